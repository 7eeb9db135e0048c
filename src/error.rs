//error.rs - error types for compiling dna and building simulations

use thiserror::Error;

//a compile error carries the full caret excerpt in `rendered`,
//display prints exactly that so callers can show it as-is
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{rendered}")]
pub struct CompileError {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub rendered: String,
}

impl CompileError {
    pub fn new(line: usize, column: usize, message: impl Into<String>, excerpt: &str) -> Self {
        let message = message.into();
        //caret sits under column (1-based)
        let rendered = format!(
            "Error on line {} : {}\n{}\n{}^\n{}",
            line,
            column,
            excerpt,
            " ".repeat(column.saturating_sub(1)),
            message
        );
        Self { line, column, message, rendered }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Cannot use {name} because it did not compile correctly")]
    InvalidSpecies { name: String },

    #[error("simulation needs at least one species")]
    NoSpecies,
}
