// files tldr:
// - lexer.rs  : source manager, cursor + pattern matching + caret errors
// - types.rs  : syntax tree, sysvars, simulation structures
// - parser.rs : source to syntax tree
// - eval.rs   : runs the syntax tree against sysvars
// - world.rs  : simulation logic
// - error.rs  : compile and simulation errors

pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod world;

pub use error::{CompileError, SimulationError};
pub use parser::{Parser, compile_source};
pub use types::*;
