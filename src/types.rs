//types.rs - core data types for darwinbots
//the dna syntax tree, the sysvars store every bot carries, and the
//structures the simulation is built from. no parsing or execution here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::CompileError;

//sysvars - a bot's variable store
//the dna reads and writes it by name. missing names read as 0
//and a write always succeeds.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sysvars {
    store: HashMap<String, f64>,
}

impl Sysvars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> f64 {
        self.store.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.store.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    //name-ordered copy, handy for printing and comparing
    pub fn sorted(&self) -> Vec<(String, f64)> {
        let mut vars: Vec<_> = self.store.iter().map(|(k, v)| (k.clone(), *v)).collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Sysvars {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self { store: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

//syntax tree
//every node is built once by the parser and never changed afterwards,
//so a compiled dna can be shared between threads behind an Arc.

pub const RESERVED: [&str; 6] = ["cond", "and", "or", "start", "stop", "end"];

//name of the variable that reads back as random() * its stored value
pub const RND: &str = "rnd";

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_rnd(&self) -> bool {
        self.name == RND
    }
}

//exp - numeric expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    Literal(f64),             //5, 2.5, .5
    Var(Variable),            //eye1
    Add(Box<Exp>, Box<Exp>),  //a + b
    Sub(Box<Exp>, Box<Exp>),  //a - b
    Mul(Box<Exp>, Box<Exp>),  //a * b
    Div(Box<Exp>, Box<Exp>),  //a / b
    Pow(Box<Exp>, Box<Exp>),  //a ^ b
    Minus(Box<Exp>),          //-a
}

impl Exp {
    pub fn var(name: impl Into<String>) -> Self {
        Exp::Var(Variable::new(name))
    }
}

//bexp - conditions. Empty is the cond of a gene with nothing between
//cond and start, it is always true
#[derive(Debug, Clone, PartialEq)]
pub enum BExp {
    Empty,
    Equal(Exp, Exp),           //a = b
    NotEqual(Exp, Exp),        //a != b
    Greater(Exp, Exp),         //a > b
    Less(Exp, Exp),            //a < b
    GreaterEqual(Exp, Exp),    //a >= b
    LessEqual(Exp, Exp),       //a <= b
    And(Box<BExp>, Box<BExp>), //a and b
    Or(Box<BExp>, Box<BExp>),  //a or b
}

//a single `variable <- expression` statement in a gene body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyExp {
    pub variable: Variable,
    pub exp: Exp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub cond: BExp,
    pub body: Vec<BodyExp>,
}

//the root, genes run in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dna {
    pub genes: Vec<Gene>,
}

//pretty printing

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.name)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, lhs, rhs) = match self {
            Exp::Literal(v) => return write!(f, "Literal({})", v),
            Exp::Var(v) => return write!(f, "{}", v),
            Exp::Minus(e) => return write!(f, "Minus({})", e),
            Exp::Add(l, r) => ("ADD_EXPR", l, r),
            Exp::Sub(l, r) => ("SUB_EXPR", l, r),
            Exp::Mul(l, r) => ("MUL_EXPR", l, r),
            Exp::Div(l, r) => ("DIV_EXPR", l, r),
            Exp::Pow(l, r) => ("POW_EXPR", l, r),
        };
        write!(f, "{}({}, {})", tag, lhs, rhs)
    }
}

impl fmt::Display for BExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, lhs, rhs) = match self {
            BExp::Empty => return write!(f, "EmptyCond()"),
            BExp::And(l, r) => return write!(f, "AndPhrase({} and {})", l, r),
            BExp::Or(l, r) => return write!(f, "OrPhrase({} or {})", l, r),
            BExp::Equal(l, r) => ("E_COND_EXPR", l, r),
            BExp::NotEqual(l, r) => ("NE_COND_EXPR", l, r),
            BExp::Greater(l, r) => ("G_COND_EXPR", l, r),
            BExp::Less(l, r) => ("L_COND_EXPR", l, r),
            BExp::GreaterEqual(l, r) => ("GE_COND_EXPR", l, r),
            BExp::LessEqual(l, r) => ("LE_COND_EXPR", l, r),
        };
        write!(f, "{}({}, {})", tag, lhs, rhs)
    }
}

impl fmt::Display for BodyExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyExpression: {} <- {}", self.variable, self.exp)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gene(")?;
        writeln!(f, "  Cond(")?;
        writeln!(f, "    {}", self.cond)?;
        writeln!(f, "  )")?;
        writeln!(f, "  Body(")?;
        for stmt in &self.body {
            writeln!(f, "    {}", stmt)?;
        }
        writeln!(f, "  )")?;
        write!(f, ")")
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dna Start:\n\n")?;
        for gene in &self.genes {
            writeln!(f, "{}", gene)?;
        }
        write!(f, "Dna End")
    }
}

//simulation structures

//a named dna program. a species whose source does not compile keeps
//the error and can't be used to populate a simulation.
#[derive(Debug, Clone)]
pub struct Species {
    pub name: String,
    pub raw_source: String,
    pub dna: Option<Arc<Dna>>,
    pub compile_err: Option<CompileError>,
}

//a single bot - owns its sysvars, shares its species' dna
#[derive(Debug, Clone)]
pub struct Bot {
    pub species: Arc<Species>,
    pub sysvars: Sysvars,
    pub nrg: f64,
    pub species_id: usize,
}

#[derive(Debug, Clone)]
pub struct SpeciesConfig {
    pub species: Arc<Species>,
    pub initial_population: usize,
}

//settings for a whole run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub initial_nrg: f64,
    pub nrg_decay_rate: f64,
    pub species_config: Vec<SpeciesConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_nrg: 100.0,
            nrg_decay_rate: 2.0,
            species_config: Vec::new(),
        }
    }
}

//the running population
#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: SimulationConfig,
    pub bots: Vec<Bot>,
    pub cycle: u64,
}

//what a single step did, for logging and the cli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub cycle: u64,
    pub alive: usize,
    pub removed: usize,
}
