use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::CompileError;
use crate::lexer::Source;
use crate::types::*;
//recursive descent over the source, one method per grammar rule.
//every rule either returns a node and leaves the cursor after it, or
//returns the first error it hit. there is no recovery: one bad gene
//fails the whole dna.

fn pattern(p: &str) -> Regex {
    Regex::new(&format!("^(?:{})", p)).expect("parser pattern")
}

macro_rules! keyword {
    ($name:ident, $word:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| pattern(concat!($word, r"\b")));
    };
}

keyword!(COND, "cond");
keyword!(START, "start");
keyword!(STOP, "stop");
keyword!(END, "end");
keyword!(AND, "and");
keyword!(OR, "or");

static ASSIGN: Lazy<Regex> = Lazy::new(|| pattern("<-"));
static ADD_OP: Lazy<Regex> = Lazy::new(|| pattern(r"\+|-"));
static MUL_OP: Lazy<Regex> = Lazy::new(|| pattern(r"\*|/"));
static POW_OP: Lazy<Regex> = Lazy::new(|| pattern(r"\^"));
static MINUS: Lazy<Regex> = Lazy::new(|| pattern("-"));
static BOOL_OP: Lazy<Regex> = Lazy::new(|| pattern(r"!=|[<>]=?|="));
static LPAREN: Lazy<Regex> = Lazy::new(|| pattern(r"\("));
static RPAREN: Lazy<Regex> = Lazy::new(|| pattern(r"\)"));
static LITERAL: Lazy<Regex> = Lazy::new(|| pattern(r"\d+(?:\.\d*)?|\.\d*"));
static VARIABLE: Lazy<Regex> = Lazy::new(|| pattern(r"[a-zA-Z]+(?:\d+[a-zA-Z]*)*"));

//entry point: source text in, dna out
pub fn compile_source(src: &str) -> Result<Dna, CompileError> {
    let dna = Parser::new(src).parse_dna()?;
    debug!(genes = dna.genes.len(), "compiled dna");
    Ok(dna)
}

pub struct Parser {
    source: Source,
}

impl Parser {
    pub fn new(src: &str) -> Self {
        Self { source: Source::new(src) }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    fn error(&self, msg: &str) -> CompileError {
        self.source.error_at_cursor(msg)
    }

    //Dna := Gene* 'end'
    pub fn parse_dna(&mut self) -> Result<Dna, CompileError> {
        let mut genes = Vec::new();
        while self.source.expect_not(&END, "end").is_ok() {
            if self.source.at_eof() {
                break;
            }
            genes.push(self.parse_gene()?);
        }
        self.source.expect(&END, "end")?;
        Ok(Dna { genes })
    }

    //Gene := 'cond' CondExpr* 'start' BodyExpr* 'stop'
    //several conds in a row are and-ed, none at all is the always-true EmptyCond
    pub fn parse_gene(&mut self) -> Result<Gene, CompileError> {
        self.source.expect(&COND, "cond")?;
        self.source.inside_gene = true;

        let mut conds = Vec::new();
        while self.source.expect_not(&START, "start").is_ok() {
            if self.source.at_eof() {
                break;
            }
            self.check_not_end()?;
            conds.push(self.parse_cond_exp()?);
        }
        self.source.expect(&START, "start")?;

        let mut body = Vec::new();
        while self.source.expect_not(&STOP, "stop").is_ok() {
            if self.source.at_eof() {
                break;
            }
            self.check_not_end()?;
            body.push(self.parse_body_exp()?);
        }
        if self.source.paren_ctr != 0 {
            return Err(self.error("Unclosed parenthesis in gene body"));
        }
        self.source.expect(&STOP, "stop")?;
        self.source.inside_gene = false;

        let cond = conds
            .into_iter()
            .rev()
            .reduce(|rhs, lhs| BExp::And(Box::new(lhs), Box::new(rhs)))
            .unwrap_or(BExp::Empty);
        Ok(Gene { cond, body })
    }

    fn check_not_end(&mut self) -> Result<(), CompileError> {
        if self.source.inside_gene && self.source.lookahead(&END).is_some() {
            return Err(self.error("Expected to find stop before end of dna"));
        }
        Ok(())
    }

    //CondExpr := AndPhrase
    pub fn parse_cond_exp(&mut self) -> Result<BExp, CompileError> {
        self.parse_and_phrase()
    }

    //AndPhrase := OrPhrase ('and' AndPhrase)?
    pub fn parse_and_phrase(&mut self) -> Result<BExp, CompileError> {
        let lhs = self.parse_or_phrase()?;
        if self.source.accept(&AND).is_some() {
            let rhs = self.parse_and_phrase()?;
            return Ok(BExp::And(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    //OrPhrase := BoolGroup ('or' OrPhrase)?
    pub fn parse_or_phrase(&mut self) -> Result<BExp, CompileError> {
        let lhs = self.parse_bool_group()?;
        if self.source.accept(&OR).is_some() {
            let rhs = self.parse_or_phrase()?;
            return Ok(BExp::Or(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    //BoolGroup := '(' AndPhrase ')' | BoolTerm
    pub fn parse_bool_group(&mut self) -> Result<BExp, CompileError> {
        if self.source.accept(&LPAREN).is_some() {
            let phrase = self.parse_and_phrase()?;
            self.source.expect(&RPAREN, ")")?;
            return Ok(phrase);
        }
        self.parse_bool_term()
    }

    //BoolTerm := Expression op Expression
    pub fn parse_bool_term(&mut self) -> Result<BExp, CompileError> {
        let lhs = self.parse_exp()?;
        let op = self.source.expect(&BOOL_OP, "boolean operation")?;
        let rhs = self.parse_exp()?;
        Ok(match op.as_str() {
            "=" => BExp::Equal(lhs, rhs),
            "!=" => BExp::NotEqual(lhs, rhs),
            ">" => BExp::Greater(lhs, rhs),
            "<" => BExp::Less(lhs, rhs),
            ">=" => BExp::GreaterEqual(lhs, rhs),
            "<=" => BExp::LessEqual(lhs, rhs),
            _ => unreachable!("BOOL_OP only matches comparison operators"),
        })
    }

    //BodyExpr := Variable '<-' Expression
    pub fn parse_body_exp(&mut self) -> Result<BodyExp, CompileError> {
        let variable = self.parse_variable()?;
        self.source.expect(&ASSIGN, "<-")?;
        let exp = self.parse_exp()?;
        Ok(BodyExp { variable, exp })
    }

    //Expression := Term (('+'|'-') Expression)?
    //right recursive, so 2 - 3 - 5 is 2 - (3 - 5)
    pub fn parse_exp(&mut self) -> Result<Exp, CompileError> {
        let lhs = self.parse_term()?;
        match self.source.accept(&ADD_OP).as_deref() {
            Some("+") => Ok(Exp::Add(Box::new(lhs), Box::new(self.parse_exp()?))),
            Some(_) => Ok(Exp::Sub(Box::new(lhs), Box::new(self.parse_exp()?))),
            None => Ok(lhs),
        }
    }

    //Term := Factor (('*'|'/') Term)?
    pub fn parse_term(&mut self) -> Result<Exp, CompileError> {
        let lhs = self.parse_factor()?;
        match self.source.accept(&MUL_OP).as_deref() {
            Some("*") => Ok(Exp::Mul(Box::new(lhs), Box::new(self.parse_term()?))),
            Some(_) => Ok(Exp::Div(Box::new(lhs), Box::new(self.parse_term()?))),
            None => Ok(lhs),
        }
    }

    //Factor := Unary ('^' Factor)?
    pub fn parse_factor(&mut self) -> Result<Exp, CompileError> {
        let base = self.parse_unary()?;
        if self.source.accept(&POW_OP).is_some() {
            let exponent = self.parse_factor()?;
            return Ok(Exp::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    //Unary := '-' Unary | Group
    pub fn parse_unary(&mut self) -> Result<Exp, CompileError> {
        if self.source.accept(&MINUS).is_some() {
            let inner = self.parse_unary()?;
            return Ok(Exp::Minus(Box::new(inner)));
        }
        self.parse_group()
    }

    //Group := '(' Expression ')' | Literal | Variable
    pub fn parse_group(&mut self) -> Result<Exp, CompileError> {
        if self.source.accept(&LPAREN).is_some() {
            self.source.paren_ctr += 1;
            let exp = self.parse_exp()?;
            if self.source.accept(&RPAREN).is_none() {
                //left open right before stop: the gene reports the unclosed paren
                if self.source.lookahead(&STOP).is_some() {
                    return Ok(exp);
                }
                return Err(self.error("Expected to find )"));
            }
            self.source.paren_ctr -= 1;
            return Ok(exp);
        }
        self.parse_literal()
            .or_else(|_| self.parse_variable().map(Exp::Var))
    }

    //a number that is not glued to a letter: 5, 2.5, 5., .5
    pub fn parse_literal(&mut self) -> Result<Exp, CompileError> {
        self.source.skip_whitespace();
        let start = self.source.cursor;
        let text = self.source.expect(&LITERAL, "number")?;
        if self.source.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.source.rewind(start);
            return Err(self.error("Expected to find number"));
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(Exp::Literal(value)),
            Err(_) => {
                self.source.rewind(start);
                Err(self.error("Expected valid number"))
            }
        }
    }

    //letters, then optional digit+letter groups. keywords are rejected
    pub fn parse_variable(&mut self) -> Result<Variable, CompileError> {
        self.source.skip_whitespace();
        let start = self.source.cursor;
        let name = self.source.expect(&VARIABLE, "variable")?;
        if RESERVED.contains(&name.as_str()) {
            self.source.rewind(start);
            return Err(self.error(&format!("Unexpected keyword {}", name)));
        }
        Ok(Variable::new(name))
    }
}
