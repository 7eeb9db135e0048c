//eval.rs - runs a compiled dna against a bot's sysvars
//execution can't fail: division by zero is ieee (inf/nan), unknown
//variables read as 0, and the tree is known valid once compiled.
//the only randomness is the `rnd` variable, so every entry point has a
//`_with_rng` twin that takes the generator explicitly.

use rand::Rng;

use crate::types::*;

//exp evaluation

impl Variable {
    //missing or nan (falsy) reads as 0. `rnd` reads as random() * its stored value
    pub fn execute(&self, sysvars: &Sysvars) -> f64 {
        self.execute_with_rng(sysvars, &mut rand::thread_rng())
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &Sysvars, rng: &mut R) -> f64 {
        let value = sysvars.get(&self.name);
        let value = if value.is_nan() { 0.0 } else { value };
        if self.is_rnd() {
            return rng.gen_range(0.0..1.0) * value;
        }
        value
    }
}

impl Exp {
    pub fn execute(&self, sysvars: &Sysvars) -> f64 {
        self.execute_with_rng(sysvars, &mut rand::thread_rng())
    }

    //lhs is always evaluated before rhs
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &Sysvars, rng: &mut R) -> f64 {
        match self {
            Exp::Literal(v) => *v,
            Exp::Var(var) => var.execute_with_rng(sysvars, rng),
            Exp::Minus(e) => -e.execute_with_rng(sysvars, rng),
            Exp::Add(l, r) | Exp::Sub(l, r) | Exp::Mul(l, r) | Exp::Div(l, r) | Exp::Pow(l, r) => {
                let lhs = l.execute_with_rng(sysvars, rng);
                let rhs = r.execute_with_rng(sysvars, rng);
                match self {
                    Exp::Add(..) => lhs + rhs,
                    Exp::Sub(..) => lhs - rhs,
                    Exp::Mul(..) => lhs * rhs,
                    Exp::Div(..) => lhs / rhs,
                    _ => lhs.powf(rhs),
                }
            }
        }
    }
}

//bexp evaluation

impl BExp {
    pub fn execute(&self, sysvars: &Sysvars) -> bool {
        self.execute_with_rng(sysvars, &mut rand::thread_rng())
    }

    //and/or do not short-circuit, both sides always run (lhs first)
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &Sysvars, rng: &mut R) -> bool {
        match self {
            BExp::Empty => true,

            BExp::And(l, r) => {
                let lhs = l.execute_with_rng(sysvars, rng);
                let rhs = r.execute_with_rng(sysvars, rng);
                lhs && rhs
            }

            BExp::Or(l, r) => {
                let lhs = l.execute_with_rng(sysvars, rng);
                let rhs = r.execute_with_rng(sysvars, rng);
                lhs || rhs
            }

            BExp::Equal(l, r)
            | BExp::NotEqual(l, r)
            | BExp::Greater(l, r)
            | BExp::Less(l, r)
            | BExp::GreaterEqual(l, r)
            | BExp::LessEqual(l, r) => {
                let lhs = l.execute_with_rng(sysvars, rng);
                let rhs = r.execute_with_rng(sysvars, rng);
                match self {
                    BExp::Equal(..) => lhs == rhs,
                    BExp::NotEqual(..) => lhs != rhs,
                    BExp::Greater(..) => lhs > rhs,
                    BExp::Less(..) => lhs < rhs,
                    BExp::GreaterEqual(..) => lhs >= rhs,
                    _ => lhs <= rhs,
                }
            }
        }
    }
}

//statement execution

impl BodyExp {
    pub fn execute(&self, sysvars: &mut Sysvars) {
        self.execute_with_rng(sysvars, &mut rand::thread_rng());
    }

    //exactly one write to sysvars
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &mut Sysvars, rng: &mut R) {
        let value = self.exp.execute_with_rng(sysvars, rng);
        sysvars.set(self.variable.name.as_str(), value);
    }
}

impl Gene {
    pub fn execute(&self, sysvars: &mut Sysvars) {
        self.execute_with_rng(sysvars, &mut rand::thread_rng());
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &mut Sysvars, rng: &mut R) {
        if self.cond.execute_with_rng(sysvars, rng) {
            for stmt in &self.body {
                stmt.execute_with_rng(sysvars, rng);
            }
        }
    }
}

impl Dna {
    //runs every gene once, in order. state carries over between calls
    pub fn execute(&self, sysvars: &mut Sysvars) {
        self.execute_with_rng(sysvars, &mut rand::thread_rng());
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(&self, sysvars: &mut Sysvars, rng: &mut R) {
        for gene in &self.genes {
            gene.execute_with_rng(sysvars, rng);
        }
    }
}
