//world.rs -> simulation logic
//creating the population, running every bot's dna each cycle, then the
//rules: energy decay, removing the dead, syncing sysvars.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::SimulationError;
use crate::parser::compile_source;
use crate::types::*;

impl Species {
    //compile the source straight away. a species that fails keeps its error
    pub fn new(raw_source: impl Into<String>, name: impl Into<String>) -> Self {
        let raw_source = raw_source.into();
        let name = name.into();
        let (dna, compile_err) = match compile_source(&raw_source) {
            Ok(dna) => (Some(Arc::new(dna)), None),
            Err(e) => {
                debug!(species = %name, "dna failed to compile");
                (None, Some(e))
            }
        };
        Self { name, raw_source, dna, compile_err }
    }

    pub fn is_valid(&self) -> bool {
        self.dna.is_some()
    }
}

impl Bot {
    pub fn new(species: Arc<Species>) -> Self {
        Self {
            species,
            sysvars: Sysvars::new(),
            nrg: 0.0,
            species_id: 0,
        }
    }

    //run this bot's dna once against its own sysvars
    pub fn think<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(dna) = &self.species.dna {
            dna.execute_with_rng(&mut self.sysvars, rng);
        }
    }
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        if config.species_config.is_empty() {
            return Err(SimulationError::NoSpecies);
        }
        if let Some(bad) = config.species_config.iter().find(|sc| !sc.species.is_valid()) {
            return Err(SimulationError::InvalidSpecies { name: bad.species.name.clone() });
        }

        let mut bots = Vec::new();
        for (index, sc) in config.species_config.iter().enumerate() {
            for _ in 0..sc.initial_population {
                let mut bot = Bot::new(sc.species.clone());
                bot.nrg = config.initial_nrg;
                bot.species_id = index;
                bots.push(bot);
            }
        }

        let mut sim = Self { config, bots, cycle: 0 };
        sim.sync_sysvars();
        info!(bots = sim.bots.len(), species = sim.config.species_config.len(), "simulation created");
        Ok(sim)
    }

    //one cycle with thread-local randomness
    pub fn step(&mut self) -> StepReport {
        self.bots.par_iter_mut().for_each(|bot| {
            bot.think(&mut rand::thread_rng());
        });
        self.apply_rules()
    }

    //one cycle where every bot's rng comes from (seed, cycle, index),
    //so a run is reproducible no matter how rayon splits the work
    pub fn step_seeded(&mut self, seed: u64) -> StepReport {
        let cycle = self.cycle;
        self.bots.par_iter_mut().enumerate().for_each(|(i, bot)| {
            let mut rng = StdRng::seed_from_u64(bot_seed(seed, cycle, i));
            bot.think(&mut rng);
        });
        self.apply_rules()
    }

    fn apply_rules(&mut self) -> StepReport {
        self.passive_nrg_decay();
        let removed = self.remove_dead_bots();
        //sync last, after every other rule has run
        self.sync_sysvars();
        self.cycle += 1;

        let report = StepReport { cycle: self.cycle, alive: self.bots.len(), removed };
        debug!(cycle = report.cycle, alive = report.alive, removed = report.removed, "step");
        report
    }

    //rules

    pub fn passive_nrg_decay(&mut self) {
        let rate = self.config.nrg_decay_rate;
        for bot in &mut self.bots {
            bot.nrg -= rate;
        }
    }

    //returns how many bots died
    pub fn remove_dead_bots(&mut self) -> usize {
        let before = self.bots.len();
        self.bots.retain(|bot| bot.nrg > 0.0);
        before - self.bots.len()
    }

    pub fn sync_sysvars(&mut self) {
        for bot in &mut self.bots {
            bot.sysvars.set("nrg", bot.nrg);
            bot.sysvars.set("id", bot.species_id as f64);
        }
    }

    pub fn population_of(&self, species_id: usize) -> usize {
        self.bots.iter().filter(|b| b.species_id == species_id).count()
    }
}

fn bot_seed(seed: u64, cycle: u64, index: usize) -> u64 {
    seed ^ cycle.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (index as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}
