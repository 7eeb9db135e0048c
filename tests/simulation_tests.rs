use std::sync::Arc;

use darwinbots::*;

const FORAGER: &str = "
' counts its own cycles and remembers its energy
cond start
  age <- age + 1
  last <- nrg
stop
cond id = 1 start
  second <- 1
stop
end
";

fn config(species: Vec<(Arc<Species>, usize)>) -> SimulationConfig {
    SimulationConfig {
        initial_nrg: 20.0,
        nrg_decay_rate: 5.0,
        species_config: species
            .into_iter()
            .map(|(species, initial_population)| SpeciesConfig { species, initial_population })
            .collect(),
    }
}

#[test]
fn species_compile_on_creation() {
    let good = Species::new(FORAGER, "forager");
    assert!(good.is_valid());
    assert!(good.compile_err.is_none());

    let bad = Species::new("cond start stop", "broken");
    assert!(!bad.is_valid());
    assert_eq!(bad.compile_err.unwrap().message, "Expected to find end");
}

#[test]
fn every_bot_runs_its_own_dna() {
    let a = Arc::new(Species::new(FORAGER, "a"));
    let b = Arc::new(Species::new(FORAGER, "b"));
    let mut sim = Simulation::new(config(vec![(a, 3), (b, 2)])).unwrap();
    assert_eq!(sim.population_of(0), 3);
    assert_eq!(sim.population_of(1), 2);

    sim.step();
    sim.step();
    for bot in &sim.bots {
        assert_eq!(bot.sysvars.get("age"), 2.0);
        assert_eq!(bot.sysvars.get("last"), 15.0);
        assert_eq!(bot.sysvars.contains("second"), bot.species_id == 1);
    }
}

#[test]
fn population_dies_out() {
    let sp = Arc::new(Species::new(FORAGER, "forager"));
    let mut sim = Simulation::new(config(vec![(sp, 10)])).unwrap();
    let reports: Vec<_> = (0..4).map(|_| sim.step()).collect();
    assert_eq!(reports.iter().map(|r| r.alive).collect::<Vec<_>>(), vec![10, 10, 10, 0]);
    assert_eq!(reports[3].removed, 10);
    assert!(sim.bots.is_empty());
}

#[test]
fn any_invalid_species_blocks_the_simulation() {
    let good = Arc::new(Species::new(FORAGER, "good"));
    let bad = Arc::new(Species::new("cond 1 = start stop end", "bad"));
    let err = Simulation::new(config(vec![(good, 1), (bad, 1)])).unwrap_err();
    assert_eq!(err.to_string(), "Cannot use bad because it did not compile correctly");
}

#[test]
fn rules_can_run_by_hand() {
    let sp = Arc::new(Species::new("end", "idle"));
    let mut sim = Simulation::new(config(vec![(sp, 2)])).unwrap();
    sim.bots[0].nrg = 3.0;
    sim.passive_nrg_decay();
    assert_eq!(sim.remove_dead_bots(), 1);
    sim.sync_sysvars();
    assert_eq!(sim.bots[0].sysvars.get("nrg"), 15.0);
}
