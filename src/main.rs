use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use darwinbots::{Simulation, SimulationConfig, Species, SpeciesConfig, Sysvars, compile_source};

/// Compile and run DarwinBots dna.
#[derive(Parser)]
#[command(name = "darwinbots", version, about = "Compile and run DarwinBots dna")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a dna file compiles
    Check { file: PathBuf },

    /// Print the syntax tree of a dna file
    Dump { file: PathBuf },

    /// Run a dna file against a single sysvars map
    Exec {
        file: PathBuf,
        /// Number of times to run the dna
        #[arg(long, default_value_t = 1)]
        ticks: usize,
        /// Initial sysvar, as name=value (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, f64)>,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a population simulation, one species per file
    Run {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Bots per species
        #[arg(long, default_value_t = 100)]
        population: usize,
        #[arg(long, default_value_t = 100.0)]
        initial_nrg: f64,
        /// Energy lost by every bot each cycle
        #[arg(long, default_value_t = 2.0)]
        decay: f64,
        #[arg(long, default_value_t = 10)]
        steps: usize,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Time repeated execution of a dna file
    Bench {
        file: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        iterations: usize,
    },
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected name=value, got `{}`", s))?;
    let value = value.trim().parse::<f64>().map_err(|e| format!("bad value for {}: {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Check { file } => {
            compile_file(&file)?;
            println!("{}: ok", file.display());
            Ok(())
        }
        Commands::Dump { file } => {
            println!("{}", compile_file(&file)?);
            Ok(())
        }
        Commands::Exec { file, ticks, set, seed } => exec(&file, ticks, set, seed),
        Commands::Run { files, population, initial_nrg, decay, steps, seed } => {
            let mut species_config = Vec::new();
            for file in &files {
                species_config.push(SpeciesConfig {
                    species: Arc::new(load_species(file)?),
                    initial_population: population,
                });
            }
            let config = SimulationConfig { initial_nrg, nrg_decay_rate: decay, species_config };
            simulate(config, steps, seed)
        }
        Commands::Bench { file, iterations } => bench(&file, iterations),
    }
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn compile_file(file: &Path) -> Result<darwinbots::Dna> {
    let src = read_source(file)?;
    compile_source(&src).map_err(|e| anyhow!("{}\n{}", file.display(), e))
}

fn load_species(file: &Path) -> Result<Species> {
    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let species = Species::new(read_source(file)?, name);
    if let Some(err) = &species.compile_err {
        warn!(species = %species.name, "species does not compile");
        bail!("{}\n{}", file.display(), err);
    }
    Ok(species)
}

fn exec(file: &Path, ticks: usize, set: Vec<(String, f64)>, seed: Option<u64>) -> Result<()> {
    let dna = compile_file(file)?;
    let mut sysvars: Sysvars = set.into_iter().collect();
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..ticks {
                dna.execute_with_rng(&mut sysvars, &mut rng);
            }
        }
        None => {
            for _ in 0..ticks {
                dna.execute(&mut sysvars);
            }
        }
    }
    for (name, value) in sysvars.sorted() {
        println!("{} = {}", name, value);
    }
    Ok(())
}

fn simulate(config: SimulationConfig, steps: usize, seed: Option<u64>) -> Result<()> {
    let names: Vec<String> = config.species_config.iter().map(|sc| sc.species.name.clone()).collect();
    let mut sim = Simulation::new(config)?;
    let start = Instant::now();

    for _ in 0..steps {
        let report = match seed {
            Some(seed) => sim.step_seeded(seed),
            None => sim.step(),
        };
        info!(cycle = report.cycle, alive = report.alive, removed = report.removed, "cycle done");
        if report.alive == 0 {
            info!("every bot has died");
            break;
        }
    }

    let elapsed = start.elapsed();
    for (id, name) in names.iter().enumerate() {
        println!("{}: {} alive", name, sim.population_of(id));
    }
    println!(
        "{} cycles in {:.3} ms ({:.3} ms per cycle)",
        sim.cycle,
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1000.0 / sim.cycle.max(1) as f64
    );
    Ok(())
}

fn bench(file: &Path, iterations: usize) -> Result<()> {
    let dna = compile_file(file)?;
    let start = Instant::now();
    for _ in 0..iterations {
        dna.execute(&mut Sysvars::new());
    }
    let elapsed = start.elapsed();
    println!("{} iterations in {:.3} ms", iterations, elapsed.as_secs_f64() * 1000.0);
    Ok(())
}
