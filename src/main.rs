use anyhow::{Context, Result};
use clap::Parser;
use evonet_core::{
    init_logging, sort_organisms, EvaluationConfig, Encoding, Metrics, Organism,
    ParallelEvaluator, PopulationEvaluator, SequentialEvaluator,
};
use evonet_data::Genome;
use evonet_lib::xor;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate neuroevolution phenotypes on XOR", long_about = None)]
struct Args {
    /// Evaluation config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Genome file in text form; a random population is used when absent
    #[arg(short, long)]
    genome: Option<PathBuf>,

    /// Evaluate through compiled solvers
    #[arg(long)]
    compiled: bool,

    /// Evaluate on rayon workers
    #[arg(long)]
    parallel: bool,

    /// Size of the random population
    #[arg(short, long, default_value_t = 10)]
    population: usize,

    /// Hidden nodes per random genome
    #[arg(long, default_value_t = 2)]
    hidden: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct OrganismReport {
    genome: usize,
    fitness: f64,
    error: f64,
    winner: bool,
    complexity: usize,
    outputs: Vec<f64>,
}

#[derive(Serialize)]
struct Report {
    config_fingerprint: String,
    evaluated: usize,
    best_fitness: f64,
    winners: usize,
    organisms: Vec<OrganismReport>,
}

fn load_genome(path: &Path) -> Result<Genome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading genome {}", path.display()))?;
    let id = text
        .split_whitespace()
        .skip_while(|w| *w != "genomestart")
        .nth(1)
        .and_then(|w| w.parse().ok())
        .context("genome file has no genomestart record")?;
    Ok(Genome::read_from(&mut text.as_bytes(), id)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EvaluationConfig::from_file(path)?,
        None => EvaluationConfig::default(),
    };
    if args.compiled {
        config.use_compiled_solver = true;
    }
    if config.solved_fitness.is_none() {
        config.solved_fitness = Some(xor::MAX_FITNESS * 0.9);
    }

    init_logging(config.tracing_level());

    let mut population = match &args.genome {
        Some(path) => {
            let genome = load_genome(path)?;
            vec![Organism::new(0.0, genome, 0)?]
        }
        None => xor::random_population(args.population, args.hidden, args.seed, 0)?,
    };
    tracing::info!(
        organisms = population.len(),
        compiled = config.use_compiled_solver,
        parallel = args.parallel,
        fingerprint = %config.fingerprint(),
        "Starting evaluation"
    );

    let metrics = Arc::new(Metrics::new());
    let task_config = config.clone();
    let fitness = move |org: &mut Organism<Genome>| xor::evaluate(org, &task_config).map(|_| ());
    let stats = if args.parallel {
        ParallelEvaluator::new(config.clone(), metrics.clone())?.evaluate(&mut population, 0, &fitness)?
    } else {
        SequentialEvaluator::new(config.clone(), metrics.clone()).evaluate(&mut population, 0, &fitness)?
    };

    sort_organisms(&mut population);
    population.reverse();

    let mut organisms = Vec::with_capacity(population.len());
    for org in &mut population {
        let fitness = org.fitness;
        let winner = org.is_winner;
        let outputs = xor::evaluate(org, &config)?;
        org.fitness = fitness;
        org.is_winner = winner;
        organisms.push(OrganismReport {
            genome: org.genotype.id,
            fitness: org.fitness,
            error: org.error,
            winner: org.is_winner,
            complexity: org.complexity(),
            outputs,
        });
    }

    let report = Report {
        config_fingerprint: config.fingerprint(),
        evaluated: stats.evaluated,
        best_fitness: stats.best_fitness,
        winners: stats.winners,
        organisms,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (org, row) in population.iter().zip(&report.organisms) {
            println!("genome {:>4} {} outputs {:.3?}", row.genome, org, row.outputs);
        }
        println!(
            "evaluated {} organisms in {:?}: best fitness {:.3}, {} winner(s)",
            report.evaluated,
            metrics.elapsed(),
            report.best_fitness,
            report.winners
        );
    }
    Ok(())
}
