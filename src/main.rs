//! tsp-qubo: solve a small TSP exactly through its QUBO formulation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;

use tsp_qubo::distance::{Coordinate, DistanceMatrix};
use tsp_qubo::qubo::Qubo;
use tsp_qubo::qubo_builder::build_tsp_qubo;
use tsp_qubo::solver_options::SolverOptions;
use tsp_qubo::tsp_solver::{check_problem_size, solve_with_coefficients};

const SAMPLE_COORDINATES: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

#[derive(Parser)]
#[command(name = "tsp-qubo")]
#[command(about = "Exact TSP solver through a QUBO formulation and exhaustive enumeration")]
#[command(version)]
struct Cli {
    /// City coordinates as x,y pairs, the unit square when omitted. Put negative values after `--`
    coordinates: Vec<String>,

    /// Row penalty weight A
    #[arg(long, default_value_t = 1000.0)]
    penalty_a: f64,

    /// Column penalty weight B
    #[arg(long, default_value_t = 1000.0)]
    penalty_b: f64,

    /// Worker threads, 0 for one per core
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Refuse instances with more binary variables than this
    #[arg(long, default_value_t = 36)]
    max_variables: usize,

    /// Stop after this many assignments
    #[arg(long)]
    max_evaluations: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    max_time: Option<f64>,

    /// Write the QUBO to this file before solving
    #[arg(long)]
    write_qubo: Option<PathBuf>,

    /// Solver output level, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let coordinates: Vec<Coordinate> = match cli.coordinates.is_empty() {
        true => SAMPLE_COORDINATES.iter().copied().map(Coordinate::from).collect(),
        false => cli
            .coordinates
            .iter()
            .map(|s| parse_coordinate(s))
            .collect::<Result<Vec<_>>>()?,
    };

    let mut options = SolverOptions::new();
    options.set_penalties(Some(cli.penalty_a), Some(cli.penalty_b));
    options.set_threads(cli.threads);
    options.max_variables = cli.max_variables;
    options.max_evaluations = cli.max_evaluations;
    options.max_time = cli.max_time;
    options.verbose = usize::from(cli.verbose);
    options.penalties.validate()?;

    let dist = DistanceMatrix::from_coordinates(&coordinates)?;
    let search_space = check_problem_size(dist.num_cities(), &options)?;
    info!(
        "{} cities, {} binary variables, {search_space} assignments to enumerate",
        dist.num_cities(),
        dist.num_cities() * dist.num_cities()
    );

    let coefficients = build_tsp_qubo(&dist, &options.penalties);
    if let Some(path) = &cli.write_qubo {
        Qubo::from_coefficients(&coefficients)
            .write_qubo(path)
            .with_context(|| format!("writing QUBO to {}", path.display()))?;
    }

    let solution = solve_with_coefficients(&dist, &coefficients, &options)?;

    let route: Vec<String> = solution.tour.iter().map(ToString::to_string).collect();
    println!("Tour: {} -> {}", route.join(" -> "), solution.tour[0]);
    println!("Energy: {}", solution.energy);
    println!("Tour length: {}", solution.tour_length);
    println!("Optimal assignments: {}", solution.degeneracy);

    Ok(())
}

fn parse_coordinate(s: &str) -> Result<Coordinate> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("coordinate '{s}' is not of the form x,y");
    };

    let x: f64 = x.trim().parse().with_context(|| format!("bad x in '{s}'"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("bad y in '{s}'"))?;
    Ok(Coordinate::new(x, y))
}
