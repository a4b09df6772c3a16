use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use permsolve::{textual::TextualPuzzle, zebra, SolveError, Solver};
use tracing_subscriber::EnvFilter;

/// Solve logic grid puzzles by enumerating permutations.
#[derive(Parser, Debug)]
#[command(name = "permsolve", version, about, long_about = None)]
struct Cli {
    /// Puzzle file in the textual syntax. Solves the built-in zebra puzzle when omitted.
    puzzle: Option<PathBuf>,

    /// Print every solution instead of only the first one.
    #[arg(short, long, conflicts_with = "limit")]
    all: bool,

    /// Print at most this many solutions.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Run the search this many times, e.g. for timing.
    #[arg(short, long, default_value_t = 1)]
    repeat: usize,

    /// Print search statistics after each run.
    #[arg(short, long)]
    stats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let solver = match load(cli.puzzle.as_ref()) {
        Some(solver) => solver,
        None => return ExitCode::FAILURE,
    };

    let limit = if cli.all {
        None
    } else {
        Some(cli.limit.unwrap_or(1))
    };

    for _ in 0..cli.repeat {
        if let Err(err) = run(&solver, limit, cli.stats) {
            tracing::error!("search aborted: {}", err);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn load(path: Option<&PathBuf>) -> Option<Solver> {
    let Some(path) = path else {
        return match zebra::solver() {
            Ok(solver) => Some(solver),
            Err(err) => {
                tracing::error!("failed to build the zebra puzzle: {}", err);
                None
            }
        };
    };

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!("failed to read {}: {}", path.display(), err);
            return None;
        }
    };

    let mut puzzle = TextualPuzzle::new();
    if let Err(err) = puzzle.load_str(&source) {
        let (line, col) = err.line_col(&source);
        tracing::error!("{}:{}:{}: {}", path.display(), line, col, err.kind);
        return None;
    }

    match puzzle.solver() {
        Ok(solver) => Some(solver),
        Err(err) => {
            tracing::error!("invalid puzzle {}: {}", path.display(), err);
            None
        }
    }
}

fn run(solver: &Solver, limit: Option<usize>, stats: bool) -> Result<(), SolveError> {
    let mut search = solver.solve();
    let before = Instant::now();
    let mut found = 0;
    while limit.map_or(true, |limit| found < limit) {
        let Some(solution) = search.next().transpose()? else {
            break;
        };
        found += 1;
        println!("{}", solution);
    }
    let duration = before.elapsed();

    println!(
        "Took {:.3}s with {} solutions",
        duration.as_secs_f64(),
        found
    );
    if stats {
        println!("{}", search.stats());
    }
    Ok(())
}
