use std::path::PathBuf;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::time::Instant;

use permsolve::textual::{ParseError, TextualPuzzle};
use permsolve::Step;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

const HEADER: &str = "
#=======================#
# permsolve REPL v0.1.0 #
#=======================#
";

fn main() {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt::init();

    println!("{}", HEADER);

    let mut rl = Editor::<(), DefaultHistory>::new().expect("Failed to initialize REPL");

    // ================= SETUP HISTORY ========================
    let history_path = get_history_path();
    if let Some(history_path) = history_path.as_ref() {
        match rl.load_history(history_path.as_path()) {
            Ok(()) => tracing::debug!("History loaded"),
            Err(ReadlineError::Io(ioerr)) if ioerr.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No previous history")
            }
            Err(err) => tracing::error!("Failed to load history: {}", err),
        }
    }

    // ================= CTRL-C HANDLING ========================

    // rustyline only sees Ctrl-C during prompts, a running search needs its own flag.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_in_handler = interrupted.clone();
    if let Err(err) =
        ctrlc::set_handler(move || interrupted_in_handler.store(true, atomic::Ordering::SeqCst))
    {
        tracing::error!(
            "Could not install Ctrl-C handler, searches cannot be interrupted: {}",
            err
        );
    }

    let mut state = AppState::new(interrupted);

    // ================= ACTUAL REPL ========================

    loop {
        match rl.readline("|- ") {
            Ok(line) => {
                rl.add_history_entry(&line).expect("Couldn't add history");
                dispatch(&mut state, line)
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C also interrupts searches, so it must not close the REPL.
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                tracing::error!("readline: {}", err);
                break;
            }
        }
    }

    // ================= CLEANUP ========================

    if let Some(history_path) = history_path.as_ref() {
        if let Err(err) = rl.save_history(history_path) {
            tracing::error!("Failed to save history: {}", err);
        } else {
            tracing::debug!("History saved");
        }
    }
}

/// Puzzles are consumed when solved, so the REPL keeps every accepted chunk of source and
/// rebuilds the puzzle from it when needed.
struct AppState {
    sources: Vec<String>,
    puzzle: TextualPuzzle,
    interrupted: Arc<AtomicBool>,
}

impl AppState {
    fn new(interrupted: Arc<AtomicBool>) -> Self {
        Self {
            sources: Vec::new(),
            puzzle: TextualPuzzle::new(),
            interrupted,
        }
    }

    fn define(&mut self, source: &str) -> Result<(), ParseError> {
        match self.puzzle.load_str(source) {
            Ok(()) => {
                self.sources.push(source.to_owned());
                Ok(())
            }
            Err(err) => {
                // a failed chunk may have been applied partially
                self.puzzle = self.rebuild();
                Err(err)
            }
        }
    }

    fn rebuild(&self) -> TextualPuzzle {
        let mut puzzle = TextualPuzzle::new();
        for source in &self.sources {
            if let Err(err) = puzzle.load_str(source) {
                tracing::error!("previously accepted source failed to parse: {}", err);
            }
        }
        puzzle
    }
}

fn dispatch(state: &mut AppState, line: String) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if line.starts_with(':') {
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        for cmd in COMMANDS {
            if command == cmd.name {
                return (cmd.run)(state, args.trim());
            }
        }
        println!("No such command: {}", command);
    } else {
        define(state, line);
    }
}

fn define(state: &mut AppState, source: &str) {
    if let Err(err) = state.define(source) {
        let (line, col) = err.line_col(source);
        println!("Failed to parse at {}:{}: {}", line, col, err.kind);
    }
}

fn solve(state: &mut AppState, args: &str) {
    let limit = if args.is_empty() {
        None
    } else {
        match args.parse::<usize>() {
            Ok(limit) => Some(limit),
            Err(_) => {
                println!("Usage:\n\t:solve [<limit>]");
                return;
            }
        }
    };

    let solver = match state.rebuild().solver() {
        Ok(solver) => solver,
        Err(err) => {
            println!("Invalid puzzle: {}", err);
            return;
        }
    };

    state.interrupted.store(false, atomic::Ordering::SeqCst);
    let mut solutions = solver.solve();
    let mut found = 0;
    loop {
        if limit.map_or(false, |limit| found >= limit) {
            println!("Limit reached.");
            break;
        }
        if state.interrupted.load(atomic::Ordering::SeqCst) {
            println!("Interrupted!");
            break;
        }
        match solutions.step() {
            Ok(Step::Yield) => {
                found += 1;
                println!("Found solution:");
                println!("{}", solutions.get_solution());
            }
            Ok(Step::Continue) => continue,
            Ok(Step::Done) => {
                println!("No more solutions.");
                break;
            }
            Err(err) => {
                println!("Search aborted: {}", err);
                break;
            }
        }
    }
    println!("{}", solutions.stats());
}

static COMMANDS: &[Command] = &[
    Command {
        name: ":help",
        args: "",
        help: "Show this help message.",
        run: &|_state, _args| {
            println!("Lines not starting with ':' are added to the puzzle.");
            println!("Available commands:");
            let max_width = COMMANDS
                .iter()
                .map(|cmd| cmd.name.len() + cmd.args.len() + 1)
                .max()
                .unwrap_or(0);
            let spaces: String = " ".repeat(max_width + 2);
            for cmd in COMMANDS {
                let width = cmd.name.len() + cmd.args.len() + 1;
                let num_spaces = max_width - width + 2;
                println!(
                    "  {} {}{}{}",
                    cmd.name,
                    cmd.args,
                    &spaces[0..num_spaces],
                    cmd.help
                );
            }
        },
    },
    Command {
        name: ":load",
        args: "<filename>",
        help: "Add the statements in the given file to the puzzle.",
        run: &|state, args| {
            if args.is_empty() {
                println!("Usage:\n\t:load <filename>");
                return;
            }
            match std::fs::read_to_string(args) {
                Ok(contents) => match state.define(&contents) {
                    Ok(()) => println!("Loaded!"),
                    Err(err) => {
                        let (line, col) = err.line_col(&contents);
                        println!("Failed to parse {}:{}:{}: {}", args, line, col, err.kind);
                    }
                },
                Err(err) => {
                    println!("Failed to load: {}", err);
                }
            }
        },
    },
    Command {
        name: ":zebra",
        args: "",
        help: "Add the zebra puzzle.",
        run: &|state, _args| define(state, permsolve::zebra::SOURCE),
    },
    Command {
        name: ":show",
        args: "",
        help: "Print the groups and constraints of the puzzle.",
        run: &|state, _args| {
            let puzzle = state.puzzle.puzzle();
            let pretty = state.puzzle.pretty();
            for group in puzzle.groups() {
                println!("{}", pretty.group_to_string(group));
            }
            for constraint in puzzle.constraints() {
                println!("{}.", pretty.predicate_to_string(constraint));
            }
        },
    },
    Command {
        name: ":reset",
        args: "",
        help: "Forget all groups and constraints.",
        run: &|state, _args| {
            state.sources.clear();
            state.puzzle = TextualPuzzle::new();
        },
    },
    Command {
        name: ":solve",
        args: "[<limit>]",
        help: "Print the solutions of the puzzle.",
        run: &solve,
    },
    Command {
        name: ":time",
        args: "[<limit>]",
        help: "Time the duration of the search.",
        run: &|state, args| {
            let start = Instant::now();
            solve(state, args);
            let duration = start.elapsed();
            println!("Took {:.4}s", duration.as_secs_f64());
        },
    },
];

struct Command {
    name: &'static str,
    args: &'static str,
    help: &'static str,
    run: &'static (dyn Fn(&mut AppState, &str) + Sync + Send + 'static),
}

fn get_history_path() -> Option<PathBuf> {
    if let Some(mut config_path) = dirs::config_dir() {
        config_path.push("permsolve");
        match std::fs::create_dir(&config_path) {
            Ok(()) => (),
            Err(ioerr) if ioerr.kind() == std::io::ErrorKind::AlreadyExists => (),
            Err(other) => {
                tracing::error!(
                    "Failed to create config dir {}: {}",
                    config_path.display(),
                    other
                );
                return None;
            }
        };
        config_path.push("history.txt");
        tracing::info!("Using history file: {}", config_path.display());
        Some(config_path)
    } else {
        tracing::error!("Could not determine config folder, history will not be persisted");
        None
    }
}
