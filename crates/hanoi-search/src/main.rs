//! CLI entry point for the Tower of Hanoi explorer.
//!
//! Usage:
//!   hanoi-search solve --towers <t> --rings <r> [options]
//!   hanoi-search solve-file <puzzle.json> | --stdin [options]
//!   hanoi-search check <solution.json> | --stdin
//!   hanoi-search interactive
//!
//! Options:
//!   --from <tower>        Tower holding the full stack at the start (default: 0)
//!   --to <tower>          Tower holding the full stack at the end (default: last)
//!   --max-rounds <n>      Stop after n breadth-first rounds
//!   --timeout <seconds>   Stop after this much search time
//!   --json                Print a JSON report instead of the move list
//!
//! Logs go to stderr; set RUST_LOG (e.g. `hanoi_search=debug`) or pass
//! --verbose to see per-round progress.

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hanoi_search::{
    render_moves, replay, solve, PuzzleConfig, SearchConfig, SolutionCheck, SolveReport,
};

const WELCOME_MESSAGE: &str = "Welcome to quite bad tower of hanoi solver!";
const QUES_TOWERS: &str = "Enter the number of towers in hanoi:";
const QUES_RINGS: &str = "Enter the number of rings in hanoi:";
const RETRY_HINT: &str = "Enter an integer, ex-3";

#[derive(Parser)]
#[command(name = "hanoi-search")]
#[command(about = "Breadth-first state-space explorer for generalized Tower of Hanoi puzzles")]
#[command(version)]
struct Cli {
    /// Log per-round progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move a full stack from one tower to another
    Solve {
        /// Number of towers
        #[arg(long)]
        towers: usize,

        /// Number of rings
        #[arg(long)]
        rings: usize,

        /// Tower holding every ring at the start
        #[arg(long, default_value = "0")]
        from: usize,

        /// Tower that should hold every ring at the end (default: last tower)
        #[arg(long)]
        to: Option<usize>,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Search a puzzle described in JSON and print a JSON report
    SolveFile {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Check that a move list takes a start configuration to a target
    Check {
        /// Path to solution JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read solution from stdin instead of file
        #[arg(long)]
        stdin: bool,
    },

    /// Ask for tower and ring counts, then print the moves
    Interactive,
}

#[derive(clap::Args)]
struct BudgetArgs {
    /// Maximum breadth-first rounds
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Maximum search time in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl BudgetArgs {
    fn to_config(&self) -> SearchConfig {
        SearchConfig {
            max_rounds: self.max_rounds,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hanoi_search=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hanoi_search=warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Returns whether the command succeeded in the puzzle sense (targets
/// reached, solution valid).
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Solve {
            towers,
            rings,
            from,
            to,
            budget,
            json,
        } => {
            let to = to.unwrap_or(towers.saturating_sub(1));
            let puzzle = PuzzleConfig::stacked(towers, rings, from, to)?;
            let report = solve(puzzle.start, puzzle.targets, &budget.to_config())?;

            if json {
                print_json(&report)?;
            } else {
                print_moves(&report);
            }
            Ok(report.all_reached())
        }

        Commands::SolveFile {
            file,
            stdin,
            budget,
        } => {
            let content = read_input(file, stdin)?;
            let puzzle: PuzzleConfig =
                serde_json::from_str(&content).context("Failed to parse puzzle JSON")?;
            let report = solve(puzzle.start, puzzle.targets, &budget.to_config())?;

            print_json(&report)?;
            Ok(report.all_reached())
        }

        Commands::Check { file, stdin } => {
            let content = read_input(file, stdin)?;
            let check: SolutionCheck =
                serde_json::from_str(&content).context("Failed to parse solution JSON")?;
            let result = replay(&check.start, &check.moves, Some(&check.target));

            print_json(&result)?;
            Ok(result.reached())
        }

        Commands::Interactive => interactive(),
    }
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file {:?}", path))
    } else {
        bail!("Must provide either a file path or --stdin");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_moves(report: &SolveReport) {
    for found in &report.targets {
        match &found.moves {
            Some(moves) if moves.is_empty() => println!("Already solved, no moves needed"),
            Some(moves) => println!("{}", render_moves(moves)),
            None if report.stats.exhausted => {
                println!("Target {} is not reachable", found.target)
            }
            None => println!(
                "Target {} not reached within the search budget",
                found.target
            ),
        }
    }
}

fn interactive() -> Result<bool> {
    println!("{}", WELCOME_MESSAGE);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let towers = ask(QUES_TOWERS, &mut lines)?;
    let rings = ask(QUES_RINGS, &mut lines)?;

    let puzzle = PuzzleConfig::stacked(towers, rings, 0, towers - 1)?;
    let report = solve(puzzle.start, puzzle.targets, &SearchConfig::default())?;
    print_moves(&report);
    Ok(report.all_reached())
}

/// Keep asking until a positive integer is entered.
fn ask<I>(question: &str, lines: &mut I) -> Result<usize>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        println!("{}", question);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line.context("Failed to read from stdin")?,
            None => bail!("Input ended before an answer was given"),
        };

        match line.trim().parse::<usize>() {
            Ok(value) if value > 0 => return Ok(value),
            _ => println!("{}", RETRY_HINT),
        }
    }
}
