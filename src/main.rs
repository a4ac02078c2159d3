use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use indicatif::HumanCount;

use hashcash_solver::progress::SearchProgress;
use hashcash_solver::{Challenge, SearchConfig, Solver, Strategy, check_token};

/// Hashcash solver - answer upload proof-of-work challenges
#[derive(Parser, Debug)]
#[command(name = "hashcash-solver")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Challenge string, e.g. "1:<easiness>:<ignored>:<token>"
    #[arg(env = "HASHCASH_CHALLENGE")]
    challenge: String,

    /// Number of CPU threads to use (default: all cores)
    #[arg(short, long, env = "HASHCASH_THREADS")]
    threads: Option<usize>,

    /// Counters claimed by a worker at a time
    #[arg(long, default_value = "64")]
    chunk_size: u64,

    /// Use the deterministic single-threaded search (minimal counter)
    #[arg(long)]
    sequential: bool,

    /// Check TOKEN against the challenge instead of solving it
    #[arg(long, value_name = "TOKEN")]
    verify: Option<String>,

    /// Print a JSON report instead of the bare token
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    token: String,
    counter: u32,
    attempts: u64,
    elapsed_ms: u64,
    strategy: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let challenge = Challenge::parse(&args.challenge).context("Invalid challenge")?;

    if let Some(token) = &args.verify {
        return verify_token(&args.challenge, token);
    }

    let strategy = if args.sequential {
        Strategy::Sequential
    } else {
        Strategy::Parallel
    };
    let config = SearchConfig::new(args.threads.unwrap_or(0)).with_chunk_size(args.chunk_size);
    let threshold = challenge.threshold();

    if !args.json {
        eprintln!("{}", style("Hashcash Solver").bold());
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!(
            "Easiness: {} (threshold {:#010x}, ~{} attempts avg)",
            challenge.easiness(),
            threshold.value(),
            HumanCount(threshold.estimated_attempts())
        );
        eprintln!(
            "Strategy: {} ({} threads)",
            strategy,
            if strategy == Strategy::Sequential {
                1
            } else {
                config.effective_threads()
            }
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let attempts = Arc::new(AtomicU64::new(0));
    let cancel = Arc::new(AtomicBool::new(false));
    let done = Arc::new(AtomicBool::new(false));

    // Setup Ctrl+C handler
    let cancel_clone = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\n⛔ Cancelled by user");
        cancel_clone.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    // Start progress display
    let progress = (!args.no_progress && !args.json)
        .then(|| Arc::new(SearchProgress::new(threshold, &config, strategy)));
    let progress_handle = progress.clone().map(|progress| {
        let done = done.clone();
        let attempts = attempts.clone();
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(100));
                progress.update(attempts.load(Ordering::Relaxed));
            }
        })
    });

    let solver = Solver::new(strategy).with_config(config);
    let started = Instant::now();
    let result = {
        let challenge = args.challenge.clone();
        let attempts = attempts.clone();
        tokio::task::spawn_blocking(move || solver.solve_with_cancel(&challenge, attempts, cancel))
            .await
            .context("Solver task panicked")?
    };
    let elapsed = started.elapsed();

    // Stop progress thread
    done.store(true, Ordering::SeqCst);
    if let Some(handle) = progress_handle {
        let _ = handle.join();
    }

    let total_attempts = attempts.load(Ordering::Relaxed);
    match result {
        Ok(solution) => {
            if let Some(progress) = &progress {
                progress.finish_solved(solution.counter(), total_attempts);
            }

            if args.json {
                let report = SolveReport {
                    token: solution.token(),
                    counter: solution.counter(),
                    attempts: total_attempts,
                    elapsed_ms: elapsed.as_millis() as u64,
                    strategy: strategy.to_string(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                eprintln!(
                    "Counter: {} (LE bytes {})",
                    solution.counter(),
                    hex::encode(solution.counter().to_le_bytes())
                );
                println!("{}", solution.token());
            }
            Ok(())
        }
        Err(err) => {
            if let Some(progress) = &progress {
                progress.abandon(&err.to_string(), total_attempts);
            }
            if err.is_search_failure() {
                anyhow::bail!(
                    "No solution after {} trials: {}",
                    HumanCount(total_attempts),
                    err
                );
            }
            Err(err).context("Failed to solve challenge")
        }
    }
}

fn verify_token(challenge: &str, token: &str) -> Result<()> {
    let check = check_token(challenge, token).context("Failed to verify token")?;

    eprintln!(
        "Counter {} -> digest prefix {} (threshold {})",
        check.counter,
        hex::encode(check.digest_prefix.to_be_bytes()),
        hex::encode(check.threshold.value().to_be_bytes())
    );

    if check.is_valid() {
        println!("{}", style("valid").green());
        Ok(())
    } else {
        anyhow::bail!("Token does not satisfy the challenge threshold")
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
