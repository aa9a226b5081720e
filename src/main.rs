use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use awkbench::config;
use awkbench::matrix;
use awkbench::run::run_session;

#[derive(Parser)]
#[command(
    name = "awkbench",
    version,
    about = "Benchmark a parallel awk build against reference awk implementations"
)]
struct Cli {
    /// Session config file listing the profiles to run
    #[arg(default_value = "awkbench.toml")]
    config: PathBuf,

    /// Print every command the session would run, without executing anything
    #[arg(long)]
    dry_run: bool,

    /// Report and skip profiles that fail instead of aborting the session
    #[arg(long)]
    keep_going: bool,
}

/// Returns whether the session had failed runs or skipped profiles.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let profiles = config::load(&cli.config)?;

    if cli.dry_run {
        for profile in &profiles {
            for invocation in matrix::build(profile) {
                println!("{}", invocation.command_line());
            }
        }
        return Ok(false);
    }

    let summary = run_session(&profiles, cli.keep_going)?;

    let line = format!(
        "{} runs recorded across {} profiles ({} failed runs, {} skipped profiles)",
        summary.runs, summary.profiles_run, summary.failed_runs, summary.profiles_skipped
    );
    if summary.clean() {
        eprintln!("{}", line.if_supports_color(Stream::Stderr, |t| t.green()));
        Ok(false)
    } else {
        eprintln!("{}", line.if_supports_color(Stream::Stderr, |t| t.yellow()));
        Ok(true)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
