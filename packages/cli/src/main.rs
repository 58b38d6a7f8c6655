mod commands;
mod snapshot;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, init, replay, CheckArgs, InitArgs, ReplayArgs};
use tracing_subscriber::EnvFilter;

/// Folio CLI - replay and verify document operations
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default folio.config.json
    Init(InitArgs),

    /// Apply operations to a snapshot and print the result
    Replay(ReplayArgs),

    /// Verify that every operation is undone by its reverse
    Check(CheckArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()
        .context("Cannot get current directory")?
        .display()
        .to_string();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Replay(args) => replay(args, &cwd),
        Command::Check(args) => check(args, &cwd),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
