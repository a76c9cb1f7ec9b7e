use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::EncodeArgs;

/// Encode and decode 10-byte SFFA sensor payloads.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack sensor values into a payload and print it as hex.
    Encode(EncodeArgs),
    /// Decode a hex payload into engineering units.
    Decode {
        /// The 10 payload bytes as hex, e.g. a000006e33048c0c74dd.
        hex: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Show every bit field of a hex payload, reserved bits included.
    Inspect {
        /// The 10 payload bytes as hex.
        hex: String,
    },
}

fn setup_logging(
    log_file_path: Option<PathBuf>,
    verbosity: &Verbosity<WarnLevel>,
) -> Result<Option<WorkerGuard>> {
    // stdout carries the command output, so console logs go to stderr
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match log_file_path {
        Some(path) => {
            let log_file = File::create(&path)
                .with_context(|| format!("Failed to create log file at: {:?}", path))?;
            let (writer, guard) = tracing_appender::non_blocking(log_file);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // RUST_LOG overrides the -v/-q level
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Encode(args) => commands::encode(&args),
        Command::Decode { hex, json } => commands::decode(&hex, json),
        Command::Inspect { hex } => commands::inspect(&hex),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = setup_logging(cli.log_file, &cli.verbose)?;

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        drop(guard);
        process::exit(1);
    }

    Ok(())
}
