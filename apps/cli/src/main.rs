use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::load_settings, ConversionClient, ConversionResult, HttpConversionClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "money", about = "Convert a money expression with the conversion service")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// The expression, e.g. `money 5 usd to eur`. Words are joined with single spaces.
    words: Vec<String>,
}

fn joined_input(words: &[String]) -> Option<String> {
    (!words.is_empty()).then(|| words.join(" "))
}

async fn run(args: Args, out: &mut impl Write, err: &mut impl Write) -> Result<ExitCode> {
    let Some(input) = joined_input(&args.words) else {
        writeln!(err, "no input given")?;
        return Ok(ExitCode::FAILURE);
    };

    let settings = load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(args.server_url, args.timeout_ms);
    let client = match HttpConversionClient::from_settings(&settings) {
        Ok(client) => client,
        Err(reason) => {
            writeln!(err, "{reason}")?;
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(endpoint = %client.endpoint(), "converting");

    match client.convert(&input).await {
        ConversionResult::Success { text } => {
            writeln!(out, "{text}")?;
            Ok(ExitCode::SUCCESS)
        }
        ConversionResult::Failure { reason } => {
            writeln!(err, "{reason}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    run(args, &mut std::io::stdout(), &mut std::io::stderr()).await
}
