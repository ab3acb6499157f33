//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `webfetch` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output and exit status
//!
//! All engine functionality is implemented in the library crate.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use webfetch::initialization::{init_crypto_provider, init_logger_with};
use webfetch::{Client, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    init_crypto_provider();

    let mut client = Client::with_read_timeout(Duration::from_secs(opt.timeout_seconds));

    let outcome = match (&opt.url, &opt.search) {
        (_, Some(term)) => client.search(term).await,
        (Some(url), None) => client.fetch(url).await,
        // clap enforces that exactly one of the two modes is present
        (None, None) => unreachable!(),
    };

    match outcome {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("webfetch error: {:#}", anyhow::Error::from(e));
            process::exit(1);
        }
    }
}
