//! Consent - command line shell
//!
//! The consent manager, its cookie jar and the page document live in Rust;
//! every command prints a JSON result for whatever renders the page.

mod cli;
mod commands;
mod state;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Command};
use commands::{consent, CommandResult};
use consent_core::{Config, ConsentForm};
use state::AppState;

fn print<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let state = AppState::new(config).context("failed to open consent state")?;

    match cli.command {
        Command::Status => print(consent::status(&state)),
        Command::PageLoad => print(consent::page_load(&state)),
        Command::Accept {
            form: Some(path), ..
        } => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            print(consent::accept_form(&state, &html))
        }
        Command::Accept {
            marketing,
            analytics,
            form: None,
        } => print(consent::accept(&state, ConsentForm::new(marketing, analytics))),
        Command::AcceptAll => print(consent::accept_all(&state)),
        Command::Reset => print(consent::reset(&state)),
        Command::Track {
            product_id,
            sdk_loaded,
        } => print(consent::track(&state, product_id, sdk_loaded)),
    }
}

fn main() -> anyhow::Result<()> {
    consent_core::init_logging();

    let cli = Cli::parse();
    if !run(cli)? {
        std::process::exit(1);
    }
    Ok(())
}
