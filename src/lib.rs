// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::AppSettings;
use crate::cli::args::{Args, Command};
use crate::cli::{commands, shell};
use anyhow::{Context, Result};
use infrastructure::{Config, HttpNoteService};
use std::io;
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notehub with arguments");

    // Initialize infrastructure
    let config = Config::resolve(args.config.as_deref(), args.base_url.as_deref())?;
    let service = HttpNoteService::new(&config)?;
    let settings = AppSettings {
        per_page: config.per_page,
        ..AppSettings::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    // Execute use case
    match args.command {
        Command::List { search, page } => {
            info!(?search, page, "Listing notes");
            runtime.block_on(commands::list(
                &service,
                settings,
                search.as_deref().unwrap_or_default(),
                page,
                &mut io::stdout(),
            ))
        }
        Command::Create {
            title,
            content,
            tag,
        } => runtime.block_on(commands::create(
            &service,
            &title,
            content.as_deref(),
            tag.into(),
            &mut io::stdout(),
        )),
        Command::Delete { note_id, yes } => {
            info!(note_id, "Deleting note");
            runtime.block_on(commands::delete(
                &service,
                note_id,
                yes,
                &mut io::stdin().lock(),
                &mut io::stdout(),
            ))
        }
        Command::Shell => runtime.block_on(shell::run(service, settings)),
    }
}

#[cfg(test)]
/// must be public to be used from integration tests
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
