//! Athar CLI - idempotent schema migrations and seeding for the Athar database

use clap::Parser;
use std::path::Path;

mod cli;
mod commands;

use cli::Cli;
use commands::common::{self, ExitCode};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Load .env before logging so RUST_LOG from the file applies.
    let env_file = common::load_env_file(Path::new("."));
    common::init_logging(cli.global.verbose);
    match env_file {
        Ok(Some(path)) => log::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => log::warn!("{e:#}"),
    }

    let procedure = cli.command.procedure();
    match commands::run::execute(procedure, &cli.global).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => {
                std::process::ExitCode::from(u8::try_from(*code).unwrap_or(1))
            }
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
