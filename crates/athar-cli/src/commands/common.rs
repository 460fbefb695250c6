//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Structured exit code error.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that the connection and other RAII guards are dropped first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, the report has already been printed.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load `<dir>/.env` into the process environment if the file exists.
///
/// Variables already set in the environment win over the file.
pub(crate) fn load_env_file(dir: &Path) -> Result<Option<PathBuf>> {
    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(None);
    }
    dotenv::from_path(&path).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(Some(path))
}

/// Initialise `env_logger`; `RUST_LOG` overrides the default filter
pub(crate) fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_target(false)
        .init();
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
