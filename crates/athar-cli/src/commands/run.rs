//! Run one maintenance procedure against the configured MySQL server

use anyhow::{Context, Result};
use athar_core::{ConnectionConfig, RunReport, TestUserConfig};
use athar_db::MySqlBackend;
use athar_migrate::{Procedure, ProcedureContext};

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;

/// Execute `procedure` and print its report.
///
/// A failed step surfaces as `ExitCode(1)`; configuration errors surface as
/// plain errors before any connection is made.
pub async fn execute(procedure: Procedure, global: &GlobalArgs) -> Result<()> {
    let config = ConnectionConfig::from_env().context("Invalid database configuration")?;
    let context = ProcedureContext::new(&config, TestUserConfig::from_env());
    log::info!("Running {procedure} against {}", config.display_target());

    let report = match MySqlBackend::connect(&config, procedure.requires_database()).await {
        Ok(db) => athar_migrate::execute(procedure, &db, &context).await,
        Err(e) => {
            log::error!("Could not connect to {}: {e}", config.display_target());
            RunReport::provisioning_failed(procedure.name(), e.to_string())
        }
    };

    print!("{}", render_report(&report));
    if global.verbose {
        match report.to_json() {
            Ok(json) => log::debug!("Run report:\n{json}"),
            Err(e) => log::warn!("Could not serialize the run report: {e}"),
        }
    }

    match report.exit_code() {
        0 => Ok(()),
        code => Err(ExitCode(code).into()),
    }
}

/// Step lines, then notes, then the summary block
pub(crate) fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        out.push_str(&step.line());
        out.push('\n');
    }
    if !report.notes.is_empty() {
        out.push('\n');
        for note in &report.notes {
            out.push_str(note);
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&report.summary());
    out.push('\n');
    out
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
