//! Step runner: sequences a procedure, records every outcome and owns the
//! connection's release.

use crate::error::{MigrateError, MigrateResult};
use crate::inspector::Inspector;
use crate::mutator::SchemaMutator;
use crate::procedures::Procedure;
use crate::seeder::Seeder;
use athar_core::{ConnectionConfig, Ident, RunReport, StepKind, StepOutcome, TestUserConfig};
use athar_db::Database;

/// Inputs a procedure needs besides the connection
#[derive(Debug, Clone)]
pub struct ProcedureContext {
    /// Database the procedures converge
    pub database: Ident,

    /// Test-user natural key and echoed OTP
    pub test_user: TestUserConfig,
}

impl ProcedureContext {
    pub fn new(config: &ConnectionConfig, test_user: TestUserConfig) -> Self {
        Self {
            database: config.database.clone(),
            test_user,
        }
    }
}

/// A run in progress: the connection, the context and the report so far
pub struct Run<'a> {
    db: &'a dyn Database,
    context: &'a ProcedureContext,
    report: &'a mut RunReport,
}

impl<'a> Run<'a> {
    pub fn new(
        db: &'a dyn Database,
        context: &'a ProcedureContext,
        report: &'a mut RunReport,
    ) -> Self {
        Self {
            db,
            context,
            report,
        }
    }

    pub fn db(&self) -> &'a dyn Database {
        self.db
    }

    pub fn context(&self) -> &'a ProcedureContext {
        self.context
    }

    pub fn mutator(&self) -> SchemaMutator<'a> {
        SchemaMutator::new(self.db)
    }

    pub fn seeder(&self) -> Seeder<'a> {
        Seeder::new(self.db)
    }

    pub fn inspector(&self) -> Inspector<'a> {
        Inspector::new(self.db)
    }

    /// Record the result of one step.
    ///
    /// A failure is recorded against `kind`/`name` and handed back so the
    /// caller stops with `?`.
    pub fn record(
        &mut self,
        kind: StepKind,
        name: &str,
        result: MigrateResult<StepOutcome>,
    ) -> MigrateResult<()> {
        match result {
            Ok(outcome) => {
                log::debug!("{}", outcome.line());
                self.report.push(outcome);
                Ok(())
            }
            Err(e) => self.fail(kind, name, e),
        }
    }

    /// Record a failed step and hand the error back
    pub fn fail<T>(&mut self, kind: StepKind, name: &str, err: MigrateError) -> MigrateResult<T> {
        log::error!("{kind} {name} failed: {err}");
        self.report.push(StepOutcome::failed(kind, name, err.to_string()));
        Err(err)
    }

    /// Add an operator-facing note to the report
    pub fn note(&mut self, note: impl Into<String>) {
        self.report.note(note);
    }
}

/// Run `procedure` to completion or first failure.
///
/// The connection is closed on every path. The returned report carries the
/// exit code.
pub async fn execute(
    procedure: Procedure,
    db: &dyn Database,
    context: &ProcedureContext,
) -> RunReport {
    let mut report = RunReport::new(procedure.name());
    log::info!(
        "Starting {} (run {}) on {}",
        procedure.name(),
        report.run_id,
        db.db_type()
    );

    let result = {
        let mut run = Run::new(db, context, &mut report);
        procedure.run(&mut run).await
    };
    settle(&mut report, &result);

    if let Err(e) = db.close().await {
        log::warn!("Closing the connection failed: {e}");
    }
    report.finish();
    report
}

/// Make sure an aborted run reports a failure even if no step recorded one
fn settle(report: &mut RunReport, result: &MigrateResult<()>) {
    let Err(e) = result else {
        return;
    };
    log::error!("{} aborted: {e}", report.procedure);
    if !report.has_failures() {
        let procedure = report.procedure.clone();
        report.push(StepOutcome::failed(
            StepKind::Database,
            procedure,
            e.to_string(),
        ));
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
