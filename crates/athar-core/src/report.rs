//! Step outcomes and the per-run report
//!
//! Every procedure step produces a [`StepOutcome`]. The [`RunReport`] collects
//! them in execution order and is the single place that translates a run into
//! a summary and a process exit code.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::error::CoreResult;

/// What kind of element a step converged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Database,
    Table,
    Column,
    Index,
    ForeignKey,
    Rename,
    Seed,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Database => "database",
            StepKind::Table => "table",
            StepKind::Column => "column",
            StepKind::Index => "index",
            StepKind::ForeignKey => "foreign key",
            StepKind::Rename => "rename",
            StepKind::Seed => "seed",
        };
        f.write_str(s)
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum StepStatus {
    /// The step changed the database
    Applied,
    /// The desired end state already held
    Skipped(String),
    /// The step failed; the run stops here
    Failed(String),
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Element kind
    pub kind: StepKind,

    /// Element name, e.g. `posts.is_private`
    pub name: String,

    /// What happened
    pub status: StepStatus,

    /// Rows inserted (seed steps only)
    #[serde(skip_serializing_if = "is_zero")]
    pub rows: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl StepOutcome {
    pub fn applied(kind: StepKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: StepStatus::Applied,
            rows: 0,
        }
    }

    pub fn skipped(kind: StepKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: StepStatus::Skipped(reason.into()),
            rows: 0,
        }
    }

    pub fn failed(kind: StepKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: StepStatus::Failed(message.into()),
            rows: 0,
        }
    }

    /// A seed step that inserted `rows` rows
    pub fn seeded(name: impl Into<String>, rows: u64) -> Self {
        Self {
            rows,
            ..Self::applied(StepKind::Seed, name)
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == StepStatus::Applied
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, StepStatus::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, StepStatus::Failed(_))
    }

    /// One human-readable progress line
    pub fn line(&self) -> String {
        match &self.status {
            StepStatus::Applied => {
                let verb = match self.kind {
                    StepKind::Database => "created database",
                    StepKind::Table => "created table",
                    StepKind::Column => "added column",
                    StepKind::Index => "added index",
                    StepKind::ForeignKey => "added foreign key",
                    StepKind::Rename => "renamed column",
                    StepKind::Seed => {
                        return format!("✓ seeded {} rows into {}", self.rows, self.name)
                    }
                };
                format!("✓ {verb} {}", self.name)
            }
            StepStatus::Skipped(reason) => format!("- {} {}: {reason}", self.kind, self.name),
            StepStatus::Failed(message) => format!("✗ {} {}: {message}", self.kind, self.name),
        }
    }
}

/// Per-kind totals of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub databases: usize,
    pub tables: usize,
    pub columns: usize,
    pub indexes: usize,
    pub foreign_keys: usize,
    pub renames: usize,
    pub seeded_rows: u64,
    pub skipped: usize,
    pub failed: usize,
}

/// Report of one procedure run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Short unique identifier for log correlation
    pub run_id: String,

    /// Procedure that produced the report
    pub procedure: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, if it has
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Steps in execution order
    pub steps: Vec<StepOutcome>,

    /// Operator-facing notes (e.g. test credentials)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl RunReport {
    /// Start a report for `procedure`
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            procedure: procedure.into(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Report for a run that never got a connection
    pub fn provisioning_failed(procedure: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::new(procedure);
        report.push(StepOutcome::failed(
            StepKind::Database,
            "connection",
            message,
        ));
        report.finish();
        report
    }

    pub fn push(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Stamp the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(StepOutcome::is_failed)
    }

    /// Whether every step was skipped (nothing to do)
    pub fn is_noop(&self) -> bool {
        self.steps.iter().all(StepOutcome::is_skipped)
    }

    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for step in &self.steps {
            match &step.status {
                StepStatus::Skipped(_) => counts.skipped += 1,
                StepStatus::Failed(_) => counts.failed += 1,
                StepStatus::Applied => match step.kind {
                    StepKind::Database => counts.databases += 1,
                    StepKind::Table => counts.tables += 1,
                    StepKind::Column => counts.columns += 1,
                    StepKind::Index => counts.indexes += 1,
                    StepKind::ForeignKey => counts.foreign_keys += 1,
                    StepKind::Rename => counts.renames += 1,
                    StepKind::Seed => counts.seeded_rows += step.rows,
                },
            }
        }
        counts
    }

    /// `0` when no step failed, `1` otherwise
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Final text block printed after the step lines
    pub fn summary(&self) -> String {
        let c = self.counts();
        let mut out = String::new();

        if let Some(failed) = self.steps.iter().find(|s| s.is_failed()) {
            out.push_str(&format!(
                "✗ {} failed at {} {} (run {})\n",
                self.procedure, failed.kind, failed.name, self.run_id
            ));
        } else if self.is_noop() {
            out.push_str(&format!(
                "✓ {} complete: already up to date (run {})\n",
                self.procedure, self.run_id
            ));
        } else {
            out.push_str(&format!(
                "✓ {} complete (run {})\n",
                self.procedure, self.run_id
            ));
        }

        out.push_str(&format!(
            "  tables created: {}, columns added: {}, indexes added: {}, foreign keys added: {}, columns renamed: {}, rows seeded: {}, skipped: {}",
            c.tables, c.columns, c.indexes, c.foreign_keys, c.renames, c.seeded_rows, c.skipped
        ));
        if let Some(finished) = self.finished_at {
            let ms = (finished - self.started_at).num_milliseconds();
            out.push_str(&format!(", {ms}ms"));
        }
        out
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
