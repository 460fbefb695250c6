use super::*;

#[test]
fn test_empty_report_succeeds() {
    let report = RunReport::new("init");
    assert_eq!(report.exit_code(), 0);
    assert!(!report.has_failures());
    assert_eq!(report.run_id.len(), 8);
}

#[test]
fn test_counts_by_kind() {
    let mut report = RunReport::new("migrate");
    report.push(StepOutcome::applied(StepKind::Database, "athar_db"));
    report.push(StepOutcome::applied(StepKind::Table, "users"));
    report.push(StepOutcome::applied(StepKind::Table, "posts"));
    report.push(StepOutcome::skipped(StepKind::Table, "boxes", "already exists"));
    report.push(StepOutcome::applied(StepKind::Column, "posts.is_private"));
    report.push(StepOutcome::applied(StepKind::Index, "posts.idx_is_private"));
    report.push(StepOutcome::applied(StepKind::ForeignKey, "notifications.sender_id"));
    report.push(StepOutcome::applied(StepKind::Rename, "notifications.body"));
    report.push(StepOutcome::seeded("boxes", 6));
    report.push(StepOutcome::seeded("categories", 18));

    let c = report.counts();
    assert_eq!(c.databases, 1);
    assert_eq!(c.tables, 2);
    assert_eq!(c.columns, 1);
    assert_eq!(c.indexes, 1);
    assert_eq!(c.foreign_keys, 1);
    assert_eq!(c.renames, 1);
    assert_eq!(c.seeded_rows, 24);
    assert_eq!(c.skipped, 1);
    assert_eq!(c.failed, 0);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_failure_sets_exit_code() {
    let mut report = RunReport::new("init");
    report.push(StepOutcome::applied(StepKind::Table, "users"));
    report.push(StepOutcome::failed(StepKind::Table, "posts", "lock wait timeout"));
    assert!(report.has_failures());
    assert_eq!(report.exit_code(), 1);
    assert!(report.summary().contains("failed at table posts"));
}

#[test]
fn test_noop_summary() {
    let mut report = RunReport::new("add-private-field");
    report.push(StepOutcome::skipped(StepKind::Column, "posts.is_private", "already exists"));
    report.finish();
    assert!(report.is_noop());
    assert!(report.summary().contains("already up to date"));
}

#[test]
fn test_provisioning_failed() {
    let report = RunReport::provisioning_failed("seed", "[D005] Unknown database 'athar_db'");
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.steps[0].kind, StepKind::Database);
    assert!(report.finished_at.is_some());
}

#[test]
fn test_step_lines() {
    assert_eq!(
        StepOutcome::applied(StepKind::Table, "users").line(),
        "✓ created table users"
    );
    assert_eq!(
        StepOutcome::skipped(StepKind::Column, "posts.is_private", "already exists").line(),
        "- column posts.is_private: already exists"
    );
    assert_eq!(
        StepOutcome::seeded("users", 9).line(),
        "✓ seeded 9 rows into users"
    );
    assert!(StepOutcome::failed(StepKind::Index, "x", "boom")
        .line()
        .starts_with("✗ index x"));
}

#[test]
fn test_to_json() {
    let mut report = RunReport::new("seed");
    report.push(StepOutcome::seeded("users", 9));
    report.push(StepOutcome::skipped(StepKind::Seed, "posts", "already contains data"));
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["procedure"], "seed");
    assert_eq!(json["steps"][0]["rows"], 9);
    assert_eq!(json["steps"][0]["status"]["status"], "applied");
    assert_eq!(json["steps"][1]["status"]["message"], "already contains data");
}
