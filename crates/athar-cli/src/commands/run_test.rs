use super::*;
use athar_core::{StepKind, StepOutcome};

#[test]
fn test_render_successful_report() {
    let mut report = RunReport::new("add-private-field");
    report.push(StepOutcome::applied(StepKind::Column, "posts.is_private"));
    report.push(StepOutcome::skipped(
        StepKind::Index,
        "posts.idx_is_private",
        "already exists",
    ));
    report.finish();

    let out = render_report(&report);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "✓ added column posts.is_private");
    assert_eq!(lines[1], "- index posts.idx_is_private: already exists");
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("✓ add-private-field complete"));
    assert!(out.contains("columns added: 1"));
}

#[test]
fn test_render_notes_before_summary() {
    let mut report = RunReport::new("create-test-user");
    report.push(StepOutcome::seeded("users", 1));
    report.note("  OTP:      123456");
    report.finish();

    let out = render_report(&report);
    let note = out.find("OTP").unwrap();
    let summary = out.find("create-test-user complete").unwrap();
    assert!(note < summary);
}

#[test]
fn test_render_provisioning_failure() {
    let report = RunReport::provisioning_failed("init", "[D001] Connection error: refused");
    let out = render_report(&report);

    assert!(out.starts_with("✗ database connection: [D001] Connection error: refused"));
    assert!(out.contains("init failed at database connection"));
    assert_eq!(report.exit_code(), 1);
}
