use super::*;
use athar_db::MemoryBackend;

fn context() -> ProcedureContext {
    ProcedureContext::new(&ConnectionConfig::default(), TestUserConfig::default())
}

#[test]
fn test_context_from_config() {
    let config = ConnectionConfig {
        database: Ident::new("athar_staging"),
        ..ConnectionConfig::default()
    };
    let ctx = ProcedureContext::new(&config, TestUserConfig::default());
    assert_eq!(ctx.database, "athar_staging");
    assert_eq!(ctx.test_user.phone, "07761763665");
}

#[tokio::test]
async fn test_record_pushes_outcomes() {
    let db = MemoryBackend::new();
    let ctx = context();
    let mut report = RunReport::new("test");
    {
        let mut run = Run::new(&db, &ctx, &mut report);
        run.record(
            StepKind::Table,
            "users",
            Ok(StepOutcome::applied(StepKind::Table, "users")),
        )
        .unwrap();
        run.note("hello");
    }
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.notes, vec!["hello".to_string()]);
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_record_failure_hands_error_back() {
    let db = MemoryBackend::new();
    let ctx = context();
    let mut report = RunReport::new("test");
    let result = {
        let mut run = Run::new(&db, &ctx, &mut report);
        run.record(
            StepKind::Column,
            "posts.is_private",
            Err(MigrateError::Verification {
                element: "posts.is_private".to_string(),
            }),
        )
    };
    assert!(result.is_err());
    assert_eq!(report.steps.len(), 1);
    assert!(report.steps[0].is_failed());
    assert_eq!(report.steps[0].name, "posts.is_private");
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_execute_closes_on_success() {
    let db = MemoryBackend::new();
    let report = execute(Procedure::Init, &db, &context()).await;
    assert_eq!(report.exit_code(), 0);
    assert!(report.finished_at.is_some());
    assert_eq!(db.close_calls(), 1);
    assert!(db.is_closed());
}

#[tokio::test]
async fn test_execute_closes_on_failure() {
    let db = MemoryBackend::new();
    db.fail_on("CREATE DATABASE").unwrap();
    let report = execute(Procedure::Init, &db, &context()).await;

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].kind, StepKind::Database);
    assert!(report.steps[0].is_failed());
    assert_eq!(db.close_calls(), 1);
}

#[tokio::test]
async fn test_execute_without_database_fails_first_step() {
    // Connected without selecting a database that was never created
    let db = MemoryBackend::new();
    let report = execute(Procedure::AddBanFields, &db, &context()).await;

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].name, "users.is_banned");
    assert_eq!(db.close_calls(), 1);
}

#[test]
fn test_unrecorded_error_still_fails_the_run() {
    let mut report = RunReport::new("migrate");
    report.push(StepOutcome::applied(StepKind::Table, "users"));
    let result: MigrateResult<()> = Err(MigrateError::Verification {
        element: "posts.is_private".to_string(),
    });

    settle(&mut report, &result);
    assert_eq!(report.exit_code(), 1);
    let last = report.steps.last().unwrap();
    assert!(last.is_failed());
    assert_eq!(last.name, "migrate");
}

#[test]
fn test_recorded_error_is_not_doubled() {
    let mut report = RunReport::new("init");
    report.push(StepOutcome::failed(StepKind::Table, "posts", "boom"));
    let result: MigrateResult<()> = Err(MigrateError::Verification {
        element: "posts".to_string(),
    });

    settle(&mut report, &result);
    assert_eq!(report.steps.len(), 1);

    let mut clean = RunReport::new("status");
    settle(&mut clean, &Ok(()));
    assert!(clean.steps.is_empty());
    assert_eq!(clean.exit_code(), 0);
}
