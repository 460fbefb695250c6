use crate::error::MigrateResult;
use crate::password::hash_password;
use crate::runner::Run;
use crate::seeder::SeedGate;
use athar_core::fixtures::{TEST_USER, TEST_USER_PASSWORD};
use athar_core::{Ident, Row, StepKind, StepOutcome};

pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let seeder = run.seeder();
    let users = Ident::new("users");
    let phone = run.context().test_user.phone.clone();
    let otp = run.context().test_user.otp_code.clone();
    let key = [Ident::new("phone")];
    let probe = Row::new().with("phone", phone.as_str());

    let exists = match seeder.exists(&users, &probe, &key).await {
        Ok(exists) => exists,
        Err(e) => return run.fail(StepKind::Seed, users.as_str(), e),
    };

    if exists {
        log::info!("Test user {phone} already exists");
        run.record(
            StepKind::Seed,
            users.as_str(),
            Ok(StepOutcome::skipped(
                StepKind::Seed,
                users.as_str(),
                format!("test user {phone} already exists"),
            )),
        )?;
    } else {
        let hash = match hash_password(TEST_USER_PASSWORD).await {
            Ok(hash) => hash,
            Err(e) => return run.fail(StepKind::Seed, users.as_str(), e),
        };
        let rows = [TEST_USER.to_row(&phone, &hash)];
        let result = seeder
            .seed_if_empty(&users, &rows, &SeedGate::NaturalKey(key.to_vec()))
            .await
            .map(|o| o.step(&users));
        run.record(StepKind::Seed, users.as_str(), result)?;
    }

    run.note("Test user credentials:");
    run.note(format!("  phone:    {phone}"));
    run.note(format!("  OTP:      {otp}"));
    run.note(format!("  password: {TEST_USER_PASSWORD}"));
    Ok(())
}
