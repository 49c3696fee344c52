//! Account administration integration tests (in-memory engine)

use admin_server::accounts::{AccountAdmin, ImportRow, RowOutcome};
use admin_server::db::DbService;
use admin_server::db::models::{AccountCreate, AccountStatus, AccountUpdate};
use admin_server::db::repository::RoleRepository;
use admin_server::settings::ConfigStore;
use admin_server::utils::AppError;

async fn admin() -> AccountAdmin {
    let db = DbService::memory().await.expect("in-memory db");
    RoleRepository::new(db.db.clone())
        .seed_defaults()
        .await
        .expect("seed roles");
    let store = ConfigStore::new(db.db.clone());
    AccountAdmin::new(db.db, store)
}

fn create_payload(username: &str) -> AccountCreate {
    AccountCreate {
        username: username.to_string(),
        password: "initial-pass-123".to_string(),
        full_name: "Grace Hopper".to_string(),
        department: "Computer Science".to_string(),
        employee_no: "EMP-042".to_string(),
        role: None,
    }
}

#[tokio::test]
async fn creates_account_with_default_role() {
    let admin = admin().await;

    let account = admin.create(create_payload("ghopper")).await.unwrap();
    assert_eq!(account.username, "ghopper");
    assert_eq!(account.status, AccountStatus::Active);
    assert!(account.id.is_some());
    assert!(account.verify_password("initial-pass-123").unwrap());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let admin = admin().await;

    admin.create(create_payload("ghopper")).await.unwrap();
    let err = admin.create(create_payload("ghopper")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn edit_updates_fields_and_rechecks_username() {
    let admin = admin().await;

    let a = admin.create(create_payload("ghopper")).await.unwrap();
    admin.create(create_payload("akay")).await.unwrap();

    let id = a.id.as_ref().unwrap().to_string();
    let updated = admin
        .edit(
            &id,
            AccountUpdate {
                department: Some("Mathematics".into()),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.department, "Mathematics");

    // Renaming onto a taken username conflicts
    let err = admin
        .edit(
            &id,
            AccountUpdate {
                username: Some("akay".into()),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn edit_unknown_account_is_not_found() {
    let admin = admin().await;

    let err = admin
        .edit(
            "account:missing",
            AccountUpdate {
                department: Some("Physics".into()),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn deactivation_is_idempotent() {
    let admin = admin().await;

    let a = admin.create(create_payload("ghopper")).await.unwrap();
    let id = a.id.as_ref().unwrap().to_string();

    let first = admin.deactivate(&id).await.unwrap();
    assert_eq!(first.status, AccountStatus::Deactivated);

    // Deactivating again returns the record unchanged, not an error
    let second = admin.deactivate(&id).await.unwrap();
    assert_eq!(second.status, AccountStatus::Deactivated);
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn archive_is_terminal_and_releases_username() {
    let admin = admin().await;

    let a = admin.create(create_payload("ghopper")).await.unwrap();
    let id = a.id.as_ref().unwrap().to_string();

    admin.deactivate(&id).await.unwrap();
    let archived = admin.archive(&id).await.unwrap();
    assert_eq!(archived.status, AccountStatus::Archived);

    // Archived records are immutable
    let err = admin
        .edit(
            &id,
            AccountUpdate {
                department: Some("Physics".into()),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // The username is free again; the new record is a distinct identity
    let replacement = admin.create(create_payload("ghopper")).await.unwrap();
    assert_ne!(replacement.id, archived.id);
}

#[tokio::test]
async fn reset_password_issues_working_temporary_credential() {
    let admin = admin().await;

    let a = admin.create(create_payload("ghopper")).await.unwrap();
    let id = a.id.as_ref().unwrap().to_string();

    let credential = admin.reset_password(&id).await.unwrap();
    assert_eq!(credential.username, "ghopper");
    assert!(credential.temporary_password.len() >= 12);

    let account = admin.get(&id).await.unwrap();
    assert!(account.verify_password(&credential.temporary_password).unwrap());
    assert!(!account.verify_password("initial-pass-123").unwrap());
}

#[tokio::test]
async fn short_password_is_rejected_by_security_settings() {
    let admin = admin().await;

    let mut payload = create_payload("ghopper");
    payload.password = "short".into(); // below the default minimum of 8
    let err = admin.create(payload).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

fn import_row(username: &str) -> ImportRow {
    ImportRow {
        full_name: "Imported Person".into(),
        employee_no: format!("EMP-{username}"),
        department: "Biology".into(),
        username: username.into(),
    }
}

#[tokio::test]
async fn bulk_import_isolates_failed_rows() {
    let admin = admin().await;

    let mut rows = vec![
        import_row("row0"),
        import_row("row1"),
        import_row("row2"),
        import_row("row3"),
    ];
    rows[2].department = "  ".into(); // malformed row

    let outcomes = admin.bulk_import(rows).await.unwrap();
    assert_eq!(outcomes.len(), 4);

    // Input order preserved
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.row(), i);
    }

    assert!(outcomes[0].is_created());
    assert!(outcomes[1].is_created());
    assert!(outcomes[3].is_created());
    match &outcomes[2] {
        RowOutcome::Failed { row, reason } => {
            assert_eq!(*row, 2);
            assert!(reason.contains("department"), "reason: {reason}");
        }
        other => panic!("expected row 2 to fail, got {other:?}"),
    }

    // No successful row was rolled back
    let accounts = admin.list(false).await.unwrap();
    assert_eq!(accounts.len(), 3);
}

#[tokio::test]
async fn bulk_import_fails_duplicates_after_first_occurrence() {
    let admin = admin().await;

    let rows = vec![
        import_row("dup"),
        import_row("unique"),
        import_row("dup"),
    ];

    let outcomes = admin.bulk_import(rows).await.unwrap();
    assert!(outcomes[0].is_created());
    assert!(outcomes[1].is_created());
    match &outcomes[2] {
        RowOutcome::Failed { reason, .. } => {
            assert!(reason.contains("duplicated"), "reason: {reason}");
        }
        other => panic!("expected duplicate row to fail, got {other:?}"),
    }
}

#[tokio::test]
async fn bulk_import_conflicts_with_existing_accounts() {
    let admin = admin().await;
    admin.create(create_payload("ghopper")).await.unwrap();

    let outcomes = admin
        .bulk_import(vec![import_row("ghopper"), import_row("fresh")])
        .await
        .unwrap();

    assert!(!outcomes[0].is_created());
    assert!(outcomes[1].is_created());
}

#[tokio::test]
async fn imported_accounts_can_login_with_temporary_password() {
    let admin = admin().await;

    let outcomes = admin.bulk_import(vec![import_row("newhire")]).await.unwrap();
    let (account, password) = match &outcomes[0] {
        RowOutcome::Created {
            account,
            temporary_password,
            ..
        } => (account.clone(), temporary_password.clone()),
        other => panic!("expected creation, got {other:?}"),
    };

    let id = account.id.as_ref().unwrap().to_string();
    let stored = admin.get(&id).await.unwrap();
    assert!(stored.verify_password(&password).unwrap());
}
