//! Server state bootstrap tests (in-memory engine)

use admin_server::core::{Config, ServerState};
use admin_server::db::DbService;
use admin_server::db::repository::{AccountRepository, RoleRepository};

async fn state() -> ServerState {
    let mut config = Config::from_env();
    config.environment = "development".into();
    config.admin_username = "admin".into();
    config.admin_initial_password = Some("bootstrap-pass-1".into());

    let db = DbService::memory().await.expect("in-memory db");
    ServerState::with_db(&config, db).await
}

#[tokio::test]
async fn seeds_roles_and_bootstrap_administrator() {
    let state = state().await;

    let roles = RoleRepository::new(state.get_db())
        .find_all()
        .await
        .unwrap();
    let names: Vec<_> = roles.iter().map(|r| r.role_name.as_str()).collect();
    assert!(names.contains(&"admin"));
    assert!(names.contains(&"staff"));

    let admin = AccountRepository::new(state.get_db())
        .find_live_by_username("admin")
        .await
        .unwrap()
        .expect("bootstrap admin exists");
    assert!(admin.is_system);
    assert!(admin.verify_password("bootstrap-pass-1").unwrap());

    // Bootstrap admin can mint and validate a token
    let token = state
        .jwt_service
        .generate_token("account:admin", "admin", "admin", &["all".to_string()])
        .unwrap();
    let claims = state.jwt_service.validate_token(&token).unwrap();
    assert_eq!(claims.role, "admin");
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let state = state().await;

    // Run the full bootstrap again over the same database
    let again = ServerState::with_db(&state.config, DbService { db: state.get_db() }).await;

    let roles = RoleRepository::new(again.get_db()).find_all().await.unwrap();
    assert_eq!(roles.len(), 2);

    let accounts = AccountRepository::new(again.get_db())
        .find_all_with_inactive()
        .await
        .unwrap();
    assert_eq!(accounts.len(), 1);
}

#[tokio::test]
async fn configuration_bootstraps_on_first_read() {
    let state = state().await;

    let config = state.config_store.get().await.unwrap();
    assert_eq!(config.version, 1);
    assert_eq!(config.settings.user_management.default_role, "staff");
}
