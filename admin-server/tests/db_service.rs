//! On-disk database smoke test

use admin_server::db::DbService;
use admin_server::db::repository::RoleRepository;

#[tokio::test]
async fn opens_rocksdb_and_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("admin.db");
    let path_str = path.to_string_lossy().to_string();

    {
        let db = DbService::new(&path_str).await.expect("open db");
        RoleRepository::new(db.db.clone())
            .seed_defaults()
            .await
            .expect("seed roles");
        let roles = RoleRepository::new(db.db).find_all().await.expect("list");
        assert_eq!(roles.len(), 2);
    }

    // Give the first handle time to release its file locks
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    // Reopen the same files; seeded data must still be there
    {
        let db = DbService::new(&path_str).await.expect("reopen db");
        let roles = RoleRepository::new(db.db).find_all().await.expect("list");
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().any(|r| r.role_name == "admin"));
    }
}
