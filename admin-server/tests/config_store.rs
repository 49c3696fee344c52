//! Configuration store integration tests (in-memory engine)

use admin_server::db::DbService;
use admin_server::db::models::{OrgSettingsPatch, ScheduleSettings, SecuritySettings};
use admin_server::settings::{ConfigStore, ProposeError};

async fn store() -> ConfigStore {
    let db = DbService::memory().await.expect("in-memory db");
    ConfigStore::new(db.db)
}

#[tokio::test]
async fn bootstraps_defaults_as_version_one() {
    let store = store().await;

    let config = store.get().await.unwrap();
    assert_eq!(config.version, 1);
    assert_eq!(config.author, "system");
    assert_eq!(config.settings.schedule.shift_start, "09:00");
}

#[tokio::test]
async fn valid_patch_increments_version_by_exactly_one() {
    let store = store().await;
    let base = store.get().await.unwrap();

    let patch = OrgSettingsPatch {
        schedule: Some(ScheduleSettings {
            grace_period_minutes: 15,
            ..ScheduleSettings::default()
        }),
        ..OrgSettingsPatch::default()
    };

    let committed = store.propose(base.version, &patch, "admin").await.unwrap();
    assert_eq!(committed.version, base.version + 1);
    assert_eq!(committed.author, "admin");
    assert_eq!(committed.settings.schedule.grace_period_minutes, 15);

    // Read-your-writes: get() sees the commit immediately
    let current = store.get().await.unwrap();
    assert_eq!(current.version, committed.version);
    assert_eq!(current.settings.schedule.grace_period_minutes, 15);

    // Exactly one new version was persisted
    let history = store.history(10, 0).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].version, 2);
    assert_eq!(history[1].version, 1);
}

#[tokio::test]
async fn invalid_patch_leaves_store_unchanged() {
    let store = store().await;
    let base = store.get().await.unwrap();

    // 09:00-18:00 is 540 minutes; a 600-minute grace period is invalid
    let patch = OrgSettingsPatch {
        schedule: Some(ScheduleSettings {
            grace_period_minutes: 600,
            ..ScheduleSettings::default()
        }),
        ..OrgSettingsPatch::default()
    };

    let err = store
        .propose(base.version, &patch, "admin")
        .await
        .unwrap_err();
    match err {
        ProposeError::Rejected(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].category, "schedule");
            assert_eq!(violations[0].field, "grace_period_minutes");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    let current = store.get().await.unwrap();
    assert_eq!(current.version, base.version);
    assert_eq!(current.settings.schedule.grace_period_minutes, 5);
}

#[tokio::test]
async fn all_violations_are_reported_together() {
    let store = store().await;
    let base = store.get().await.unwrap();

    let patch = OrgSettingsPatch {
        schedule: Some(ScheduleSettings {
            grace_period_minutes: 600,
            work_days: vec![],
            ..ScheduleSettings::default()
        }),
        security: Some(SecuritySettings {
            max_failed_logins: 0,
            ..SecuritySettings::default()
        }),
        ..OrgSettingsPatch::default()
    };

    match store.propose(base.version, &patch, "admin").await {
        Err(ProposeError::Rejected(violations)) => {
            assert_eq!(violations.len(), 3);
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn stale_base_version_is_rejected() {
    let store = store().await;
    let base = store.get().await.unwrap();

    let patch = OrgSettingsPatch {
        security: Some(SecuritySettings {
            session_timeout_minutes: 240,
            ..SecuritySettings::default()
        }),
        ..OrgSettingsPatch::default()
    };

    store.propose(base.version, &patch, "admin").await.unwrap();

    // A second proposal against the superseded version must not commit
    let err = store
        .propose(base.version, &patch, "admin")
        .await
        .unwrap_err();
    match err {
        ProposeError::StaleVersion { base: b, latest } => {
            assert_eq!(b, base.version);
            assert_eq!(latest, base.version + 1);
        }
        other => panic!("expected StaleVersion, got {other:?}"),
    }

    let current = store.get().await.unwrap();
    assert_eq!(current.version, base.version + 1);
}

#[tokio::test]
async fn prior_versions_are_retained_immutably() {
    let store = store().await;
    let mut version = store.get().await.unwrap().version;

    for minutes in [10, 20, 30] {
        let patch = OrgSettingsPatch {
            schedule: Some(ScheduleSettings {
                grace_period_minutes: minutes,
                ..ScheduleSettings::default()
            }),
            ..OrgSettingsPatch::default()
        };
        version = store.propose(version, &patch, "admin").await.unwrap().version;
    }

    // Every version is still addressable with its original content
    let v2 = store.version(2).await.unwrap().unwrap();
    assert_eq!(v2.settings.schedule.grace_period_minutes, 10);
    let v4 = store.version(4).await.unwrap().unwrap();
    assert_eq!(v4.settings.schedule.grace_period_minutes, 30);
    assert!(store.version(99).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_proposals_are_serialized() {
    let store = store().await;
    let base = store.get().await.unwrap().version;

    let patch = OrgSettingsPatch {
        schedule: Some(ScheduleSettings {
            grace_period_minutes: 25,
            ..ScheduleSettings::default()
        }),
        ..OrgSettingsPatch::default()
    };

    // Both proposals race against the same base; exactly one may win
    let (a, b) = tokio::join!(
        store.propose(base, &patch, "first"),
        store.propose(base, &patch, "second"),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one proposal must commit");

    let current = store.get().await.unwrap();
    assert_eq!(current.version, base + 1);
}
