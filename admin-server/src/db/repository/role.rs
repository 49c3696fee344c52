//! Role Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Role, RoleCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Default roles seeded on first start
const DEFAULT_ROLES: &[(&str, &[&str])] = &[
    ("admin", &["all"]),
    (
        "staff",
        &["attendance:read", "attendance:write", "reports:read"],
    ),
];

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active roles
    pub async fn find_all(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT * FROM role WHERE is_active = true ORDER BY role_name")
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// Find role by name
    pub async fn find_by_name(&self, role_name: &str) -> RepoResult<Option<Role>> {
        let name_owned = role_name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM role WHERE role_name = $role_name LIMIT 1")
            .bind(("role_name", name_owned))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Create a new role
    pub async fn create(&self, data: RoleCreate) -> RepoResult<Role> {
        if self.find_by_name(&data.role_name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                data.role_name
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE role SET
                    role_name = $role_name,
                    permissions = $permissions,
                    is_system = false,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("role_name", data.role_name))
            .bind(("permissions", data.permissions))
            .await?;

        let created: Option<Role> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create role".to_string()))
    }

    /// Seed the default roles (idempotent)
    pub async fn seed_defaults(&self) -> RepoResult<()> {
        for (name, permissions) in DEFAULT_ROLES {
            if self.find_by_name(name).await?.is_none() {
                let permissions: Vec<String> =
                    permissions.iter().map(|p| (*p).to_string()).collect();
                let mut result = self
                    .base
                    .db()
                    .query(
                        r#"CREATE role SET
                            role_name = $role_name,
                            permissions = $permissions,
                            is_system = true,
                            is_active = true
                        RETURN AFTER"#,
                    )
                    .bind(("role_name", (*name).to_string()))
                    .bind(("permissions", permissions))
                    .await?;
                let _: Option<Role> = result.take(0)?;
                tracing::info!(role = name, "Seeded default role");
            }
        }
        Ok(())
    }
}
