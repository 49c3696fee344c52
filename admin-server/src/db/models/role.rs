//! Role Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Role ID type
pub type RoleId = RecordId;

/// Role model matching the `role` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoleId>,
    pub role_name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Role {
    pub fn new(role_name: String, permissions: Vec<String>) -> Self {
        Self {
            id: None,
            role_name,
            permissions,
            is_system: false,
            is_active: true,
        }
    }
}

/// Create role request
#[derive(Debug, Deserialize)]
pub struct RoleCreate {
    pub role_name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
