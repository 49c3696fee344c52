//! Audit Trail Storage
//!
//! Append-only: no update or delete paths exist. A SHA-256 hash chain
//! links every entry to its predecessor, so any tampering is detectable
//! by re-walking the chain.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditQuery,
};
use crate::utils::time::now_millis;

/// Storage error
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for AuditStorageError {
    fn from(err: surrealdb::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for crate::utils::AppError {
    fn from(err: AuditStorageError) -> Self {
        crate::utils::AppError::internal(err.to_string())
    }
}

/// Database row shape (includes the SurrealDB record id)
#[derive(Debug, Clone, serde::Deserialize)]
struct AuditRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    resource_type: String,
    resource_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

impl From<AuditRecord> for AuditEntry {
    fn from(r: AuditRecord) -> Self {
        AuditEntry {
            id: r.sequence,
            timestamp: r.timestamp,
            action: r.action,
            resource_type: r.resource_type,
            resource_id: r.resource_id,
            operator_id: r.operator_id,
            operator_name: r.operator_name,
            details: r.details,
            prev_hash: r.prev_hash,
            curr_hash: r.curr_hash,
        }
    }
}

/// Sequence + hash of the newest entry
#[derive(Debug, serde::Deserialize)]
struct LastEntry {
    sequence: u64,
    curr_hash: String,
}

/// COUNT result
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// Insert shape (no record id)
#[derive(Debug, serde::Serialize)]
struct AuditInsert {
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    resource_type: String,
    resource_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

/// Audit trail storage (SurrealDB)
#[derive(Clone)]
pub struct AuditStorage {
    db: Surreal<Db>,
    /// Serializes appends; the sequence/prev_hash read-modify-write must
    /// not race
    append_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AuditStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            append_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Append one audit entry
    ///
    /// 1. read the newest sequence number and hash
    /// 2. compute this entry's hash
    /// 3. insert
    pub async fn append(
        &self,
        action: AuditAction,
        resource_type: String,
        resource_id: String,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) -> AuditStorageResult<AuditEntry> {
        let _guard = self.append_lock.lock().await;

        let mut result = self
            .db
            .query("SELECT sequence, curr_hash FROM audit_log ORDER BY sequence DESC LIMIT 1")
            .await?;
        let last: Vec<LastEntry> = result.take(0)?;

        let (sequence, prev_hash) = match last.first() {
            Some(last) => (last.sequence + 1, last.curr_hash.clone()),
            None => (1, "genesis".to_string()),
        };

        let timestamp = now_millis();
        let curr_hash = compute_audit_hash(
            &prev_hash,
            sequence,
            timestamp,
            &action,
            &resource_type,
            &resource_id,
            operator_id.as_deref(),
            operator_name.as_deref(),
            &details,
        );

        let entry = AuditEntry {
            id: sequence,
            timestamp,
            action,
            resource_type: resource_type.clone(),
            resource_id: resource_id.clone(),
            operator_id: operator_id.clone(),
            operator_name: operator_name.clone(),
            details: details.clone(),
            prev_hash: prev_hash.clone(),
            curr_hash: curr_hash.clone(),
        };

        let insert = AuditInsert {
            sequence,
            timestamp,
            action,
            resource_type,
            resource_id,
            operator_id,
            operator_name,
            details,
            prev_hash,
            curr_hash,
        };

        let mut res = self
            .db
            .query("CREATE audit_log CONTENT $data")
            .bind(("data", insert))
            .await?;
        let _: Vec<AuditRecord> = res.take(0)?;

        Ok(entry)
    }

    /// Query the audit trail
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if q.to.is_some() {
            conditions.push("timestamp <= $to");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.operator_id.is_some() {
            conditions.push("operator_id = $operator_id");
        }
        if q.resource_type.is_some() {
            conditions.push("resource_type = $resource_type");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() as total FROM audit_log{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.db.query(&sql);

        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref action) = q.action {
            let action_str = serde_json::to_value(action)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("action", action_str));
        }
        if let Some(ref operator_id) = q.operator_id {
            qb = qb.bind(("operator_id", operator_id.clone()));
        }
        if let Some(ref resource_type) = q.resource_type {
            qb = qb.bind(("resource_type", resource_type.clone()));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<AuditRecord> = result.take(1)?;
        let entries = records.into_iter().map(AuditEntry::from).collect();

        Ok((entries, total))
    }

    /// Walk the full chain and report every break
    ///
    /// Checks both linkage (each entry's `prev_hash` equals its
    /// predecessor's `curr_hash`) and content (each `curr_hash`
    /// recomputes from the stored fields).
    pub async fn verify_chain(&self) -> AuditStorageResult<AuditChainVerification> {
        let mut result = self
            .db
            .query("SELECT * FROM audit_log ORDER BY sequence ASC")
            .await?;
        let records: Vec<AuditRecord> = result.take(0)?;

        let mut breaks = Vec::new();
        let mut expected_prev = "genesis".to_string();

        for record in &records {
            if record.prev_hash != expected_prev {
                breaks.push(AuditChainBreak {
                    entry_id: record.sequence,
                    expected_hash: expected_prev.clone(),
                    actual_hash: record.prev_hash.clone(),
                });
            }

            let recomputed = compute_audit_hash(
                &record.prev_hash,
                record.sequence,
                record.timestamp,
                &record.action,
                &record.resource_type,
                &record.resource_id,
                record.operator_id.as_deref(),
                record.operator_name.as_deref(),
                &record.details,
            );
            if recomputed != record.curr_hash {
                breaks.push(AuditChainBreak {
                    entry_id: record.sequence,
                    expected_hash: recomputed,
                    actual_hash: record.curr_hash.clone(),
                });
            }

            expected_prev = record.curr_hash.clone();
        }

        Ok(AuditChainVerification {
            total_entries: records.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }
}

/// Normalize a JSON value — restore integers that SurrealDB degraded to
/// floats
///
/// SurrealDB stores numbers as floats internally, so `5` reads back as
/// `5.0`. Hashing must see the same serialization on write and re-read;
/// integers without a fractional part are folded back to i64.
///
/// Safe range: f64 mantissa is 52 bits, only |value| ≤ 2^53 converts
/// losslessly.
fn normalize_json(value: &serde_json::Value) -> serde_json::Value {
    const MAX_SAFE_INT: f64 = (1_i64 << 53) as f64;

    match value {
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() <= MAX_SAFE_INT
            {
                return serde_json::Value::Number(serde_json::Number::from(f as i64));
            }
            value.clone()
        }
        serde_json::Value::Object(map) => {
            let normalized: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            serde_json::Value::Object(normalized)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(normalize_json).collect())
        }
        _ => value.clone(),
    }
}

/// SHA-256 over every stored field
///
/// - variable-length fields are separated with `\x00` so ("ab","cd") and
///   ("abc","d") cannot collide
/// - fixed-width fields (u64/i64) use LE bytes, no separator needed
/// - optional fields use a tag byte (`\x00`=None, `\x01`+bytes=Some) so
///   None and Some("") differ
/// - action uses its serde form (snake_case, stable across versions)
/// - details go through normalize_json first
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    id: u64,
    timestamp: i64,
    action: &AuditAction,
    resource_type: &str,
    resource_id: &str,
    operator_id: Option<&str>,
    operator_name: Option<&str>,
    details: &serde_json::Value,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(id.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());

    let action_str = serde_json::to_string(action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    hasher.update(resource_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(resource_id.as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, operator_id);
    hash_optional(&mut hasher, operator_name);

    let normalized = normalize_json(details);
    let details_json = serde_json::to_string(&normalized).unwrap_or_default();
    hasher.update(details_json.as_bytes());
    hasher.update(b"\x00");

    format!("{:x}", hasher.finalize())
}

/// Optional field hashing: `\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_distinguishes_none_from_empty() {
        let details = serde_json::json!({});
        let a = compute_audit_hash(
            "genesis",
            1,
            0,
            &AuditAction::LoginSuccess,
            "account",
            "account:x",
            None,
            None,
            &details,
        );
        let b = compute_audit_hash(
            "genesis",
            1,
            0,
            &AuditAction::LoginSuccess,
            "account",
            "account:x",
            Some(""),
            None,
            &details,
        );
        assert_ne!(a, b);
    }

    #[test]
    fn normalize_folds_whole_floats() {
        let v = serde_json::json!({"n": 5.0, "deep": [1.0, 2.5]});
        let n = normalize_json(&v);
        assert_eq!(n["n"], serde_json::json!(5));
        assert_eq!(n["deep"][0], serde_json::json!(1));
        assert_eq!(n["deep"][1], serde_json::json!(2.5));
    }
}
