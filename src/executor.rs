//! Query execution against the warehouse
//!
//! SQL-level failures (bad syntax, missing relation) are expected while the
//! agent iterates, so they are reported in-band via `ExecutionResult` rather
//! than as errors. Only infrastructure failure (connection lost, pool
//! exhausted) surfaces as `AgentError::Database`.

use crate::config::Config;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, PgPool, Row};

/// Outcome of running one statement.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub error_message: Option<String>,
}

impl ExecutionResult {
    pub fn ok(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            success: true,
            columns,
            rows,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            columns: Vec::new(),
            rows: Vec::new(),
            error_message: Some(message.into()),
        }
    }
}

/// The relational collaborator. `Err` is reserved for infrastructure
/// failure; SQL errors come back as `success = false`.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn run(&self, sql: &str) -> Result<ExecutionResult>;
}

/// Postgres executor over an explicitly owned pool. Each execution acquires
/// a connection from the pool, so concurrent questions never share a cursor.
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&config.database_url())
            .await
            .map_err(|e| AgentError::Database(format!("Failed to connect: {}", e)))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn run(&self, sql: &str) -> Result<ExecutionResult> {
        match sqlx::query(sql).fetch_all(&self.pool).await {
            Ok(rows) => {
                let columns = rows
                    .first()
                    .map(|row| {
                        row.columns()
                            .iter()
                            .map(|c| c.name().to_string())
                            .collect()
                    })
                    .unwrap_or_default();
                let rows = rows.iter().map(row_to_json).collect();
                Ok(ExecutionResult::ok(columns, rows))
            }
            // The server rejected the statement; feed the message back to
            // the correction loop.
            Err(sqlx::Error::Database(db_err)) => {
                Ok(ExecutionResult::failed(db_err.message().to_string()))
            }
            Err(e) => Err(AgentError::Database(format!("Execution failed: {}", e))),
        }
    }
}

/// Decode a row into JSON values, trying the common scalar types in order.
/// Types without a cheap decode path fall back to null.
fn row_to_json(row: &PgRow) -> Vec<serde_json::Value> {
    (0..row.columns().len())
        .map(|idx| {
            if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
                return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
            }
            serde_json::Value::Null
        })
        .collect()
}
