//! Schema descriptor for prompt grounding
//!
//! Tables, columns, types, and foreign-key edges of the warehouse. Loaded
//! once per session (either introspected from information_schema or built
//! from static triples) and shared read-only across questions.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};

/// One (table, column, type) triple, ordered by table then ordinal position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub table: String,
    pub name: String,
    pub data_type: String,
}

/// Immutable schema description: column triples plus directional foreign-key
/// edges written as `table.column -> table.column`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    columns: Vec<SchemaColumn>,
    relationships: Vec<String>,
}

/// Foreign-key edges of the FPL star schema. These are hand-maintained
/// configuration, not derived from the database.
pub fn fpl_relationships() -> Vec<String> {
    [
        "fact_player_performance.player_id -> dim_players.player_id",
        "fact_player_performance.team_id -> dim_teams.team_id",
        "fact_player_performance.gameweek_id -> dim_gameweeks.gameweek_id",
        "fact_player_performance.season_id -> dim_seasons.season_id",
        "fact_player_performance.date_id -> dim_dates.date_id",
        "fact_fixtures.home_team_id -> dim_teams.team_id",
        "fact_fixtures.away_team_id -> dim_teams.team_id",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl SchemaInfo {
    pub fn new(columns: Vec<SchemaColumn>, relationships: Vec<String>) -> Self {
        Self {
            columns,
            relationships,
        }
    }

    /// Load column triples from information_schema for the given namespace,
    /// attaching the hand-maintained FPL relationship edges.
    pub async fn introspect(pool: &PgPool, schema_namespace: &str) -> Result<Self> {
        let rows = sqlx::query(
            r#"
            SELECT table_name, column_name, data_type
            FROM information_schema.columns
            WHERE table_schema = $1
            ORDER BY table_name, ordinal_position
            "#,
        )
        .bind(schema_namespace)
        .fetch_all(pool)
        .await
        .map_err(|e| AgentError::Schema(format!("Failed to introspect schema: {}", e)))?;

        let columns = rows
            .into_iter()
            .map(|row| SchemaColumn {
                table: row.get("table_name"),
                name: row.get("column_name"),
                data_type: row.get("data_type"),
            })
            .collect();

        Ok(Self::new(columns, fpl_relationships()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Deterministic table block: columns grouped under a `Table: X` header,
    /// one ` - {column}: {type}` line each, blank line between tables.
    pub fn format_tables(&self) -> String {
        let mut lines = Vec::new();
        let mut current_table: Option<&str> = None;

        for col in &self.columns {
            if current_table != Some(col.table.as_str()) {
                if current_table.is_some() {
                    lines.push(String::new());
                }
                lines.push(format!("Table: {}", col.table));
                current_table = Some(col.table.as_str());
            }
            lines.push(format!(" - {}: {}", col.name, col.data_type));
        }

        lines.join("\n")
    }

    /// One relationship edge per line.
    pub fn format_relationships(&self) -> String {
        self.relationships.join("\n")
    }
}
