//! Generation orchestrator
//!
//! Drives the generate -> sanitize -> execute loop as an explicit state
//! machine with a decrementing retry budget. Expected SQL failures are
//! absorbed here and fed back into a corrective prompt; model failures and
//! infrastructure failures are terminal.

use crate::error::{AgentError, Result};
use crate::executor::SqlExecutor;
use crate::llm::ModelClient;
use crate::prompt;
use crate::sanitize;
use crate::schema::SchemaInfo;
use tracing::{debug, info, warn};

/// Loop states, each carrying the data the next transition needs. Kept
/// explicit so retry accounting stays auditable.
#[derive(Debug)]
enum AgentState {
    BuildPrompt,
    InvokeModel { prompt: String },
    Sanitize { raw: String },
    Execute { sql: String },
    Retry { sql: String, error: String },
}

/// Successful resolution of a question.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Total execution attempts, counting the first (1 means no retries).
    pub attempts: u8,
}

/// Cheap textual pre-flight: the statement mentions both SELECT and FROM,
/// case-insensitively. Advisory only; the orchestrator logs a warning on a
/// false result but still executes.
pub fn validate(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    upper.contains("SELECT") && upper.contains("FROM")
}

pub struct SqlAgent<M: ModelClient, E: SqlExecutor> {
    model: M,
    executor: E,
    schema_info: Option<SchemaInfo>,
    /// Corrective retries after the initial attempt.
    max_retries: u8,
}

impl<M: ModelClient, E: SqlExecutor> SqlAgent<M, E> {
    pub fn new(model: M, executor: E, schema_info: Option<SchemaInfo>, max_retries: u8) -> Self {
        Self {
            model,
            executor,
            schema_info,
            max_retries,
        }
    }

    /// Resolve a question to rows, retrying with error feedback until the
    /// budget runs out.
    pub async fn resolve(&self, question: &str) -> Result<QueryOutcome> {
        let mut state = AgentState::BuildPrompt;
        let mut retries_left = self.max_retries;
        let mut attempts: u8 = 0;
        let mut error_context: Option<String> = None;

        loop {
            state = match state {
                AgentState::BuildPrompt => {
                    let prompt = match &error_context {
                        None => prompt::build_initial_prompt(question, self.schema_info.as_ref()),
                        Some(err) => {
                            prompt::build_error_prompt(question, err, self.schema_info.as_ref())
                        }
                    };
                    debug!(prompt_len = prompt.len(), "Built prompt");
                    AgentState::InvokeModel { prompt }
                }
                AgentState::InvokeModel { prompt } => {
                    // A failed model call is terminal: it does not consume a
                    // SQL retry and is not retried here.
                    let raw = self.model.complete(&prompt, question).await?;
                    AgentState::Sanitize { raw }
                }
                AgentState::Sanitize { raw } => {
                    let sql = sanitize::clean(&raw);
                    if sanitize::is_degenerate(&sql) {
                        // Never execute an empty statement; it consumes a
                        // retry like any execution failure.
                        warn!("Sanitized response was empty");
                        AgentState::Retry {
                            sql,
                            error: "empty query generated".to_string(),
                        }
                    } else {
                        AgentState::Execute { sql }
                    }
                }
                AgentState::Execute { sql } => {
                    if !validate(&sql) {
                        warn!(sql = %sql, "Pre-flight validation failed (missing SELECT/FROM), executing anyway");
                    }
                    attempts += 1;
                    info!(attempt = attempts, sql = %sql, "Executing generated SQL");

                    let result = self.executor.run(&sql).await?;
                    if result.success {
                        info!(rows = result.rows.len(), attempts, "Question resolved");
                        return Ok(QueryOutcome {
                            sql,
                            columns: result.columns,
                            rows: result.rows,
                            attempts,
                        });
                    }

                    let error = result
                        .error_message
                        .unwrap_or_else(|| "unknown execution error".to_string());
                    warn!(attempt = attempts, error = %error, "Execution failed");
                    AgentState::Retry { sql, error }
                }
                AgentState::Retry { sql, error } => {
                    if retries_left == 0 {
                        return Err(AgentError::RetryBudgetExhausted {
                            message: error,
                            sql,
                            question: question.to_string(),
                        });
                    }
                    retries_left -= 1;
                    error_context = Some(error);
                    AgentState::BuildPrompt
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_select_and_from() {
        assert!(validate("SELECT a FROM b"));
        assert!(validate("select web_name from dim_players;"));
        assert!(!validate("DELETE FROM b"));
        assert!(!validate("SELECT 1"));
    }
}
