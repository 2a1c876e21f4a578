pub mod agent;
pub mod config;
pub mod error;
pub mod executor;
pub mod llm;
pub mod prompt;
pub mod sanitize;
pub mod schema;

pub use agent::{validate, QueryOutcome, SqlAgent};
pub use config::Config;
pub use error::{AgentError, Result};
pub use executor::{ExecutionResult, PgExecutor, SqlExecutor};
pub use llm::{ModelClient, OpenAiClient};
pub use schema::{SchemaColumn, SchemaInfo};
