use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Retry budget exhausted for question '{question}': {message} (last SQL: {sql})")]
    RetryBudgetExhausted {
        message: String,
        sql: String,
        question: String,
    },
}

pub type Result<T> = std::result::Result<T, AgentError>;
