use anyhow::Result;
use clap::Parser;
use fpl_sql_agent::agent::SqlAgent;
use fpl_sql_agent::config::Config;
use fpl_sql_agent::executor::PgExecutor;
use fpl_sql_agent::llm::OpenAiClient;
use fpl_sql_agent::schema::SchemaInfo;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fpl-sql-agent")]
#[command(about = "Ask the FPL warehouse a question in natural language")]
struct Args {
    /// The question in natural language
    question: String,

    /// Model identifier (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Corrective retries after the initial attempt (overrides SQL_MAX_RETRIES)
    #[arg(long)]
    max_retries: Option<u8>,

    /// Model API key (overrides GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Skip schema introspection and prompt without schema context
    #[arg(long)]
    no_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    if config.api_key.is_empty() {
        anyhow::bail!("Missing model API key: set GEMINI_API_KEY or pass --api-key");
    }

    info!(question = %args.question, model = %config.model, "Resolving question");

    let executor = PgExecutor::connect(&config).await?;

    let schema_info = if args.no_schema {
        None
    } else {
        let schema = SchemaInfo::introspect(executor.pool(), &config.schema_namespace).await?;
        if schema.is_empty() {
            info!(namespace = %config.schema_namespace, "Schema namespace has no columns, prompting without schema");
            None
        } else {
            Some(schema)
        }
    };

    let model = OpenAiClient::new(
        config.api_key.clone(),
        config.api_base_url.clone(),
        config.model.clone(),
    );

    let agent = SqlAgent::new(model, executor, schema_info, config.max_retries);
    let outcome = agent.resolve(&args.question).await?;

    println!("SQL: {}", outcome.sql);
    println!();
    print_table(&outcome.columns, &outcome.rows);
    println!();
    println!("{} row(s), {} attempt(s)", outcome.rows.len(), outcome.attempts);

    Ok(())
}

/// Render rows as aligned plain text.
fn print_table(columns: &[String], rows: &[Vec<serde_json::Value>]) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let render = |v: &serde_json::Value| match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "NULL".to_string(),
        other => other.to_string(),
    };

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    widths.resize(
        columns.len().max(rows.iter().map(|r| r.len()).max().unwrap_or(0)),
        0,
    );
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(render(value).len());
        }
    }

    if !columns.is_empty() {
        let header: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
            .collect();
        println!("{}", header.join(" | "));
        println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    }

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:width$}", render(v), width = widths[i]))
            .collect();
        println!("{}", cells.join(" | "));
    }
}
