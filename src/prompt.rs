//! Prompt construction
//!
//! Pure transformations from (question, schema, optional error context) to
//! the system prompt text. Section order matters: base instructions first,
//! then the correction block on retries, then the schema context, then the
//! question. Later sections can override earlier framing, so the question
//! always comes last.

use crate::schema::SchemaInfo;

/// Base dialect and behavioral instructions for SQL generation.
pub const SQL_BASE_PROMPT: &str = "\
You are a Postgres SQL expert assistant. Your task is to convert natural language questions
into SQL queries. Follow these rules:
1. Only return the SQL query without any explanations
2. Use proper SQL syntax and formatting
3. Consider table relationships and join conditions
4. Include appropriate WHERE clauses for filtering
5. Use clear aliasing for joined tables";

/// Fixed correction directives appended under the literal error text.
const SQL_ERROR_DIRECTIVES: &str = "\
When generating the new query:
1. Check table and column names
2. Verify join conditions
3. Validate syntax and semicolons
4. Ensure proper quoting of string values";

/// Correction block for a retry: previous error verbatim, then the fixed
/// directives.
fn error_block(error_context: &str) -> String {
    format!(
        "The previous query resulted in an error. Please fix the following issues:\n{}\n{}",
        error_context, SQL_ERROR_DIRECTIVES
    )
}

/// Schema context block embedding the formatted tables and relationships.
fn schema_block(schema_info: &SchemaInfo) -> String {
    format!(
        "Available tables and their schemas:\n{}\n\nKey relationships:\n{}",
        schema_info.format_tables(),
        schema_info.format_relationships()
    )
}

/// Build the first-attempt prompt. Without schema info the schema section is
/// omitted entirely and the question is still appended.
pub fn build_initial_prompt(question: &str, schema_info: Option<&SchemaInfo>) -> String {
    let mut parts = vec![SQL_BASE_PROMPT.to_string()];

    if let Some(schema) = schema_info {
        parts.push(schema_block(schema));
    }

    parts.push(format!("Question: {}", question));
    parts.join("\n\n")
}

/// Build a corrective prompt for a retry. The correction block sits directly
/// after the base instructions, before any schema context.
pub fn build_error_prompt(
    question: &str,
    error_context: &str,
    schema_info: Option<&SchemaInfo>,
) -> String {
    let mut parts = vec![SQL_BASE_PROMPT.to_string(), error_block(error_context)];

    if let Some(schema) = schema_info {
        parts.push(schema_block(schema));
    }

    parts.push(format!("Question: {}", question));
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fpl_relationships, SchemaColumn, SchemaInfo};

    fn sample_schema() -> SchemaInfo {
        SchemaInfo::new(
            vec![SchemaColumn {
                table: "dim_teams".to_string(),
                name: "team_id".to_string(),
                data_type: "integer".to_string(),
            }],
            fpl_relationships(),
        )
    }

    #[test]
    fn test_initial_prompt_without_schema() {
        let prompt = build_initial_prompt("Q", None);
        assert!(prompt.contains("Question: Q"));
        assert!(!prompt.contains("Available tables"));
        assert!(prompt.contains("Postgres SQL expert"));
    }

    #[test]
    fn test_initial_prompt_embeds_schema_blocks_verbatim() {
        let schema = sample_schema();
        let prompt = build_initial_prompt("Q", Some(&schema));
        assert!(prompt.contains(&schema.format_tables()));
        assert!(prompt.contains(&schema.format_relationships()));
        assert!(prompt.contains("Available tables and their schemas:"));
        assert!(prompt.contains("Key relationships:"));
    }

    #[test]
    fn test_question_is_the_last_section() {
        let prompt = build_initial_prompt("top scorers this season", Some(&sample_schema()));
        assert!(prompt.ends_with("Question: top scorers this season"));
    }

    #[test]
    fn test_error_prompt_contains_error_and_base_instructions() {
        let prompt = build_error_prompt("Q", "boom", None);
        assert!(prompt.contains("boom"));
        assert!(prompt.contains("Postgres SQL expert"));
        assert!(prompt.contains("Check table and column names"));

        // Correction directives appear before the question line.
        let directives_pos = prompt.find("Verify join conditions").unwrap();
        let question_pos = prompt.find("Question:").unwrap();
        assert!(directives_pos < question_pos);
    }

    #[test]
    fn test_error_prompt_places_correction_before_schema() {
        let prompt = build_error_prompt("Q", "relation does not exist", Some(&sample_schema()));
        let error_pos = prompt.find("relation does not exist").unwrap();
        let schema_pos = prompt.find("Available tables and their schemas:").unwrap();
        assert!(error_pos < schema_pos);
    }
}
