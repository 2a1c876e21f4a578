//! Response sanitization
//!
//! Normalizes raw model output into a single executable SQL statement.

/// Clean raw model output into executable SQL.
///
/// Steps are order-dependent: strip ```sql / ``` fence markers, drop a
/// leading `sql` token from the still-untrimmed text, trim whitespace,
/// ensure exactly one trailing `;`.
///
/// The leading-token strip removes exactly three characters whenever the
/// lowercased text starts with `sql`. That is deliberately compatible with
/// the historical behavior and is a known risk: an unfenced statement
/// legitimately beginning with those letters (for example a column named
/// `sqlx` at the very start of the text) gets truncated. Fenced output is
/// immune because stripping the fence leaves a leading newline, so the
/// prefix check never fires on it.
pub fn clean(raw: &str) -> String {
    let mut text = raw.replace("```sql", "").replace("```", "");

    if text.to_lowercase().starts_with("sql") {
        text = text[3..].to_string();
    }

    let trimmed = text.trim();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}

/// True when sanitization produced no statement at all. Callers must treat
/// this as a failed generation and never execute it.
pub fn is_degenerate(sql: &str) -> bool {
    sql.trim_end_matches(';').trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_sql_fences() {
        let cleaned = clean("```sql\nSELECT * FROM dim_players\n```");
        assert_eq!(cleaned, "SELECT * FROM dim_players;");
        assert!(!cleaned.contains('`'));
    }

    #[test]
    fn test_strips_bare_fences() {
        assert_eq!(clean("```\nSELECT 1\n```"), "SELECT 1;");
    }

    #[test]
    fn test_appends_missing_semicolon() {
        assert_eq!(clean("SELECT 1"), "SELECT 1;");
    }

    #[test]
    fn test_no_duplicate_semicolon() {
        assert_eq!(clean("SELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn test_strips_leading_sql_token() {
        assert_eq!(clean("sql SELECT 1"), "SELECT 1;");
        assert_eq!(clean("SQL\nSELECT 1"), "SELECT 1;");
    }

    // Documented fragility: three characters are dropped even when `sql` is
    // not a standalone token.
    #[test]
    fn test_leading_sql_strip_is_not_word_boundary_aware() {
        assert_eq!(clean("sqlx_col FROM t"), "x_col FROM t;");
    }

    // The prefix check runs before trimming, so the newline left by fence
    // stripping shields fenced statements from it.
    #[test]
    fn test_fenced_statement_keeps_sql_like_leading_identifier() {
        assert_eq!(clean("```sql\nsqlx_col FROM t\n```"), "sqlx_col FROM t;");
        assert_eq!(clean("```\nsql_dialect FROM settings\n```"), "sql_dialect FROM settings;");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "```sql\nSELECT a FROM b\n```",
            "SELECT a FROM b;",
            "  SELECT a FROM b  ",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once);
        }
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        assert_eq!(clean(""), ";");
        assert!(is_degenerate(&clean("")));
        assert!(is_degenerate(&clean("```sql\n```")));
        assert!(is_degenerate(&clean("   \n  ")));
        assert!(!is_degenerate(&clean("SELECT 1")));
    }
}
