//! Human-readable rendering of built SQL, for logs only.

use crate::config::SessionConfig;
use serde_json::Value;

/// Rewrite each `?` placeholder outside single-quoted literals.
///
/// `replace` receives the 0-based placeholder index; returning `None` keeps
/// the `?` as-is.
pub(crate) fn replace_placeholders(
    sql: &str,
    mut replace: impl FnMut(usize) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut in_literal = false;
    let mut idx = 0;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                match replace(idx) {
                    Some(rendered) => out.push_str(&rendered),
                    None => out.push(ch),
                }
                idx += 1;
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Inline `params` into `sql` as literals.
///
/// The result is meant for reading, not for execution.
///
/// # Example
/// ```ignore
/// let s = explain_sql(" WHERE name = ? AND age > ?", &[json!("o'neil"), json!(18)]);
/// assert_eq!(s, " WHERE name = 'o''neil' AND age > 18");
/// ```
pub fn explain_sql(sql: &str, params: &[Value]) -> String {
    replace_placeholders(sql, |idx| params.get(idx).map(literal))
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) | Value::Object(_) => quote(&value.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Truncate to at most `max` chars, appending `...` when cut.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.chars().count() > max => {
            let cut: String = sql.chars().take(max).collect();
            format!("{cut}...")
        }
        _ => sql.to_string(),
    }
}

/// Log a built statement per the session's logging settings.
#[cfg(feature = "tracing")]
pub(crate) fn log_sql(config: &SessionConfig, sql: &str, params: &[Value]) {
    use crate::config::LogLevel;

    if !config.log_sql {
        return;
    }
    let explained = truncate_sql(&explain_sql(sql, params), config.max_log_length);
    let count = params.len();

    // Tracing macros need a constant level.
    match config.log_level {
        LogLevel::Error => tracing::error!(params = count, sql = %explained, "built sql"),
        LogLevel::Warn => tracing::warn!(params = count, sql = %explained, "built sql"),
        LogLevel::Info => tracing::info!(params = count, sql = %explained, "built sql"),
        LogLevel::Debug => tracing::debug!(params = count, sql = %explained, "built sql"),
        LogLevel::Trace => tracing::trace!(params = count, sql = %explained, "built sql"),
    }
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn log_sql(_config: &SessionConfig, _sql: &str, _params: &[Value]) {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inlines_params() {
        let s = explain_sql(
            "SELECT * FROM t WHERE (name = ? AND age > ? AND ok = ?)",
            &[json!("o'neil"), json!(18), json!(true)],
        );
        assert_eq!(s, "SELECT * FROM t WHERE (name = 'o''neil' AND age > 18 AND ok = true)");
    }

    #[test]
    fn skips_question_marks_in_literals() {
        let s = explain_sql("a = '?' AND b = ?", &[json!(null)]);
        assert_eq!(s, "a = '?' AND b = NULL");
    }

    #[test]
    fn keeps_placeholders_without_params() {
        let s = explain_sql("a IN(?,?)", &[json!([1, 2])]);
        assert_eq!(s, "a IN('[1,2]',?)");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_sql("héllo", Some(2)), "hé...");
        assert_eq!(truncate_sql("héllo", Some(10)), "héllo");
        assert_eq!(truncate_sql("héllo", None), "héllo");
    }
}
