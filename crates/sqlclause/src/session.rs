//! Session: shared configuration and the entry points that start query handles.

use crate::config::{Operation, SessionConfig};
use crate::query::Query;
use serde_json::Value;
use std::sync::Arc;

/// Factory for [`Query`] handles sharing one [`SessionConfig`].
///
/// # Example
/// ```ignore
/// let session = Session::new(SessionConfig::default().log_sql(true));
///
/// let built = session
///     .query("SELECT * FROM users", vec![])
///     .and_where(("status", "=", "active"))
///     .limit(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Arc<SessionConfig>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start an empty SELECT chain.
    pub fn statement(&self) -> Query {
        Query::with_config(Arc::clone(&self.config), Operation::Select)
    }

    /// Start a SELECT chain from base text.
    pub fn query(&self, sql: &str, args: Vec<Value>) -> Query {
        self.statement().sql(sql, args)
    }

    /// Start an EXEC chain from base text.
    pub fn exec(&self, sql: &str, args: Vec<Value>) -> Query {
        Query::with_config(Arc::clone(&self.config), Operation::Exec).sql(sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_uses_select_clauses() {
        let session = Session::default();
        let built = session
            .query("SELECT * FROM t", vec![])
            .limit(5)
            .and_where(("a", "=", 1))
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT * FROM t WHERE a = ? LIMIT 5");
    }

    #[test]
    fn exec_uses_exec_clauses() {
        let session = Session::default();
        let built = session
            .exec("DELETE FROM t", vec![])
            .and_where(("a", "=", 1))
            .build()
            .unwrap();
        assert_eq!(built.sql(), "DELETE FROM t");
        assert!(built.params().is_empty());

        let session = Session::new(SessionConfig::new().exec_clauses(["WHERE"]));
        let built = session
            .exec("UPDATE t SET b = ?", vec![json!(2)])
            .and_where(("a", "=", 1))
            .build()
            .unwrap();
        assert_eq!(built.sql(), "UPDATE t SET b = ? WHERE a = ?");
        assert_eq!(built.params(), &[json!(2), json!(1)]);
    }

    #[test]
    fn handles_are_independent() {
        let session = Session::default();
        let a = session.statement().and_where(("a", "=", 1));
        let b = session.statement();
        assert_eq!(a.to_sql(), " WHERE a = ?");
        assert_eq!(b.to_sql(), "");
    }

    #[test]
    fn logging_does_not_change_output() {
        let quiet = Session::default();
        let loud = Session::new(SessionConfig::new().log_sql(true).max_log_length(8));
        let build = |s: &Session| s.query("SELECT 1", vec![]).and_where(("a", "=", "x")).build();
        assert_eq!(build(&quiet), build(&loud));
    }
}
