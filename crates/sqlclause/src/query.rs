//! Fluent query handle.
//!
//! Every call consumes the handle and returns it. A [`Query`] owns its
//! statement; cloning one shares the clause map and rename table with the
//! handle it came from until either side writes.
//!
//! # Example
//! ```ignore
//! use serde_json::json;
//! use sqlclause::Query;
//!
//! let built = Query::new()
//!     .and_where(("age", ">", 18))
//!     .and_where(json!({"name": {"IN": ["a", "b"]}}))
//!     .order([["created_at", "DESC"]])
//!     .limit(10)
//!     .build()?;
//!
//! assert_eq!(built.sql(), " WHERE (age > ? AND name IN(?,?)) ORDER BY created_at DESC LIMIT 10");
//! ```

use crate::clause::{Builder, ClauseExpression, GroupBy, Limit};
use crate::condition::WhereNode;
use crate::config::{Operation, SessionConfig};
use crate::error::{BuildError, BuildResult};
use crate::explain::{explain_sql, log_sql};
use crate::normalize::{OperatorArg, OrderInput, WhereInput};
use crate::statement::Statement;
use serde_json::Value;
use std::sync::Arc;

/// Final SQL text and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<Value>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// SQL with parameters inlined, for logs.
    pub fn explain(&self) -> String {
        explain_sql(&self.sql, &self.params)
    }
}

/// A chain of builder calls for one logical query.
#[derive(Debug, Clone, Default)]
pub struct Query {
    statement: Statement,
    config: Arc<SessionConfig>,
    operation: Operation,
    build_error: Option<BuildError>,
}

impl Query {
    /// Create a SELECT chain with default configuration and no base text.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_config(config: Arc<SessionConfig>, operation: Operation) -> Self {
        Self {
            statement: Statement::new(),
            config,
            operation,
            build_error: None,
        }
    }

    /// Append base text and its parameters (bound before any clause parameter).
    pub fn sql(mut self, sql: &str, args: Vec<Value>) -> Self {
        self.statement.write_str(sql);
        self.statement.extend_vars(args);
        self
    }

    /// Choose which configured clause order [`build`](Query::build) uses.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    // ==================== WHERE ====================

    /// Add WHERE conditions in any accepted shape.
    ///
    /// Dropped inputs leave the query unchanged; construction errors are
    /// recorded and returned by [`build`](Query::build).
    pub fn and_where(mut self, input: impl Into<WhereInput>) -> Self {
        let result = input
            .into()
            .lower()
            .and_then(|lowered| match lowered {
                Some(where_) => self.statement.add_clause(where_),
                None => Ok(()),
            });
        self.record(result);
        self
    }

    /// Add WHERE: `field op value`.
    pub fn where_cmp(
        self,
        field: impl Into<String>,
        operator: impl Into<OperatorArg>,
        value: impl Into<Value>,
    ) -> Self {
        self.and_where(WhereInput::Positional {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        })
    }

    /// Add WHERE: raw text followed by its bound values.
    pub fn where_raw(self, semantic: impl Into<String>, values: Vec<Value>) -> Self {
        self.and_where(WhereInput::Raw {
            semantic: semantic.into(),
            values,
        })
    }

    /// Add WHERE: a pre-built node.
    pub fn where_node(self, node: WhereNode) -> Self {
        self.and_where(WhereInput::Node(node))
    }

    // ==================== ORDER / GROUP / LIMIT ====================

    /// Add ORDER BY columns after any existing ones.
    pub fn order(mut self, input: impl Into<OrderInput>) -> Self {
        if let Some(order) = input.into().lower() {
            let result = self.statement.add_clause(order);
            self.record(result);
        }
        self
    }

    /// Add a GROUP BY column after any existing ones.
    pub fn group_by(self, column: impl Into<String>) -> Self {
        self.clause(GroupBy::column(column))
    }

    /// Set LIMIT. Zero keeps a previously set limit.
    pub fn limit(self, limit: i64) -> Self {
        self.clause(Limit::limit(limit))
    }

    /// Set OFFSET. Zero keeps a previously set offset; negatives become zero.
    pub fn offset(self, offset: i64) -> Self {
        self.clause(Limit::offset(offset))
    }

    /// Pagination helper. `page` is 1-based (values below 1 mean page 1).
    pub fn paging(self, page: i64, per_page: i64) -> Self {
        self.clause(Limit::page(page, per_page))
    }

    /// Contribute any clause expression.
    pub fn clause<E: ClauseExpression>(mut self, expr: E) -> Self {
        let result = self.statement.add_clause(expr);
        self.record(result);
        self
    }

    // ==================== Renames / reset ====================

    /// Emit `new` wherever the identifier `old` is written.
    pub fn rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.statement.add_name_map(old, new);
        self
    }

    /// Register several renames at once.
    pub fn renames<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (old, new) in pairs {
            self.statement.add_name_map(old, new);
        }
        self
    }

    /// Drop clauses, renames and any recorded error.
    pub fn reset(mut self) -> Self {
        self.statement.reset();
        self.build_error = None;
        self
    }

    // ==================== Inspection / build ====================

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// First construction error recorded on this chain.
    pub fn build_error(&self) -> Option<&BuildError> {
        self.build_error.as_ref()
    }

    /// Build using the configured clause order for this handle's operation.
    pub fn build(&self) -> BuildResult<BuiltQuery> {
        self.build_with(self.config.clauses_for(self.operation))
    }

    /// Build serializing exactly the clauses in `names`, in that order.
    ///
    /// The handle is not modified and can be built again.
    pub fn build_with<S: AsRef<str>>(&self, names: &[S]) -> BuildResult<BuiltQuery> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let mut statement = self.statement.clone();
        statement.build(names);
        let (sql, params) = statement.into_parts();
        log_sql(&self.config, &sql, &params);
        Ok(BuiltQuery { sql, params })
    }

    /// Get the SQL string (for debugging). Ignores recorded errors.
    pub fn to_sql(&self) -> String {
        let mut statement = self.statement.clone();
        statement.build(self.config.clauses_for(self.operation));
        statement.into_parts().0
    }

    fn record(&mut self, result: BuildResult<()>) {
        if let Err(err) = result {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %err, "clause rejected");
            if self.build_error.is_none() {
                self.build_error = Some(err);
            }
        }
    }
}
