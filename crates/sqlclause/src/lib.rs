//! # sqlclause
//!
//! Composable SQL clause builder: WHERE / ORDER BY / GROUP BY / LIMIT
//! fragments accumulated per query and serialized with `?` placeholders.
//!
//! ## Features
//!
//! - **Condition tree**: predicates and AND/OR groups with their own connectors
//! - **Merge policies**: repeated WHERE/ORDER/GROUP calls accumulate, LIMIT overrides
//! - **Informal inputs**: nested JSON mappings, positional triples, raw fragments
//! - **Clone-friendly**: query handles share state until their first write
//! - **Configurable**: clause order per operation and SQL logging from TOML
//!
//! ```ignore
//! use serde_json::json;
//! use sqlclause::{Session, SessionConfig};
//!
//! let session = Session::new(SessionConfig::default());
//!
//! let built = session
//!     .query("SELECT * FROM users", vec![])
//!     .and_where(json!({"age": {">": 18}, "status": {"IN": ["active", "new"]}}))
//!     .order([["created_at", "DESC"]])
//!     .paging(2, 20)
//!     .build()?;
//!
//! assert_eq!(
//!     built.sql(),
//!     "SELECT * FROM users WHERE (age > ? AND status IN(?,?)) ORDER BY created_at DESC LIMIT 20 OFFSET 20"
//! );
//! ```

pub mod clause;
pub mod condition;
pub mod config;
pub mod error;
pub mod explain;
pub mod normalize;
pub mod operator;
pub mod query;
pub mod session;
pub mod statement;

#[cfg(feature = "postgres")]
pub mod pg;

pub use clause::{
    Builder, Clause, ClauseExpression, Expression, GroupBy, GroupByColumn, Limit, OrderBy,
    OrderByColumn, Where, GROUP_BY, LIMIT, ORDER_BY, WHERE,
};
pub use condition::{Conjunction, Predicate, WhereNode};
pub use config::{LogLevel, Operation, SessionConfig};
pub use error::{BuildError, BuildResult};
pub use explain::explain_sql;
pub use normalize::{OperatorArg, OrderInput, WhereInput};
pub use operator::{Connector, Operator};
pub use query::{BuiltQuery, Query};
pub use session::Session;
pub use statement::Statement;

#[cfg(feature = "postgres")]
pub use pg::{PgParam, number_placeholders};
