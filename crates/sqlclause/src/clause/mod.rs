//! Named statement clauses and their merge policies.
//!
//! A [`Clause`] wraps one [`Expression`] under a name (`WHERE`, `ORDER BY`,
//! `GROUP BY`, `LIMIT`). The first contribution to a name creates the clause;
//! later contributions go through [`ClauseExpression::merge_clause`], which
//! decides per kind how the new expression combines with the stored one:
//!
//! | Kind       | Policy                                                  |
//! |------------|---------------------------------------------------------|
//! | `ORDER BY` | append columns after the existing ones                  |
//! | `GROUP BY` | append columns after the existing ones                  |
//! | `WHERE`    | append nodes; an empty node aborts the whole merge      |
//! | `LIMIT`    | non-zero limit overrides, offset falls back / clamps    |

mod group;
mod limit;
mod order;
mod where_clause;

pub use group::{GroupBy, GroupByColumn};
pub use limit::Limit;
pub use order::{OrderBy, OrderByColumn};
pub use where_clause::Where;

use crate::error::BuildResult;
use serde_json::Value;

/// Clause name: `WHERE`.
pub const WHERE: &str = "WHERE";
/// Clause name: `ORDER BY`.
pub const ORDER_BY: &str = "ORDER BY";
/// Clause name: `GROUP BY`.
pub const GROUP_BY: &str = "GROUP BY";
/// Clause name: `LIMIT` (also carries OFFSET).
pub const LIMIT: &str = "LIMIT";

/// Sink that clause serializers write through.
pub trait Builder {
    /// Append raw text.
    fn write_str(&mut self, s: &str);

    /// Append a single character.
    fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf));
    }

    /// Append an identifier. Implementations may remap it; quoting is up to
    /// the caller.
    fn write_quoted(&mut self, field: &str);

    /// Bind parameters in order.
    fn add_vars(&mut self, vars: &[Value]);

    /// Bind one parameter.
    fn add_var(&mut self, var: &Value) {
        self.add_vars(std::slice::from_ref(var));
    }
}

/// The expression stored in a [`Clause`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Where(Where),
    OrderBy(OrderBy),
    GroupBy(GroupBy),
    Limit(Limit),
}

impl Expression {
    /// Whether serializing this expression would produce no text.
    pub fn is_empty(&self) -> bool {
        match self {
            Expression::Where(e) => e.is_empty(),
            Expression::OrderBy(e) => e.is_empty(),
            Expression::GroupBy(e) => e.is_empty(),
            Expression::Limit(e) => e.is_empty(),
        }
    }

    pub fn build(&self, builder: &mut dyn Builder) {
        match self {
            Expression::Where(e) => e.build(builder),
            Expression::OrderBy(e) => e.build(builder),
            Expression::GroupBy(e) => e.build(builder),
            Expression::Limit(e) => e.build(builder),
        }
    }
}

/// A clause expression kind: its name, its serializer, and its merge policy.
pub trait ClauseExpression: Into<Expression> {
    /// Key under which the clause is stored.
    fn name(&self) -> &'static str;

    /// Serialize the expression (without the clause keyword).
    fn build(&self, builder: &mut dyn Builder);

    /// Combine `self` with the clause already stored under the same name and
    /// store the result in `clause`. On error `clause` is left unchanged.
    fn merge_clause(self, clause: &mut Clause) -> BuildResult<()>;
}

/// A named clause of a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clause {
    pub(crate) name: String,
    pub(crate) expression: Option<Expression>,
}

impl Clause {
    /// Create a clause with no expression yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: None,
        }
    }

    /// Keyword written before the expression. Empty for LIMIT, whose
    /// expression writes its own keywords.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Whether building would produce no text.
    pub fn is_empty(&self) -> bool {
        self.expression.as_ref().is_none_or(Expression::is_empty)
    }

    /// Write `"<name> "` followed by the expression; nothing without one.
    pub fn build(&self, builder: &mut dyn Builder) {
        if let Some(expression) = &self.expression {
            if !self.name.is_empty() {
                builder.write_str(&self.name);
                builder.write_char(' ');
            }
            expression.build(builder);
        }
    }
}
