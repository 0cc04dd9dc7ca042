use super::{Builder, Clause, ClauseExpression, Expression, ORDER_BY};
use crate::error::BuildResult;

/// One `ORDER BY` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByColumn {
    pub column: String,
    pub desc: bool,
}

impl OrderByColumn {
    /// Ascending column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }

    /// Descending column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }
}

/// `ORDER BY a,b DESC,...`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy {
    pub columns: Vec<OrderByColumn>,
}

impl OrderBy {
    pub fn new(columns: Vec<OrderByColumn>) -> Self {
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<OrderBy> for Expression {
    fn from(order: OrderBy) -> Self {
        Expression::OrderBy(order)
    }
}

impl ClauseExpression for OrderBy {
    fn name(&self) -> &'static str {
        ORDER_BY
    }

    fn build(&self, builder: &mut dyn Builder) {
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_char(',');
            }
            builder.write_quoted(&column.column);
            if column.desc {
                builder.write_str(" DESC");
            }
        }
    }

    fn merge_clause(mut self, clause: &mut Clause) -> BuildResult<()> {
        if let Some(Expression::OrderBy(existing)) = clause.expression.take() {
            let mut columns = existing.columns;
            columns.append(&mut self.columns);
            self.columns = columns;
        }
        clause.expression = Some(self.into());
        Ok(())
    }
}
