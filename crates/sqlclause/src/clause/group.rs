use super::{Builder, Clause, ClauseExpression, Expression, GROUP_BY};
use crate::error::BuildResult;

/// One `GROUP BY` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupByColumn {
    pub column: String,
}

impl GroupByColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// `GROUP BY a,b,...`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupBy {
    pub columns: Vec<GroupByColumn>,
}

impl GroupBy {
    pub fn new(columns: Vec<GroupByColumn>) -> Self {
        Self { columns }
    }

    /// Group by a single column.
    pub fn column(column: impl Into<String>) -> Self {
        Self::new(vec![GroupByColumn::new(column)])
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<GroupBy> for Expression {
    fn from(group: GroupBy) -> Self {
        Expression::GroupBy(group)
    }
}

impl ClauseExpression for GroupBy {
    fn name(&self) -> &'static str {
        GROUP_BY
    }

    fn build(&self, builder: &mut dyn Builder) {
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_char(',');
            }
            builder.write_quoted(&column.column);
        }
    }

    fn merge_clause(mut self, clause: &mut Clause) -> BuildResult<()> {
        if let Some(Expression::GroupBy(existing)) = clause.expression.take() {
            let mut columns = existing.columns;
            columns.append(&mut self.columns);
            self.columns = columns;
        }
        clause.expression = Some(self.into());
        Ok(())
    }
}
