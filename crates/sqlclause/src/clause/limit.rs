use super::{Builder, Clause, ClauseExpression, Expression, LIMIT};
use crate::error::BuildResult;

/// `LIMIT n OFFSET m`. Zero means "not set" for both.
///
/// Stored under the `LIMIT` key, but the clause keyword is cleared on merge:
/// the expression writes `LIMIT`/`OFFSET` itself so both render as one
/// fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub limit: i64,
    pub offset: i64,
}

impl Limit {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Only a limit.
    pub fn limit(limit: i64) -> Self {
        Self { limit, offset: 0 }
    }

    /// Only an offset.
    pub fn offset(offset: i64) -> Self {
        Self { limit: 0, offset }
    }

    /// 1-based page of `per_page` rows. A page below 1 is treated as 1.
    pub fn page(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        Self {
            limit: per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.limit <= 0 && self.offset <= 0
    }
}

impl From<Limit> for Expression {
    fn from(limit: Limit) -> Self {
        Expression::Limit(limit)
    }
}

impl ClauseExpression for Limit {
    fn name(&self) -> &'static str {
        LIMIT
    }

    fn build(&self, builder: &mut dyn Builder) {
        if self.limit > 0 {
            builder.write_str("LIMIT ");
            builder.write_str(&self.limit.to_string());
        }
        if self.offset > 0 {
            if self.limit > 0 {
                builder.write_char(' ');
            }
            builder.write_str("OFFSET ");
            builder.write_str(&self.offset.to_string());
        }
    }

    fn merge_clause(mut self, clause: &mut Clause) -> BuildResult<()> {
        clause.name.clear();

        if let Some(Expression::Limit(prior)) = &clause.expression {
            if self.limit == 0 && prior.limit != 0 {
                self.limit = prior.limit;
            }
            if self.offset == 0 && prior.offset > 0 {
                self.offset = prior.offset;
            }
        }
        if self.offset < 0 {
            self.offset = 0;
        }

        clause.expression = Some(self.into());
        Ok(())
    }
}
