//! Comparison operators and boolean connectors.

use crate::error::BuildError;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a predicate.
///
/// The set is closed: text that does not parse into one of these variants
/// never reaches a WHERE tree.
///
/// # Example
/// ```ignore
/// use sqlclause::Operator;
///
/// assert_eq!("like".parse::<Operator>()?, Operator::Like);
/// assert_eq!(Operator::Gte.as_str(), ">=");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `LIKE`
    Like,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `BETWEEN ? AND ?`
    Between,
    /// `IN(?,...)`
    In,
}

impl Operator {
    /// SQL text of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Like => "LIKE",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
        }
    }

    /// Match operator text case-insensitively, returning `None` when unknown.
    pub fn parse(op: &str) -> Option<Self> {
        let op = op.trim();
        let parsed = match op {
            "=" => Operator::Eq,
            "<>" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            _ if op.eq_ignore_ascii_case("LIKE") => Operator::Like,
            _ if op.eq_ignore_ascii_case("BETWEEN") => Operator::Between,
            _ if op.eq_ignore_ascii_case("IN") => Operator::In,
            _ => return None,
        };
        Some(parsed)
    }

    /// Whether the operator binds a sequence (IN/BETWEEN) instead of a scalar.
    pub fn takes_sequence(self) -> bool {
        matches!(self, Operator::Between | Operator::In)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s).ok_or_else(|| BuildError::invalid_operator(s))
    }
}

/// Keyword placed in front of a node when it follows a sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    /// SQL keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }

    /// Match `AND`/`OR` case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("AND") {
            Some(Connector::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Some(Connector::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
