//! Error types for sqlclause

use crate::operator::Operator;
use thiserror::Error;

/// Result type alias for clause construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while constructing predicates and merging clauses.
///
/// These are usage errors: they are reported at the call that introduced the
/// bad input and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Operator text outside the supported set
    #[error("Unsupported operator: {0:?}")]
    InvalidOperator(String),

    /// Predicate without a field name
    #[error("Predicate field cannot be empty")]
    EmptyField,

    /// IN/BETWEEN without a value
    #[error("{operator} requires a value")]
    MissingValue { operator: Operator },

    /// IN/BETWEEN with a value of the wrong shape or size
    #[error("{operator} expects {expected} value(s), got {found}")]
    Arity {
        operator: Operator,
        expected: &'static str,
        found: usize,
    },

    /// Raw fragment without text
    #[error("Raw fragment text cannot be empty")]
    EmptySemantic,

    /// A node with no condition and no children was merged into WHERE
    #[error("Cannot merge an empty node into WHERE")]
    EmptyNode,

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl BuildError {
    /// Create an invalid operator error
    pub fn invalid_operator(op: impl Into<String>) -> Self {
        Self::InvalidOperator(op.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an arity error (IN/BETWEEN value count)
    pub fn is_arity(&self) -> bool {
        matches!(self, Self::Arity { .. } | Self::MissingValue { .. })
    }

    /// Check if this is an empty-node merge error
    pub fn is_empty_node(&self) -> bool {
        matches!(self, Self::EmptyNode)
    }
}

impl From<toml::de::Error> for BuildError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
