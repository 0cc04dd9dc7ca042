//! Session configuration: clause order per operation and SQL logging.

use crate::clause::{GROUP_BY, LIMIT, ORDER_BY, WHERE};
use crate::error::BuildResult;
use serde::Deserialize;

/// Kind of statement a query handle is building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Row-returning statement.
    #[default]
    Select,
    /// Statement executed for its side effects.
    Exec,
}

/// Level at which built SQL is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

#[cfg(feature = "tracing")]
impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Configuration shared by every query handle of a [`Session`](crate::Session).
///
/// # Example
/// ```ignore
/// let config = SessionConfig::from_toml_str(r#"
///     select_clauses = ["WHERE", "ORDER BY", "LIMIT"]
///     log_sql = true
///     log_level = "info"
/// "#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Clauses serialized after SELECT base text, in order.
    pub select_clauses: Vec<String>,
    /// Clauses serialized after EXEC base text, in order.
    pub exec_clauses: Vec<String>,
    /// Whether built statements are logged.
    pub log_sql: bool,
    /// Tracing level for built statements.
    pub log_level: LogLevel,
    /// Truncate logged SQL (in chars). `None` means no truncation.
    pub max_log_length: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            select_clauses: [WHERE, GROUP_BY, ORDER_BY, LIMIT]
                .into_iter()
                .map(String::from)
                .collect(),
            exec_clauses: Vec::new(),
            log_sql: false,
            log_level: LogLevel::Debug,
            max_log_length: Some(200),
        }
    }
}

impl SessionConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> BuildResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Clause order for `operation`.
    pub fn clauses_for(&self, operation: Operation) -> &[String] {
        match operation {
            Operation::Select => &self.select_clauses,
            Operation::Exec => &self.exec_clauses,
        }
    }

    /// Set the SELECT clause order.
    pub fn select_clauses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_clauses = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the EXEC clause order.
    pub fn exec_clauses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exec_clauses = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable SQL logging.
    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Set the logging level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_log_length(mut self, len: usize) -> Self {
        self.max_log_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_log_length = None;
        self
    }
}
