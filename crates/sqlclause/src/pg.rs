//! tokio-postgres adapter: `$n` placeholders and typed parameters.

use crate::explain::replace_placeholders;
use crate::query::BuiltQuery;
use serde_json::Value;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter for tokio-postgres.
#[derive(Clone)]
pub struct PgParam(Arc<dyn ToSql + Send + Sync>);

impl PgParam {
    fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        PgParam(Arc::new(value))
    }

    /// Convert a JSON value into the closest Postgres type.
    ///
    /// `null` binds as a text NULL; integers that fit `i64` bind as `INT8`,
    /// other numbers as `FLOAT8`; arrays and objects bind as `JSONB`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::new(None::<String>),
            Value::Bool(b) => Self::new(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::new(i),
                None => Self::new(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::new(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::new(value.clone()),
        }
    }

    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for PgParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PgParam").field(&"<dyn ToSql>").finish()
    }
}

/// Rewrite `?` placeholders as `$1`, `$2`, ... in order.
pub fn number_placeholders(sql: &str) -> String {
    replace_placeholders(sql, |idx| Some(format!("${}", idx + 1)))
}

impl BuiltQuery {
    /// SQL with `$n` placeholders and parameters ready for tokio-postgres.
    ///
    /// ```ignore
    /// let (sql, params) = built.to_postgres();
    /// let refs: Vec<_> = params.iter().map(PgParam::as_ref).collect();
    /// client.query(&sql, &refs).await?;
    /// ```
    pub fn to_postgres(&self) -> (String, Vec<PgParam>) {
        let sql = number_placeholders(self.sql());
        let params = self.params().iter().map(PgParam::from_value).collect();
        (sql, params)
    }
}
