//! Per-query accumulation of clauses, identifier renames and parameters.
//!
//! [`Statement`] is also the [`Builder`] sink clause serializers write into.
//! The clause map and rename table sit behind `Arc`s: a cloned statement
//! shares them with its origin until its first write, at which point
//! `Arc::make_mut` gives it a private copy. Neither side can observe the
//! other's later mutations.

use crate::clause::{Builder, Clause, ClauseExpression};
use crate::error::BuildResult;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Clause map, rename table, output text and parameters for one logical query.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    sql: String,
    vars: Vec<Value>,
    clauses: Arc<HashMap<String, Clause>>,
    name_mapper: Arc<HashMap<String, String>>,
}

impl Statement {
    /// Create an empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a statement seeded with base text and its parameters.
    pub fn with_sql(sql: impl Into<String>, vars: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            vars,
            ..Self::default()
        }
    }

    /// Text written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters bound so far.
    pub fn vars(&self) -> &[Value] {
        &self.vars
    }

    /// Append base parameters (used together with hand-written base text).
    pub(crate) fn extend_vars(&mut self, vars: impl IntoIterator<Item = Value>) {
        self.vars.extend(vars);
    }

    /// Clause stored under `name`.
    pub fn clause(&self, name: &str) -> Option<&Clause> {
        self.clauses.get(name)
    }

    /// Whether a clause is stored under `name`.
    pub fn has_clause(&self, name: &str) -> bool {
        self.clauses.contains_key(name)
    }

    /// Map the logical identifier `old` to `new` at emission time.
    pub fn add_name_map(&mut self, old: impl Into<String>, new: impl Into<String>) {
        Arc::make_mut(&mut self.name_mapper).insert(old.into(), new.into());
    }

    /// Physical name registered for `name`, if any.
    pub fn mapped_name(&self, name: &str) -> Option<&str> {
        self.name_mapper.get(name).map(String::as_str)
    }

    /// Contribute a clause expression.
    ///
    /// The first contribution creates the clause; later ones run the kind's
    /// merge policy against the stored clause. A failed merge leaves the
    /// statement untouched.
    pub fn add_clause<E: ClauseExpression>(&mut self, expr: E) -> BuildResult<()> {
        let name = expr.name();
        let mut clause = self.clauses.get(name).cloned().unwrap_or_default();
        clause.name = name.to_owned();
        expr.merge_clause(&mut clause)?;
        Arc::make_mut(&mut self.clauses).insert(name.to_owned(), clause);
        Ok(())
    }

    /// Serialize the clauses named in `names`, in that order.
    ///
    /// Each present, non-empty clause is written after a single space.
    /// Names with no stored clause are skipped.
    pub fn build<S: AsRef<str>>(&mut self, names: &[S]) {
        let clauses = Arc::clone(&self.clauses);
        for name in names {
            if let Some(clause) = clauses.get(name.as_ref()) {
                if clause.is_empty() {
                    continue;
                }
                self.write_char(' ');
                clause.build(self);
            }
        }
    }

    /// Drop all clauses and renames, starting a new logical query.
    ///
    /// Base text and its parameters are kept.
    pub fn reset(&mut self) {
        self.clauses = Arc::default();
        self.name_mapper = Arc::default();
    }

    /// Whether `self` and `other` still share the same clause map.
    pub fn shares_clauses_with(&self, other: &Statement) -> bool {
        Arc::ptr_eq(&self.clauses, &other.clauses)
    }

    /// Consume the statement, returning text and parameters.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.vars)
    }
}

impl Builder for Statement {
    fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn write_char(&mut self, c: char) {
        self.sql.push(c);
    }

    fn write_quoted(&mut self, field: &str) {
        match self.name_mapper.get(field) {
            Some(mapped) => self.sql.push_str(mapped),
            None => self.sql.push_str(field),
        }
    }

    fn add_vars(&mut self, vars: &[Value]) {
        // Keyed mappings are not bindable; drop them.
        self.vars
            .extend(vars.iter().filter(|v| !v.is_object()).cloned());
    }
}
