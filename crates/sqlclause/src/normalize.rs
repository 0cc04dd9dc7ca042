//! Lowering of the informal WHERE/ORDER call shapes into clause expressions.
//!
//! Accepted WHERE shapes ([`WhereInput`]):
//! - nested mapping `{field: {op: value, ...}, ...}`, with `AND`/`OR` keys
//!   holding a nested mapping lowered into a sub-group;
//! - a pre-built [`WhereNode`];
//! - a positional triple `(field, operator, value)`;
//! - a raw fragment `(text, values)`.
//!
//! The mapping form is best-effort: malformed entries are dropped and the
//! rest is kept. The positional form drops the whole call on IN/BETWEEN
//! arity problems but reports unknown operators. Raw fragments and nodes are
//! validated like any other node.

use crate::clause::{OrderBy, OrderByColumn, Where};
use crate::condition::{Predicate, WhereNode};
use crate::error::BuildResult;
use crate::operator::{Connector, Operator};
use serde_json::{Map, Value};

/// Operator given either as a variant or as text.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorArg {
    Op(Operator),
    Text(String),
}

impl From<Operator> for OperatorArg {
    fn from(op: Operator) -> Self {
        OperatorArg::Op(op)
    }
}

impl From<&str> for OperatorArg {
    fn from(op: &str) -> Self {
        OperatorArg::Text(op.to_string())
    }
}

impl From<String> for OperatorArg {
    fn from(op: String) -> Self {
        OperatorArg::Text(op)
    }
}

impl OperatorArg {
    fn resolve(self) -> BuildResult<Operator> {
        match self {
            OperatorArg::Op(op) => Ok(op),
            OperatorArg::Text(text) => text.parse(),
        }
    }
}

/// One WHERE call, in any of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereInput {
    /// `{field: {op: value}}`
    Map(Map<String, Value>),
    /// Pre-built node, used as the sole new WHERE child.
    Node(WhereNode),
    /// `(field, operator, value)`
    Positional {
        field: String,
        operator: OperatorArg,
        value: Value,
    },
    /// `(text, values...)`
    Raw { semantic: String, values: Vec<Value> },
    /// A value that is not a mapping; ignored.
    Unsupported(Value),
}

impl From<Map<String, Value>> for WhereInput {
    fn from(map: Map<String, Value>) -> Self {
        WhereInput::Map(map)
    }
}

impl From<Value> for WhereInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => WhereInput::Map(map),
            other => WhereInput::Unsupported(other),
        }
    }
}

impl From<WhereNode> for WhereInput {
    fn from(node: WhereNode) -> Self {
        WhereInput::Node(node)
    }
}

impl<F, V> From<(F, Operator, V)> for WhereInput
where
    F: Into<String>,
    V: Into<Value>,
{
    fn from((field, operator, value): (F, Operator, V)) -> Self {
        WhereInput::Positional {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl<F, V> From<(F, &str, V)> for WhereInput
where
    F: Into<String>,
    V: Into<Value>,
{
    fn from((field, operator, value): (F, &str, V)) -> Self {
        WhereInput::Positional {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl<F, V> From<(F, Vec<V>)> for WhereInput
where
    F: Into<String>,
    V: Into<Value>,
{
    fn from((semantic, values): (F, Vec<V>)) -> Self {
        WhereInput::Raw {
            semantic: semantic.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl WhereInput {
    /// Lower the input into a WHERE expression.
    ///
    /// `Ok(None)` means the call was dropped and no clause should be added.
    pub fn lower(self) -> BuildResult<Option<Where>> {
        match self {
            WhereInput::Map(map) => {
                let nodes = lower_map(map);
                if nodes.is_empty() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("where mapping produced no conditions, call ignored");
                    return Ok(None);
                }
                Ok(Some(Where::from_nodes(nodes)))
            }
            WhereInput::Node(node) => Ok(Some(Where::from(node))),
            WhereInput::Positional {
                field,
                operator,
                value,
            } => {
                let operator = operator.resolve()?;
                match Predicate::new(field, operator, value) {
                    Ok(predicate) => Ok(Some(Where::from(WhereNode::predicate(
                        Connector::And,
                        predicate,
                    )))),
                    Err(err) if err.is_arity() => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(error = %err, "positional where ignored");
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            }
            WhereInput::Raw { semantic, values } => {
                Ok(Some(Where::from(WhereNode::raw(semantic, values)?)))
            }
            WhereInput::Unsupported(_value) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(value = %_value, "where input is not a mapping, call ignored");
                Ok(None)
            }
        }
    }
}

/// Reserved group keys match exactly; `"or"` is an unknown operator.
fn group_key(key: &str) -> Option<Connector> {
    match key {
        "AND" => Some(Connector::And),
        "OR" => Some(Connector::Or),
        _ => None,
    }
}

/// Lower `{field: {op: value}}` into AND-connected leaves, in map order.
fn lower_map(map: Map<String, Value>) -> Vec<WhereNode> {
    let mut nodes = Vec::new();
    for (field, ops) in map {
        let Value::Object(ops) = ops else {
            #[cfg(feature = "tracing")]
            tracing::debug!(field = %field, "dropping where entry: expected an operator mapping");
            continue;
        };

        for (key, value) in ops {
            if let Some(connector) = group_key(&key) {
                match value {
                    Value::Object(sub) => {
                        let children = lower_map(sub);
                        if children.is_empty() {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(field = %field, group = %connector, "dropping empty where group");
                            continue;
                        }
                        nodes.push(WhereNode::group(connector, children));
                    }
                    _ => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(field = %field, group = %connector, "dropping where group: expected a mapping");
                    }
                }
                continue;
            }

            let Some(operator) = Operator::parse(&key) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(field = %field, operator = %key, "dropping where entry: unknown operator");
                continue;
            };

            match Predicate::new(field.as_str(), operator, value) {
                Ok(predicate) => nodes.push(WhereNode::predicate(Connector::And, predicate)),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(field = %field, error = %_err, "dropping where entry");
                }
            }
        }
    }
    nodes
}

/// One ORDER call, in any of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderInput {
    columns: Vec<OrderByColumn>,
}

impl OrderInput {
    /// Lower into an ORDER BY expression; `None` when nothing usable was given.
    pub fn lower(self) -> Option<OrderBy> {
        if self.columns.is_empty() {
            return None;
        }
        Some(OrderBy::new(self.columns))
    }

    fn from_pairs<S: AsRef<str>>(pairs: impl IntoIterator<Item = [S; 2]>) -> Self {
        let columns = pairs
            .into_iter()
            .filter_map(|[column, direction]| {
                let direction = direction.as_ref();
                if direction.eq_ignore_ascii_case("ASC") {
                    Some(OrderByColumn::asc(column.as_ref()))
                } else if direction.eq_ignore_ascii_case("DESC") {
                    Some(OrderByColumn::desc(column.as_ref()))
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(column = %column.as_ref(), direction, "dropping order column: unknown direction");
                    None
                }
            })
            .collect();
        Self { columns }
    }
}

impl From<&str> for OrderInput {
    fn from(column: &str) -> Self {
        if column.is_empty() {
            return Self::default();
        }
        Self {
            columns: vec![OrderByColumn::asc(column)],
        }
    }
}

impl From<String> for OrderInput {
    fn from(column: String) -> Self {
        Self::from(column.as_str())
    }
}

impl From<OrderByColumn> for OrderInput {
    fn from(column: OrderByColumn) -> Self {
        Self {
            columns: vec![column],
        }
    }
}

impl<S: AsRef<str>> From<Vec<[S; 2]>> for OrderInput {
    fn from(pairs: Vec<[S; 2]>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<S: AsRef<str>, const N: usize> From<[[S; 2]; N]> for OrderInput {
    fn from(pairs: [[S; 2]; N]) -> Self {
        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseExpression;
    use crate::error::BuildError;
    use crate::statement::Statement;
    use serde_json::json;

    fn render(input: impl Into<WhereInput>) -> Option<(String, Vec<Value>)> {
        let where_ = input.into().lower().unwrap()?;
        let mut st = Statement::new();
        where_.build(&mut st);
        Some(st.into_parts())
    }

    #[test]
    fn mapping_between() {
        let (sql, params) = render(json!({"age": {"BETWEEN": [18, 30]}})).unwrap();
        assert_eq!(sql, "age BETWEEN ? AND ?");
        assert_eq!(params, vec![json!(18), json!(30)]);
    }

    #[test]
    fn mapping_operators_are_case_insensitive() {
        let (sql, params) = render(json!({"name": {"like": "a%"}})).unwrap();
        assert_eq!(sql, "name LIKE ?");
        assert_eq!(params, vec![json!("a%")]);
    }

    #[test]
    fn mapping_drops_malformed_entries() {
        let input = json!({
            "a": {"IN": []},
            "b": {"BETWEEN": [1]},
            "c": {"~": 1},
            "d": 5,
            "e": {">": 3},
        });
        let (sql, params) = render(input).unwrap();
        assert_eq!(sql, "e > ?");
        assert_eq!(params, vec![json!(3)]);
    }

    #[test]
    fn mapping_with_nothing_usable_is_ignored() {
        assert_eq!(render(json!({"a": {"IN": []}})), None);
        assert_eq!(render(json!({})), None);
        assert_eq!(render(json!("a = 1")), None);
    }

    #[test]
    fn mapping_groups() {
        let (sql, params) =
            render(json!({"x": {"AND": {"a": {"=": 1}, "b": {"=": 2}}}})).unwrap();
        assert_eq!(sql, "(a = ? AND b = ?)");
        assert_eq!(params, vec![json!(1), json!(2)]);

        // A group joins its preceding sibling with its own keyword.
        let (sql, params) =
            render(json!({"a": {"=": 1}, "z": {"OR": {"b": {"=": 2}, "c": {"<": 3}}}})).unwrap();
        assert_eq!(sql, "(a = ? OR (b = ? AND c < ?))");
        assert_eq!(params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn mapping_group_keys_are_case_sensitive() {
        assert_eq!(render(json!({"x": {"or": {"a": {"=": 1}}}})), None);

        let (sql, params) =
            render(json!({"a": {"=": 1}, "x": {"And": {"b": {"=": 2}}}})).unwrap();
        assert_eq!(sql, "a = ?");
        assert_eq!(params, vec![json!(1)]);
    }

    #[test]
    fn mapping_drops_empty_groups() {
        let (sql, _) = render(json!({"a": {"=": 1}, "x": {"OR": {}}})).unwrap();
        assert_eq!(sql, "a = ?");
    }

    #[test]
    fn positional_forms() {
        let (sql, params) = render(("age", ">", 18)).unwrap();
        assert_eq!(sql, "age > ?");
        assert_eq!(params, vec![json!(18)]);

        let (sql, params) = render(("name", Operator::In, vec!["a", "b"])).unwrap();
        assert_eq!(sql, "name IN(?,?)");
        assert_eq!(params, vec![json!("a"), json!("b")]);

        let (sql, _) = render(("name", "like", "a%")).unwrap();
        assert_eq!(sql, "name LIKE ?");
    }

    #[test]
    fn positional_arity_violations_are_ignored() {
        assert_eq!(render(("id", "IN", Vec::<i32>::new())), None);
        assert_eq!(render(("age", "BETWEEN", vec![1, 2, 3])), None);
        assert_eq!(render(("age", Operator::Between, Value::Null)), None);
        assert_eq!(render(("id", "in", 5)), None);
    }

    #[test]
    fn positional_unknown_operator_is_an_error() {
        let err = WhereInput::from(("age", "!==", 1)).lower().unwrap_err();
        assert_eq!(err, BuildError::InvalidOperator("!==".to_string()));
    }

    #[test]
    fn raw_fragment() {
        let (sql, params) = render(("a = ? OR b = ?", vec![1, 2])).unwrap();
        assert_eq!(sql, "a = ? OR b = ?");
        assert_eq!(params, vec![json!(1), json!(2)]);

        let err = WhereInput::from(("", vec![1])).lower().unwrap_err();
        assert_eq!(err, BuildError::EmptySemantic);
    }

    #[test]
    fn order_shapes() {
        assert_eq!(OrderInput::from("").lower(), None);
        assert_eq!(
            OrderInput::from("a").lower(),
            Some(OrderBy::new(vec![OrderByColumn::asc("a")]))
        );
        assert_eq!(
            OrderInput::from([["b", "DESC"], ["c", "sideways"], ["d", "asc"]]).lower(),
            Some(OrderBy::new(vec![OrderByColumn::desc("b"), OrderByColumn::asc("d")]))
        );
        assert_eq!(OrderInput::from(Vec::<[String; 2]>::new()).lower(), None);
    }
}
