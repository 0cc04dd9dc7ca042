//! Boolean expression tree for WHERE logic.
//!
//! A [`WhereNode`] is either a leaf [`Predicate`] or a [`Conjunction`] of child
//! nodes. Every node carries its own [`Connector`]: when a node follows a
//! sibling, the keyword written between them is the *following* node's
//! connector, so mixed `AND`/`OR` chains are expressed node by node.
//!
//! Serialization rules:
//! - a leaf writes `field op ?` (or its `BETWEEN`/`IN`/raw form);
//! - a group with one child writes that child as-is (no parentheses);
//! - a group with two or more children is parenthesized.
//!
//! Parameters are added depth-first, left to right, in the same order as
//! their placeholders appear in the text.

use crate::clause::Builder;
use crate::error::{BuildError, BuildResult};
use crate::operator::{Connector, Operator};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum PredicateInner {
    Compare {
        field: String,
        operator: Operator,
        value: Value,
    },
    Between {
        field: String,
        low: Value,
        high: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    /// Literal SQL text followed by its bound values.
    Raw { semantic: String, values: Vec<Value> },
}

/// A leaf condition: `field operator value`, or a raw fragment with values.
///
/// Construction validates the operator arity, so a `Predicate` that exists is
/// always serializable.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate(PredicateInner);

impl Predicate {
    /// Create a structured predicate.
    ///
    /// `IN` requires a non-empty array value and `BETWEEN` an array of exactly
    /// two elements; `null` counts as a missing value for both.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> BuildResult<Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(BuildError::EmptyField);
        }
        let value = value.into();

        let inner = match operator {
            Operator::Between => {
                let values = into_sequence(operator, value, "exactly 2")?;
                let [low, high]: [Value; 2] =
                    values.try_into().map_err(|v: Vec<Value>| BuildError::Arity {
                        operator,
                        expected: "exactly 2",
                        found: v.len(),
                    })?;
                PredicateInner::Between { field, low, high }
            }
            Operator::In => {
                let values = into_sequence(operator, value, "at least 1")?;
                if values.is_empty() {
                    return Err(BuildError::Arity {
                        operator,
                        expected: "at least 1",
                        found: 0,
                    });
                }
                PredicateInner::In { field, values }
            }
            _ => PredicateInner::Compare {
                field,
                operator,
                value,
            },
        };
        Ok(Predicate(inner))
    }

    /// Create a predicate from operator text (matched case-insensitively).
    pub fn parse(field: impl Into<String>, operator: &str, value: impl Into<Value>) -> BuildResult<Self> {
        let operator: Operator = operator.parse()?;
        Self::new(field, operator, value)
    }

    /// Create a raw fragment. The text is written verbatim and `values` are
    /// bound in order after it.
    pub fn raw(semantic: impl Into<String>, values: Vec<Value>) -> BuildResult<Self> {
        let semantic = semantic.into();
        if semantic.trim().is_empty() {
            return Err(BuildError::EmptySemantic);
        }
        Ok(Predicate(PredicateInner::Raw { semantic, values }))
    }

    /// Field name, `None` for raw fragments.
    pub fn field(&self) -> Option<&str> {
        match &self.0 {
            PredicateInner::Compare { field, .. }
            | PredicateInner::Between { field, .. }
            | PredicateInner::In { field, .. } => Some(field),
            PredicateInner::Raw { .. } => None,
        }
    }

    /// Operator, `None` for raw fragments.
    pub fn operator(&self) -> Option<Operator> {
        match &self.0 {
            PredicateInner::Compare { operator, .. } => Some(*operator),
            PredicateInner::Between { .. } => Some(Operator::Between),
            PredicateInner::In { .. } => Some(Operator::In),
            PredicateInner::Raw { .. } => None,
        }
    }

    /// Raw fragment text, `None` for structured predicates.
    pub fn semantic(&self) -> Option<&str> {
        match &self.0 {
            PredicateInner::Raw { semantic, .. } => Some(semantic),
            _ => None,
        }
    }

    /// Number of parameters this predicate binds.
    pub fn param_count(&self) -> usize {
        match &self.0 {
            PredicateInner::Compare { .. } => 1,
            PredicateInner::Between { .. } => 2,
            PredicateInner::In { values, .. } | PredicateInner::Raw { values, .. } => values.len(),
        }
    }

    /// Write the predicate into a builder sink.
    pub fn build(&self, builder: &mut dyn Builder) {
        match &self.0 {
            PredicateInner::Compare {
                field,
                operator,
                value,
            } => {
                builder.write_quoted(field);
                builder.write_char(' ');
                builder.write_str(operator.as_str());
                builder.write_str(" ?");
                builder.add_var(value);
            }
            PredicateInner::Between { field, low, high } => {
                builder.write_quoted(field);
                builder.write_str(" BETWEEN ? AND ?");
                builder.add_var(low);
                builder.add_var(high);
            }
            PredicateInner::In { field, values } => {
                builder.write_quoted(field);
                builder.write_str(" IN(");
                for idx in 0..values.len() {
                    if idx > 0 {
                        builder.write_char(',');
                    }
                    builder.write_char('?');
                }
                builder.write_char(')');
                builder.add_vars(values);
            }
            PredicateInner::Raw { semantic, values } => {
                builder.write_str(semantic);
                builder.add_vars(values);
            }
        }
    }
}

fn into_sequence(operator: Operator, value: Value, expected: &'static str) -> BuildResult<Vec<Value>> {
    match value {
        Value::Null => Err(BuildError::MissingValue { operator }),
        Value::Array(values) => Ok(values),
        _ => Err(BuildError::Arity {
            operator,
            expected,
            found: 1,
        }),
    }
}

/// An internal node combining children.
///
/// The group's own connector is used when the group follows a sibling; the
/// keywords between its children come from the children themselves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conjunction {
    connector: Connector,
    children: Vec<WhereNode>,
}

impl Conjunction {
    /// Create an empty group.
    pub fn new(connector: Connector) -> Self {
        Self {
            connector,
            children: Vec::new(),
        }
    }

    /// Create a group with the given children.
    pub fn with_children(connector: Connector, children: Vec<WhereNode>) -> Self {
        Self {
            connector,
            children,
        }
    }

    pub fn connector(&self) -> Connector {
        self.connector
    }

    pub fn children(&self) -> &[WhereNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// A group holds no condition when it has no children or only empty ones.
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(WhereNode::is_empty)
    }

    /// Append a child.
    pub fn push(&mut self, child: WhereNode) {
        self.children.push(child);
    }

    /// Write the group into a builder sink.
    pub fn build(&self, builder: &mut dyn Builder) {
        build_nodes(&self.children, builder);
    }
}

/// A node of the WHERE tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    /// Leaf condition.
    Predicate {
        connector: Connector,
        predicate: Predicate,
    },
    /// Group of child nodes.
    Conjunction(Conjunction),
}

impl WhereNode {
    /// Create an AND-connected leaf: `field op value`.
    pub fn and(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> BuildResult<Self> {
        Ok(Self::predicate(Connector::And, Predicate::new(field, operator, value)?))
    }

    /// Create an OR-connected leaf: `field op value`.
    pub fn or(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> BuildResult<Self> {
        Ok(Self::predicate(Connector::Or, Predicate::new(field, operator, value)?))
    }

    /// Create an AND-connected raw fragment.
    pub fn raw(semantic: impl Into<String>, values: Vec<Value>) -> BuildResult<Self> {
        Ok(Self::predicate(Connector::And, Predicate::raw(semantic, values)?))
    }

    /// Create an OR-connected raw fragment.
    pub fn or_raw(semantic: impl Into<String>, values: Vec<Value>) -> BuildResult<Self> {
        Ok(Self::predicate(Connector::Or, Predicate::raw(semantic, values)?))
    }

    /// Wrap a validated predicate.
    pub fn predicate(connector: Connector, predicate: Predicate) -> Self {
        WhereNode::Predicate {
            connector,
            predicate,
        }
    }

    /// Create a group node.
    pub fn group(connector: Connector, children: Vec<WhereNode>) -> Self {
        WhereNode::Conjunction(Conjunction::with_children(connector, children))
    }

    // ==================== Convenience constructors ====================

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Eq, value)
    }

    /// `field <> value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Ne, value)
    }

    /// `field LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Like, pattern)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Lt, value)
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Lte, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Gt, value)
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> BuildResult<Self> {
        Self::and(field, Operator::Gte, value)
    }

    /// `field BETWEEN from AND to`
    pub fn between(
        field: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> BuildResult<Self> {
        Self::and(field, Operator::Between, Value::Array(vec![from.into(), to.into()]))
    }

    /// `field IN(values...)`
    pub fn in_list<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> BuildResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::and(field, Operator::In, Value::Array(values))
    }

    // ==================== Tree operations ====================

    pub fn connector(&self) -> Connector {
        match self {
            WhereNode::Predicate { connector, .. } => *connector,
            WhereNode::Conjunction(group) => group.connector,
        }
    }

    /// Replace the connector used in front of this node.
    pub fn with_connector(mut self, connector: Connector) -> Self {
        match &mut self {
            WhereNode::Predicate { connector: c, .. } => *c = connector,
            WhereNode::Conjunction(group) => group.connector = connector,
        }
        self
    }

    /// Child nodes; a leaf has none.
    pub fn children(&self) -> &[WhereNode] {
        match self {
            WhereNode::Predicate { .. } => &[],
            WhereNode::Conjunction(group) => &group.children,
        }
    }

    /// Number of children; a leaf has none.
    pub fn len(&self) -> usize {
        self.children().len()
    }

    /// A node is empty when it holds neither a condition nor children.
    pub fn is_empty(&self) -> bool {
        match self {
            WhereNode::Predicate { .. } => false,
            WhereNode::Conjunction(group) => group.is_empty(),
        }
    }

    /// Append a child, returning the resulting node.
    ///
    /// A leaf is promoted into a group of the same connector whose first child
    /// is the leaf itself, so its condition is kept in front of `child`.
    pub fn push(self, child: WhereNode) -> WhereNode {
        match self {
            WhereNode::Predicate {
                connector,
                predicate,
            } => WhereNode::Conjunction(Conjunction::with_children(
                connector,
                vec![WhereNode::predicate(connector, predicate), child],
            )),
            WhereNode::Conjunction(mut group) => {
                group.push(child);
                WhereNode::Conjunction(group)
            }
        }
    }

    /// Write the node into a builder sink.
    pub fn build(&self, builder: &mut dyn Builder) {
        match self {
            WhereNode::Predicate { predicate, .. } => predicate.build(builder),
            WhereNode::Conjunction(group) => group.build(builder),
        }
    }
}

impl From<Conjunction> for WhereNode {
    fn from(group: Conjunction) -> Self {
        WhereNode::Conjunction(group)
    }
}

/// Write a sibling list: nothing when empty, the lone child unwrapped, or a
/// parenthesized sequence joined by each following child's connector.
///
/// Empty children write nothing and are skipped before counting.
pub(crate) fn build_nodes(nodes: &[WhereNode], builder: &mut dyn Builder) {
    let nodes: Vec<&WhereNode> = nodes.iter().filter(|node| !node.is_empty()).collect();
    match nodes.as_slice() {
        [] => {}
        [only] => only.build(builder),
        [first, rest @ ..] => {
            builder.write_char('(');
            first.build(builder);
            for node in rest {
                builder.write_char(' ');
                builder.write_str(node.connector().as_str());
                builder.write_char(' ');
                node.build(builder);
            }
            builder.write_char(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use serde_json::json;

    fn render(node: &WhereNode) -> (String, Vec<Value>) {
        let mut st = Statement::new();
        node.build(&mut st);
        st.into_parts()
    }

    #[test]
    fn leaf_forms() {
        let (sql, params) = render(&WhereNode::gt("age", 18).unwrap());
        assert_eq!(sql, "age > ?");
        assert_eq!(params, vec![json!(18)]);

        let (sql, params) = render(&WhereNode::between("age", 18, 30).unwrap());
        assert_eq!(sql, "age BETWEEN ? AND ?");
        assert_eq!(params, vec![json!(18), json!(30)]);

        let (sql, params) = render(&WhereNode::in_list("name", vec!["a", "b", "c"]).unwrap());
        assert_eq!(sql, "name IN(?,?,?)");
        assert_eq!(params, vec![json!("a"), json!("b"), json!("c")]);

        let (sql, params) = render(&WhereNode::raw("a = ? OR b = ?", vec![json!(1), json!(2)]).unwrap());
        assert_eq!(sql, "a = ? OR b = ?");
        assert_eq!(params, vec![json!(1), json!(2)]);
    }

    #[test]
    fn in_and_between_arity_is_checked() {
        assert_eq!(
            WhereNode::in_list("id", Vec::<i32>::new()),
            Err(BuildError::Arity {
                operator: Operator::In,
                expected: "at least 1",
                found: 0
            })
        );
        let err = Predicate::new("age", Operator::Between, json!([1, 2, 3])).unwrap_err();
        assert!(err.is_arity());
        assert_eq!(
            Predicate::new("age", Operator::Between, Value::Null),
            Err(BuildError::MissingValue {
                operator: Operator::Between
            })
        );
        assert!(Predicate::new("age", Operator::In, 5).unwrap_err().is_arity());
    }

    #[test]
    fn construction_rejects_bad_input() {
        assert_eq!(Predicate::new("", Operator::Eq, 1), Err(BuildError::EmptyField));
        assert_eq!(Predicate::raw("  ", vec![]), Err(BuildError::EmptySemantic));
        assert_eq!(
            Predicate::parse("a", "~", 1),
            Err(BuildError::InvalidOperator("~".to_string()))
        );
        assert_eq!(
            Predicate::parse("a", "like", "x%").unwrap().operator(),
            Some(Operator::Like)
        );
    }

    #[test]
    fn single_child_flattens() {
        let node = WhereNode::group(Connector::Or, vec![WhereNode::eq("a", 1).unwrap()]);
        assert_eq!(render(&node).0, "a = ?");
    }

    #[test]
    fn siblings_use_their_own_connector() {
        let node = WhereNode::group(
            Connector::And,
            vec![
                WhereNode::eq("a", 1).unwrap(),
                WhereNode::or("b", Operator::Eq, 2).unwrap(),
                WhereNode::lt("c", 3).unwrap(),
            ],
        );
        let (sql, params) = render(&node);
        assert_eq!(sql, "(a = ? OR b = ? AND c < ?)");
        assert_eq!(params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn nested_params_are_depth_first() {
        let inner = WhereNode::group(
            Connector::Or,
            vec![
                WhereNode::eq("b", 2).unwrap(),
                WhereNode::or("c", Operator::In, json!([3, 4])).unwrap(),
            ],
        );
        let node = WhereNode::group(
            Connector::And,
            vec![WhereNode::eq("a", 1).unwrap(), inner, WhereNode::eq("d", 5).unwrap()],
        );
        let (sql, params) = render(&node);
        assert_eq!(sql, "(a = ? OR (b = ? OR c IN(?,?)) AND d = ?)");
        assert_eq!(params, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    }

    #[test]
    fn push_promotes_leaf_without_losing_it() {
        let node = WhereNode::between("age", 18, 30)
            .unwrap()
            .push(WhereNode::or("vip", Operator::Eq, true).unwrap());
        assert_eq!(node.len(), 2);
        let (sql, params) = render(&node);
        assert_eq!(sql, "(age BETWEEN ? AND ? OR vip = ?)");
        assert_eq!(params, vec![json!(18), json!(30), json!(true)]);

        let node = node.push(WhereNode::eq("active", 1).unwrap());
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn empty_group() {
        let group = WhereNode::group(Connector::And, vec![]);
        assert!(group.is_empty());
        assert!(!WhereNode::eq("a", 1).unwrap().is_empty());
        assert_eq!(render(&group).0, "");

        let group = group.push(WhereNode::eq("a", 1).unwrap());
        assert!(!group.is_empty());
        assert_eq!(render(&group).0, "a = ?");
    }

    #[test]
    fn groups_of_empty_groups_are_empty() {
        let nested = WhereNode::group(
            Connector::And,
            vec![
                WhereNode::group(Connector::Or, vec![]),
                WhereNode::group(Connector::And, vec![WhereNode::group(Connector::And, vec![])]),
            ],
        );
        assert!(nested.is_empty());
        assert_eq!(render(&nested).0, "");
    }

    #[test]
    fn empty_children_are_skipped() {
        let node = WhereNode::group(
            Connector::And,
            vec![
                WhereNode::group(Connector::And, vec![]),
                WhereNode::eq("a", 1).unwrap(),
                WhereNode::group(Connector::Or, vec![WhereNode::group(Connector::Or, vec![])]),
                WhereNode::or("b", Operator::Eq, 2).unwrap(),
            ],
        );
        assert!(!node.is_empty());
        let (sql, params) = render(&node);
        assert_eq!(sql, "(a = ? OR b = ?)");
        assert_eq!(params, vec![json!(1), json!(2)]);

        let lone = WhereNode::group(
            Connector::And,
            vec![WhereNode::group(Connector::And, vec![]), WhereNode::eq("a", 1).unwrap()],
        );
        assert_eq!(render(&lone).0, "a = ?");
    }
}
