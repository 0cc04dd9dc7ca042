use super::{Builder, Clause, ClauseExpression, Expression, WHERE};
use crate::condition::{WhereNode, build_nodes};
use crate::error::{BuildError, BuildResult};
use crate::operator::Operator;
use serde_json::Value;

/// `WHERE ...`: the top-level sibling list of the WHERE tree.
///
/// The list serializes like an AND group: a single node is written as-is,
/// two or more are parenthesized and joined by each node's own connector.
/// `Where(a); Where(b)` therefore renders `WHERE (a = ? AND b = ?)`, not the
/// bare `WHERE a = ? AND b = ?` some builders emit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    nodes: Vec<WhereNode>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// A WHERE clause holding `nodes` in order.
    pub fn from_nodes(nodes: Vec<WhereNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[WhereNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node, rejecting nodes that hold no condition.
    pub fn push(&mut self, node: WhereNode) -> BuildResult<&mut Self> {
        if node.is_empty() {
            return Err(BuildError::EmptyNode);
        }
        self.nodes.push(node);
        Ok(self)
    }

    /// Append `field op value` joined with AND.
    pub fn and(
        &mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> BuildResult<&mut Self> {
        let node = WhereNode::and(field, operator, value)?;
        self.push(node)
    }

    /// Append `field op value` joined with OR.
    pub fn or(
        &mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> BuildResult<&mut Self> {
        let node = WhereNode::or(field, operator, value)?;
        self.push(node)
    }
}

impl From<WhereNode> for Where {
    fn from(node: WhereNode) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<Where> for Expression {
    fn from(where_: Where) -> Self {
        Expression::Where(where_)
    }
}

impl ClauseExpression for Where {
    fn name(&self) -> &'static str {
        WHERE
    }

    fn build(&self, builder: &mut dyn Builder) {
        build_nodes(&self.nodes, builder);
    }

    fn merge_clause(mut self, clause: &mut Clause) -> BuildResult<()> {
        // Validate everything before touching the stored clause.
        if self.nodes.iter().any(WhereNode::is_empty) {
            return Err(BuildError::EmptyNode);
        }

        if let Some(Expression::Where(existing)) = clause.expression.take() {
            let mut nodes = existing.nodes;
            nodes.append(&mut self.nodes);
            self.nodes = nodes;
        }
        clause.expression = Some(self.into());
        Ok(())
    }
}
