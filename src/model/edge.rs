//! Directed edge in the property graph.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use super::{AttributeMap, AttributeSource, AttributeValue, NodeId};

/// Stable edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Edges whose `from` is the node.
    Outgoing,
    /// Edges whose `to` is the node.
    Incoming,
    Both,
}

/// A directed edge: `from` is the outbound end, `to` the inbound end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Relationship label; required (non-empty) in a property graph.
    pub rel: Option<String>,
    pub attributes: AttributeMap,
}

impl Edge {
    pub const BUILTIN_FIELDS: &'static [&'static str] = &["id", "rel", "from", "to"];

    pub fn new(id: EdgeId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            from,
            to,
            rel: None,
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// The "other" end of the edge from the given node.
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from { Some(self.to) }
        else if node == self.to { Some(self.from) }
        else { None }
    }
}

impl AttributeSource for Edge {
    fn lookup(&self, name: &str) -> Cow<'_, AttributeValue> {
        match name {
            "id" => Cow::Owned(AttributeValue::Number(self.id.0 as f64)),
            "rel" => Cow::Owned(AttributeValue::from(self.rel.as_deref())),
            "from" => Cow::Owned(AttributeValue::Number(self.from.0 as f64)),
            "to" => Cow::Owned(AttributeValue::Number(self.to.0 as f64)),
            _ => super::lookup_attr(&self.attributes, name),
        }
    }
}
