//! Node in the property graph.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use super::{AttributeMap, AttributeSource, AttributeValue};

/// Stable node identifier. Assigned on insert, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: Option<String>,
    /// Required (non-empty) in a property graph.
    pub node_type: Option<String>,
    pub attributes: AttributeMap,
}

impl Node {
    /// Names resolved from the node itself rather than its attributes.
    pub const BUILTIN_FIELDS: &'static [&'static str] = &["id", "type", "label"];

    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            label: None,
            node_type: None,
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn has_type(&self, node_type: &str) -> bool {
        self.node_type.as_deref() == Some(node_type)
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

impl AttributeSource for Node {
    fn lookup(&self, name: &str) -> Cow<'_, AttributeValue> {
        match name {
            "id" => Cow::Owned(AttributeValue::Number(self.id.0 as f64)),
            "type" => Cow::Owned(AttributeValue::from(self.node_type.as_deref())),
            "label" => Cow::Owned(AttributeValue::from(self.label.as_deref())),
            _ => super::lookup_attr(&self.attributes, name),
        }
    }
}
