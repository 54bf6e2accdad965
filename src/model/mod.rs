//! # Property Graph Model
//!
//! Plain data: nodes, edges, their identifiers and attribute values.
//! No I/O and no query state lives here.

pub mod node;
pub mod edge;
pub mod value;

use std::borrow::Cow;
use std::collections::BTreeMap;

pub use node::{Node, NodeId};
pub use edge::{Direction, Edge, EdgeId};
pub use value::{AttributeValue, ValueType};

/// Attribute name → value. Sorted so exports are deterministic.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// Anything a predicate can be evaluated against.
///
/// Nodes and edges expose their built-in fields (`id`, `type`, `label` /
/// `id`, `rel`, `from`, `to`) ahead of their attribute map. Unknown names
/// resolve to [`AttributeValue::Absent`].
pub trait AttributeSource {
    fn lookup(&self, name: &str) -> Cow<'_, AttributeValue>;
}

impl AttributeSource for AttributeMap {
    fn lookup(&self, name: &str) -> Cow<'_, AttributeValue> {
        lookup_attr(self, name)
    }
}

fn lookup_attr<'a>(attrs: &'a AttributeMap, name: &str) -> Cow<'a, AttributeValue> {
    attrs.get(name).map_or(Cow::Owned(AttributeValue::Absent), Cow::Borrowed)
}

/// Build an [`AttributeMap`] from `(key, value)` pairs.
pub fn attrs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> AttributeMap
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
