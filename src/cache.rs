//! # Aggregation cache
//!
//! A cache call copies one attribute from every entity in the current
//! selection into an ordered list. The list is overwritten by the next
//! cache call and survives everything else, which lets a pipeline cache,
//! aggregate, and feed the aggregate back into a later predicate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AttributeValue, EdgeId, NodeId};

/// Entity reference used in cache diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Node(NodeId),
    Edge(EdgeId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => write!(f, "node {id}"),
            EntityId::Edge(id) => write!(f, "edge {id}"),
        }
    }
}

/// An entity left out of the cache, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skipped {
    pub entity: EntityId,
    pub reason: String,
}

/// Values captured by the most recent cache call, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationCache {
    attribute: Option<String>,
    values: Vec<AttributeValue>,
    skipped: Vec<Skipped>,
}

impl AggregationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents.
    pub fn overwrite(&mut self, attribute: &str, values: Vec<AttributeValue>, skipped: Vec<Skipped>) {
        self.attribute = Some(attribute.to_owned());
        self.values = values;
        self.skipped = skipped;
    }

    /// The attribute the cache was last filled from.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric view of the cache; non-numeric entries are dropped.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(AttributeValue::as_number).collect()
    }

    /// Text view of the cache.
    pub fn strings(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|v| v.as_text().map(|t| t.into_owned()))
            .collect()
    }

    pub fn aggregate(&self, agg: Aggregate) -> Option<f64> {
        aggregate(&self.values, agg)
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Aggregate functions over cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Count,
    Sum,
    Mean,
    Max,
    Min,
}

/// Aggregate the numeric-coercible entries of `values`.
///
/// With no numeric entries `Sum` is `0` and `Count` is `0`; `Mean`, `Max`
/// and `Min` return `None` ("no data") rather than a misleading zero.
pub fn aggregate(values: &[AttributeValue], agg: Aggregate) -> Option<f64> {
    let numbers = values.iter().filter_map(AttributeValue::as_number);
    match agg {
        Aggregate::Count => Some(numbers.count() as f64),
        Aggregate::Sum => Some(numbers.sum()),
        Aggregate::Mean => {
            let (total, n) = numbers.fold((0.0, 0usize), |(t, n), x| (t + x, n + 1));
            (n > 0).then(|| total / n as f64)
        }
        Aggregate::Max => numbers.reduce(f64::max),
        Aggregate::Min => numbers.reduce(f64::min),
    }
}

pub fn sum(values: &[AttributeValue]) -> f64 {
    aggregate(values, Aggregate::Sum).unwrap_or(0.0)
}

pub fn mean(values: &[AttributeValue]) -> Option<f64> {
    aggregate(values, Aggregate::Mean)
}

pub fn max(values: &[AttributeValue]) -> Option<f64> {
    aggregate(values, Aggregate::Max)
}

pub fn min(values: &[AttributeValue]) -> Option<f64> {
    aggregate(values, Aggregate::Min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(v: &[f64]) -> Vec<AttributeValue> {
        v.iter().map(|&n| AttributeValue::Number(n)).collect()
    }

    #[test]
    fn test_aggregates() {
        let values = nums(&[15.0, 4.0, 23.0]);
        assert_eq!(sum(&values), 42.0);
        assert_eq!(mean(&values), Some(14.0));
        assert_eq!(max(&values), Some(23.0));
        assert_eq!(min(&values), Some(4.0));
        assert_eq!(aggregate(&values, Aggregate::Count), Some(3.0));
    }

    #[test]
    fn test_empty_is_no_data_except_sum() {
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(aggregate(&[], Aggregate::Count), Some(0.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(max(&[]), None);
        assert_eq!(min(&[]), None);
    }

    #[test]
    fn test_non_numeric_entries_ignored() {
        let values = vec![AttributeValue::from("x"), AttributeValue::from("7"), AttributeValue::Bool(true)];
        assert_eq!(sum(&values), 7.0);
        assert_eq!(mean(&values), Some(7.0));
    }

    #[test]
    fn test_overwrite_replaces() {
        let mut cache = AggregationCache::new();
        cache.overwrite("a", nums(&[1.0, 2.0]), Vec::new());
        cache.overwrite("b", nums(&[3.0]), Vec::new());
        assert_eq!(cache.attribute(), Some("b"));
        assert_eq!(cache.values(), &nums(&[3.0])[..]);
        assert_eq!(cache.strings(), vec!["3".to_string()]);
    }
}
