//! Cache operations: copy one attribute of the selection into the
//! aggregation cache, then read or aggregate it.

use crate::cache::{Aggregate, AggregationCache, EntityId, Skipped};
use crate::model::{AttributeSource, AttributeValue, ValueType};
use crate::{Graph, Result};

impl Graph {
    /// Cache `attr` of every selected node, in selection order.
    ///
    /// With `expected` set, each value is coerced first. Absent values and
    /// failed coercions are left out and reported by [`Graph::cache_skipped`].
    /// The selection is not changed.
    pub fn cache_node_attrs(&mut self, attr: &str, expected: Option<ValueType>) -> Result<&mut Self> {
        let ids = self.input_nodes("cache_node_attrs")?;
        let entities = ids
            .iter()
            .filter_map(|&id| self.store.node(id))
            .map(|n| (EntityId::Node(n.id), n));
        let (values, skipped) = collect_values(attr, expected, entities);
        Ok(self.fill_cache("cache_node_attrs", attr, values, skipped))
    }

    /// Cache `attr` of every selected edge; symmetric to [`Graph::cache_node_attrs`].
    pub fn cache_edge_attrs(&mut self, attr: &str, expected: Option<ValueType>) -> Result<&mut Self> {
        let ids = self.input_edges("cache_edge_attrs")?;
        let entities = ids
            .iter()
            .filter_map(|&id| self.store.edge(id))
            .map(|e| (EntityId::Edge(e.id), e));
        let (values, skipped) = collect_values(attr, expected, entities);
        Ok(self.fill_cache("cache_edge_attrs", attr, values, skipped))
    }

    /// The values captured by the most recent cache call. Reading does not
    /// clear the cache.
    pub fn get_cache(&self) -> &[AttributeValue] {
        self.cache.values()
    }

    pub fn cache_skipped(&self) -> &[Skipped] {
        self.cache.skipped()
    }

    pub fn cache(&self) -> &AggregationCache {
        &self.cache
    }

    /// Numeric view of the cache.
    pub fn cache_numbers(&self) -> Vec<f64> {
        self.cache.numbers()
    }

    pub fn cache_strings(&self) -> Vec<String> {
        self.cache.strings()
    }

    /// Apply `agg` to the cached values. See [`crate::cache::aggregate`].
    pub fn aggregate_cache(&self, agg: Aggregate) -> Option<f64> {
        self.cache.aggregate(agg)
    }

    fn fill_cache(
        &mut self,
        op: &'static str,
        attr: &str,
        values: Vec<AttributeValue>,
        skipped: Vec<Skipped>,
    ) -> &mut Self {
        if !skipped.is_empty() {
            tracing::warn!(op, attr, skipped = skipped.len(), "entities left out of the cache");
        }
        tracing::debug!(op, attr, cached = values.len(), "cache overwritten");
        self.cache.overwrite(attr, values, skipped);
        self
    }
}

fn collect_values<'a, S, I>(
    attr: &str,
    expected: Option<ValueType>,
    entities: I,
) -> (Vec<AttributeValue>, Vec<Skipped>)
where
    S: AttributeSource + 'a,
    I: Iterator<Item = (EntityId, &'a S)>,
{
    let mut values = Vec::new();
    let mut skipped = Vec::new();

    for (entity, source) in entities {
        let value = source.lookup(attr);
        if value.is_absent() {
            tracing::trace!(%entity, attr, "no value");
            skipped.push(Skipped { entity, reason: format!("no attribute '{attr}'") });
            continue;
        }
        match expected {
            None => values.push(value.into_owned()),
            Some(target) => match value.coerce(target) {
                Ok(v) => values.push(v),
                Err(err) => {
                    tracing::trace!(%entity, attr, %err, "coercion failed");
                    skipped.push(Skipped { entity, reason: err.to_string() });
                }
            },
        }
    }
    (values, skipped)
}
