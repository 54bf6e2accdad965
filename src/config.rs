//! Graph configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// How strictly the store enforces the property-graph schema on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// Every node needs a non-empty type and every edge a non-empty rel.
    #[default]
    PropertyGraph,
    /// Accept untyped nodes and unlabeled edges.
    Loose,
}

/// What a query call does with a predicate it cannot parse or bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateMode {
    /// Match nothing and log a warning.
    #[default]
    FailClosed,
    /// Abort the call with `Error::PredicateError`.
    Strict,
}

/// Configuration for a [`Graph`](crate::Graph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub name: String,
    pub schema: SchemaMode,
    pub predicate_mode: PredicateMode,
    /// Maximum number of selections remembered for `Graph::back()`.
    pub history_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "graph".into(),
            schema: SchemaMode::PropertyGraph,
            predicate_mode: PredicateMode::FailClosed,
            history_limit: 16,
        }
    }
}

impl GraphConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_schema(mut self, schema: SchemaMode) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_predicate_mode(mut self, mode: PredicateMode) -> Self {
        self.predicate_mode = mode;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
