//! # propgraph: in-memory property graph query engine
//!
//! A mutable graph of typed nodes and directed, labeled edges, queried by
//! moving a *selection* around the graph.
//!
//! ## Design Principles
//!
//! 1. **Selection-first**: every query call reads and/or replaces one typed
//!    working set (nodes *or* edges), never both
//! 2. **Clean DTOs**: `Node`, `Edge`, `AttributeValue` cross all boundaries
//! 3. **Predicates are data**: source text is parsed into an AST, and values
//!    computed mid-pipeline are bound as `$params`
//! 4. **All-or-nothing calls**: a failing call leaves selection and cache as
//!    they were
//!
//! ## Quick Start
//!
//! ```rust
//! use propgraph::{attrs, Filter, Graph, SetOp, ValueType};
//!
//! # fn example() -> propgraph::Result<()> {
//! let mut g = Graph::new("repos");
//! let josh = g.add_node("person", Some("Josh"), attrs([("name", "Josh")]))?;
//! let calc = g.add_node("project", Some("supercalc"), attrs([("name", "supercalc")]))?;
//! g.add_edge(josh, calc, "contributor", attrs([("commits", 15)]))?;
//!
//! g.select_nodes("name == 'Josh'", SetOp::Replace)?
//!     .trav_out_edge(Filter::All)?
//!     .cache_edge_attrs("commits", Some(ValueType::Numeric))?;
//!
//! assert_eq!(g.cache_numbers(), vec![15.0]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod predicate;
pub mod selection;
pub mod storage;
pub mod query;
pub mod cache;
pub mod mutate;
pub mod export;
pub mod config;
pub mod shared;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    attrs, AttributeMap, AttributeSource, AttributeValue, Direction, Edge, EdgeId, Node, NodeId,
    ValueType,
};
pub use predicate::{evaluate, CompareOp, DegreePredicate, Params, Predicate};
pub use selection::{IdSet, Selection, SelectionMode, SetOp};
pub use storage::{GraphStore, Table};
pub use query::Filter;
pub use cache::{Aggregate, AggregationCache, EntityId, Skipped};
pub use mutate::{Color, ScaleBound};
pub use export::{export_dot, export_json, GraphSnapshot};
pub use config::{GraphConfig, PredicateMode, SchemaMode};
pub use shared::SharedGraph;

use selection::SelectionHistory;

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// The primary entry point: a graph plus its query state.
///
/// Owns the store, the current selection, the selection stack and history,
/// and the aggregation cache. Query calls take `&mut self` and return
/// `Result<&mut Self>` so pipelines chain with `?`.
#[derive(Debug, Clone)]
pub struct Graph {
    config: GraphConfig,
    store: GraphStore,
    selection: Selection,
    history: SelectionHistory,
    stack: Vec<Selection>,
    cache: AggregationCache,
}

impl Graph {
    /// Create an empty graph with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(GraphConfig::named(name))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: GraphStore::new(config.schema),
            selection: Selection::Empty,
            history: SelectionHistory::new(config.history_limit),
            stack: Vec::new(),
            cache: AggregationCache::new(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Read access to the node and edge tables.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    // ========================================================================
    // Graph construction (delegates to the store)
    // ========================================================================

    pub fn add_node(&mut self, node_type: &str, label: Option<&str>, attributes: AttributeMap) -> Result<NodeId> {
        self.store.add_node(node_type, label, attributes)
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, rel: &str, attributes: AttributeMap) -> Result<EdgeId> {
        self.store.add_edge(from, to, rel, attributes)
    }

    pub fn add_nodes_from_table(&mut self, table: &Table, node_type: &str, label_column: &str) -> Result<Vec<NodeId>> {
        self.store.add_nodes_from_table(table, node_type, label_column)
    }

    pub fn add_edges_from_table(
        &mut self,
        table: &Table,
        from_column: &str,
        to_column: &str,
        lookup_field: &str,
        rel_column: &str,
    ) -> Result<Vec<EdgeId>> {
        self.store.add_edges_from_table(table, from_column, to_column, lookup_field, rel_column)
    }

    pub fn is_property_graph(&self) -> bool {
        self.store.is_property_graph()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.store.edge(id)
    }

    // ========================================================================
    // Selection state
    // ========================================================================

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Install `next` as the selection, remembering the previous one.
    fn commit(&mut self, op: &'static str, next: Selection) -> &mut Self {
        tracing::debug!(op, mode = %next.mode(), size = next.len(), "selection updated");
        let previous = std::mem::replace(&mut self.selection, next);
        self.history.record(previous);
        self
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Reference error: {0}")]
    ReferenceError(String),

    #[error("Mode error: {op} expects a {expected} selection, got {got}")]
    ModeError {
        op: &'static str,
        expected: SelectionMode,
        got: SelectionMode,
    },

    #[error("Type coercion error: expected {expected}, got {got}")]
    TypeCoercion { expected: String, got: String },

    #[error("Predicate error at position {position}: {message}")]
    PredicateError { position: usize, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
