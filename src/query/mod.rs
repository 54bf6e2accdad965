//! # Query engine
//!
//! Select, traverse and cache operations on [`Graph`]. Every call either
//! succeeds and returns the graph for chaining, or fails without touching
//! the selection, the history or the cache.
//!
//! | Module | Operations |
//! |--------|------------|
//! | `select` | `select_nodes`, `select_edges`, `select_nodes_by_degree`, stack and history |
//! | `traverse` | `trav_out`, `trav_in`, `trav_both`, `trav_*_edge`, `trav_*_node` |
//! | `aggregate` | `cache_node_attrs`, `cache_edge_attrs`, `get_cache`, aggregates |

pub mod select;
pub mod traverse;
pub mod aggregate;

use crate::config::PredicateMode;
use crate::model::{AttributeSource, AttributeValue, EdgeId, NodeId};
use crate::predicate::{DegreePredicate, Operand, Params, Predicate};
use crate::selection::{IdSet, Selection, SelectionMode};
use crate::{Error, Graph, Result};

/// The optional predicate argument of a query call.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// Match everything.
    #[default]
    All,
    /// Predicate source text plus values for its `$params`.
    Source { text: String, params: Params },
    /// A prebuilt predicate.
    Predicate(Predicate),
}

impl Filter {
    /// Bind `$name` to `value`.
    pub fn bind(self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self {
            Filter::All => Filter::All,
            Filter::Source { text, mut params } => {
                params.insert(name, value);
                Filter::Source { text, params }
            }
            Filter::Predicate(p) => {
                if matches!(&p.operand, Operand::Param(param) if *param == name) {
                    Filter::Predicate(Predicate { operand: Operand::Literal(value), ..p })
                } else {
                    Filter::Predicate(p)
                }
            }
        }
    }
}

impl From<&str> for Filter {
    fn from(text: &str) -> Self {
        Filter::Source { text: text.to_owned(), params: Params::new() }
    }
}

impl From<String> for Filter {
    fn from(text: String) -> Self {
        Filter::Source { text, params: Params::new() }
    }
}

impl From<Predicate> for Filter {
    fn from(p: Predicate) -> Self {
        Filter::Predicate(p)
    }
}

/// A filter ready for evaluation.
#[derive(Debug, Clone)]
pub(crate) enum Compiled {
    All,
    Predicate(Predicate),
    /// Malformed filter under fail-closed semantics.
    Nothing,
}

impl Compiled {
    pub(crate) fn matches<S: AttributeSource + ?Sized>(&self, entity: &S) -> bool {
        match self {
            Compiled::All => true,
            Compiled::Predicate(p) => p.matches(entity),
            Compiled::Nothing => false,
        }
    }
}

impl Graph {
    /// Parse and bind `filter`, honoring the configured predicate mode.
    pub(crate) fn compile(&self, filter: Filter) -> Result<Compiled> {
        let resolved = match filter {
            Filter::All => return Ok(Compiled::All),
            Filter::Source { text, params } => {
                Predicate::parse(&text).and_then(|p| p.bind(&params)).map_err(|e| (text, e))
            }
            Filter::Predicate(p) => p.bind(&Params::new()).map_err(|e| (p.to_string(), e)),
        };
        match resolved {
            Ok(p) => Ok(Compiled::Predicate(p)),
            Err((text, err)) => self.reject_predicate(&text, err).map(|()| Compiled::Nothing),
        }
    }

    pub(crate) fn compile_degree(&self, expr: &str) -> Result<Option<DegreePredicate>> {
        match DegreePredicate::parse(expr) {
            Ok(d) => Ok(Some(d)),
            Err(err) => self.reject_predicate(expr, err).map(|()| None),
        }
    }

    fn reject_predicate(&self, text: &str, err: Error) -> Result<()> {
        match self.config.predicate_mode {
            PredicateMode::Strict => Err(err),
            PredicateMode::FailClosed => {
                tracing::warn!(predicate = text, %err, "malformed predicate matches nothing");
                Ok(())
            }
        }
    }

    /// Node ids of the current selection, for an operation that needs
    /// node-mode input. `Empty` yields no ids.
    pub(crate) fn input_nodes(&self, op: &'static str) -> Result<&[NodeId]> {
        match &self.selection {
            Selection::Empty => Ok(&[][..]),
            Selection::Nodes(ids) => Ok(ids.as_slice()),
            Selection::Edges(_) => Err(mode_error(op, SelectionMode::Node, SelectionMode::Edge)),
        }
    }

    /// Edge ids of the current selection, for an operation that needs
    /// edge-mode input.
    pub(crate) fn input_edges(&self, op: &'static str) -> Result<&[EdgeId]> {
        match &self.selection {
            Selection::Empty => Ok(&[][..]),
            Selection::Edges(ids) => Ok(ids.as_slice()),
            Selection::Nodes(_) => Err(mode_error(op, SelectionMode::Edge, SelectionMode::Node)),
        }
    }

    /// The selection a node `select_*` call combines with, or `None` when
    /// the call behaves like a replace.
    pub(crate) fn combine_base_nodes(&self, op: &'static str, set_op: crate::SetOp) -> Result<Option<&IdSet<NodeId>>> {
        match &self.selection {
            Selection::Nodes(ids) => Ok(Some(ids)),
            Selection::Empty => Ok(None),
            Selection::Edges(ids) if ids.is_empty() || set_op == crate::SetOp::Replace => Ok(None),
            Selection::Edges(_) => Err(mode_error(op, SelectionMode::Node, SelectionMode::Edge)),
        }
    }

    pub(crate) fn combine_base_edges(&self, op: &'static str, set_op: crate::SetOp) -> Result<Option<&IdSet<EdgeId>>> {
        match &self.selection {
            Selection::Edges(ids) => Ok(Some(ids)),
            Selection::Empty => Ok(None),
            Selection::Nodes(ids) if ids.is_empty() || set_op == crate::SetOp::Replace => Ok(None),
            Selection::Nodes(_) => Err(mode_error(op, SelectionMode::Edge, SelectionMode::Node)),
        }
    }
}

pub(crate) fn mode_error(op: &'static str, expected: SelectionMode, got: SelectionMode) -> Error {
    Error::ModeError { op, expected, got }
}
