//! Traversal operators.
//!
//! A traversal moves the selection one hop across the graph and replaces
//! it; it never accumulates. Filters are evaluated against the edge being
//! crossed. An empty result is a valid dead end that keeps the output mode.
//!
//! ```text
//! node ──trav_out / trav_in / trav_both──▶ node
//! node ──trav_out_edge / trav_in_edge───▶ edge
//! edge ──trav_out_node / trav_in_node───▶ node   (to / from end)
//! ```

use crate::model::{Direction, Edge, EdgeId, NodeId};
use crate::selection::{IdSet, Selection};
use crate::{Graph, Result};
use super::{Compiled, Filter};

impl Graph {
    /// Nodes at the `to` end of matching edges leaving the selection.
    pub fn trav_out(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.neighbors("trav_out", Direction::Outgoing, &compiled)?;
        Ok(self.commit("trav_out", Selection::Nodes(next)))
    }

    /// Nodes at the `from` end of matching edges arriving at the selection.
    pub fn trav_in(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.neighbors("trav_in", Direction::Incoming, &compiled)?;
        Ok(self.commit("trav_in", Selection::Nodes(next)))
    }

    /// `trav_out` result followed by the `trav_in` nodes not already found.
    pub fn trav_both(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.neighbors("trav_both", Direction::Both, &compiled)?;
        Ok(self.commit("trav_both", Selection::Nodes(next)))
    }

    /// Matching edges whose `from` is selected (node → edge).
    pub fn trav_out_edge(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.incident_edges("trav_out_edge", Direction::Outgoing, &compiled)?;
        Ok(self.commit("trav_out_edge", Selection::Edges(next)))
    }

    /// Matching edges whose `to` is selected (node → edge).
    pub fn trav_in_edge(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.incident_edges("trav_in_edge", Direction::Incoming, &compiled)?;
        Ok(self.commit("trav_in_edge", Selection::Edges(next)))
    }

    /// The `to` node of every selected edge passing the filter (edge → node).
    pub fn trav_out_node(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.endpoints("trav_out_node", |e| e.to, &compiled)?;
        Ok(self.commit("trav_out_node", Selection::Nodes(next)))
    }

    /// The `from` node of every selected edge passing the filter (edge → node).
    pub fn trav_in_node(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let next = self.endpoints("trav_in_node", |e| e.from, &compiled)?;
        Ok(self.commit("trav_in_node", Selection::Nodes(next)))
    }

    // ========================================================================
    // Hop helpers (read-only; callers commit the result)
    // ========================================================================

    fn incident_edges(&self, op: &'static str, dir: Direction, filter: &Compiled) -> Result<IdSet<EdgeId>> {
        let sources = self.input_nodes(op)?;
        let mut out = IdSet::new();
        for &node in sources {
            for edge in self.store.edges_of(node, dir) {
                if filter.matches(edge) {
                    out.insert(edge.id);
                }
            }
        }
        Ok(out)
    }

    fn neighbors(&self, op: &'static str, dir: Direction, filter: &Compiled) -> Result<IdSet<NodeId>> {
        let sources = self.input_nodes(op)?;
        let mut out = IdSet::new();
        let passes = [Direction::Outgoing, Direction::Incoming]
            .into_iter()
            .filter(|d| dir == Direction::Both || *d == dir);

        for pass in passes {
            for &node in sources {
                for edge in self.store.edges_of(node, pass) {
                    if !filter.matches(edge) {
                        continue;
                    }
                    let next = if pass == Direction::Outgoing { edge.to } else { edge.from };
                    out.insert(next);
                }
            }
        }
        Ok(out)
    }

    fn endpoints(
        &self,
        op: &'static str,
        end: impl Fn(&Edge) -> NodeId,
        filter: &Compiled,
    ) -> Result<IdSet<NodeId>> {
        let edges = self.input_edges(op)?;
        Ok(edges
            .iter()
            .filter_map(|&id| self.store.edge(id))
            .filter(|e| filter.matches(*e))
            .map(end)
            .collect())
    }
}
