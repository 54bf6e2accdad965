//! Predicate selection and selection management.

use crate::model::{EdgeId, NodeId};
use crate::selection::{IdSet, Selection, SetOp};
use crate::{Error, Graph, Result};
use super::Filter;

impl Graph {
    /// Select nodes matching `filter`, combined with the current node
    /// selection by `set_op`.
    ///
    /// With no current selection every `set_op` acts like `Replace`; an
    /// empty node selection is still a set, so `Intersect` stays empty.
    /// Union or intersect against a non-empty edge selection is a `ModeError`.
    pub fn select_nodes(&mut self, filter: impl Into<Filter>, set_op: SetOp) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let base = self.combine_base_nodes("select_nodes", set_op)?;
        let matches: IdSet<NodeId> = self
            .store
            .nodes()
            .filter(|n| compiled.matches(*n))
            .map(|n| n.id)
            .collect();
        let next = set_op.combine(base, matches);
        Ok(self.commit("select_nodes", Selection::Nodes(next)))
    }

    /// Select edges matching `filter`; symmetric to [`Graph::select_nodes`].
    pub fn select_edges(&mut self, filter: impl Into<Filter>, set_op: SetOp) -> Result<&mut Self> {
        let compiled = self.compile(filter.into())?;
        let base = self.combine_base_edges("select_edges", set_op)?;
        let matches: IdSet<EdgeId> = self
            .store
            .edges()
            .filter(|e| compiled.matches(*e))
            .map(|e| e.id)
            .collect();
        let next = set_op.combine(base, matches);
        Ok(self.commit("select_edges", Selection::Edges(next)))
    }

    /// Select nodes by degree: `indeg|outdeg|deg <op> <int>`.
    pub fn select_nodes_by_degree(&mut self, expr: &str, set_op: SetOp) -> Result<&mut Self> {
        let degree = self.compile_degree(expr)?;
        let base = self.combine_base_nodes("select_nodes_by_degree", set_op)?;
        let matches: IdSet<NodeId> = match degree {
            Some(d) => self
                .store
                .nodes()
                .filter(|n| d.matches(self.store.in_degree(n.id), self.store.out_degree(n.id)))
                .map(|n| n.id)
                .collect(),
            None => IdSet::new(),
        };
        let next = set_op.combine(base, matches);
        Ok(self.commit("select_nodes_by_degree", Selection::Nodes(next)))
    }

    pub fn select_all_nodes(&mut self) -> Result<&mut Self> {
        self.select_nodes(Filter::All, SetOp::Replace)
    }

    pub fn select_all_edges(&mut self) -> Result<&mut Self> {
        self.select_edges(Filter::All, SetOp::Replace)
    }

    /// Drop the selection (mode becomes empty).
    pub fn clear_selection(&mut self) -> &mut Self {
        self.commit("clear_selection", Selection::Empty)
    }

    /// Selected node ids in discovery order; empty unless in node mode.
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.selection.node_ids().map(|ids| ids.as_slice().to_vec()).unwrap_or_default()
    }

    /// Selected edge ids in discovery order; empty unless in edge mode.
    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.selection.edge_ids().map(|ids| ids.as_slice().to_vec()).unwrap_or_default()
    }

    // ========================================================================
    // Suspend / resume
    // ========================================================================

    /// Save the current selection on the stack. The selection is unchanged.
    pub fn push_selection(&mut self) -> &mut Self {
        self.stack.push(self.selection.clone());
        self
    }

    /// Restore the most recently pushed selection.
    pub fn pop_selection(&mut self) -> Result<&mut Self> {
        let saved = self
            .stack
            .pop()
            .ok_or_else(|| Error::InvalidArgument("selection stack is empty".into()))?;
        Ok(self.commit("pop_selection", saved))
    }

    pub fn selection_depth(&self) -> usize {
        self.stack.len()
    }

    /// Step back to the selection before the last selection-changing call.
    pub fn back(&mut self) -> Result<&mut Self> {
        let previous = self
            .history
            .pop()
            .ok_or_else(|| Error::InvalidArgument("no earlier selection".into()))?;
        tracing::debug!(mode = %previous.mode(), size = previous.len(), "selection restored from history");
        self.selection = previous;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attrs;
    use crate::selection::SelectionMode;

    fn people() -> Graph {
        let mut g = Graph::new("people");
        for (name, age) in [("Ann", 25), ("Bob", 35), ("Cid", 41)] {
            let mut a = attrs([("name", name)]);
            a.insert("age".into(), age.into());
            g.add_node("person", Some(name), a).unwrap();
        }
        g.add_node("project", Some("calc"), attrs([("age", 50)])).unwrap();
        g
    }

    #[test]
    fn test_select_replace_union_intersect() {
        let mut g = people();
        g.select_nodes("type == 'person'", SetOp::Replace).unwrap();
        assert_eq!(g.selected_nodes().len(), 3);

        g.select_nodes("age > 30", SetOp::Intersect).unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(2), NodeId(3)]);

        g.select_nodes("name == 'Ann'", SetOp::Union).unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(2), NodeId(3), NodeId(1)]);
    }

    #[test]
    fn test_select_on_empty_selection_replaces() {
        let mut g = people();
        g.select_nodes("age > 30", SetOp::Intersect).unwrap();
        assert_eq!(g.selected_nodes().len(), 3);
    }

    #[test]
    fn test_set_ops_on_empty_node_selection() {
        let mut g = people();
        g.select_nodes("name == 'Nobody'", SetOp::Replace).unwrap();
        g.select_nodes("age > 30", SetOp::Intersect).unwrap();
        assert_eq!(g.selection().mode(), SelectionMode::Node);
        assert!(g.selected_nodes().is_empty());

        g.select_nodes("name == 'Bob'", SetOp::Union).unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(2)]);
    }

    #[test]
    fn test_union_with_edge_selection_is_mode_error() {
        let mut g = people();
        g.add_edge(NodeId(1), NodeId(4), "contributor", attrs([("commits", 3)])).unwrap();
        g.select_all_edges().unwrap();

        let err = g.select_nodes("age > 30", SetOp::Union).unwrap_err();
        assert!(matches!(err, Error::ModeError { expected: SelectionMode::Node, .. }));
        assert_eq!(g.selection().mode(), SelectionMode::Edge);

        g.select_nodes("age > 30", SetOp::Replace).unwrap();
        assert_eq!(g.selection().mode(), SelectionMode::Node);
    }

    #[test]
    fn test_select_by_degree() {
        let mut g = people();
        g.add_edge(NodeId(1), NodeId(4), "contributor", Default::default()).unwrap();
        g.add_edge(NodeId(2), NodeId(4), "contributor", Default::default()).unwrap();

        g.select_nodes_by_degree("indeg >= 2", SetOp::Replace).unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(4)]);

        g.select_nodes_by_degree("deg == 0", SetOp::Replace).unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(3)]);
    }

    #[test]
    fn test_push_pop_and_back() {
        let mut g = people();
        g.select_nodes("name == 'Ann'", SetOp::Replace).unwrap();
        g.push_selection();
        g.select_all_edges().unwrap();
        assert_eq!(g.selection().mode(), SelectionMode::Edge);

        g.pop_selection().unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(1)]);
        assert!(g.pop_selection().is_err());

        g.back().unwrap();
        assert_eq!(g.selection().mode(), SelectionMode::Edge);
        g.back().unwrap();
        assert_eq!(g.selected_nodes(), vec![NodeId(1)]);
    }

    #[test]
    fn test_select_edges() {
        let mut g = people();
        g.add_edge(NodeId(1), NodeId(4), "contributor", attrs([("commits", 3)])).unwrap();
        g.add_edge(NodeId(2), NodeId(4), "contributor", attrs([("commits", 9)])).unwrap();
        g.select_edges("commits > 5", SetOp::Replace).unwrap();
        assert_eq!(g.selected_edges(), vec![EdgeId(2)]);
        assert!(g.selected_nodes().is_empty());
    }
}
