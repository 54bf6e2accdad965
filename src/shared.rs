//! Thread-shareable graph handle.
//!
//! [`Graph`] itself is single-owner: every query call takes `&mut self`.
//! `SharedGraph` puts it behind a lock so several threads can run
//! pipelines against one graph. A pipeline runs entirely under one write
//! guard, so no other thread observes its intermediate selections.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Graph, GraphSnapshot, Result};

#[derive(Debug, Clone)]
pub struct SharedGraph {
    inner: Arc<RwLock<Graph>>,
}

impl SharedGraph {
    pub fn new(graph: Graph) -> Self {
        Self { inner: Arc::new(RwLock::new(graph)) }
    }

    /// Run a pipeline with exclusive access to the graph.
    pub fn query<T>(&self, pipeline: impl FnOnce(&mut Graph) -> Result<T>) -> Result<T> {
        let mut graph = self.inner.write();
        pipeline(&mut graph)
    }

    /// Read-only access; concurrent readers do not block each other.
    pub fn read<T>(&self, f: impl FnOnce(&Graph) -> T) -> T {
        f(&self.inner.read())
    }

    /// Clone the graph out, including its current selection and cache.
    pub fn snapshot(&self) -> Graph {
        self.inner.read().clone()
    }

    /// Node and edge data only.
    pub fn export(&self) -> GraphSnapshot {
        self.inner.read().snapshot()
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::model::attrs;
    use crate::{Filter, SetOp, ValueType};

    fn repos() -> Graph {
        let mut g = Graph::new("repos");
        let calc = g.add_node("project", Some("calc"), Default::default()).unwrap();
        for (name, commits) in [("Ann", 3), ("Bob", 7)] {
            let p = g.add_node("person", Some(name), attrs([("name", name)])).unwrap();
            g.add_edge(p, calc, "contributor", attrs([("commits", commits)])).unwrap();
        }
        g
    }

    #[test]
    fn test_query_runs_pipeline() {
        let shared = SharedGraph::new(repos());
        let total = shared
            .query(|g| {
                g.select_nodes("type == 'person'", SetOp::Replace)?
                    .trav_out_edge(Filter::All)?
                    .cache_edge_attrs("commits", Some(ValueType::Numeric))?;
                Ok(g.cache_numbers().iter().sum::<f64>())
            })
            .unwrap();
        assert_eq!(total, 10.0);
        assert_eq!(shared.read(|g| g.selected_edges().len()), 2);
    }

    #[test]
    fn test_concurrent_pipelines() {
        let shared = SharedGraph::new(repos());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .query(|g| {
                            g.set_node_attrs("touched", i)?;
                            g.select_all_nodes()?.cache_node_attrs("label", None)?;
                            Ok(g.get_cache().len())
                        })
                        .unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 3);
        }
        assert_eq!(shared.export().nodes.len(), 3);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedGraph::from(repos());
        let mut copy = shared.snapshot();
        copy.select_all_nodes().unwrap();
        assert!(shared.read(|g| g.selection().is_empty()));
    }
}
