//! Graph export: a serde snapshot, JSON and Graphviz DOT.
//!
//! ```text
//! Graph ──snapshot()──▶ GraphSnapshot ──export_json()──▶ JSON
//!                                     ──into_graph()───▶ Graph
//! Graph ──export_dot()──▶ digraph (color / width styled)
//! ```
//!
//! Node and edge order follows insertion order, and attribute maps are
//! sorted, so output is deterministic.

use std::fmt::Write as _;
use std::io::{Read, Write};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::model::{AttributeMap, AttributeValue, Edge, Node, NodeId};
use crate::{Error, Graph, Result};

/// Plain-data copy of a graph's nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Rebuild a graph. Ids are reassigned in snapshot order and edges are
    /// remapped onto the new node ids.
    pub fn into_graph(self, config: GraphConfig) -> Result<Graph> {
        let mut graph = Graph::with_config(config);
        let mut remap: HashMap<NodeId, NodeId> = HashMap::with_capacity(self.nodes.len());

        for node in self.nodes {
            let id = graph.add_node(
                node.node_type.as_deref().unwrap_or_default(),
                node.label.as_deref(),
                node.attributes,
            )?;
            remap.insert(node.id, id);
        }
        for edge in self.edges {
            let endpoint = |old: NodeId| {
                remap
                    .get(&old)
                    .copied()
                    .ok_or_else(|| Error::ReferenceError(format!("edge {} refers to missing node {old}", edge.id)))
            };
            let (from, to) = (endpoint(edge.from)?, endpoint(edge.to)?);
            graph.add_edge(from, to, edge.rel.as_deref().unwrap_or_default(), edge.attributes)?;
        }
        Ok(graph)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Graph {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            name: self.name().to_owned(),
            nodes: self.store.nodes().cloned().collect(),
            edges: self.store.edges().cloned().collect(),
        }
    }
}

/// Write the graph as pretty-printed JSON.
pub fn export_json(graph: &Graph, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &graph.snapshot())?;
    writeln!(writer)?;
    Ok(())
}

/// Write the graph as a Graphviz `digraph`.
///
/// Node labels come from the node label (falling back to the id); edge
/// labels from the rel. `color` attributes become DOT `color`, and numeric
/// `width` attributes become `penwidth`.
pub fn export_dot(graph: &Graph, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "digraph {} {{", quote(graph.name()))?;

    for node in graph.store().nodes() {
        let label = node.label.clone().unwrap_or_else(|| node.id.to_string());
        let style = dot_attributes(&label, &node.attributes);
        writeln!(writer, "  n{} [{}];", node.id.0, style)?;
    }
    for edge in graph.store().edges() {
        let style = dot_attributes(edge.rel.as_deref().unwrap_or_default(), &edge.attributes);
        writeln!(writer, "  n{} -> n{} [{}];", edge.from.0, edge.to.0, style)?;
    }

    writeln!(writer, "}}")?;
    Ok(())
}

fn dot_attributes(label: &str, attributes: &AttributeMap) -> String {
    let mut out = format!("label={}", quote(label));
    if let Some(color) = attributes.get("color").and_then(AttributeValue::as_text) {
        let _ = write!(out, ", color={}", quote(&color));
    }
    if let Some(width) = attributes.get("width").and_then(AttributeValue::as_number) {
        let _ = write!(out, ", penwidth={width}");
    }
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaMode;
    use crate::model::{attrs, EdgeId};

    fn small() -> Graph {
        let mut g = Graph::new("repos");
        let josh = g.add_node("person", Some("Josh"), attrs([("name", "Josh")])).unwrap();
        let calc = g.add_node("project", Some("supercalc"), Default::default()).unwrap();
        g.add_edge(josh, calc, "contributor", attrs([("commits", 15)])).unwrap();
        g
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let g = small();
        let mut buf = Vec::new();
        export_json(&g, &mut buf).unwrap();

        let snapshot = GraphSnapshot::from_json_reader(&buf[..]).unwrap();
        assert_eq!(snapshot, g.snapshot());

        let rebuilt = snapshot.into_graph(GraphConfig::named("copy")).unwrap();
        assert_eq!(rebuilt.name(), "copy");
        assert_eq!(rebuilt.store().edge_count(), 1);
        let edge = rebuilt.edge(EdgeId(1)).unwrap();
        assert_eq!(edge.get("commits"), Some(&AttributeValue::Number(15.0)));
    }

    #[test]
    fn test_into_graph_rejects_dangling_edge() {
        let mut snapshot = small().snapshot();
        snapshot.edges[0].to = NodeId(99);
        let err = snapshot.into_graph(GraphConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ReferenceError(_)));
    }

    #[test]
    fn test_loose_snapshot_needs_loose_config() {
        let mut g = Graph::with_config(GraphConfig::default().with_schema(SchemaMode::Loose));
        g.add_node("", Some("untyped"), Default::default()).unwrap();
        let snapshot = g.snapshot();

        assert!(matches!(snapshot.clone().into_graph(GraphConfig::default()), Err(Error::SchemaError(_))));
        let loose = snapshot.into_graph(GraphConfig::default().with_schema(SchemaMode::Loose)).unwrap();
        assert!(!loose.is_property_graph());
    }

    #[test]
    fn test_export_dot_styles() {
        let mut g = small();
        g.rescale_edge_attrs("commits", 1.0, 4.0, "width").unwrap();
        g.select_nodes("name == 'Josh'", crate::SetOp::Replace).unwrap();
        g.set_node_attrs("color", "#ff0000").unwrap();

        let mut buf = Vec::new();
        export_dot(&g, &mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();

        assert!(dot.starts_with("digraph \"repos\" {"));
        assert!(dot.contains("n1 [label=\"Josh\", color=\"#ff0000\"];"));
        assert!(dot.contains("n2 [label=\"supercalc\"];"));
        assert!(dot.contains("n1 -> n2 [label=\"contributor\", penwidth=2.5];"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }
}
