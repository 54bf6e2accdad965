//! In-memory node and edge tables.
//!
//! Nodes and edges live in insertion-ordered vectors so every scan is
//! deterministic. Hash indexes map ids to table slots, and a per-node
//! adjacency record keeps outbound and inbound edge ids so traversals
//! never rescan the edge table.
//!
//! ## Limitations
//!
//! - **No deletion**: ids are assigned monotonically and never reused.
//! - **No property indexes**: attribute lookups are full scans.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::SchemaMode;
use crate::model::*;
use crate::{Error, Result};

/// Outbound and inbound edge ids of one node, in insertion order.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    outbound: SmallVec<[EdgeId; 4]>,
    inbound: SmallVec<[EdgeId; 4]>,
}

// ============================================================================
// GraphStore
// ============================================================================

/// Owns the node table and the edge table.
#[derive(Debug, Clone)]
pub struct GraphStore {
    schema: SchemaMode,
    nodes: Vec<Node>,
    node_slots: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_slots: HashMap<EdgeId, usize>,
    adjacency: HashMap<NodeId, Adjacency>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(SchemaMode::default())
    }
}

impl GraphStore {
    pub fn new(schema: SchemaMode) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
            node_slots: HashMap::new(),
            edges: Vec::new(),
            edge_slots: HashMap::new(),
            adjacency: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    pub fn schema(&self) -> SchemaMode {
        self.schema
    }

    // ========================================================================
    // Inserts
    // ========================================================================

    /// Append a node. Fails with `SchemaError` on an empty type unless the
    /// store is in [`SchemaMode::Loose`].
    pub fn add_node(
        &mut self,
        node_type: &str,
        label: Option<&str>,
        attributes: AttributeMap,
    ) -> Result<NodeId> {
        let node_type = self.check_tag("node type", node_type)?;
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        self.node_slots.insert(id, self.nodes.len());
        self.adjacency.insert(id, Adjacency::default());
        self.nodes.push(Node {
            id,
            label: label.map(str::to_owned),
            node_type,
            attributes,
        });

        tracing::trace!(node = %id, "node added");
        Ok(id)
    }

    /// Append a directed edge `from -> to`.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel: &str,
        attributes: AttributeMap,
    ) -> Result<EdgeId> {
        if !self.node_slots.contains_key(&from) {
            return Err(Error::ReferenceError(format!("source node {from} does not exist")));
        }
        if !self.node_slots.contains_key(&to) {
            return Err(Error::ReferenceError(format!("target node {to} does not exist")));
        }
        let rel = self.check_tag("edge rel", rel)?;

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;

        self.edge_slots.insert(id, self.edges.len());
        self.edges.push(Edge { id, from, to, rel, attributes });

        // Self loops appear in both lists of the same node.
        self.adjacency.entry(from).or_default().outbound.push(id);
        self.adjacency.entry(to).or_default().inbound.push(id);

        tracing::trace!(edge = %id, %from, %to, "edge added");
        Ok(id)
    }

    fn check_tag(&self, what: &str, tag: &str) -> Result<Option<String>> {
        if !tag.trim().is_empty() {
            return Ok(Some(tag.to_owned()));
        }
        match self.schema {
            SchemaMode::PropertyGraph => Err(Error::SchemaError(format!("{what} must not be empty"))),
            SchemaMode::Loose => Ok(None),
        }
    }

    /// True iff every node has a non-empty type and every edge a non-empty rel.
    pub fn is_property_graph(&self) -> bool {
        let tagged = |t: &Option<String>| t.as_deref().is_some_and(|s| !s.trim().is_empty());
        self.nodes.iter().all(|n| tagged(&n.node_type)) && self.edges.iter().all(|e| tagged(&e.rel))
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_slots.get(&id).map(|&slot| &self.edges[slot])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_slots.contains_key(&id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `node`, in insertion order.
    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        self.adjacency.get(&node).map_or(&[][..], |a| a.outbound.as_slice())
    }

    /// Edges arriving at `node`, in insertion order.
    pub fn in_edges(&self, node: NodeId) -> &[EdgeId] {
        self.adjacency.get(&node).map_or(&[][..], |a| a.inbound.as_slice())
    }

    /// Edges incident to `node` in the given direction.
    pub fn edges_of(&self, node: NodeId, dir: Direction) -> Vec<&Edge> {
        let ids: Vec<EdgeId> = match dir {
            Direction::Outgoing => self.out_edges(node).to_vec(),
            Direction::Incoming => self.in_edges(node).to_vec(),
            Direction::Both => {
                let mut ids = self.out_edges(node).to_vec();
                for id in self.in_edges(node) {
                    if !ids.contains(id) {
                        ids.push(*id);
                    }
                }
                ids
            }
        };
        ids.into_iter().filter_map(|id| self.edge(id)).collect()
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_edges(node).len()
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).len()
    }

    /// In-degree plus out-degree; a self loop counts twice.
    pub fn degree(&self, node: NodeId) -> usize {
        self.in_degree(node) + self.out_degree(node)
    }

    /// Nodes whose `field` (built-in or attribute) renders exactly as `value`.
    pub fn find_nodes(&self, field: &str, value: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.lookup(field).as_text().is_some_and(|t| t == value))
            .map(|n| n.id)
            .collect()
    }

    /// Distinct node types, sorted.
    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.nodes.iter().filter_map(|n| n.node_type.clone()).collect();
        types.sort();
        types.dedup();
        types
    }

    /// Distinct edge rels, sorted.
    pub fn rel_types(&self) -> Vec<String> {
        let mut rels: Vec<String> = self.edges.iter().filter_map(|e| e.rel.clone()).collect();
        rels.sort();
        rels.dedup();
        rels
    }

    // ========================================================================
    // Attribute writers
    // ========================================================================

    pub fn set_node_attr(&mut self, id: NodeId, key: &str, value: AttributeValue) -> Result<()> {
        let slot = *self.node_slots.get(&id).ok_or_else(|| Error::NotFound(format!("node {id}")))?;
        self.nodes[slot].attributes.insert(key.to_owned(), value);
        Ok(())
    }

    pub fn set_edge_attr(&mut self, id: EdgeId, key: &str, value: AttributeValue) -> Result<()> {
        let slot = *self.edge_slots.get(&id).ok_or_else(|| Error::NotFound(format!("edge {id}")))?;
        self.edges[slot].attributes.insert(key.to_owned(), value);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
