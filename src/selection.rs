//! # Selection
//!
//! The working set every query call operates on: an ordered, duplicate-free
//! set of node ids or edge ids. A selection is typed. It is either empty
//! (no mode yet), node-mode, or edge-mode; a typed selection with zero ids is
//! a "dead end" and keeps its mode.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::{EdgeId, NodeId};

// ============================================================================
// IdSet
// ============================================================================

/// Insertion-ordered set of ids (discovery order, no duplicates).
#[derive(Debug, Clone)]
pub struct IdSet<T: Copy + Eq + Hash> {
    order: Vec<T>,
    members: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Default for IdSet<T> {
    fn default() -> Self {
        Self { order: Vec::new(), members: HashSet::new() }
    }
}

impl<T: Copy + Eq + Hash> IdSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`; returns false if it was already present.
    pub fn insert(&mut self, id: T) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &T) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.order
    }

    /// `self` followed by the members of `other` not already present.
    pub fn union(&self, other: &IdSet<T>) -> IdSet<T> {
        let mut out = self.clone();
        out.extend(other.iter());
        out
    }

    /// Members of `self` also in `other`, in `self`'s order.
    pub fn intersection(&self, other: &IdSet<T>) -> IdSet<T> {
        self.iter().filter(|id| other.contains(id)).collect()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for IdSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = IdSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Copy + Eq + Hash> Extend<T> for IdSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<T: Copy + Eq + Hash> PartialEq for IdSet<T> {
    /// Order-sensitive: two selections are equal only if discovered alike.
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<T: Copy + Eq + Hash> Eq for IdSet<T> {}

// ============================================================================
// Selection
// ============================================================================

/// Which kind of entity a selection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Empty,
    Node,
    Edge,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Empty => write!(f, "empty"),
            SelectionMode::Node => write!(f, "node"),
            SelectionMode::Edge => write!(f, "edge"),
        }
    }
}

/// The current working set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Nodes(IdSet<NodeId>),
    Edges(IdSet<EdgeId>),
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Empty => SelectionMode::Empty,
            Selection::Nodes(_) => SelectionMode::Node,
            Selection::Edges(_) => SelectionMode::Edge,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Empty => 0,
            Selection::Nodes(ids) => ids.len(),
            Selection::Edges(ids) => ids.len(),
        }
    }

    /// True for `Empty` and for dead ends (typed, zero ids).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_ids(&self) -> Option<&IdSet<NodeId>> {
        match self {
            Selection::Nodes(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn edge_ids(&self) -> Option<&IdSet<EdgeId>> {
        match self {
            Selection::Edges(ids) => Some(ids),
            _ => None,
        }
    }
}

/// How a new match combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOp {
    #[default]
    Replace,
    Union,
    Intersect,
}

impl SetOp {
    /// Combine `previous` with `matches`. With no previous selection
    /// (`None`) every op behaves like `Replace`; an empty previous set is
    /// still a set, so `Intersect` against it is empty.
    pub fn combine<T: Copy + Eq + Hash>(self, previous: Option<&IdSet<T>>, matches: IdSet<T>) -> IdSet<T> {
        match (self, previous) {
            (SetOp::Replace, _) | (_, None) => matches,
            (SetOp::Union, Some(prev)) => prev.union(&matches),
            (SetOp::Intersect, Some(prev)) => prev.intersection(&matches),
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// Bounded stack of earlier selections, newest last.
#[derive(Debug, Clone, Default)]
pub struct SelectionHistory {
    entries: VecDeque<Selection>,
    limit: usize,
}

impl SelectionHistory {
    pub fn new(limit: usize) -> Self {
        Self { entries: VecDeque::new(), limit }
    }

    /// Remember `selection`, dropping the oldest entry beyond the limit.
    pub fn record(&mut self, selection: Selection) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(selection);
    }

    pub fn pop(&mut self) -> Option<Selection> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
