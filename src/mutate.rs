//! # Graph mutators
//!
//! Styling helpers that write derived attributes back onto the graph:
//! linear rescaling of a numeric attribute into a number range or a color
//! gradient, and constant writers over the current selection. None of
//! them change the selection or the cache.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{AttributeSource, AttributeValue, Edge, EdgeId, Node, NodeId};
use crate::selection::Selection;
use crate::{Error, Graph, Result};

// ============================================================================
// Color
// ============================================================================

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or a basic CSS color name.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let invalid = || Error::InvalidArgument(format!("not a color: '{text}'"));

        if let Some(hex) = text.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    let expand = |i: usize| channel(hex[i..=i].repeat(2).as_str());
                    Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
                }
                6 => Ok(Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
                _ => Err(invalid()),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text))
            .map(|&(_, c)| c)
            .ok_or_else(invalid)
    }

    /// Point `t` (clamped to `[0, 1]`) on the gradient from `self` to `other`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Scale bounds
// ============================================================================

/// One end of a rescale range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleBound {
    Number(f64),
    Color(Color),
}

impl ScaleBound {
    /// A number, or anything [`Color::parse`] accepts.
    pub fn parse(text: &str) -> Result<Self> {
        match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(ScaleBound::Number(n)),
            _ => Color::parse(text).map(ScaleBound::Color),
        }
    }
}

impl From<f64> for ScaleBound {
    fn from(n: f64) -> Self {
        ScaleBound::Number(n)
    }
}

impl From<i32> for ScaleBound {
    fn from(n: i32) -> Self {
        ScaleBound::Number(n as f64)
    }
}

impl From<Color> for ScaleBound {
    fn from(c: Color) -> Self {
        ScaleBound::Color(c)
    }
}

/// A validated `[low, high]` pair.
#[derive(Debug, Clone, Copy)]
enum Scale {
    Linear(f64, f64),
    Gradient(Color, Color),
}

impl Scale {
    fn new(low: ScaleBound, high: ScaleBound) -> Result<Self> {
        match (low, high) {
            (ScaleBound::Number(lo), ScaleBound::Number(hi)) => {
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(Error::InvalidArgument(format!("scale bounds must be finite: {lo}, {hi}")));
                }
                Ok(Scale::Linear(lo, hi))
            }
            (ScaleBound::Color(lo), ScaleBound::Color(hi)) => Ok(Scale::Gradient(lo, hi)),
            _ => Err(Error::InvalidArgument(
                "scale bounds must both be numbers or both be colors".into(),
            )),
        }
    }

    fn at(self, t: f64) -> AttributeValue {
        match self {
            // weighted form so t = 0 and t = 1 land exactly on the bounds
            Scale::Linear(lo, hi) => AttributeValue::Number(lo * (1.0 - t) + hi * t),
            Scale::Gradient(lo, hi) => AttributeValue::String(lo.lerp(hi, t).to_string()),
        }
    }
}

/// Map every finite source value into `scale`. A constant source maps to
/// the middle of the range.
fn rescale_values<Id: Copy>(sources: &[(Id, f64)], scale: Scale) -> Vec<(Id, AttributeValue)> {
    let Some(lo) = sources.iter().map(|&(_, v)| v).reduce(f64::min) else {
        return Vec::new();
    };
    let hi = sources.iter().map(|&(_, v)| v).fold(lo, f64::max);
    let span = hi - lo;

    sources
        .iter()
        .map(|&(id, v)| {
            let t = if span > 0.0 { (v - lo) / span } else { 0.5 };
            (id, scale.at(t))
        })
        .collect()
}

fn check_target(source: Option<&str>, target: &str, builtins: &[&str]) -> Result<()> {
    if builtins.contains(&target) {
        return Err(Error::InvalidArgument(format!(
            "'{target}' is a built-in field and cannot be written"
        )));
    }
    if source == Some(target) {
        return Err(Error::InvalidArgument(format!(
            "rescale target '{target}' would overwrite its source"
        )));
    }
    Ok(())
}

// ============================================================================
// Graph mutators
// ============================================================================

impl Graph {
    /// Rescale edge attribute `source` linearly into `[low, high]` and
    /// write the result to `target`.
    ///
    /// Applies to the current edge selection when it is non-empty,
    /// otherwise to every edge. Edges without a numeric `source` are left
    /// alone. Bounds may be numbers or colors, not one of each.
    pub fn rescale_edge_attrs(
        &mut self,
        source: &str,
        low: impl Into<ScaleBound>,
        high: impl Into<ScaleBound>,
        target: &str,
    ) -> Result<&mut Self> {
        let scale = Scale::new(low.into(), high.into())?;
        check_target(Some(source), target, Edge::BUILTIN_FIELDS)?;

        let scope: Vec<EdgeId> = match &self.selection {
            Selection::Edges(ids) if !ids.is_empty() => ids.as_slice().to_vec(),
            _ => self.store.edges().map(|e| e.id).collect(),
        };
        let sources = numeric_sources(scope.iter().filter_map(|&id| self.store.edge(id)), source, |e| e.id);
        let skipped = scope.len() - sources.len();

        for (id, value) in rescale_values(&sources, scale) {
            self.store.set_edge_attr(id, target, value)?;
        }
        tracing::debug!(source, target, rescaled = sources.len(), skipped, "edge attributes rescaled");
        Ok(self)
    }

    /// Node counterpart of [`Graph::rescale_edge_attrs`].
    pub fn rescale_node_attrs(
        &mut self,
        source: &str,
        low: impl Into<ScaleBound>,
        high: impl Into<ScaleBound>,
        target: &str,
    ) -> Result<&mut Self> {
        let scale = Scale::new(low.into(), high.into())?;
        check_target(Some(source), target, Node::BUILTIN_FIELDS)?;

        let scope: Vec<NodeId> = match &self.selection {
            Selection::Nodes(ids) if !ids.is_empty() => ids.as_slice().to_vec(),
            _ => self.store.nodes().map(|n| n.id).collect(),
        };
        let sources = numeric_sources(scope.iter().filter_map(|&id| self.store.node(id)), source, |n| n.id);
        let skipped = scope.len() - sources.len();

        for (id, value) in rescale_values(&sources, scale) {
            self.store.set_node_attr(id, target, value)?;
        }
        tracing::debug!(source, target, rescaled = sources.len(), skipped, "node attributes rescaled");
        Ok(self)
    }

    /// Write `value` to attribute `name` of every selected node.
    pub fn set_node_attrs(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        check_target(None, name, Node::BUILTIN_FIELDS)?;
        let ids = self.input_nodes("set_node_attrs")?.to_vec();
        let value = value.into();
        for id in &ids {
            self.store.set_node_attr(*id, name, value.clone())?;
        }
        tracing::debug!(name, written = ids.len(), "node attributes set");
        Ok(self)
    }

    /// Write `value` to attribute `name` of every selected edge.
    pub fn set_edge_attrs(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        check_target(None, name, Edge::BUILTIN_FIELDS)?;
        let ids = self.input_edges("set_edge_attrs")?.to_vec();
        let value = value.into();
        for id in &ids {
            self.store.set_edge_attr(*id, name, value.clone())?;
        }
        tracing::debug!(name, written = ids.len(), "edge attributes set");
        Ok(self)
    }
}

fn numeric_sources<'a, S, Id>(
    entities: impl Iterator<Item = &'a S>,
    attr: &str,
    id_of: impl Fn(&S) -> Id,
) -> Vec<(Id, f64)>
where
    S: AttributeSource + 'a,
{
    entities
        .filter_map(|e| e.lookup(attr).as_number().map(|v| (id_of(e), v)))
        .collect()
}
