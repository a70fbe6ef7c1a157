//! Snapshot records mirroring the graph state reported by the canvas layer

use std::fmt;

use serde::{Deserialize, Serialize};

/// A directed connection between a port of one node and a port of another.
///
/// Edges are value objects: identity and equality are the 4-tuple, nothing
/// else. Both endpoints must name existing nodes and existing ports on them;
/// the engine validates this before an edge takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Node id from which the edge starts.
    pub source: String,
    /// Plugged port name on the source node.
    pub source_handle: String,
    /// Node id at which the edge ends.
    pub target: String,
    /// Plugged port name on the target node.
    pub target_handle: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }

    /// Wire id understood by the canvas layer.
    pub fn wire_id(&self) -> String {
        [
            self.source.as_str(),
            self.source_handle.as_str(),
            self.target.as_str(),
            self.target_handle.as_str(),
        ]
        .join(":")
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_handle, self.target, self.target_handle
        )
    }
}

/// Position of a node on the canvas, owned by the rendering layer and
/// mirrored into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One node as reported by the canvas layer. Rendering-only fields beyond
/// these are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Position::new(x, y),
            selected: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    fn is_selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    /// True when the selection flag flipped to set between `old` and `self`.
    pub(crate) fn newly_selected(&self, old: &NodeRecord) -> bool {
        self.is_selected() && !old.is_selected()
    }

    /// True when the selection flag flipped to cleared between `old` and
    /// `self`. An absent flag counts as cleared.
    pub(crate) fn newly_deselected(&self, old: &NodeRecord) -> bool {
        !self.is_selected() && old.is_selected()
    }
}

/// One edge as reported by the canvas layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl EdgeRecord {
    pub fn new(edge: &Edge) -> Self {
        Self {
            id: edge.wire_id(),
            source: edge.source.clone(),
            source_handle: edge.source_handle.clone(),
            target: edge.target.clone(),
            target_handle: edge.target_handle.clone(),
            selected: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    /// The 4-tuple identity of this record.
    pub fn edge(&self) -> Edge {
        Edge::new(
            self.source.clone(),
            self.source_handle.clone(),
            self.target.clone(),
            self.target_handle.clone(),
        )
    }

    fn is_selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    pub(crate) fn newly_selected(&self, old: &EdgeRecord) -> bool {
        self.is_selected() && !old.is_selected()
    }

    pub(crate) fn newly_deselected(&self, old: &EdgeRecord) -> bool {
        !self.is_selected() && old.is_selected()
    }
}
