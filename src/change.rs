//! Change detection between two consecutive graph snapshots
//!
//! The diff functions are pure: given the same pair of snapshots they always
//! produce the same event list. Creations are emitted in new-snapshot order;
//! moves, selection changes and deletions in old-snapshot order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::{Edge, EdgeRecord, NodeRecord};

/// One discrete difference on the node side of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeChange {
    Created {
        id: String,
    },
    Deleted {
        id: String,
    },
    /// Both axes are always carried, even when only one changed.
    Moved {
        id: String,
        new_x: f64,
        new_y: f64,
        old_x: f64,
        old_y: f64,
    },
    Selected {
        id: String,
    },
    Deselected {
        id: String,
    },
}

impl NodeChange {
    /// Id of the node this change concerns.
    pub fn node_id(&self) -> &str {
        match self {
            NodeChange::Created { id }
            | NodeChange::Deleted { id }
            | NodeChange::Moved { id, .. }
            | NodeChange::Selected { id }
            | NodeChange::Deselected { id } => id,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            NodeChange::Created { .. } => ChangeKind::NodeCreated,
            NodeChange::Deleted { .. } => ChangeKind::NodeDeleted,
            NodeChange::Moved { .. } => ChangeKind::NodeMoved,
            NodeChange::Selected { .. } => ChangeKind::NodeSelected,
            NodeChange::Deselected { .. } => ChangeKind::NodeDeselected,
        }
    }
}

/// One discrete difference on the edge side of the graph. Edges have no move
/// concept; every variant carries the 4-tuple identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeChange {
    Created(Edge),
    Deleted(Edge),
    Selected(Edge),
    Deselected(Edge),
}

impl EdgeChange {
    pub fn edge(&self) -> &Edge {
        match self {
            EdgeChange::Created(edge)
            | EdgeChange::Deleted(edge)
            | EdgeChange::Selected(edge)
            | EdgeChange::Deselected(edge) => edge,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            EdgeChange::Created(_) => ChangeKind::EdgeCreated,
            EdgeChange::Deleted(_) => ChangeKind::EdgeDeleted,
            EdgeChange::Selected(_) => ChangeKind::EdgeSelected,
            EdgeChange::Deselected(_) => ChangeKind::EdgeDeselected,
        }
    }
}

/// Either side of a diff, as delivered to registered callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphChange {
    Node(NodeChange),
    Edge(EdgeChange),
}

impl GraphChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            GraphChange::Node(change) => change.kind(),
            GraphChange::Edge(change) => change.kind(),
        }
    }
}

/// Variant key used to register callbacks for one exact change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    NodeCreated,
    NodeDeleted,
    NodeMoved,
    NodeSelected,
    NodeDeselected,
    EdgeCreated,
    EdgeDeleted,
    EdgeSelected,
    EdgeDeselected,
}

/// Diffs two node snapshots, keyed by node id.
///
/// A node present only in the new snapshot yields exactly one `Created`
/// event; selection and position comparison only run over ids present in
/// both snapshots. A node may emit both a move and a selection event in the
/// same cycle.
pub fn diff_nodes(old: &[NodeRecord], new: &[NodeRecord]) -> Vec<NodeChange> {
    let old_by_id: HashMap<&str, &NodeRecord> =
        old.iter().map(|record| (record.id.as_str(), record)).collect();
    let new_by_id: HashMap<&str, &NodeRecord> =
        new.iter().map(|record| (record.id.as_str(), record)).collect();

    let mut changes = Vec::new();

    for record in new {
        if !old_by_id.contains_key(record.id.as_str()) {
            changes.push(NodeChange::Created {
                id: record.id.clone(),
            });
        }
    }

    for old_record in old {
        match new_by_id.get(old_record.id.as_str()) {
            Some(new_record) => {
                if old_record.position != new_record.position {
                    changes.push(NodeChange::Moved {
                        id: old_record.id.clone(),
                        new_x: new_record.position.x,
                        new_y: new_record.position.y,
                        old_x: old_record.position.x,
                        old_y: old_record.position.y,
                    });
                }
                if new_record.newly_selected(old_record) {
                    changes.push(NodeChange::Selected {
                        id: old_record.id.clone(),
                    });
                } else if new_record.newly_deselected(old_record) {
                    changes.push(NodeChange::Deselected {
                        id: old_record.id.clone(),
                    });
                }
            }
            None => changes.push(NodeChange::Deleted {
                id: old_record.id.clone(),
            }),
        }
    }

    changes
}

/// Diffs two edge snapshots, keyed by the record id the canvas assigned.
pub fn diff_edges(old: &[EdgeRecord], new: &[EdgeRecord]) -> Vec<EdgeChange> {
    let old_by_id: HashMap<&str, &EdgeRecord> =
        old.iter().map(|record| (record.id.as_str(), record)).collect();
    let new_by_id: HashMap<&str, &EdgeRecord> =
        new.iter().map(|record| (record.id.as_str(), record)).collect();

    let mut changes = Vec::new();

    for record in new {
        if !old_by_id.contains_key(record.id.as_str()) {
            changes.push(EdgeChange::Created(record.edge()));
        }
    }

    for old_record in old {
        match new_by_id.get(old_record.id.as_str()) {
            Some(new_record) => {
                if new_record.newly_selected(old_record) {
                    changes.push(EdgeChange::Selected(old_record.edge()));
                } else if new_record.newly_deselected(old_record) {
                    changes.push(EdgeChange::Deselected(old_record.edge()));
                }
            }
            None => changes.push(EdgeChange::Deleted(old_record.edge())),
        }
    }

    changes
}
