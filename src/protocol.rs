//! Wire payloads exchanged with the canvas layer
//!
//! The transport carrying these messages is an external collaborator; the
//! engine only produces and consumes the JSON shapes below, tagged by an
//! `action` field.

use serde::{Deserialize, Serialize};

use crate::snapshot::Edge;

/// Structured request sent by the canvas layer to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    /// A node was dragged out of the palette onto the canvas.
    #[serde(rename = "NEW_NODE")]
    NewNode {
        node_id: String,
        /// Class label of a registered node class.
        #[serde(rename = "type")]
        node_type: String,
        x: f64,
        y: f64,
    },
}

/// Engine-initiated notification to the canvas layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    NodeCreation {
        node_name: String,
        x: f64,
        y: f64,
        node_class_name: String,
    },
    NodesRemoval {
        nodes_names: Vec<String>,
    },
    EdgesCreation {
        edges: Vec<EdgeCreationPayload>,
    },
    EdgesRemoval {
        edges: Vec<Edge>,
    },
}

/// One edge in an `EdgesCreation` notice, carrying the wire id the canvas
/// will echo back in subsequent snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCreationPayload {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

impl EdgeCreationPayload {
    pub fn new(edge: &Edge) -> Self {
        Self {
            id: edge.wire_id(),
            source: edge.source.clone(),
            source_handle: edge.source_handle.clone(),
            target: edge.target.clone(),
            target_handle: edge.target_handle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_node_request_shape() {
        let json = json!({
            "action": "NEW_NODE",
            "node_id": "node_3",
            "type": "Float Input",
            "x": 120.0,
            "y": 40.0
        });
        let msg: InboundMessage = serde_json::from_value(json).unwrap();
        assert_eq!(
            msg,
            InboundMessage::NewNode {
                node_id: "node_3".to_string(),
                node_type: "Float Input".to_string(),
                x: 120.0,
                y: 40.0,
            }
        );
    }

    #[test]
    fn test_node_creation_notice_shape() {
        let msg = OutboundMessage::NodeCreation {
            node_name: "n1".to_string(),
            x: 0.0,
            y: 0.0,
            node_class_name: "Float Input".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["action"], "NodeCreation");
        assert_eq!(json["node_name"], "n1");
        assert_eq!(json["node_class_name"], "Float Input");
    }

    #[test]
    fn test_edges_creation_notice_carries_wire_ids() {
        let edge = Edge::new("a", "out", "b", "in");
        let msg = OutboundMessage::EdgesCreation {
            edges: vec![EdgeCreationPayload::new(&edge)],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["action"], "EdgesCreation");
        assert_eq!(json["edges"][0]["id"], "a:out:b:in");
        assert_eq!(json["edges"][0]["sourceHandle"], "out");
    }

    #[test]
    fn test_edges_removal_notice_shape() {
        let msg = OutboundMessage::EdgesRemoval {
            edges: vec![Edge::new("a", "out", "b", "in")],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["action"], "EdgesRemoval");
        assert_eq!(json["edges"][0]["targetHandle"], "in");
        assert!(json["edges"][0].get("id").is_none());
    }
}
