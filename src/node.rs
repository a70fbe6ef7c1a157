//! The polymorphic contract implemented by every graph participant

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::port::NodePort;

/// Opaque value snapshot a node exposes to its downstream neighbors,
/// interpreted by key convention. Empty when the node produces nothing.
pub type NodeValue = serde_json::Map<String, serde_json::Value>;

/// Opaque description of a node's visual body, forwarded verbatim to the
/// canvas layer. The engine never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderHandle {
    /// Widget kind understood by the rendering toolkit.
    pub widget: String,
    /// Toolkit-specific construction properties.
    pub props: serde_json::Value,
}

impl RenderHandle {
    pub fn widget(widget: impl Into<String>) -> Self {
        Self {
            widget: widget.into(),
            props: serde_json::Value::Null,
        }
    }

    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = props;
        self
    }
}

/// Value snapshot of one neighbor plugged into a port.
#[derive(Debug, Clone, PartialEq)]
pub struct PluggedValue {
    /// Id of the node on the other end of the edge.
    pub node_id: String,
    /// That node's value snapshot at cascade time.
    pub value: NodeValue,
}

/// Read-only view of a node's inputs, collected by the engine from the
/// adjacency index before each `update` call. Nodes never see live neighbor
/// references.
#[derive(Debug, Clone, Default)]
pub struct PortInputs {
    ports: HashMap<String, Vec<PluggedValue>>,
}

impl PortInputs {
    pub(crate) fn insert(&mut self, port: impl Into<String>, values: Vec<PluggedValue>) {
        self.ports.insert(port.into(), values);
    }

    /// Neighbor snapshots plugged into the named input port, in edge order.
    /// Empty for unknown ports and for ports with nothing plugged.
    pub fn plugged(&self, port: &str) -> &[PluggedValue] {
        self.ports.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the input ports this view was collected for.
    pub fn port_names(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }
}

/// Contract implemented by every node variant.
///
/// `create`, `update` and `value` default to [`NodeError::NotImplemented`];
/// an unfinished node class surfaces immediately at the call site during
/// development. The lifecycle hooks default to no-ops.
pub trait FlowNode {
    /// Class label shown in the node-creation palette. Stable per class; the
    /// registry resolves creation requests against it.
    fn class_label(&self) -> &str;

    /// The node's connection points, fixed per class.
    fn ports(&self) -> Vec<NodePort>;

    /// Builds the node's visual body. Called exactly once per instance, when
    /// the node is added to the graph. Must not have observable side effects
    /// on other nodes.
    fn create(&mut self) -> Result<RenderHandle, NodeError> {
        Err(NodeError::not_implemented(self.class_label(), "create"))
    }

    /// Recomputes the node's own displayable state from its inputs. Invoked
    /// by the engine whenever the node's data source fires or an upstream
    /// port changes topology or value; the engine forwards the cascade to
    /// downstream neighbors afterwards.
    fn update(&mut self, inputs: &PortInputs) -> Result<(), NodeError> {
        let _ = inputs;
        Err(NodeError::not_implemented(self.class_label(), "update"))
    }

    /// The node's current value snapshot, read by downstream neighbors.
    fn value(&self) -> Result<NodeValue, NodeError> {
        Err(NodeError::not_implemented(self.class_label(), "value"))
    }

    /// Called when the node is dragged to a new canvas position.
    fn on_move(&mut self, new_x: f64, new_y: f64, old_x: f64, old_y: f64) {
        let _ = (new_x, new_y, old_x, old_y);
    }

    /// Called when the node is selected on the canvas.
    fn on_selected(&mut self) {}

    /// Called when the node is deselected on the canvas.
    fn on_deselected(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortDirection, PortPlacement};

    struct BareNode;

    impl FlowNode for BareNode {
        fn class_label(&self) -> &str {
            "Bare"
        }

        fn ports(&self) -> Vec<NodePort> {
            vec![NodePort::new(
                PortDirection::Output,
                PortPlacement::Right,
                "Output",
            )]
        }
    }

    #[test]
    fn test_unimplemented_contract_operations_fail() {
        let mut node = BareNode;
        assert_eq!(
            node.create().unwrap_err(),
            NodeError::not_implemented("Bare", "create")
        );
        assert_eq!(
            node.update(&PortInputs::default()).unwrap_err(),
            NodeError::not_implemented("Bare", "update")
        );
        assert_eq!(
            node.value().unwrap_err(),
            NodeError::not_implemented("Bare", "value")
        );
    }

    #[test]
    fn test_lifecycle_hooks_default_to_noops() {
        let mut node = BareNode;
        node.on_move(1.0, 2.0, 0.0, 0.0);
        node.on_selected();
        node.on_deselected();
    }

    #[test]
    fn test_port_inputs_unknown_port_is_empty() {
        let inputs = PortInputs::default();
        assert!(inputs.plugged("missing").is_empty());
    }
}
