//! Float value source

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use crate::error::NodeError;
use crate::node::{FlowNode, NodeValue, PortInputs, RenderHandle};
use crate::port::{NodePort, PortDirection, PortPlacement};

/// Source node holding a single float, exposed under the `value` key.
///
/// The host keeps the shared handle returned by [`FloatSourceNode::shared`],
/// writes new values into it when its widget fires, and triggers the cascade
/// with `GraphEngine::update_node`.
pub struct FloatSourceNode {
    value: Rc<Cell<f64>>,
}

impl FloatSourceNode {
    pub fn new(value: f64) -> Self {
        Self {
            value: Rc::new(Cell::new(value)),
        }
    }

    /// Builds the node together with a handle the host can write through.
    pub fn shared(value: f64) -> (Self, Rc<Cell<f64>>) {
        let node = Self::new(value);
        let handle = node.value.clone();
        (node, handle)
    }
}

impl FlowNode for FloatSourceNode {
    fn class_label(&self) -> &str {
        "Float Input"
    }

    fn ports(&self) -> Vec<NodePort> {
        vec![NodePort::new(
            PortDirection::Output,
            PortPlacement::Right,
            "Output",
        )]
    }

    fn create(&mut self) -> Result<RenderHandle, NodeError> {
        Ok(RenderHandle::widget("FloatInput").with_props(json!({ "width": 100 })))
    }

    // Sources have no inputs to recompute from.
    fn update(&mut self, _inputs: &PortInputs) -> Result<(), NodeError> {
        Ok(())
    }

    fn value(&self) -> Result<NodeValue, NodeError> {
        let mut value = NodeValue::new();
        value.insert("value".to_string(), json!(self.value.get()));
        Ok(value)
    }
}
