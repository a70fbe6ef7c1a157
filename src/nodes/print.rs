//! JSON display sink

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::error::NodeError;
use crate::node::{FlowNode, NodeValue, PortInputs, RenderHandle};
use crate::port::{NodePort, PortDirection, PortPlacement};

/// Shared view of the values a [`PrintNode`] last displayed, keyed by the
/// plugged node's id.
pub type DisplayHandle = Rc<RefCell<NodeValue>>;

/// Sink node rendering the value snapshot of every plugged input in a JSON
/// pane. Produces nothing itself.
pub struct PrintNode {
    display: DisplayHandle,
}

impl PrintNode {
    /// Builds the node together with a handle mirroring its display state.
    pub fn new() -> (Self, DisplayHandle) {
        let display: DisplayHandle = Rc::new(RefCell::new(NodeValue::new()));
        (
            Self {
                display: display.clone(),
            },
            display,
        )
    }
}

impl FlowNode for PrintNode {
    fn class_label(&self) -> &str {
        "Print Input"
    }

    fn ports(&self) -> Vec<NodePort> {
        vec![NodePort::new(
            PortDirection::Input,
            PortPlacement::Left,
            "Input",
        )]
    }

    fn create(&mut self) -> Result<RenderHandle, NodeError> {
        Ok(RenderHandle::widget("JsonPane").with_props(json!({ "depth": -1 })))
    }

    fn update(&mut self, inputs: &PortInputs) -> Result<(), NodeError> {
        let mut display = self.display.borrow_mut();
        display.clear();
        for plugged in inputs.plugged("Input") {
            display.insert(
                plugged.node_id.clone(),
                serde_json::Value::Object(plugged.value.clone()),
            );
        }
        Ok(())
    }

    fn value(&self) -> Result<NodeValue, NodeError> {
        Ok(NodeValue::new())
    }
}
