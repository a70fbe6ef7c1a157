//! Text value source

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::error::NodeError;
use crate::node::{FlowNode, NodeValue, PortInputs, RenderHandle};
use crate::port::{NodePort, PortDirection, PortPlacement};

/// Source node holding a string, exposed under the `value` key.
pub struct TextSourceNode {
    value: Rc<RefCell<String>>,
}

impl TextSourceNode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Rc::new(RefCell::new(value.into())),
        }
    }

    /// Builds the node together with a handle the host can write through.
    pub fn shared(value: impl Into<String>) -> (Self, Rc<RefCell<String>>) {
        let node = Self::new(value);
        let handle = node.value.clone();
        (node, handle)
    }
}

impl FlowNode for TextSourceNode {
    fn class_label(&self) -> &str {
        "Text Input"
    }

    fn ports(&self) -> Vec<NodePort> {
        vec![NodePort::new(
            PortDirection::Output,
            PortPlacement::Right,
            "Output",
        )]
    }

    fn create(&mut self) -> Result<RenderHandle, NodeError> {
        Ok(RenderHandle::widget("TextInput").with_props(json!({ "width": 100 })))
    }

    fn update(&mut self, _inputs: &PortInputs) -> Result<(), NodeError> {
        Ok(())
    }

    fn value(&self) -> Result<NodeValue, NodeError> {
        let mut value = NodeValue::new();
        value.insert("value".to_string(), json!(self.value.borrow().clone()));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_reflects_shared_handle() {
        let (node, handle) = TextSourceNode::shared("hello");
        assert_eq!(node.value().unwrap()["value"], "hello");

        *handle.borrow_mut() = "world".to_string();
        assert_eq!(node.value().unwrap()["value"], "world");
    }
}
