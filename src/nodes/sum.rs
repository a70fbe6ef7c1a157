//! Summing combinator

use serde_json::json;

use crate::error::NodeError;
use crate::node::{FlowNode, NodeValue, PortInputs, RenderHandle};
use crate::port::{NodePort, PortDirection, PortPlacement};

/// Sums the numeric `value` entries of every node plugged into its input
/// port and exposes the total under the `value` key. Non-numeric or missing
/// entries are skipped.
#[derive(Default)]
pub struct SumNode {
    total: f64,
}

impl SumNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

impl FlowNode for SumNode {
    fn class_label(&self) -> &str {
        "Sum"
    }

    fn ports(&self) -> Vec<NodePort> {
        vec![
            NodePort::new(PortDirection::Input, PortPlacement::Left, "Input"),
            NodePort::new(PortDirection::Output, PortPlacement::Right, "Output"),
        ]
    }

    fn create(&mut self) -> Result<RenderHandle, NodeError> {
        Ok(RenderHandle::widget("StaticText").with_props(json!({ "value": self.total })))
    }

    fn update(&mut self, inputs: &PortInputs) -> Result<(), NodeError> {
        self.total = inputs
            .plugged("Input")
            .iter()
            .filter_map(|plugged| plugged.value.get("value").and_then(|value| value.as_f64()))
            .sum();
        Ok(())
    }

    fn value(&self) -> Result<NodeValue, NodeError> {
        let mut value = NodeValue::new();
        value.insert("value".to_string(), json!(self.total));
        Ok(value)
    }
}
