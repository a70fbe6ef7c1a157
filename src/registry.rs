//! Node class registry
//!
//! Maps a stable class label to a factory producing fresh node instances.
//! Each engine owns its registry; there is no process-wide registration.

use std::collections::HashMap;

use crate::node::FlowNode;

type NodeFactory = Box<dyn Fn() -> Box<dyn FlowNode>>;

/// Open set of node classes instantiable by display label.
#[derive(Default)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
    labels: Vec<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a class label. Re-registering a label
    /// replaces the previous factory.
    pub fn register<F>(&mut self, label: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn FlowNode> + 'static,
    {
        let label = label.into();
        if self.factories.insert(label.clone(), Box::new(factory)).is_none() {
            self.labels.push(label);
        }
    }

    /// Builds a fresh instance of the named class, if registered.
    pub fn instantiate(&self, label: &str) -> Option<Box<dyn FlowNode>> {
        self.factories.get(label).map(|factory| factory())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.factories.contains_key(label)
    }

    /// Class labels in registration order, as shown in the palette.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("labels", &self.labels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::FloatSourceNode;

    #[test]
    fn test_register_and_instantiate() {
        let mut registry = NodeRegistry::new();
        registry.register("Float Input", || Box::new(FloatSourceNode::new(0.0)));

        assert!(registry.contains("Float Input"));
        let node = registry.instantiate("Float Input").unwrap();
        assert_eq!(node.class_label(), "Float Input");
        assert!(registry.instantiate("Unknown").is_none());
    }

    #[test]
    fn test_labels_keep_registration_order() {
        let mut registry = NodeRegistry::new();
        registry.register("Float Input", || Box::new(FloatSourceNode::new(0.0)));
        registry.register("Another", || Box::new(FloatSourceNode::new(1.0)));
        registry.register("Float Input", || Box::new(FloatSourceNode::new(2.0)));

        assert_eq!(registry.labels(), ["Float Input", "Another"]);
    }
}
