//! Port types describing the connection points of a node

use serde::{Deserialize, Serialize};

use crate::error::PortConfigError;

/// Whether the port is an input or an output. Update cascades flow through
/// output ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Placement of the port around the node body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortPlacement {
    Top,
    Bottom,
    Left,
    Right,
}

/// Restriction of what can be plugged into a port. Two ports connect only if
/// both are unrestricted or both carry a restriction with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRestriction {
    /// Name of the restriction type.
    pub name: String,
    /// HTML color code used to tint edges carrying this restriction.
    pub color: String,
}

impl PortRestriction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: "#000".to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Immutable descriptor of a single connection point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePort {
    pub direction: PortDirection,
    pub placement: PortPlacement,
    /// Port name, unique within a node.
    pub name: String,
    /// Display the port name on the node body. Only valid for left/right
    /// placements with an explicit offset.
    pub display_name: bool,
    /// Distance from the top/left of the node edge. Centered when absent.
    pub offset: Option<f64>,
    /// Maximum number of edges that may touch this port.
    pub connection_limit: Option<usize>,
    pub restriction: Option<PortRestriction>,
}

impl NodePort {
    /// Creates a port with no offset, no connection limit and no restriction.
    pub fn new(
        direction: PortDirection,
        placement: PortPlacement,
        name: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            placement,
            name: name.into(),
            display_name: false,
            offset: None,
            connection_limit: None,
            restriction: None,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_connection_limit(mut self, limit: usize) -> Self {
        self.connection_limit = Some(limit);
        self
    }

    pub fn with_restriction(mut self, restriction: PortRestriction) -> Self {
        self.restriction = Some(restriction);
        self
    }

    /// Requests the port name to be drawn on the node body. Fails unless the
    /// port sits left or right and an offset was provided first.
    pub fn with_display_name(mut self) -> Result<Self, PortConfigError> {
        if !matches!(self.placement, PortPlacement::Left | PortPlacement::Right) {
            return Err(PortConfigError::DisplayNamePlacement(self.name));
        }
        if self.offset.is_none() {
            return Err(PortConfigError::DisplayNameOffset(self.name));
        }
        self.display_name = true;
        Ok(self)
    }

    pub fn is_input(&self) -> bool {
        matches!(self.direction, PortDirection::Input)
    }

    pub fn is_output(&self) -> bool {
        matches!(self.direction, PortDirection::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_requires_offset() {
        let err = NodePort::new(PortDirection::Input, PortPlacement::Left, "in")
            .with_display_name()
            .unwrap_err();
        assert_eq!(err, PortConfigError::DisplayNameOffset("in".to_string()));
    }

    #[test]
    fn test_display_name_requires_side_placement() {
        let err = NodePort::new(PortDirection::Input, PortPlacement::Top, "in")
            .with_offset(10.0)
            .with_display_name()
            .unwrap_err();
        assert_eq!(err, PortConfigError::DisplayNamePlacement("in".to_string()));
    }

    #[test]
    fn test_display_name_accepted_on_side_with_offset() {
        let port = NodePort::new(PortDirection::Output, PortPlacement::Right, "out")
            .with_offset(25.0)
            .with_display_name()
            .unwrap();
        assert!(port.display_name);
        assert_eq!(port.offset, Some(25.0));
        assert!(port.is_output());
    }
}
