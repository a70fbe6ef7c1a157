//! Wireflow — graph synchronization and dataflow propagation engine
//!
//! Backs an interactive, browser-rendered node-and-edge workflow editor:
//! nodes wrap arbitrary UI widgets and communicate through typed ports. The
//! engine reconciles the canvas layer's mutable graph state against a cached
//! snapshot into semantic change events, maintains the plugged-node index
//! used to resolve each node's inputs, and propagates update cascades in
//! dependency order when data or topology changes.
//!
//! Rendering and transport are external collaborators; the engine speaks to
//! them only through the payloads in [`protocol`].
//!
//! Known hazard: the engine bounds cyclic topologies with a per-cascade
//! visited set, so a cycle updates each node once per cascade rather than
//! recursing unboundedly; node authors still must ensure their own `update`
//! logic terminates.

pub mod adjacency;
pub mod change;
pub mod engine;
pub mod error;
pub mod node;
pub mod nodes;
pub mod port;
pub mod protocol;
pub mod registry;
pub mod snapshot;

pub use adjacency::AdjacencyIndex;
pub use change::{diff_edges, diff_nodes, ChangeKind, EdgeChange, GraphChange, NodeChange};
pub use engine::GraphEngine;
pub use error::{GraphError, NodeError, PortConfigError};
pub use node::{FlowNode, NodeValue, PluggedValue, PortInputs, RenderHandle};
pub use port::{NodePort, PortDirection, PortPlacement, PortRestriction};
pub use protocol::{EdgeCreationPayload, InboundMessage, OutboundMessage};
pub use registry::NodeRegistry;
pub use snapshot::{Edge, EdgeRecord, NodeRecord, Position};
