//! Graph engine: authoritative state, validation and update dispatch
//!
//! The engine owns the node/edge collections, the previous-snapshot cache,
//! the node-instance registry and the event-callback registry. Structural
//! edits are validated before they take effect; the canvas layer echoes them
//! back as a new snapshot, which [`GraphEngine::sync`] diffs against the
//! cached baseline to drive lifecycle hooks, update cascades and callbacks.
//!
//! Everything is single-threaded and synchronous: one snapshot notification
//! runs to completion before the next is accepted, and callbacks must not
//! re-enter the engine.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, info, warn};

use crate::adjacency::AdjacencyIndex;
use crate::change::{diff_edges, diff_nodes, ChangeKind, EdgeChange, GraphChange, NodeChange};
use crate::error::GraphError;
use crate::node::{FlowNode, PluggedValue, PortInputs, RenderHandle};
use crate::port::NodePort;
use crate::protocol::{EdgeCreationPayload, InboundMessage, OutboundMessage};
use crate::registry::NodeRegistry;
use crate::snapshot::{Edge, EdgeRecord, NodeRecord};

type ChangeCallback = Box<dyn FnMut(&GraphChange)>;
type EdgeCallback = Box<dyn FnMut(&Edge)>;

/// Graph synchronization and dataflow-propagation engine.
///
/// One instance per graph; all registries live in the engine's own state.
/// The node lists are kept in insertion order, parallel to each other, so a
/// node's index is stable until it is removed.
#[derive(Default)]
pub struct GraphEngine {
    registry: NodeRegistry,
    /// Node ids, in insertion order.
    item_names: Vec<String>,
    /// Render handles, parallel to `item_names`.
    items: Vec<RenderHandle>,
    /// Port metadata snapshotted at add time, parallel to `item_names`.
    item_ports: Vec<Vec<NodePort>>,
    /// Node instances, parallel to `item_names`.
    instances: Vec<Box<dyn FlowNode>>,
    /// Previous snapshot, the diff baseline. Replaced wholesale after each
    /// successful sync cycle.
    old_nodes: Vec<NodeRecord>,
    old_edges: Vec<EdgeRecord>,
    adjacency: AdjacencyIndex,
    callbacks: HashMap<ChangeKind, Vec<ChangeCallback>>,
    edge_selection: Option<EdgeCallback>,
    edge_deselection: Option<EdgeCallback>,
    outbox: Vec<OutboundMessage>,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node class under its palette label.
    pub fn register_class<F>(&mut self, label: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn FlowNode> + 'static,
    {
        self.registry.register(label, factory);
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Adds a node to the graph: builds its visual body, snapshots its port
    /// metadata and notifies the canvas layer. No adjacency rebuild happens
    /// here since no edge can reference the node yet.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        mut node: Box<dyn FlowNode>,
        x: f64,
        y: f64,
    ) -> Result<(), GraphError> {
        let id = id.into();
        if self.index_of(&id).is_some() {
            return Err(GraphError::DuplicateId(id));
        }

        let handle = node.create()?;
        let ports = node.ports();
        let class_name = node.class_label().to_string();

        self.item_names.push(id.clone());
        self.items.push(handle);
        self.item_ports.push(ports);
        self.instances.push(node);

        info!("node `{id}` added (class `{class_name}`)");
        self.outbox.push(OutboundMessage::NodeCreation {
            node_name: id,
            x,
            y,
            node_class_name: class_name,
        });
        Ok(())
    }

    /// Removes the given nodes: drops their render handles, port metadata and
    /// instances, and notifies the canvas layer. Edges touching the removed
    /// nodes are filtered out on the next sync cycle.
    pub fn remove_nodes(&mut self, ids: &[&str]) -> Result<(), GraphError> {
        for id in ids {
            if self.index_of(id).is_none() {
                return Err(GraphError::UnknownNode(id.to_string()));
            }
        }

        self.outbox.push(OutboundMessage::NodesRemoval {
            nodes_names: ids.iter().map(|id| id.to_string()).collect(),
        });

        for id in ids {
            if let Some(index) = self.index_of(id) {
                self.item_names.remove(index);
                self.items.remove(index);
                self.item_ports.remove(index);
                self.instances.remove(index);
            }
        }
        info!("removed {} node(s)", ids.len());
        Ok(())
    }

    /// Validates and announces new edges. The adjacency map is not touched
    /// here; it is rebuilt once the canvas echoes the edges back into the
    /// authoritative snapshot.
    pub fn add_edges(&mut self, edges: &[Edge]) -> Result<(), GraphError> {
        // Connection counts over the authoritative edge set plus the batch.
        let mut counts: HashMap<(String, String), usize> = HashMap::new();
        for record in &self.old_edges {
            *counts
                .entry((record.source.clone(), record.source_handle.clone()))
                .or_default() += 1;
            *counts
                .entry((record.target.clone(), record.target_handle.clone()))
                .or_default() += 1;
        }

        for edge in edges {
            let source_index = self
                .index_of(&edge.source)
                .ok_or_else(|| GraphError::UnknownNode(edge.source.clone()))?;
            let target_index = self
                .index_of(&edge.target)
                .ok_or_else(|| GraphError::UnknownNode(edge.target.clone()))?;

            let source_port = self
                .port_of(source_index, &edge.source_handle)
                .ok_or_else(|| GraphError::UnknownPort {
                    node: edge.source.clone(),
                    port: edge.source_handle.clone(),
                })?;
            let target_port = self
                .port_of(target_index, &edge.target_handle)
                .ok_or_else(|| GraphError::UnknownPort {
                    node: edge.target.clone(),
                    port: edge.target_handle.clone(),
                })?;

            // Restrictions must match by name or both be absent.
            match (&source_port.restriction, &target_port.restriction) {
                (None, None) => {}
                (Some(source_tag), Some(target_tag)) if source_tag.name == target_tag.name => {}
                (source_tag, target_tag) => {
                    return Err(GraphError::TagMismatch {
                        source_node: edge.source.clone(),
                        source_handle: edge.source_handle.clone(),
                        source_restriction: source_tag.as_ref().map(|tag| tag.name.clone()),
                        target: edge.target.clone(),
                        target_handle: edge.target_handle.clone(),
                        target_restriction: target_tag.as_ref().map(|tag| tag.name.clone()),
                    });
                }
            }

            for (node, port_name, limit) in [
                (&edge.source, &edge.source_handle, source_port.connection_limit),
                (&edge.target, &edge.target_handle, target_port.connection_limit),
            ] {
                let count = counts
                    .entry((node.clone(), port_name.clone()))
                    .or_default();
                *count += 1;
                if let Some(limit) = limit {
                    if *count > limit {
                        return Err(GraphError::ConnectionLimit {
                            node: node.clone(),
                            port: port_name.clone(),
                            limit,
                        });
                    }
                }
            }
        }

        info!("announcing {} edge(s)", edges.len());
        self.outbox.push(OutboundMessage::EdgesCreation {
            edges: edges.iter().map(EdgeCreationPayload::new).collect(),
        });
        Ok(())
    }

    /// Validates and announces edge removals, compared by 4-tuple equality.
    pub fn remove_edges(&mut self, edges: &[Edge]) -> Result<(), GraphError> {
        let current = self.edges();
        for edge in edges {
            if !current.contains(edge) {
                return Err(GraphError::UnknownEdge(edge.clone()));
            }
        }

        info!("announcing removal of {} edge(s)", edges.len());
        self.outbox.push(OutboundMessage::EdgesRemoval {
            edges: edges.to_vec(),
        });
        Ok(())
    }

    /// Clears the graph: all edges first, then all nodes, so edge removal
    /// never races against already-missing endpoints.
    pub fn clear(&mut self) -> Result<(), GraphError> {
        let edges = self.edges();
        self.remove_edges(&edges)?;

        let ids = self.item_names.clone();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.remove_nodes(&refs)
    }

    /// Handles a structured request from the canvas layer.
    pub fn handle_message(&mut self, message: InboundMessage) -> Result<(), GraphError> {
        match message {
            InboundMessage::NewNode {
                node_id,
                node_type,
                x,
                y,
            } => match self.registry.instantiate(&node_type) {
                Some(node) => {
                    info!("creating node of type `{node_type}`");
                    self.add_node(node_id, node, x, y)
                }
                None => {
                    warn!("ignoring NEW_NODE request for unregistered class `{node_type}`");
                    Ok(())
                }
            },
        }
    }

    /// Reconciles a snapshot reported by the canvas layer against the cached
    /// baseline. Fired on every drag, click, connect and disconnect.
    ///
    /// On a failed node update the remaining dispatch for the cycle is
    /// aborted and the cached snapshot is **not** advanced, so the next
    /// notification re-diffs against the old baseline.
    pub fn sync(
        &mut self,
        new_nodes: Vec<NodeRecord>,
        mut new_edges: Vec<EdgeRecord>,
    ) -> Result<(), GraphError> {
        let node_changes = diff_nodes(&self.old_nodes, &new_nodes);
        let edge_changes = diff_edges(&self.old_edges, &new_edges);

        let topology_changed = node_changes.iter().any(|change| {
            matches!(change, NodeChange::Created { .. } | NodeChange::Deleted { .. })
        }) || edge_changes.iter().any(|change| {
            matches!(change, EdgeChange::Created(_) | EdgeChange::Deleted(_))
        });

        if topology_changed {
            // A node deletion cascades implicit edge deletions; drop dangling
            // edges before the rebuild so resolution cannot fail.
            let known: HashSet<&str> = self.item_names.iter().map(String::as_str).collect();
            let before = new_edges.len();
            new_edges.retain(|record| {
                known.contains(record.source.as_str()) && known.contains(record.target.as_str())
            });
            if new_edges.len() < before {
                debug!("filtered {} orphan edge(s)", before - new_edges.len());
            }
            self.rebuild_adjacency(&new_edges)?;
        }

        for change in &node_changes {
            match change {
                NodeChange::Created { id } => self.run_cascade(id)?,
                NodeChange::Moved {
                    id,
                    new_x,
                    new_y,
                    old_x,
                    old_y,
                } => {
                    let index = self
                        .index_of(id)
                        .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
                    self.instances[index].on_move(*new_x, *new_y, *old_x, *old_y);
                }
                NodeChange::Selected { id } => {
                    let index = self
                        .index_of(id)
                        .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
                    self.instances[index].on_selected();
                }
                NodeChange::Deselected { id } => {
                    let index = self
                        .index_of(id)
                        .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
                    self.instances[index].on_deselected();
                }
                NodeChange::Deleted { .. } => {}
            }
        }

        for change in &edge_changes {
            match change {
                EdgeChange::Created(edge) => self.run_cascade(&edge.target)?,
                EdgeChange::Deleted(edge) => {
                    // The target may be mid-removal; only still-present nodes
                    // get their inputs recomputed.
                    if self.index_of(&edge.target).is_some() {
                        self.run_cascade(&edge.target)?;
                    }
                }
                EdgeChange::Selected(edge) => {
                    if let Some(callback) = &mut self.edge_selection {
                        callback(edge);
                    }
                }
                EdgeChange::Deselected(edge) => {
                    if let Some(callback) = &mut self.edge_deselection {
                        callback(edge);
                    }
                }
            }
        }

        for change in node_changes {
            self.dispatch(&GraphChange::Node(change));
        }
        for change in edge_changes {
            self.dispatch(&GraphChange::Edge(change));
        }

        self.old_nodes = new_nodes;
        self.old_edges = new_edges;
        Ok(())
    }

    /// Runs an update cascade starting at the given node, e.g. after its
    /// data source fired. Traversal is breadth-first through output-port
    /// neighbors with a per-cascade visited set, so a cyclic topology
    /// updates each node at most once per cascade.
    pub fn update_node(&mut self, id: &str) -> Result<(), GraphError> {
        self.run_cascade(id)
    }

    /// Registers a callback for one exact change variant.
    pub fn on_event<F>(&mut self, kind: ChangeKind, callback: F)
    where
        F: FnMut(&GraphChange) + 'static,
    {
        self.callbacks.entry(kind).or_default().push(Box::new(callback));
    }

    /// Sets the callback invoked when an edge is selected on the canvas.
    pub fn set_on_edge_selection<F>(&mut self, callback: F)
    where
        F: FnMut(&Edge) + 'static,
    {
        self.edge_selection = Some(Box::new(callback));
    }

    /// Sets the callback invoked when an edge is deselected on the canvas.
    pub fn set_on_edge_deselection<F>(&mut self, callback: F)
    where
        F: FnMut(&Edge) + 'static,
    {
        self.edge_deselection = Some(Box::new(callback));
    }

    /// Drains the pending notifications for the transport binding.
    pub fn drain_outbound(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.item_names
    }

    pub fn node(&self, id: &str) -> Option<&dyn FlowNode> {
        self.index_of(id).map(|index| self.instances[index].as_ref())
    }

    /// Render handles, parallel to [`GraphEngine::node_ids`].
    pub fn render_handles(&self) -> &[RenderHandle] {
        &self.items
    }

    /// Port metadata snapshotted when the node was added.
    pub fn ports_of(&self, id: &str) -> Option<&[NodePort]> {
        self.index_of(id).map(|index| self.item_ports[index].as_slice())
    }

    /// The authoritative edge set, as last echoed by the canvas layer.
    pub fn edges(&self) -> Vec<Edge> {
        self.old_edges.iter().map(EdgeRecord::edge).collect()
    }

    /// Read view of the plugged-node index for a port.
    pub fn plugged(&self, node: &str, port: &str) -> &[String] {
        self.adjacency.plugged(node, port)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.item_names.iter().position(|name| name == id)
    }

    fn port_of(&self, node_index: usize, name: &str) -> Option<&NodePort> {
        self.item_ports[node_index]
            .iter()
            .find(|port| port.name == name)
    }

    fn rebuild_adjacency(&mut self, edges: &[EdgeRecord]) -> Result<(), GraphError> {
        let rows = self
            .item_names
            .iter()
            .map(String::as_str)
            .zip(self.item_ports.iter().map(Vec::as_slice));
        self.adjacency.rebuild(rows, edges)
    }

    fn run_cascade(&mut self, start: &str) -> Result<(), GraphError> {
        let mut queue = VecDeque::new();
        queue.push_back(start.to_string());
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let index = self
                .index_of(&id)
                .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;

            let inputs = self.collect_inputs(index)?;
            self.instances[index].update(&inputs)?;

            for neighbor in self.adjacency.downstream(&id, &self.item_ports[index]) {
                if !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        Ok(())
    }

    /// Clones the value snapshots of every input-port neighbor, so the node
    /// never holds live references into the graph.
    fn collect_inputs(&self, index: usize) -> Result<PortInputs, GraphError> {
        let id = &self.item_names[index];
        let mut inputs = PortInputs::default();

        for port in &self.item_ports[index] {
            if !port.is_input() {
                continue;
            }
            let mut values = Vec::new();
            for neighbor in self.adjacency.plugged(id, &port.name) {
                let neighbor_index = self
                    .index_of(neighbor)
                    .ok_or_else(|| GraphError::UnknownNode(neighbor.clone()))?;
                values.push(PluggedValue {
                    node_id: neighbor.clone(),
                    value: self.instances[neighbor_index].value()?,
                });
            }
            inputs.insert(port.name.clone(), values);
        }
        Ok(inputs)
    }

    fn dispatch(&mut self, change: &GraphChange) {
        if let Some(callbacks) = self.callbacks.get_mut(&change.kind()) {
            for callback in callbacks {
                callback(change);
            }
        }
    }
}

impl std::fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEngine")
            .field("nodes", &self.item_names)
            .field("edges", &self.old_edges.len())
            .finish()
    }
}
