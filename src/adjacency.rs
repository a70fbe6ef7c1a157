//! Central plugged-node index
//!
//! The index is derived state, fully owned and overwritten by the engine on
//! every topology change. Adjacency is recorded symmetrically: a port's
//! plugged list holds the node on the other end of the edge regardless of
//! which side is source or target, so a node looks up its input neighbors by
//! port name uniformly.

use std::collections::HashMap;

use log::debug;

use crate::error::GraphError;
use crate::port::NodePort;
use crate::snapshot::EdgeRecord;

/// Per-node mapping from port name to the ordered list of neighbor node ids.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    rows: HashMap<String, HashMap<String, Vec<String>>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the whole index from the current edge set.
    ///
    /// Every node's row is reset to one empty list per port, then each edge
    /// appends its endpoints into the opposite rows. Precondition: every
    /// edge's endpoints exist in `node_ports`; the caller filters orphan
    /// edges beforehand, otherwise resolution fails with a lookup error.
    pub fn rebuild<'a, I>(&mut self, node_ports: I, edges: &[EdgeRecord]) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (&'a str, &'a [NodePort])>,
    {
        self.rows.clear();
        for (node_id, ports) in node_ports {
            let row = ports
                .iter()
                .map(|port| (port.name.clone(), Vec::new()))
                .collect();
            self.rows.insert(node_id.to_string(), row);
        }

        for edge in edges {
            Self::append(
                &mut self.rows,
                &edge.source,
                &edge.source_handle,
                edge.target.clone(),
            )?;
            Self::append(
                &mut self.rows,
                &edge.target,
                &edge.target_handle,
                edge.source.clone(),
            )?;
        }

        debug!(
            "adjacency rebuilt: {} nodes, {} edges",
            self.rows.len(),
            edges.len()
        );
        Ok(())
    }

    fn append(
        rows: &mut HashMap<String, HashMap<String, Vec<String>>>,
        node: &str,
        port: &str,
        neighbor: String,
    ) -> Result<(), GraphError> {
        rows.get_mut(node)
            .and_then(|row| row.get_mut(port))
            .ok_or_else(|| GraphError::LookupFailure {
                node: node.to_string(),
                port: port.to_string(),
            })?
            .push(neighbor);
        Ok(())
    }

    /// Neighbor ids plugged into the named port, in edge order. Empty for
    /// unknown nodes and ports.
    pub fn plugged(&self, node: &str, port: &str) -> &[String] {
        self.rows
            .get(node)
            .and_then(|row| row.get(port))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Neighbor ids reachable through the node's output ports, in port then
    /// edge order. This is the set an update cascade fans out to.
    pub fn downstream(&self, node: &str, ports: &[NodePort]) -> Vec<String> {
        ports
            .iter()
            .filter(|port| port.is_output())
            .flat_map(|port| self.plugged(node, &port.name).iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortDirection, PortPlacement};
    use crate::snapshot::Edge;

    fn ports_in_out() -> Vec<NodePort> {
        vec![
            NodePort::new(PortDirection::Input, PortPlacement::Left, "in"),
            NodePort::new(PortDirection::Output, PortPlacement::Right, "out"),
        ]
    }

    fn record(source: &str, target: &str) -> EdgeRecord {
        EdgeRecord::new(&Edge::new(source, "out", target, "in"))
    }

    #[test]
    fn test_rebuild_records_both_directions() {
        let ports = ports_in_out();
        let nodes = [("a", ports.as_slice()), ("b", ports.as_slice())];
        let edges = vec![record("a", "b")];

        let mut index = AdjacencyIndex::new();
        index.rebuild(nodes, &edges).unwrap();

        assert_eq!(index.plugged("a", "out"), ["b".to_string()]);
        assert_eq!(index.plugged("b", "in"), ["a".to_string()]);
        assert!(index.plugged("a", "in").is_empty());
        assert!(index.plugged("b", "out").is_empty());
    }

    #[test]
    fn test_rebuild_resets_previous_rows() {
        let ports = ports_in_out();
        let nodes = [("a", ports.as_slice()), ("b", ports.as_slice())];
        let mut index = AdjacencyIndex::new();

        index.rebuild(nodes, &[record("a", "b")]).unwrap();
        index
            .rebuild([("a", ports.as_slice()), ("b", ports.as_slice())], &[])
            .unwrap();

        assert!(index.plugged("a", "out").is_empty());
        assert!(index.plugged("b", "in").is_empty());
    }

    #[test]
    fn test_unfiltered_orphan_edge_fails_lookup() {
        let ports = ports_in_out();
        let nodes = [("a", ports.as_slice())];
        let mut index = AdjacencyIndex::new();

        let err = index.rebuild(nodes, &[record("a", "gone")]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::LookupFailure { node, .. } if node == "gone"
        ));
    }

    #[test]
    fn test_downstream_follows_output_ports_only() {
        let ports = ports_in_out();
        let nodes = [
            ("a", ports.as_slice()),
            ("b", ports.as_slice()),
            ("c", ports.as_slice()),
        ];
        let edges = vec![record("a", "b"), record("c", "a")];

        let mut index = AdjacencyIndex::new();
        index.rebuild(nodes, &edges).unwrap();

        // "c" feeds into "a", but only "b" sits on a's output side.
        assert_eq!(index.downstream("a", &ports), ["b".to_string()]);
        assert!(index.downstream("b", &ports).is_empty());
    }
}
