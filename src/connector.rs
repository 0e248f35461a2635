//! Linking imported DRG elements into the graph
//!
//! A requirement on an element points at the required element by
//! reference (`href: "#input-age"`). The connector looks the reference up
//! among the imported node entries and adds an edge from the required node
//! to the requiring node.
//!
//! When the document carries diagram interchange (DMNDI) data the edge is
//! only created if a DMNDI edge exists for the requirement, and the
//! connection magnets follow that edge's waypoints. Without DMNDI the
//! first node drawing the required element is used.

use crate::document::DmnEdge;
use crate::error::Result;
use crate::graph::{Bounds, ConnectorKind, Edge, Graph, InMemoryGraph, Point, ViewConnector};
use std::collections::HashMap;

/// A graph node drawing a given DRG element
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    pub element_id: String,
    pub node_id: String,
    pub bounds: Option<Bounds>,
}

/// Element id a requirement reference points at (`"#abc"` → `"abc"`)
pub fn reference_id(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

/// Connects requirement edges for one diagram
pub struct NodeConnector<'a> {
    diagram_id: &'a str,
    entries_by_id: &'a HashMap<String, Vec<NodeEntry>>,
    dmndi_edges: &'a [DmnEdge],
    dmndi_present: bool,
}

impl<'a> NodeConnector<'a> {
    pub fn new(diagram_id: &'a str, entries_by_id: &'a HashMap<String, Vec<NodeEntry>>) -> Self {
        Self {
            diagram_id,
            entries_by_id,
            dmndi_edges: &[],
            dmndi_present: false,
        }
    }

    /// Use DMNDI edges to place connectors
    pub fn with_dmndi(mut self, edges: &'a [DmnEdge]) -> Self {
        self.dmndi_edges = edges;
        self.dmndi_present = true;
        self
    }

    /// Connect the node `current_node` to the element referenced by `href`.
    ///
    /// `requirement_id` is the id of the requirement element itself, which
    /// DMNDI edges refer to. Returns whether an edge was added.
    pub fn connect_edge_to_nodes(
        &self,
        kind: ConnectorKind,
        requirement_id: &str,
        href: &str,
        current_node: &str,
        graph: &mut InMemoryGraph,
    ) -> Result<bool> {
        let required_id = reference_id(href);
        let entries = match self.entries_by_id.get(required_id) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                tracing::debug!(href, "requirement references no imported element");
                return Ok(false);
            }
        };

        if !self.dmndi_present {
            let required = &entries[0];
            let edge = self.new_edge(required, current_node, graph);
            self.connect_wb_edge(kind, current_node, required, &edge, &required.element_id, graph)?;
            return Ok(true);
        }

        let Some(dmn_edge) = self
            .dmndi_edges
            .iter()
            .find(|e| e.dmn_element_ref == requirement_id)
        else {
            tracing::debug!(requirement_id, "no DMNDI edge for requirement, skipping");
            return Ok(false);
        };

        match self.find_entry(dmn_edge, entries) {
            Some(required) => {
                self.connect_wb_edge(kind, current_node, required, dmn_edge, requirement_id, graph)?;
                Ok(true)
            }
            None => {
                tracing::debug!(
                    requirement_id,
                    edge = %dmn_edge.id,
                    "DMNDI edge does not start on any shape of the required element"
                );
                Ok(false)
            }
        }
    }

    /// Add the graph edge `required → current` with magnets from `dmn_edge`
    pub fn connect_wb_edge(
        &self,
        kind: ConnectorKind,
        current_node: &str,
        required: &NodeEntry,
        dmn_edge: &DmnEdge,
        id: &str,
        graph: &mut InMemoryGraph,
    ) -> Result<()> {
        let target_bounds = graph.node(current_node).and_then(|n| n.bounds);
        let edge = Edge {
            id: format!("{}#{}", self.diagram_id, id),
            kind,
            source: required.node_id.clone(),
            target: current_node.to_string(),
            connector: connection_magnets(required.bounds, target_bounds, dmn_edge),
        };
        graph.add_edge(edge)
    }

    /// The entry a DMNDI edge starts from: the only entry, or the one whose
    /// shape contains the edge's first waypoint
    fn find_entry<'e>(&self, edge: &DmnEdge, entries: &'e [NodeEntry]) -> Option<&'e NodeEntry> {
        if let [only] = entries {
            return Some(only);
        }
        let start = edge.waypoints.first()?;
        entries
            .iter()
            .find(|entry| entry.bounds.is_some_and(|b| b.contains(*start)))
    }

    /// A DMNDI edge joining the centres of two shapes, for documents
    /// without diagram interchange data
    fn new_edge(&self, required: &NodeEntry, current_node: &str, graph: &InMemoryGraph) -> DmnEdge {
        let target_bounds = graph.node(current_node).and_then(|n| n.bounds);
        let waypoints = match (required.bounds, target_bounds) {
            (Some(source), Some(target)) => vec![centre(source), centre(target)],
            _ => Vec::new(),
        };
        DmnEdge {
            id: String::new(),
            dmn_element_ref: String::new(),
            waypoints,
        }
    }
}

fn centre(bounds: Bounds) -> Point {
    Point::new(
        bounds.x + bounds.width / 2.0,
        bounds.y + bounds.height / 2.0,
    )
}

/// Source magnet from the first waypoint, target magnet from the last,
/// each relative to its shape
fn connection_magnets(
    source: Option<Bounds>,
    target: Option<Bounds>,
    edge: &DmnEdge,
) -> ViewConnector {
    if edge.waypoints.len() < 2 {
        return ViewConnector::default();
    }
    let first = edge.waypoints[0];
    let last = edge.waypoints[edge.waypoints.len() - 1];
    ViewConnector {
        source_magnet: source.map(|b| b.relative(first)),
        target_magnet: target.map(|b| b.relative(last)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DrgElement, Node};
    use crate::types::{BuiltInType, InformationItem};
    use pretty_assertions::assert_eq;

    const DIAGRAM_ID: &str = "diagramId";

    fn graph() -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        graph
            .add_node(
                Node::new(
                    "required-node",
                    DrgElement::input_data("456", InformationItem::new("Age", BuiltInType::Number)),
                )
                .with_bounds(Bounds::new(0.0, 0.0, 100.0, 50.0)),
            )
            .unwrap();
        graph
            .add_node(
                Node::new(
                    "current-node",
                    DrgElement::decision("d1", InformationItem::untyped("Decision")),
                )
                .with_bounds(Bounds::new(0.0, 200.0, 100.0, 50.0)),
            )
            .unwrap();
        graph
    }

    fn entries() -> HashMap<String, Vec<NodeEntry>> {
        let mut entries = HashMap::new();
        entries.insert(
            "123".to_string(),
            vec![NodeEntry {
                element_id: "456".into(),
                node_id: "required-node".into(),
                bounds: Some(Bounds::new(0.0, 0.0, 100.0, 50.0)),
            }],
        );
        entries
    }

    #[test]
    fn test_reference_id() {
        assert_eq!(reference_id("#123"), "123");
        assert_eq!(reference_id("123"), "123");
    }

    #[test]
    fn test_connect_when_dmndi_is_not_present() {
        let entries = entries();
        let mut graph = graph();

        let connected = NodeConnector::new(DIAGRAM_ID, &entries)
            .connect_edge_to_nodes(
                ConnectorKind::InformationRequirement,
                "789",
                "#123",
                "current-node",
                &mut graph,
            )
            .unwrap();

        assert!(connected);
        let edge = &graph.edges()[0];
        assert_eq!(edge.id, "diagramId#456");
        assert_eq!(edge.source, "required-node");
        assert_eq!(edge.target, "current-node");
        assert_eq!(edge.connector.source_magnet, Some(Point::new(50.0, 25.0)));
        assert_eq!(edge.connector.target_magnet, Some(Point::new(50.0, 25.0)));
    }

    #[test]
    fn test_connect_when_dmndi_is_present() {
        let entries = entries();
        let dmndi = vec![DmnEdge {
            id: "dmnedge-1".into(),
            dmn_element_ref: "789".into(),
            waypoints: vec![Point::new(50.0, 50.0), Point::new(50.0, 200.0)],
        }];
        let mut graph = graph();

        let connected = NodeConnector::new(DIAGRAM_ID, &entries)
            .with_dmndi(&dmndi)
            .connect_edge_to_nodes(
                ConnectorKind::InformationRequirement,
                "789",
                "#123",
                "current-node",
                &mut graph,
            )
            .unwrap();

        assert!(connected);
        let edge = &graph.edges()[0];
        assert_eq!(edge.id, "diagramId#789");
        assert_eq!(edge.connector.source_magnet, Some(Point::new(50.0, 50.0)));
        assert_eq!(edge.connector.target_magnet, Some(Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_no_connection_when_dmndi_edge_is_missing() {
        let entries = entries();
        let mut graph = graph();

        let connected = NodeConnector::new(DIAGRAM_ID, &entries)
            .with_dmndi(&[])
            .connect_edge_to_nodes(
                ConnectorKind::InformationRequirement,
                "789",
                "#123",
                "current-node",
                &mut graph,
            )
            .unwrap();

        assert!(!connected);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_no_connection_when_reference_is_unknown() {
        let entries = entries();
        let mut graph = graph();

        let connected = NodeConnector::new(DIAGRAM_ID, &entries)
            .connect_edge_to_nodes(
                ConnectorKind::InformationRequirement,
                "789",
                "#456",
                "current-node",
                &mut graph,
            )
            .unwrap();

        assert!(!connected);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_dmndi_edge_picks_shape_under_first_waypoint() {
        let mut graph = graph();
        graph
            .add_node(
                Node::new(
                    "required-node-2",
                    DrgElement::input_data("456", InformationItem::new("Age", BuiltInType::Number)),
                )
                .with_bounds(Bounds::new(300.0, 0.0, 100.0, 50.0)),
            )
            .unwrap();
        let mut entries = entries();
        entries.get_mut("123").unwrap().push(NodeEntry {
            element_id: "456".into(),
            node_id: "required-node-2".into(),
            bounds: Some(Bounds::new(300.0, 0.0, 100.0, 50.0)),
        });
        let dmndi = vec![DmnEdge {
            id: "dmnedge-1".into(),
            dmn_element_ref: "789".into(),
            waypoints: vec![Point::new(350.0, 50.0), Point::new(50.0, 200.0)],
        }];

        NodeConnector::new(DIAGRAM_ID, &entries)
            .with_dmndi(&dmndi)
            .connect_edge_to_nodes(
                ConnectorKind::InformationRequirement,
                "789",
                "#123",
                "current-node",
                &mut graph,
            )
            .unwrap();

        assert_eq!(graph.edges()[0].source, "required-node-2");
    }
}
