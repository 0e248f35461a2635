//! Decision requirements graph
//!
//! Nodes carry a DRG element (input data, decision, knowledge model,
//! knowledge source). Edges point from the required element to the element
//! that requires it, so the inputs of a decision are the sources of its
//! incoming edges.
//!
//! The same DRG element may be drawn more than once (one shape per diagram),
//! so node ids and element ids are distinct.

use crate::error::{Error, Result};
use crate::types::InformationItem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of DRG element a node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DrgElementKind {
    InputData,
    Decision,
    BusinessKnowledgeModel,
    KnowledgeSource,
}

/// A DRG element as stored in a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrgElement {
    pub id: String,
    pub name: String,
    pub kind: DrgElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
}

impl DrgElement {
    pub fn input_data(id: impl Into<String>, variable: InformationItem) -> Self {
        Self {
            id: id.into(),
            name: variable.name.clone(),
            kind: DrgElementKind::InputData,
            variable: Some(variable),
        }
    }

    pub fn decision(id: impl Into<String>, variable: InformationItem) -> Self {
        Self {
            id: id.into(),
            name: variable.name.clone(),
            kind: DrgElementKind::Decision,
            variable: Some(variable),
        }
    }

    pub fn knowledge_source(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: DrgElementKind::KnowledgeSource,
            variable: None,
        }
    }

    /// The variable this element feeds into a decision table, if any.
    /// Only input data and decisions produce values a table can test;
    /// knowledge models are invoked, not read.
    pub fn input_variable(&self) -> Option<&InformationItem> {
        match self.kind {
            DrgElementKind::InputData | DrgElementKind::Decision => self.variable.as_ref(),
            DrgElementKind::BusinessKnowledgeModel | DrgElementKind::KnowledgeSource => None,
        }
    }
}

/// A point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Shape bounds in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// `p` relative to the top-left corner
    pub fn relative(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }
}

/// Kind of connector between two DRG elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    InformationRequirement,
    KnowledgeRequirement,
    AuthorityRequirement,
}

/// Where a connector attaches to its source and target shapes, relative
/// to each shape's top-left corner. `None` lets the renderer choose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewConnector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_magnet: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_magnet: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub element: DrgElement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl Node {
    pub fn new(id: impl Into<String>, element: DrgElement) -> Self {
        Self {
            id: id.into(),
            element,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub kind: ConnectorKind,
    /// Node id of the required element
    pub source: String,
    /// Node id of the requiring element
    pub target: String,
    #[serde(default)]
    pub connector: ViewConnector,
}

/// Read access to a decision requirements graph
pub trait Graph {
    fn node(&self, id: &str) -> Option<&Node>;

    /// Edges whose target is `id`, in insertion order
    fn in_edges(&self, id: &str) -> Vec<&Edge>;

    /// Edges whose source is `id`, in insertion order
    fn out_edges(&self, id: &str) -> Vec<&Edge>;
}

/// Graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(Error::Import(format!("duplicate node id '{}'", node.id)));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge between two nodes already in the graph
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        for end in [&edge.source, &edge.target] {
            if !self.index.contains_key(end) {
                return Err(Error::Import(format!(
                    "edge '{}' references unknown node '{}'",
                    edge.id, end
                )));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

impl Graph for InMemoryGraph {
    fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    fn in_edges(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.target == id).collect()
    }

    fn out_edges(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.source == id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuiltInType;

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.into(),
            kind: ConnectorKind::InformationRequirement,
            source: source.into(),
            target: target.into(),
            connector: ViewConnector::default(),
        }
    }

    fn sample() -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        graph
            .add_node(Node::new(
                "n-age",
                DrgElement::input_data("age", InformationItem::new("Age", BuiltInType::Number)),
            ))
            .unwrap();
        graph
            .add_node(Node::new(
                "n-risk",
                DrgElement::decision("risk", InformationItem::untyped("Risk")),
            ))
            .unwrap();
        graph.add_edge(edge("e1", "n-age", "n-risk")).unwrap();
        graph
    }

    #[test]
    fn test_in_and_out_edges() {
        let graph = sample();
        assert_eq!(graph.in_edges("n-risk").len(), 1);
        assert_eq!(graph.out_edges("n-age")[0].id, "e1");
        assert!(graph.in_edges("n-age").is_empty());
        assert!(graph.in_edges("missing").is_empty());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = sample();
        let err = graph
            .add_node(Node::new("n-age", DrgElement::knowledge_source("ks", "Policy")))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate node id"));
    }

    #[test]
    fn test_edge_to_unknown_node_rejected() {
        let mut graph = sample();
        assert!(graph.add_edge(edge("e2", "n-age", "nowhere")).is_err());
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_input_variable_only_for_values() {
        let source = DrgElement::knowledge_source("ks", "Policy");
        assert!(source.input_variable().is_none());

        let mut bkm = DrgElement::decision("bkm", InformationItem::untyped("Score"));
        bkm.kind = DrgElementKind::BusinessKnowledgeModel;
        assert!(bkm.input_variable().is_none());

        let input = DrgElement::input_data("age", InformationItem::untyped("Age"));
        assert_eq!(input.input_variable().map(|v| v.name.as_str()), Some("Age"));
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert!(bounds.contains(Point::new(10.0, 20.0)));
        assert!(bounds.contains(Point::new(110.0, 70.0)));
        assert!(!bounds.contains(Point::new(111.0, 30.0)));
        assert_eq!(bounds.relative(Point::new(60.0, 70.0)), Point::new(50.0, 50.0));
    }
}
