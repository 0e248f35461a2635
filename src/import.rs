//! Importing documents into a graph and enriching their decision tables
//!
//! Import builds three things from a [`Definitions`] document:
//!
//! 1. an [`ItemDefinitionCatalog`] of its item definitions,
//! 2. one graph node per DRG element, or per DMNDI shape when the document
//!    carries diagram data,
//! 3. one edge per requirement, linked by the [`NodeConnector`].
//!
//! [`ImportedModel::enrich_decision`] then walks an element's boxed
//! expression, builds its [`ExpressionTree`] and enriches every decision
//! table found inside it.

use crate::catalog::ItemDefinitionCatalog;
use crate::config::EnrichConfig;
use crate::connector::{NodeConnector, NodeEntry};
use crate::document::{Definitions, DrgElementDef, Expression};
use crate::dtable::DecisionTable;
use crate::enrich::Enricher;
use crate::error::{Error, Result};
use crate::expression::{ExpressionId, ExpressionKind, ExpressionTree};
use crate::graph::{DrgElement, DrgElementKind, InMemoryGraph, Node};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A document with its graph and type catalog
#[derive(Debug, Clone)]
pub struct ImportedModel {
    pub definitions: Definitions,
    pub graph: InMemoryGraph,
    pub catalog: ItemDefinitionCatalog,
    entries_by_id: HashMap<String, Vec<NodeEntry>>,
}

/// A decision table produced by enrichment, with where it sits
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnrichedTable {
    /// Location inside the owning element, e.g. `Eligibility/Band`
    pub path: String,
    pub table: DecisionTable,
}

/// Import a document
pub fn import(definitions: Definitions) -> Result<ImportedModel> {
    let catalog: ItemDefinitionCatalog = definitions.item_definitions.iter().cloned().collect();

    let mut seen = HashSet::new();
    for element in &definitions.drg_elements {
        if !seen.insert(element.id()) {
            return Err(Error::Import(format!(
                "duplicate DRG element id '{}'",
                element.id()
            )));
        }
    }

    let mut graph = InMemoryGraph::new();
    let mut entries_by_id: HashMap<String, Vec<NodeEntry>> = HashMap::new();

    if let Some(dmndi) = &definitions.dmndi {
        for shape in &dmndi.shapes {
            let element = definitions.element(&shape.dmn_element_ref).ok_or_else(|| {
                Error::Import(format!(
                    "shape '{}' references unknown element '{}'",
                    shape.id, shape.dmn_element_ref
                ))
            })?;
            graph.add_node(Node::new(shape.id.clone(), to_graph_element(element)).with_bounds(shape.bounds))?;
            entries_by_id
                .entry(element.id().to_string())
                .or_default()
                .push(NodeEntry {
                    element_id: element.id().to_string(),
                    node_id: shape.id.clone(),
                    bounds: Some(shape.bounds),
                });
        }
    }

    // Elements that are not drawn still take part in the graph
    for element in &definitions.drg_elements {
        if entries_by_id.contains_key(element.id()) {
            continue;
        }
        graph.add_node(Node::new(element.id(), to_graph_element(element)))?;
        entries_by_id.insert(
            element.id().to_string(),
            vec![NodeEntry {
                element_id: element.id().to_string(),
                node_id: element.id().to_string(),
                bounds: None,
            }],
        );
    }

    let connector = NodeConnector::new(&definitions.id, &entries_by_id);
    let connector = match &definitions.dmndi {
        Some(dmndi) => connector.with_dmndi(&dmndi.edges),
        None => connector,
    };

    let mut connected = 0;
    for element in &definitions.drg_elements {
        let Some(current) = entries_by_id.get(element.id()).and_then(|e| e.first()) else {
            continue;
        };
        for (kind, requirement) in element.requirements() {
            if connector.connect_edge_to_nodes(
                kind,
                &requirement.id,
                &requirement.href,
                &current.node_id,
                &mut graph,
            )? {
                connected += 1;
            }
        }
    }

    tracing::info!(
        document = %definitions.id,
        nodes = graph.nodes().len(),
        edges = connected,
        item_definitions = catalog.len(),
        "imported decision model"
    );

    Ok(ImportedModel {
        definitions,
        graph,
        catalog,
        entries_by_id,
    })
}

fn to_graph_element(element: &DrgElementDef) -> DrgElement {
    let kind = match element {
        DrgElementDef::InputData(_) => DrgElementKind::InputData,
        DrgElementDef::Decision(_) => DrgElementKind::Decision,
        DrgElementDef::BusinessKnowledgeModel(_) => DrgElementKind::BusinessKnowledgeModel,
        DrgElementDef::KnowledgeSource(_) => DrgElementKind::KnowledgeSource,
    };
    DrgElement {
        id: element.id().to_string(),
        name: element.name().to_string(),
        kind,
        variable: element.variable(),
    }
}

impl ImportedModel {
    /// The first graph node drawing `element_id`
    pub fn node_id(&self, element_id: &str) -> Option<&str> {
        self.entries_by_id
            .get(element_id)
            .and_then(|entries| entries.first())
            .map(|entry| entry.node_id.as_str())
    }

    /// Enrich every decision table in the expression of `element_id`.
    ///
    /// A table that is the element's whole expression gets the inputs
    /// feeding the element; nested tables get only the default input.
    pub fn enrich_decision(&self, element_id: &str, config: &EnrichConfig) -> Result<Vec<EnrichedTable>> {
        let element = self
            .definitions
            .element(element_id)
            .ok_or_else(|| Error::UnknownDecision(element_id.to_string()))?;
        let Some(expression) = element.expression() else {
            return Ok(Vec::new());
        };

        let mut tree = ExpressionTree::new(element.variable());
        let mut found = Vec::new();
        let root = tree.root();
        collect_tables(expression, &mut tree, root, element.name().to_string(), &mut found);

        let enricher = Enricher::new(&self.graph, &self.catalog).with_config(config.clone());
        let tables = found
            .into_iter()
            .map(|(path, parent)| {
                let mut table = DecisionTable::new();
                let node_id = if parent == root {
                    self.node_id(element_id)
                } else {
                    table.parent = Some(parent);
                    None
                };
                enricher.enrich(node_id, &tree, &mut table);
                EnrichedTable { path, table }
            })
            .collect();
        Ok(tables)
    }
}

/// Record every decision table under `expression` with its path and the
/// expression node enclosing it
fn collect_tables(
    expression: &Expression,
    tree: &mut ExpressionTree,
    parent: ExpressionId,
    path: String,
    found: &mut Vec<(String, ExpressionId)>,
) {
    match expression {
        Expression::DecisionTable(_) => found.push((path, parent)),
        Expression::Context(context) => {
            let context_id = tree.context(parent);
            for (idx, entry) in context.context_entries.iter().enumerate() {
                let entry_id = tree.context_entry(context_id, entry.variable.clone());
                let label = match &entry.variable {
                    Some(v) if !v.name.is_empty() => v.name.clone(),
                    _ => format!("[{}]", idx),
                };
                if let Some(inner) = &entry.expression {
                    collect_tables(inner, tree, entry_id, format!("{}/{}", path, label), found);
                }
            }
        }
        Expression::Invocation(invocation) => {
            let invocation_id = tree.add(parent, ExpressionKind::Invocation, None);
            for binding in &invocation.bindings {
                let binding_id = tree.add(
                    invocation_id,
                    ExpressionKind::Binding,
                    Some(binding.parameter.clone()),
                );
                if let Some(inner) = &binding.expression {
                    let child = format!("{}/{}", path, binding.parameter.name);
                    collect_tables(inner, tree, binding_id, child, found);
                }
            }
        }
        Expression::FunctionDefinition(function) => {
            let function_id = tree.add(parent, ExpressionKind::FunctionDefinition, None);
            if let Some(body) = &function.body {
                collect_tables(body, tree, function_id, format!("{}/body", path), found);
            }
        }
        Expression::LiteralExpression(_) => {}
    }
}
