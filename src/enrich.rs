//! Decision table enrichment
//!
//! Populates a new decision table from its surroundings:
//!
//! - **Inputs**: every element feeding the table's decision (the sources of
//!   its incoming edges) that binds a variable is flattened through the type
//!   catalog. All resulting columns are sorted by text, so leaves from
//!   different sources interleave by name. No sources gives one `input-1`
//!   column of undefined type.
//! - **Output**: named and typed after the nearest enclosing element that
//!   binds a variable (a context entry, an invocation binding, or the owning
//!   decision). Without one, a single `output-1` column of undefined type.
//! - **Annotations**: one `annotation-1` column unless disabled.
//! - **Rules**: one placeholder row sized to the columns.
//!
//! Nothing here fails. Unknown types become leaves and missing variables
//! become defaults.

use crate::catalog::TypeCatalog;
use crate::config::EnrichConfig;
use crate::dtable::{DecisionTable, InputClause, OutputClause, RuleAnnotationClause};
use crate::expression::ExpressionTree;
use crate::flatten::{Flattener, InputClauseRequirement};
use crate::graph::Graph;
use crate::types::{BuiltInType, TypeRef};

/// Enriches decision tables from a graph and a type catalog
pub struct Enricher<'a, G: Graph + ?Sized, C: TypeCatalog + ?Sized> {
    graph: &'a G,
    catalog: &'a C,
    config: EnrichConfig,
}

impl<'a, G: Graph + ?Sized, C: TypeCatalog + ?Sized> Enricher<'a, G, C> {
    pub fn new(graph: &'a G, catalog: &'a C) -> Self {
        Self {
            graph,
            catalog,
            config: EnrichConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EnrichConfig) -> Self {
        self.config = config;
        self
    }

    /// Enrich `model`, a table inside the expression `owner`.
    ///
    /// `node_id` is the graph node of the decision the table is attached
    /// to. Tables nested inside another expression have no node and get no
    /// discovered inputs.
    pub fn enrich(&self, node_id: Option<&str>, owner: &ExpressionTree, model: &mut DecisionTable) {
        model.hit_policy = self.config.hit_policy;
        model.preferred_orientation = self.config.orientation;

        self.enrich_input_clauses(node_id, model);
        self.enrich_output_clauses(owner, model);
        if self.config.annotation_column {
            let name = model.new_annotation_clause_name();
            model.annotations.push(RuleAnnotationClause { name });
        }
        let rule = model.default_rule();
        model.rule.push(rule);

        tracing::debug!(
            node = node_id.unwrap_or("<nested>"),
            inputs = model.input.len(),
            outputs = model.output.len(),
            "enriched decision table"
        );
    }

    /// Input requirements for the decision at `node_id`, sorted by text
    pub fn input_clause_requirements(&self, node_id: &str) -> Vec<InputClauseRequirement> {
        if self.graph.node(node_id).is_none() {
            tracing::debug!(node = node_id, "node not in graph, no inputs discovered");
            return Vec::new();
        }

        let flattener = Flattener::new(self.catalog).with_expansion(self.config.reference_expansion);
        let mut requirements = Vec::new();
        for edge in self.graph.in_edges(node_id) {
            let Some(source) = self.graph.node(&edge.source) else {
                continue;
            };
            let Some(variable) = source.element.input_variable() else {
                continue;
            };
            let name = if variable.name.is_empty() {
                source.element.name.as_str()
            } else {
                variable.name.as_str()
            };
            requirements.extend(flattener.flatten_variable(name, variable.type_ref.as_ref()));
        }

        requirements.sort_by(|a, b| a.text.cmp(&b.text));
        requirements
    }

    fn enrich_input_clauses(&self, node_id: Option<&str>, model: &mut DecisionTable) {
        let requirements = node_id
            .map(|id| self.input_clause_requirements(id))
            .unwrap_or_default();

        if requirements.is_empty() {
            let name = model.new_input_clause_name();
            model.input.push(InputClause::new(name, BuiltInType::Undefined));
            return;
        }

        model.input.extend(
            requirements
                .into_iter()
                .map(|r| InputClause::new(r.text, r.type_ref)),
        );
    }

    fn enrich_output_clauses(&self, owner: &ExpressionTree, model: &mut DecisionTable) {
        let start = model.parent.unwrap_or_else(|| owner.root());
        let variable = owner.nearest_variable(start);

        let name = variable
            .map(|v| v.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| model.new_output_clause_name());
        let type_ref = variable
            .and_then(|v| v.type_ref.clone())
            .unwrap_or_else(|| TypeRef::from(BuiltInType::Undefined));

        model.output.push(OutputClause { name, type_ref });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDefinition, ItemDefinitionCatalog};
    use crate::dtable::{DecisionTableOrientation, HitPolicy};
    use crate::flatten::ReferenceExpansion;
    use crate::graph::{ConnectorKind, DrgElement, Edge, InMemoryGraph, Node, ViewConnector};
    use crate::types::InformationItem;
    use pretty_assertions::assert_eq;

    const DECISION_NODE: &str = "decision-node";

    fn graph_with_inputs(inputs: Vec<InformationItem>) -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        graph
            .add_node(Node::new(
                DECISION_NODE,
                DrgElement::decision("d", InformationItem::untyped("Decision")),
            ))
            .unwrap();
        for (idx, variable) in inputs.into_iter().enumerate() {
            let node_id = format!("input-node-{idx}");
            graph
                .add_node(Node::new(
                    node_id.clone(),
                    DrgElement::input_data(format!("i{idx}"), variable),
                ))
                .unwrap();
            graph
                .add_edge(Edge {
                    id: format!("e{idx}"),
                    kind: ConnectorKind::InformationRequirement,
                    source: node_id,
                    target: DECISION_NODE.into(),
                    connector: ViewConnector::default(),
                })
                .unwrap();
        }
        graph
    }

    fn texts(model: &DecisionTable) -> Vec<&str> {
        model.input.iter().map(|c| c.text()).collect()
    }

    #[test]
    fn test_inputs_sorted_across_sources() {
        let graph = graph_with_inputs(vec![
            InformationItem::new("z-inputData1", BuiltInType::String),
            InformationItem::new("a-inputData2", BuiltInType::Number),
        ]);
        let catalog = ItemDefinitionCatalog::new();
        let mut model = DecisionTable::new();

        Enricher::new(&graph, &catalog).enrich(
            Some(DECISION_NODE),
            &ExpressionTree::new(None),
            &mut model,
        );

        assert_eq!(texts(&model), vec!["a-inputData2", "z-inputData1"]);
        assert_eq!(model.input[0].type_ref(), &BuiltInType::Number.as_type_ref());
        assert_eq!(model.rule.len(), 1);
        assert_eq!(model.rule[0].input_entry, vec!["-", "-"]);
    }

    #[test]
    fn test_knowledge_sources_are_not_inputs() {
        let mut graph = graph_with_inputs(vec![InformationItem::new("Age", BuiltInType::Number)]);
        graph
            .add_node(Node::new("ks-node", DrgElement::knowledge_source("ks", "Policy")))
            .unwrap();
        graph
            .add_edge(Edge {
                id: "auth".into(),
                kind: ConnectorKind::AuthorityRequirement,
                source: "ks-node".into(),
                target: DECISION_NODE.into(),
                connector: ViewConnector::default(),
            })
            .unwrap();
        let catalog = ItemDefinitionCatalog::new();

        let requirements = Enricher::new(&graph, &catalog).input_clause_requirements(DECISION_NODE);
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].text, "Age");
    }

    #[test]
    fn test_unknown_node_gets_default_input() {
        let graph = InMemoryGraph::new();
        let catalog = ItemDefinitionCatalog::new();
        let mut model = DecisionTable::new();

        Enricher::new(&graph, &catalog).enrich(Some("ghost"), &ExpressionTree::new(None), &mut model);

        assert_eq!(model.input, vec![InputClause::new("input-1", BuiltInType::Undefined)]);
    }

    #[test]
    fn test_owner_variable_names_output() {
        let graph = InMemoryGraph::new();
        let catalog = ItemDefinitionCatalog::new();
        let owner = ExpressionTree::new(Some(InformationItem::new("Eligibility", BuiltInType::Boolean)));
        let mut model = DecisionTable::new();

        Enricher::new(&graph, &catalog).enrich(None, &owner, &mut model);

        assert_eq!(
            model.output,
            vec![OutputClause {
                name: "Eligibility".into(),
                type_ref: BuiltInType::Boolean.as_type_ref(),
            }]
        );
    }

    #[test]
    fn test_huge_existing_index_does_not_overflow() {
        let graph = InMemoryGraph::new();
        let catalog = ItemDefinitionCatalog::new();
        let mut model = DecisionTable::new();
        model.output.push(OutputClause {
            name: "output-4294967295".into(),
            type_ref: BuiltInType::String.as_type_ref(),
        });
        model.output.push(OutputClause {
            name: "output-18446744073709551615".into(),
            type_ref: BuiltInType::String.as_type_ref(),
        });

        Enricher::new(&graph, &catalog).enrich(None, &ExpressionTree::new(None), &mut model);

        assert_eq!(model.output.len(), 3);
        assert_eq!(model.output[2].name, "output-4294967296");
        assert_eq!(model.rule[0].output_entry.len(), 3);
    }

    #[test]
    fn test_config_applies_table_settings() {
        let graph = InMemoryGraph::new();
        let catalog = ItemDefinitionCatalog::new();
        let config = EnrichConfig {
            hit_policy: HitPolicy::Collect,
            orientation: DecisionTableOrientation::RuleAsColumn,
            annotation_column: false,
            ..EnrichConfig::default()
        };
        let mut model = DecisionTable::new();

        Enricher::new(&graph, &catalog)
            .with_config(config)
            .enrich(None, &ExpressionTree::new(None), &mut model);

        assert_eq!(model.hit_policy, HitPolicy::Collect);
        assert_eq!(model.preferred_orientation, DecisionTableOrientation::RuleAsColumn);
        assert!(model.annotations.is_empty());
        assert!(model.rule[0].annotation_entry.is_empty());
    }

    #[test]
    fn test_resolve_expansion_reaches_named_field_types() {
        let graph = graph_with_inputs(vec![InformationItem::new("applicant", "tApplicant")]);
        let catalog: ItemDefinitionCatalog = vec![
            ItemDefinition::structure(
                "tAddress",
                vec![ItemDefinition::simple("city", BuiltInType::String)],
            ),
            ItemDefinition::structure(
                "tApplicant",
                vec![
                    ItemDefinition::simple("age", BuiltInType::Number),
                    ItemDefinition::simple("home", "tAddress"),
                ],
            ),
        ]
        .into_iter()
        .collect();
        let config = EnrichConfig {
            reference_expansion: ReferenceExpansion::Resolve,
            ..EnrichConfig::default()
        };

        let requirements = Enricher::new(&graph, &catalog)
            .with_config(config)
            .input_clause_requirements(DECISION_NODE);

        let texts: Vec<_> = requirements.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["applicant.age", "applicant.home.city"]);
    }
}
