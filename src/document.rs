//! Model documents
//!
//! A document describes a decision model: item definitions, DRG elements
//! with their requirements and expressions, and optional diagram
//! interchange (DMNDI) shapes and edges. Documents are YAML or JSON.
//!
//! ## Example
//!
//! ```yaml
//! id: smurfs
//! name: Smurf eligibility
//! itemDefinitions:
//!   - name: tSmurf
//!     itemComponents:
//!       - name: dob
//!         typeRef: date
//!       - name: isBlue
//!         typeRef: boolean
//! drgElements:
//!   - type: inputData
//!     id: smurf
//!     name: Smurf
//!     typeRef: tSmurf
//!   - type: decision
//!     id: eligible
//!     name: Eligible
//!     typeRef: boolean
//!     informationRequirements:
//!       - id: req-1
//!         href: "#smurf"
//!     expression:
//!       type: decisionTable
//! ```

use crate::catalog::ItemDefinition;
use crate::error::{Error, Result};
use crate::graph::{Bounds, ConnectorKind, Point};
use crate::types::{InformationItem, TypeRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A decision model document
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "DMN Definitions", description = "Decision model document")]
pub struct Definitions {
    /// Identifier, also used as the diagram id for graph edge ids
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(default)]
    pub item_definitions: Vec<ItemDefinition>,

    #[serde(default)]
    pub drg_elements: Vec<DrgElementDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmndi: Option<Dmndi>,
}

impl Definitions {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::DocumentParse(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::DocumentParse(e.to_string()))
    }

    /// Load a document, as JSON for `.json` files and YAML otherwise
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    pub fn element(&self, id: &str) -> Option<&DrgElementDef> {
        self.drg_elements.iter().find(|e| e.id() == id)
    }
}

/// A DRG element in a document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrgElementDef {
    InputData(InputDataDef),
    Decision(DecisionDef),
    BusinessKnowledgeModel(BusinessKnowledgeModelDef),
    KnowledgeSource(KnowledgeSourceDef),
}

impl DrgElementDef {
    pub fn id(&self) -> &str {
        match self {
            DrgElementDef::InputData(e) => &e.id,
            DrgElementDef::Decision(e) => &e.id,
            DrgElementDef::BusinessKnowledgeModel(e) => &e.id,
            DrgElementDef::KnowledgeSource(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DrgElementDef::InputData(e) => &e.name,
            DrgElementDef::Decision(e) => &e.name,
            DrgElementDef::BusinessKnowledgeModel(e) => &e.name,
            DrgElementDef::KnowledgeSource(e) => &e.name,
        }
    }

    /// The variable an element binds, named after the element
    pub fn variable(&self) -> Option<InformationItem> {
        let type_ref = match self {
            DrgElementDef::InputData(e) => e.type_ref.clone(),
            DrgElementDef::Decision(e) => e.type_ref.clone(),
            DrgElementDef::BusinessKnowledgeModel(e) => e.type_ref.clone(),
            DrgElementDef::KnowledgeSource(_) => return None,
        };
        Some(InformationItem {
            name: self.name().to_string(),
            type_ref,
        })
    }

    /// Requirements of this element, with the connector kind each creates
    pub fn requirements(&self) -> Vec<(ConnectorKind, &Requirement)> {
        let none: &[Requirement] = &[];
        let (information, knowledge, authority) = match self {
            DrgElementDef::InputData(_) => (none, none, none),
            DrgElementDef::Decision(e) => (
                e.information_requirements.as_slice(),
                e.knowledge_requirements.as_slice(),
                e.authority_requirements.as_slice(),
            ),
            DrgElementDef::BusinessKnowledgeModel(e) => (
                none,
                e.knowledge_requirements.as_slice(),
                e.authority_requirements.as_slice(),
            ),
            DrgElementDef::KnowledgeSource(e) => (none, none, e.authority_requirements.as_slice()),
        };
        information
            .iter()
            .map(|r| (ConnectorKind::InformationRequirement, r))
            .chain(knowledge.iter().map(|r| (ConnectorKind::KnowledgeRequirement, r)))
            .chain(authority.iter().map(|r| (ConnectorKind::AuthorityRequirement, r)))
            .collect()
    }

    /// The expression an element owns, if it owns one
    pub fn expression(&self) -> Option<&Expression> {
        match self {
            DrgElementDef::Decision(e) => e.expression.as_ref(),
            DrgElementDef::BusinessKnowledgeModel(e) => e.encapsulated_logic.as_ref(),
            DrgElementDef::InputData(_) | DrgElementDef::KnowledgeSource(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputDataDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub information_requirements: Vec<Requirement>,
    #[serde(default)]
    pub knowledge_requirements: Vec<Requirement>,
    #[serde(default)]
    pub authority_requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessKnowledgeModelDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub knowledge_requirements: Vec<Requirement>,
    #[serde(default)]
    pub authority_requirements: Vec<Requirement>,
    /// Usually a function definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encapsulated_logic: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSourceDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub authority_requirements: Vec<Requirement>,
}

/// A requirement on another element
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Requirement {
    /// Id of the requirement itself, referenced by DMNDI edges
    pub id: String,
    /// Reference to the required element, `#<element id>`
    pub href: String,
}

/// A boxed expression
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    DecisionTable(DecisionTableDef),
    Context(ContextDef),
    Invocation(InvocationDef),
    FunctionDefinition(FunctionDefinitionDef),
    LiteralExpression(LiteralExpressionDef),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionTableDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextDef {
    #[serde(default)]
    pub context_entries: Vec<ContextEntryDef>,
}

/// A context row. Without a variable it is the context's result row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContextEntryDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Box<Expression>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InvocationDef {
    /// Name of the invoked function
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bindings: Vec<BindingDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BindingDef {
    pub parameter: InformationItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Box<Expression>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinitionDef {
    #[serde(default)]
    pub formal_parameters: Vec<InformationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<Expression>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LiteralExpressionDef {
    #[serde(default)]
    pub text: String,
}

/// Diagram interchange data
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Dmndi {
    #[serde(default)]
    pub shapes: Vec<DmnShape>,
    #[serde(default)]
    pub edges: Vec<DmnEdge>,
}

/// Where a DRG element is drawn
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DmnShape {
    pub id: String,
    pub dmn_element_ref: String,
    pub bounds: Bounds,
}

/// How a requirement is drawn; `dmn_element_ref` is the requirement id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DmnEdge {
    pub id: String,
    pub dmn_element_ref: String,
    #[serde(default)]
    pub waypoints: Vec<Point>,
}
