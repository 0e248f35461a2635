//! Input clause flattening
//!
//! Turns a variable and its structural type into one input clause
//! requirement per leaf field. `tPerson = { name: string, age: number }`
//! bound to `Applicant` flattens to:
//!
//! ```text
//! Applicant.name  string
//! Applicant.age   number
//! ```
//!
//! Composite fields expand depth-first in declaration order and the
//! composite itself never produces a clause. How a field whose `type_ref`
//! names another catalog entry is handled depends on [`ReferenceExpansion`].

use crate::catalog::{ItemDefinition, TypeCatalog};
use crate::types::{BuiltInType, TypeRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A resolved `(text, type)` pair destined for one input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputClauseRequirement {
    pub text: String,
    pub type_ref: TypeRef,
}

impl InputClauseRequirement {
    pub fn new(text: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            text: text.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// How fields that reference a named type are expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceExpansion {
    /// Only inline components are expanded. A field typed by a named
    /// definition is a leaf carrying that name as its type.
    #[default]
    Inline,
    /// Fields typed by a named definition are expanded through the catalog.
    /// A definition already being expanded on the current path is a leaf.
    Resolve,
}

/// Flattens item definitions into input clause requirements
pub struct Flattener<'a, C: TypeCatalog + ?Sized> {
    catalog: &'a C,
    expansion: ReferenceExpansion,
}

impl<'a, C: TypeCatalog + ?Sized> Flattener<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            expansion: ReferenceExpansion::default(),
        }
    }

    pub fn with_expansion(mut self, expansion: ReferenceExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Flatten `item` with `prefix` as the qualified name of its root
    pub fn flatten(&self, prefix: &str, item: &ItemDefinition) -> Vec<InputClauseRequirement> {
        let mut requirements = Vec::new();
        self.add_input_clause_requirement(item, &mut requirements, prefix);
        requirements
    }

    /// Append the requirements for `item` to `requirements`
    pub fn add_input_clause_requirement(
        &self,
        item: &ItemDefinition,
        requirements: &mut Vec<InputClauseRequirement>,
        text: &str,
    ) {
        let mut path = vec![item.name.clone()];
        self.walk(item, text.to_string(), &mut path, requirements);
    }

    /// Flatten a variable: its type is looked up in the catalog and
    /// expanded, or used as-is when the catalog does not know it
    pub fn flatten_variable(
        &self,
        name: &str,
        type_ref: Option<&TypeRef>,
    ) -> Vec<InputClauseRequirement> {
        let Some(type_ref) = type_ref else {
            return vec![InputClauseRequirement::new(name, BuiltInType::Undefined)];
        };

        match self.catalog.resolve_ref(type_ref) {
            Some(definition) => self.flatten(name, definition),
            None => {
                if type_ref.built_in().is_none() {
                    tracing::debug!(
                        variable = name,
                        type_ref = %type_ref,
                        "type reference not found in catalog, using it as a leaf"
                    );
                }
                vec![InputClauseRequirement::new(name, type_ref.clone())]
            }
        }
    }

    fn walk(
        &self,
        item: &ItemDefinition,
        text: String,
        path: &mut Vec<String>,
        requirements: &mut Vec<InputClauseRequirement>,
    ) {
        if item.is_structure() {
            for component in &item.item_components {
                let child_text = format!("{}.{}", text, component.name);
                self.walk(component, child_text, path, requirements);
            }
            return;
        }

        if let Some(target) = self.referenced_definition(item, path) {
            path.push(target.name.clone());
            self.walk(target, text, path, requirements);
            path.pop();
            return;
        }

        requirements.push(InputClauseRequirement::new(text, item.leaf_type_ref()));
    }

    fn referenced_definition(&self, item: &ItemDefinition, path: &[String]) -> Option<&'a ItemDefinition> {
        if self.expansion != ReferenceExpansion::Resolve {
            return None;
        }
        let type_ref = item.type_ref.as_ref()?;
        let target = self.catalog.resolve_ref(type_ref)?;
        if path.iter().any(|name| *name == target.name) {
            tracing::debug!(
                field = %item.name,
                type_ref = %type_ref,
                "recursive type reference, emitting a leaf"
            );
            return None;
        }
        Some(target)
    }
}
