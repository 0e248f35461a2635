//! Item definitions and the type catalog
//!
//! An [`ItemDefinition`] is a named structural type. With no components it
//! is a primitive or an alias (its `type_ref` names the underlying type);
//! with components it is a composite whose fields are themselves item
//! definitions, declared inline.
//!
//! Named definitions are kept in an arena keyed by name
//! ([`ItemDefinitionCatalog`]). Fields refer to other named types through
//! their `type_ref`, so recursive schemas never need cyclic values: a
//! reference is resolved by looking the name up again.

use crate::types::TypeRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A structural type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub name: String,

    /// Underlying type for primitives and aliases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,

    /// Fields of a composite, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_components: Vec<ItemDefinition>,
}

impl ItemDefinition {
    /// A primitive or alias definition
    pub fn simple(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: Some(type_ref.into()),
            item_components: Vec::new(),
        }
    }

    /// A composite definition with the given fields
    pub fn structure(name: impl Into<String>, components: Vec<ItemDefinition>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
            item_components: components,
        }
    }

    pub fn is_structure(&self) -> bool {
        !self.item_components.is_empty()
    }

    /// The type tag a leaf of this definition carries: its own `type_ref`,
    /// or its name when it has none (an empty structure)
    pub fn leaf_type_ref(&self) -> TypeRef {
        self.type_ref
            .clone()
            .unwrap_or_else(|| TypeRef::local(self.name.clone()))
    }
}

/// Lookup of named structural types
pub trait TypeCatalog {
    /// Find a definition by name. `None` when the name is unknown.
    fn resolve(&self, name: &str) -> Option<&ItemDefinition>;

    /// Find the definition a type reference names, by its local part
    fn resolve_ref(&self, type_ref: &TypeRef) -> Option<&ItemDefinition> {
        self.resolve(&type_ref.local_part)
    }
}

/// Arena of item definitions keyed by name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ItemDefinitionCatalog {
    definitions: Vec<ItemDefinition>,
    index: HashMap<String, usize>,
}

impl ItemDefinitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. A definition with the same name is replaced in place.
    pub fn insert(&mut self, definition: ItemDefinition) {
        match self.index.get(&definition.name) {
            Some(&idx) => self.definitions[idx] = definition,
            None => {
                self.index
                    .insert(definition.name.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.definitions.iter()
    }
}

impl FromIterator<ItemDefinition> for ItemDefinitionCatalog {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

impl TypeCatalog for ItemDefinitionCatalog {
    fn resolve(&self, name: &str) -> Option<&ItemDefinition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }
}
