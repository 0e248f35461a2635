// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # dmn-enrich — decision table enrichment for DMN models
//!
//! When a decision table is created for a decision, most of its structure
//! is already implied by the model around it: the inputs feeding the
//! decision, the types of those inputs, and the variable the table's result
//! is bound to. This crate derives that structure.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dmn_enrich::{import, Definitions, EnrichConfig};
//!
//! let definitions = Definitions::from_yaml(r#"
//!   id: smurfs
//!   itemDefinitions:
//!     - name: tSmurf
//!       itemComponents:
//!         - name: dob
//!           typeRef: date
//!         - name: isBlue
//!           typeRef: boolean
//!   drgElements:
//!     - type: inputData
//!       id: smurf
//!       name: Smurf
//!       typeRef: tSmurf
//!     - type: decision
//!       id: eligible
//!       name: Eligible
//!       typeRef: boolean
//!       informationRequirements:
//!         - id: r1
//!           href: "#smurf"
//!       expression:
//!         type: decisionTable
//! "#)?;
//!
//! let model = import(definitions)?;
//! for enriched in model.enrich_decision("eligible", &EnrichConfig::default())? {
//!     // Inputs: Smurf.dob (date), Smurf.isBlue (boolean)
//!     // Output: Eligible (boolean)
//!     println!("{}", enriched.table.to_report());
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  Definitions (YAML / JSON)                                  │
//! │       │                                                     │
//! │       └──► import() ──► ImportedModel                       │
//! │               │            ├── InMemoryGraph   (Graph)       │
//! │               │            └── ItemDefinitionCatalog         │
//! │               │                              (TypeCatalog)  │
//! │               └── NodeConnector: requirement hrefs → edges  │
//! │                                                             │
//! │  Enricher<Graph, TypeCatalog>                               │
//! │       ├── inputs:  in-edges ──► Flattener ──► sorted columns│
//! │       ├── output:  ExpressionTree ancestor walk             │
//! │       └── rules:   one placeholder row                      │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The enricher only depends on the [`Graph`] and [`TypeCatalog`] traits,
//! so callers with their own graph representation can plug it in directly.

pub mod catalog;
pub mod config;
pub mod connector;
pub mod document;
pub mod dtable;
pub mod enrich;
pub mod error;
pub mod expression;
pub mod flatten;
pub mod graph;
pub mod import;
pub mod types;

// Re-exports
pub use catalog::{ItemDefinition, ItemDefinitionCatalog, TypeCatalog};
pub use config::EnrichConfig;
pub use connector::{reference_id, NodeConnector, NodeEntry};
pub use document::{Definitions, DmnEdge, DmnShape, DrgElementDef, Expression};
pub use dtable::{
    DecisionRule, DecisionTable, DecisionTableOrientation, HitPolicy, InputClause, OutputClause,
    RuleAnnotationClause,
};
pub use enrich::Enricher;
pub use error::{Error, Result};
pub use expression::{ExpressionId, ExpressionKind, ExpressionTree};
pub use flatten::{Flattener, InputClauseRequirement, ReferenceExpansion};
pub use graph::{
    Bounds, ConnectorKind, DrgElement, DrgElementKind, Edge, Graph, InMemoryGraph, Node, Point,
    ViewConnector,
};
pub use import::{import, EnrichedTable, ImportedModel};
pub use types::{BuiltInType, InformationItem, TypeRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
