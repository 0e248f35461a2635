//! Decision table model and default values
//!
//! A decision table has input columns (each testing a FEEL expression),
//! output columns, annotation columns and rule rows. A freshly created
//! table is empty; [`crate::enrich::Enricher`] fills in its columns and a
//! placeholder rule.

use crate::expression::ExpressionId;
use crate::types::TypeRef;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const INPUT_CLAUSE_PREFIX: &str = "input";
pub const OUTPUT_CLAUSE_PREFIX: &str = "output";
pub const RULE_ANNOTATION_CLAUSE_PREFIX: &str = "annotation";

/// Input entry text meaning "any value"
pub const INPUT_CLAUSE_UNARY_TEST_TEXT: &str = "-";
pub const OUTPUT_CLAUSE_EXPRESSION_TEXT: &str = "";
pub const RULE_ANNOTATION_CLAUSE_TEXT: &str = "";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HitPolicy {
    #[default]
    Unique,
    First,
    Priority,
    Any,
    Collect,
    RuleOrder,
    OutputOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DecisionTableOrientation {
    #[default]
    #[serde(rename = "Rule-as-Row")]
    RuleAsRow,
    #[serde(rename = "Rule-as-Column")]
    RuleAsColumn,
    #[serde(rename = "CrossTable")]
    CrossTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputClauseLiteralExpression {
    pub text: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputClause {
    pub input_expression: InputClauseLiteralExpression,
}

impl InputClause {
    pub fn new(text: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            input_expression: InputClauseLiteralExpression {
                text: text.into(),
                type_ref: type_ref.into(),
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.input_expression.text
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.input_expression.type_ref
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputClause {
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleAnnotationClause {
    pub name: String,
}

/// One rule row: an entry per input, output and annotation column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRule {
    pub input_entry: Vec<String>,
    pub output_entry: Vec<String>,
    #[serde(default)]
    pub annotation_entry: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTable {
    /// Enclosing expression node; `None` when the table is the owner's
    /// top-level expression
    #[serde(skip)]
    pub parent: Option<ExpressionId>,

    #[serde(default)]
    pub hit_policy: HitPolicy,

    #[serde(default)]
    pub preferred_orientation: DecisionTableOrientation,

    #[serde(default)]
    pub input: Vec<InputClause>,

    #[serde(default)]
    pub output: Vec<OutputClause>,

    #[serde(default)]
    pub annotations: Vec<RuleAnnotationClause>,

    #[serde(default)]
    pub rule: Vec<DecisionRule>,
}

impl DecisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table nested beneath `parent`
    pub fn with_parent(parent: ExpressionId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn new_input_clause_name(&self) -> String {
        next_indexed_name(INPUT_CLAUSE_PREFIX, self.input.iter().map(|c| c.text()))
    }

    pub fn new_output_clause_name(&self) -> String {
        next_indexed_name(OUTPUT_CLAUSE_PREFIX, self.output.iter().map(|c| c.name.as_str()))
    }

    pub fn new_annotation_clause_name(&self) -> String {
        next_indexed_name(
            RULE_ANNOTATION_CLAUSE_PREFIX,
            self.annotations.iter().map(|c| c.name.as_str()),
        )
    }

    /// A placeholder rule sized to the current columns
    pub fn default_rule(&self) -> DecisionRule {
        DecisionRule {
            input_entry: vec![INPUT_CLAUSE_UNARY_TEST_TEXT.to_string(); self.input.len()],
            output_entry: vec![OUTPUT_CLAUSE_EXPRESSION_TEXT.to_string(); self.output.len()],
            annotation_entry: vec![RULE_ANNOTATION_CLAUSE_TEXT.to_string(); self.annotations.len()],
        }
    }

    /// Render as a plain-text grid
    pub fn to_report(&self) -> String {
        let mut header: Vec<String> = vec!["#".to_string()];
        header.extend(
            self.input
                .iter()
                .map(|c| format!("{} ({})", c.text(), c.type_ref())),
        );
        header.extend(
            self.output
                .iter()
                .map(|c| format!("{} ({})", c.name, c.type_ref)),
        );
        header.extend(self.annotations.iter().map(|c| c.name.clone()));

        let mut rows = vec![header];
        for (idx, rule) in self.rule.iter().enumerate() {
            let mut row = vec![(idx + 1).to_string()];
            row.extend(rule.input_entry.iter().cloned());
            row.extend(rule.output_entry.iter().cloned());
            row.extend(rule.annotation_entry.iter().cloned());
            rows.push(row);
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("Hit policy: {:?}\n", self.hit_policy);
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }
}

fn indexed_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+)-(\d+)$").expect("indexed name pattern is valid"))
}

/// `prefix-N` where N is one more than the largest index already used
/// with that prefix among `existing`
pub fn next_indexed_name<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let next = existing
        .filter_map(|name| indexed_name_pattern().captures(name))
        .filter(|caps| &caps[1] == prefix)
        .filter_map(|caps| caps[2].parse::<u64>().ok())
        // Indices that cannot be incremented are ignored
        .filter_map(|n| n.checked_add(1))
        .max()
        .unwrap_or(1);
    format!("{}-{}", prefix, next)
}
