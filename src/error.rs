//! Error types for dmn-enrich
//!
//! Enrichment itself never fails: unresolved types and missing variables
//! degrade to defaults. These errors cover loading documents, importing
//! them into a graph and reading configuration.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// dmn-enrich errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Unknown decision: {0}")]
    UnknownDecision(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversions_become_other() {
        let from_str: Error = "boom".into();
        let from_string: Error = String::from("bang").into();
        assert!(matches!(from_str, Error::Other(ref s) if s == "boom"));
        assert_eq!(from_string.to_string(), "bang");
    }

    #[test]
    fn test_yaml_errors_convert() {
        fn parse(yaml: &str) -> Result<Vec<String>> {
            Ok(serde_norway::from_str(yaml)?)
        }
        let err = parse("[unclosed").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(err.to_string().starts_with("YAML error: "));
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::UnknownDecision("d1".into()).to_string(),
            "Unknown decision: d1"
        );
        assert_eq!(
            Error::Import("duplicate id".into()).to_string(),
            "Import error: duplicate id"
        );
    }
}
