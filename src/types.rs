//! Type references, variables and built-in DMN types
//!
//! A [`TypeRef`] is a qualified name: an optional namespace plus a local
//! part. Built-in FEEL types live in the empty namespace, so
//! `BuiltInType::Date.as_type_ref()` equals `TypeRef::local("date")`.
//!
//! In documents a type reference is written as a plain string. A namespaced
//! reference uses Clark notation: `{http://example.com/ns}tPerson`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Qualified name of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeRef {
    /// Namespace URI, empty for built-ins and local item definitions
    pub namespace: String,
    /// Local part, used for catalog lookups
    pub local_part: String,
}

impl TypeRef {
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    /// A type reference in the empty namespace
    pub fn local(local_part: impl Into<String>) -> Self {
        Self::new(String::new(), local_part)
    }

    /// The built-in type this reference names, if any
    pub fn built_in(&self) -> Option<BuiltInType> {
        if !self.namespace.is_empty() {
            return None;
        }
        BuiltInType::from_name(&self.local_part)
    }

    pub fn is_undefined(&self) -> bool {
        self.built_in() == Some(BuiltInType::Undefined)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_part)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_part)
        }
    }
}

impl From<String> for TypeRef {
    fn from(s: String) -> Self {
        if let Some(rest) = s.strip_prefix('{') {
            if let Some((namespace, local_part)) = rest.split_once('}') {
                return TypeRef::new(namespace, local_part);
            }
        }
        TypeRef::local(s)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef::from(s.to_string())
    }
}

impl From<TypeRef> for String {
    fn from(t: TypeRef) -> Self {
        t.to_string()
    }
}

impl From<BuiltInType> for TypeRef {
    fn from(t: BuiltInType) -> Self {
        t.as_type_ref()
    }
}

impl JsonSchema for TypeRef {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "TypeRef".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        <String as JsonSchema>::json_schema(generator)
    }
}

/// A variable: a name bound to an optional type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InformationItem {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
}

impl InformationItem {
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: Some(type_ref.into()),
        }
    }

    /// A variable with a name and no type
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
        }
    }
}

/// Built-in FEEL types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInType {
    Number,
    String,
    Boolean,
    Date,
    Time,
    DateTime,
    DaysTimeDuration,
    YearsMonthsDuration,
    Context,
    Any,
    Undefined,
}

impl BuiltInType {
    pub const ALL: [BuiltInType; 11] = [
        BuiltInType::Number,
        BuiltInType::String,
        BuiltInType::Boolean,
        BuiltInType::Date,
        BuiltInType::Time,
        BuiltInType::DateTime,
        BuiltInType::DaysTimeDuration,
        BuiltInType::YearsMonthsDuration,
        BuiltInType::Context,
        BuiltInType::Any,
        BuiltInType::Undefined,
    ];

    /// Name as it appears in a `typeRef`
    pub fn name(self) -> &'static str {
        match self {
            BuiltInType::Number => "number",
            BuiltInType::String => "string",
            BuiltInType::Boolean => "boolean",
            BuiltInType::Date => "date",
            BuiltInType::Time => "time",
            BuiltInType::DateTime => "date and time",
            BuiltInType::DaysTimeDuration => "days and time duration",
            BuiltInType::YearsMonthsDuration => "years and months duration",
            BuiltInType::Context => "context",
            BuiltInType::Any => "Any",
            BuiltInType::Undefined => "<Undefined>",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn as_type_ref(self) -> TypeRef {
        TypeRef::local(self.name())
    }
}

impl fmt::Display for BuiltInType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_type_ref_is_local() {
        let date = BuiltInType::Date.as_type_ref();
        assert_eq!(date, TypeRef::local("date"));
        assert_eq!(date.built_in(), Some(BuiltInType::Date));
    }

    #[test]
    fn test_parse_clark_notation() {
        let t = TypeRef::from("{https://kiegroup.org/dmn/smurfs}tSmurf");
        assert_eq!(t.namespace, "https://kiegroup.org/dmn/smurfs");
        assert_eq!(t.local_part, "tSmurf");
        assert_eq!(t.to_string(), "{https://kiegroup.org/dmn/smurfs}tSmurf");
        assert_eq!(t.built_in(), None);
    }

    #[test]
    fn test_names_with_spaces_stay_local() {
        let t = TypeRef::from("date and time");
        assert!(t.namespace.is_empty());
        assert_eq!(t.built_in(), Some(BuiltInType::DateTime));
    }

    #[test]
    fn test_undefined() {
        assert!(BuiltInType::Undefined.as_type_ref().is_undefined());
        assert!(!TypeRef::local("tPerson").is_undefined());
    }

    #[test]
    fn test_serde_as_string() {
        let t = TypeRef::local("number");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"number\"");
        let back: TypeRef = serde_json::from_str("\"{ns}x\"").unwrap();
        assert_eq!(back, TypeRef::new("ns", "x"));
    }
}
