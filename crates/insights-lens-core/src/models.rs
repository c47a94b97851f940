//! Core data models used throughout Insights Lens.
//!
//! These types describe what goes into the extraction engine (a
//! [`ResourceQuery`]) and what comes out of it (a list of
//! [`StructuredDocument`]s).

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Namespace value that selects every namespace in the archive.
pub const ALL_NAMESPACES: &str = "_all_";

/// Resource type value that selects every record type.
pub const ALL_TYPES: &str = "all";

/// Type discriminator field of a structured document.
pub const KIND_FIELD: &str = "kind";

/// Schema version field of a structured document.
pub const VERSION_FIELD: &str = "apiVersion";

/// Which namespaces a query is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceScope {
    /// No namespace given; the namespace segment is left out of patterns.
    #[default]
    Unscoped,
    /// A single, literal namespace.
    Namespace(String),
    /// Every namespace (`-A` / `_all_`).
    All,
}

impl NamespaceScope {
    /// Builds a scope from CLI-style inputs.
    ///
    /// `all_namespaces` wins over an explicit namespace. The `_all_`
    /// sentinel is accepted as a namespace value too.
    pub fn from_flags(namespace: Option<&str>, all_namespaces: bool) -> Self {
        if all_namespaces {
            return NamespaceScope::All;
        }
        match namespace {
            None | Some("") => NamespaceScope::Unscoped,
            Some(ALL_NAMESPACES) => NamespaceScope::All,
            Some(ns) => NamespaceScope::Namespace(ns.to_string()),
        }
    }

    /// The literal namespace, if one was given.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            NamespaceScope::Namespace(ns) => Some(ns),
            _ => None,
        }
    }
}

/// A logical request for records of one type.
///
/// A query always has a type; a name can only be attached to a typed query.
/// Type names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    resource_type: String,
    name: Option<String>,
    scope: NamespaceScope,
}

impl ResourceQuery {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into().to_lowercase(),
            name: None,
            scope: NamespaceScope::Unscoped,
        }
    }

    /// Restricts the query to one record name. An empty name is ignored.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn with_scope(mut self, scope: NamespaceScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn scope(&self) -> &NamespaceScope {
        &self.scope
    }
}

/// Values to use for `kind` / `apiVersion` when a payload lacks them.
///
/// `None` and empty strings both mean "no override".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMeta<'a> {
    pub kind: Option<&'a str>,
    pub api_version: Option<&'a str>,
}

impl<'a> TypeMeta<'a> {
    pub const NONE: TypeMeta<'static> = TypeMeta {
        kind: None,
        api_version: None,
    };

    pub fn new(kind: &'a str, api_version: &'a str) -> Self {
        Self {
            kind: Some(kind),
            api_version: Some(api_version),
        }
    }

    pub(crate) fn value_for(&self, field: &str) -> Option<&'a str> {
        let value = match field {
            KIND_FIELD => self.kind,
            VERSION_FIELD => self.api_version,
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Why a payload is not a structured document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("Object '{0}' is missing")]
    MissingField(&'static str),

    #[error("Object '{0}' must be a non-empty string")]
    InvalidField(&'static str),
}

/// A generic nested key/value document with a `kind` and an `apiVersion`.
///
/// Construction validates that both fields are present non-empty strings;
/// nothing else about the document's shape is checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StructuredDocument {
    object: Map<String, Value>,
}

impl StructuredDocument {
    /// Parses a JSON payload as a structured document.
    pub fn from_slice(raw: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(object) = value else {
            return Err(DocumentError::NotAnObject);
        };
        for field in [KIND_FIELD, VERSION_FIELD] {
            match object.get(field) {
                None => return Err(DocumentError::MissingField(field)),
                Some(Value::String(s)) if !s.is_empty() => {}
                Some(_) => return Err(DocumentError::InvalidField(field)),
            }
        }
        Ok(Self { object })
    }

    /// Builds a document from a body whose type metadata is known up front.
    pub(crate) fn with_type_meta(kind: &str, api_version: &str, mut body: Map<String, Value>) -> Self {
        body.insert(KIND_FIELD.to_string(), Value::String(kind.to_string()));
        body.insert(
            VERSION_FIELD.to_string(),
            Value::String(api_version.to_string()),
        );
        Self { object: body }
    }

    pub fn kind(&self) -> &str {
        self.str_field(KIND_FIELD).unwrap_or_default()
    }

    pub fn api_version(&self) -> &str {
        self.str_field(VERSION_FIELD).unwrap_or_default()
    }

    /// `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.object.get("metadata")?.get("name")?.as_str()
    }

    /// `metadata.namespace`, if present.
    pub fn namespace(&self) -> Option<&str> {
        self.object.get("metadata")?.get("namespace")?.as_str()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.object.get(field)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.object.get(field).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_flags() {
        assert_eq!(NamespaceScope::from_flags(None, false), NamespaceScope::Unscoped);
        assert_eq!(NamespaceScope::from_flags(Some(""), false), NamespaceScope::Unscoped);
        assert_eq!(NamespaceScope::from_flags(Some("ns-a"), true), NamespaceScope::All);
        assert_eq!(
            NamespaceScope::from_flags(Some(ALL_NAMESPACES), false),
            NamespaceScope::All
        );
        assert_eq!(
            NamespaceScope::from_flags(Some("ns-a"), false),
            NamespaceScope::Namespace("ns-a".to_string())
        );
    }

    #[test]
    fn query_lowercases_type_and_drops_empty_name() {
        let query = ResourceQuery::new("StorageClass").with_name("");
        assert_eq!(query.resource_type(), "storageclass");
        assert_eq!(query.name(), None);
    }

    #[test]
    fn document_requires_kind_and_api_version() {
        let doc = StructuredDocument::from_slice(
            br#"{"kind":"Pod","apiVersion":"v1","metadata":{"name":"p1","namespace":"ns-a"}}"#,
        )
        .unwrap();
        assert_eq!(doc.kind(), "Pod");
        assert_eq!(doc.api_version(), "v1");
        assert_eq!(doc.name(), Some("p1"));
        assert_eq!(doc.namespace(), Some("ns-a"));

        let err = StructuredDocument::from_slice(br#"{"apiVersion":"v1"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField(KIND_FIELD)));

        let err = StructuredDocument::from_slice(br#"{"kind":"","apiVersion":"v1"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidField(KIND_FIELD)));

        let err = StructuredDocument::from_slice(b"[1, 2]").unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject));

        let err = StructuredDocument::from_slice(b"plain text").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn empty_override_means_none() {
        let meta = TypeMeta::new("", "v1");
        assert_eq!(meta.value_for(KIND_FIELD), None);
        assert_eq!(meta.value_for(VERSION_FIELD), Some("v1"));
    }
}
