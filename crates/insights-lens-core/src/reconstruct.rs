//! Exploded record reconstruction.
//!
//! ConfigMaps are not stored as one JSON file in Insights archives. Each
//! data key is its own entry:
//!
//! ```text
//! config/configmaps/<namespace>/<configmap>/<key>
//! ```
//!
//! [`RecordAccumulator`] collects those entries during a scan and
//! [`RecordAccumulator::flatten`] turns them back into one ConfigMap
//! document per `(namespace, name)` once the scan is over.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::StructuredDocument;

/// Directory below `config/` that holds exploded records.
pub const EXPLODED_RECORDS_DIR: &str = "configmaps";

/// `kind` of every reconstructed document.
pub const EXPLODED_RECORD_KIND: &str = "ConfigMap";

/// `apiVersion` of every reconstructed document.
pub const EXPLODED_RECORD_VERSION: &str = "v1";

const EXPLODED_PATH_SEGMENTS: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("unrecognized resource path: {0}")]
    UnrecognizedResourcePath(String),
}

/// Coordinates of one exploded record entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodedPath<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub key: &'a str,
}

impl<'a> ExplodedPath<'a> {
    /// Splits `config/configmaps/<namespace>/<name>/<key>`.
    ///
    /// A trailing `/` is trimmed first; anything other than exactly five
    /// non-empty segments under the exploded records directory is rejected.
    pub fn parse(path: &'a str) -> Result<Self, PathError> {
        let unrecognized = || PathError::UnrecognizedResourcePath(path.to_string());
        let parts: Vec<&str> = path.strip_suffix('/').unwrap_or(path).split('/').collect();
        if parts.len() != EXPLODED_PATH_SEGMENTS {
            return Err(unrecognized());
        }
        if parts[0] != "config" || parts[1] != EXPLODED_RECORDS_DIR {
            return Err(unrecognized());
        }
        if parts[2..].iter().any(|p| p.is_empty()) {
            return Err(unrecognized());
        }
        Ok(Self {
            namespace: parts[2],
            name: parts[3],
            key: parts[4],
        })
    }
}

type Records = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// namespace -> record name -> key -> value.
///
/// Ordered maps keep [`flatten`](Self::flatten) output lexical by namespace,
/// then by record name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordAccumulator {
    records: Records,
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at `(namespace, name, key)`, replacing any earlier value.
    pub fn accumulate(&mut self, namespace: &str, name: &str, key: &str, value: impl Into<String>) {
        self.records
            .entry(namespace.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn value(&self, namespace: &str, name: &str, key: &str) -> Option<&str> {
        self.records
            .get(namespace)?
            .get(name)?
            .get(key)
            .map(String::as_str)
    }

    /// Number of distinct `(namespace, name)` records.
    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One ConfigMap document per accumulated record.
    pub fn flatten(self) -> Vec<StructuredDocument> {
        let mut documents = Vec::with_capacity(self.len());
        for (namespace, records) in self.records {
            for (name, data) in records {
                let data: Map<String, Value> = data
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect();
                let mut body = Map::new();
                body.insert(
                    "metadata".to_string(),
                    json!({ "name": name, "namespace": namespace }),
                );
                body.insert("data".to_string(), Value::Object(data));
                documents.push(StructuredDocument::with_type_meta(
                    EXPLODED_RECORD_KIND,
                    EXPLODED_RECORD_VERSION,
                    body,
                ));
            }
        }
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exploded_path() {
        let parsed =
            ExplodedPath::parse("config/configmaps/kube-system/cluster-config-v1/install-config")
                .unwrap();
        assert_eq!(parsed.namespace, "kube-system");
        assert_eq!(parsed.name, "cluster-config-v1");
        assert_eq!(parsed.key, "install-config");
    }

    #[test]
    fn trailing_separator_is_rejected() {
        let err = ExplodedPath::parse("config/configmaps/kube-system/cluster-config-v1/").unwrap_err();
        assert_eq!(
            err,
            PathError::UnrecognizedResourcePath(
                "config/configmaps/kube-system/cluster-config-v1/".to_string()
            )
        );
    }

    #[test]
    fn other_shapes_are_rejected() {
        for path in [
            "config/configmaps/kube-system/cluster-config-v1",
            "config/configmaps/kube-system/cm/key/extra",
            "config/pod/kube-system/pod-1/key",
            "conditional/configmaps/kube-system/cm/key",
            "config/configmaps//cm/key",
        ] {
            assert!(ExplodedPath::parse(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn keys_accumulate_into_one_record() {
        let mut acc = RecordAccumulator::new();
        acc.accumulate("kube-system", "cluster-config-v1", "install-config", "value");
        acc.accumulate("kube-system", "cluster-config-v1", "new-key", "new-value");
        assert_eq!(acc.len(), 1);

        let docs = acc.flatten();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.kind(), EXPLODED_RECORD_KIND);
        assert_eq!(doc.api_version(), EXPLODED_RECORD_VERSION);
        assert_eq!(doc.name(), Some("cluster-config-v1"));
        assert_eq!(doc.namespace(), Some("kube-system"));
        assert_eq!(
            doc.get("data"),
            Some(&json!({"install-config": "value", "new-key": "new-value"}))
        );
    }

    #[test]
    fn later_insert_overwrites() {
        let mut acc = RecordAccumulator::new();
        acc.accumulate("kube-system", "cm", "key", "old");
        acc.accumulate("kube-system", "cm", "key", "new");
        assert_eq!(acc.value("kube-system", "cm", "key"), Some("new"));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn namespaces_stay_separate() {
        let mut acc = RecordAccumulator::new();
        acc.accumulate("new-namespace", "cm", "key", "b");
        acc.accumulate("kube-system", "cm", "key", "a");
        acc.accumulate("kube-system", "another", "key", "c");

        let docs = acc.flatten();
        let coords: Vec<(Option<&str>, Option<&str>)> =
            docs.iter().map(|d| (d.namespace(), d.name())).collect();
        assert_eq!(
            coords,
            vec![
                (Some("kube-system"), Some("another")),
                (Some("kube-system"), Some("cm")),
                (Some("new-namespace"), Some("cm")),
            ]
        );
    }

    #[test]
    fn empty_accumulator_flattens_to_nothing() {
        let acc = RecordAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.flatten().is_empty());
    }
}
