//! Document normalization.
//!
//! The collector that writes Insights archives strips `kind` and
//! `apiVersion` from some otherwise well-formed payloads. [`normalize`]
//! fills the missing fields in and retries, so those payloads still come out
//! as [`StructuredDocument`]s. Fields that are present are never touched.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::trace;

use crate::models::{DocumentError, StructuredDocument, TypeMeta, KIND_FIELD, VERSION_FIELD};

/// Placeholder written into a missing type field when no override is given.
pub const MISSING_TYPE_META_VALUE: &str = "DUMMY";

/// Fields the collector is known to drop.
const REPAIRABLE_FIELDS: [&str; 2] = [KIND_FIELD, VERSION_FIELD];

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The payload is not a JSON object at all.
    #[error("unable to deserialize document: {original}")]
    NotStructured {
        original: DocumentError,
        #[source]
        source: serde_json::Error,
    },

    /// The repaired payload still failed to parse.
    #[error("unable to deserialize document: {original} (after repair: {retry})")]
    RepairFailed {
        original: DocumentError,
        #[source]
        retry: DocumentError,
    },

    #[error("unable to re-serialize repaired document: {0}")]
    Reserialize(#[source] serde_json::Error),
}

/// Parses `raw` as a structured document, filling in `kind`/`apiVersion`
/// when they are absent.
///
/// Missing fields take the override from `type_meta` when one is set and
/// [`MISSING_TYPE_META_VALUE`] otherwise.
pub fn normalize(raw: &[u8], type_meta: TypeMeta<'_>) -> Result<StructuredDocument, NormalizeError> {
    let original = match StructuredDocument::from_slice(raw) {
        Ok(doc) => return Ok(doc),
        Err(err) => err,
    };

    let mut tree: Map<String, Value> = match serde_json::from_slice(raw) {
        Ok(tree) => tree,
        Err(source) => return Err(NormalizeError::NotStructured { original, source }),
    };
    for field in REPAIRABLE_FIELDS {
        tree.entry(field).or_insert_with(|| {
            let value = type_meta.value_for(field).unwrap_or(MISSING_TYPE_META_VALUE);
            Value::String(value.to_string())
        });
    }

    trace!("retrying document parse after filling missing type fields");
    let repaired = serde_json::to_vec(&tree).map_err(NormalizeError::Reserialize)?;
    StructuredDocument::from_slice(&repaired)
        .map_err(|retry| NormalizeError::RepairFailed { original, retry })
}
