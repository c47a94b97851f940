//! Single-pass archive scanning.
//!
//! Every function here walks a decompressed tar stream exactly once, front
//! to back. Entry bodies are only read for entries whose path matched.
//!
//! # Extraction
//!
//! For each entry, in archive order:
//!
//! 1. The singleton path `config/<type>.json` ends the scan and is returned
//!    on its own.
//! 2. Otherwise the first matching pattern (primary config, then
//!    conditional) claims the entry and its body is normalized.
//! 3. A body that does not normalize but sits at
//!    `config/configmaps/<ns>/<name>/<key>` is accumulated as a ConfigMap key.
//! 4. Anything else is skipped. Archives are full of logs and binary blobs
//!    that no query cares about.
//!
//! Reconstructed ConfigMaps are appended after the directly matched
//! documents. Stream errors abort the scan and discard whatever was matched.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::{self, Read};

use insights_lens_core::logs::{build_log_pattern, container_and_stream, LogQuery, LOG_MATCH_LIMIT};
use insights_lens_core::normalize::normalize;
use insights_lens_core::pattern::{build_patterns, first_match, PathPattern, Scheme};
use insights_lens_core::reconstruct::{ExplodedPath, RecordAccumulator};
use insights_lens_core::type_meta::known_type_meta;
use insights_lens_core::{ResourceQuery, StructuredDocument, TypeMeta};
use tracing::{debug, info, trace};

use crate::archive::ArchiveError;

/// Knobs for [`extract`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Pass known `kind`/`apiVersion` values to the normalizer instead of
    /// the placeholder.
    pub infer_type_meta: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            infer_type_meta: true,
        }
    }
}

impl ExtractOptions {
    fn type_meta_for(&self, resource_type: &str) -> TypeMeta<'static> {
        if !self.infer_type_meta {
            return TypeMeta::NONE;
        }
        known_type_meta(resource_type).unwrap_or(TypeMeta::NONE)
    }
}

/// How the container of a [`LogStream`] was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerSelection {
    /// The caller named the container.
    Requested,
    /// No container was named; the first one found in the archive was used.
    Defaulted,
}

/// One container log read out of the archive.
#[derive(Debug, Clone)]
pub struct LogStream {
    pub path: String,
    pub container: String,
    pub selection: ContainerSelection,
    pub content: Vec<u8>,
}

impl LogStream {
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }
}

fn entry_path<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    String::from_utf8_lossy(&entry.path_bytes()).into_owned()
}

/// Upper bound on the buffer reserved from a header's size field.
const BODY_PREALLOC_LIMIT: u64 = 64 * 1024;

/// Reads a whole entry body.
///
/// The header size is untrusted: it only seeds a bounded preallocation, and
/// a body shorter than the header claims is a truncated archive.
fn read_body<R: Read>(entry: &mut tar::Entry<'_, R>) -> Result<Vec<u8>, ArchiveError> {
    let expected = entry.size();
    let mut raw = Vec::with_capacity(expected.min(BODY_PREALLOC_LIMIT) as usize);
    entry.read_to_end(&mut raw).map_err(ArchiveError::Read)?;
    if raw.len() as u64 != expected {
        return Err(ArchiveError::Read(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "truncated entry {}: header claims {expected} bytes, read {}",
                entry_path(entry),
                raw.len()
            ),
        )));
    }
    Ok(raw)
}

/// Extracts every document matching `query` from a decompressed tar stream.
pub fn extract<R: Read>(
    stream: R,
    query: &ResourceQuery,
    options: &ExtractOptions,
) -> Result<Vec<StructuredDocument>, ArchiveError> {
    let patterns = build_patterns(query)?;
    debug!(
        patterns = ?patterns.iter().map(PathPattern::as_str).collect::<Vec<_>>(),
        "searching archive"
    );
    let type_meta = options.type_meta_for(query.resource_type());

    let mut archive = tar::Archive::new(stream);
    let mut documents = Vec::new();
    let mut exploded = RecordAccumulator::new();

    for entry in archive.entries().map_err(ArchiveError::Read)? {
        let mut entry = entry.map_err(ArchiveError::Read)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry_path(&entry);
        trace!(path = %path, "scanning entry");

        let Some(pattern) = first_match(&patterns, &path) else {
            continue;
        };
        let scheme = pattern.scheme();
        let raw = read_body(&mut entry)?;

        if scheme == Scheme::Singleton {
            debug!(path = %path, "found well-known singleton path");
            let document = normalize(&raw, type_meta)
                .map_err(|source| ArchiveError::Deserialize { path, source })?;
            return Ok(vec![document]);
        }

        match normalize(&raw, type_meta) {
            Ok(document) => documents.push(document),
            Err(err) => match ExplodedPath::parse(&path) {
                Ok(record) => {
                    let value = String::from_utf8_lossy(&raw);
                    if let Cow::Owned(_) = value {
                        debug!(path = %path, "non UTF-8 bytes in key replaced with U+FFFD");
                    }
                    exploded.accumulate(record.namespace, record.name, record.key, value)
                }
                Err(path_err) => {
                    debug!(path = %path, error = %err, "skipping entry: {path_err}");
                }
            },
        }
    }

    debug!(
        matched = documents.len(),
        reconstructed = exploded.len(),
        "archive scan complete"
    );
    documents.extend(exploded.flatten());
    Ok(documents)
}

/// Reads the first log entry matching `query`.
///
/// Returns `None` when the query has no record name or nothing matched.
/// At most [`LOG_MATCH_LIMIT`] entries are taken; with no container named
/// that means one container's log, not all of them.
pub fn read_log<R: Read>(stream: R, query: &LogQuery) -> Result<Option<LogStream>, ArchiveError> {
    let Some(pattern) = build_log_pattern(query)? else {
        debug!("log selection needs a record name");
        return Ok(None);
    };
    debug!(pattern = pattern.as_str(), "searching archive for log");

    let mut archive = tar::Archive::new(stream);
    let mut found = Vec::with_capacity(LOG_MATCH_LIMIT);

    for entry in archive.entries().map_err(ArchiveError::Read)? {
        let mut entry = entry.map_err(ArchiveError::Read)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry_path(&entry);
        if !pattern.is_match(&path) {
            continue;
        }

        let content = read_body(&mut entry)?;
        let (container, selection) = match query.container() {
            Some(container) => (container.to_string(), ContainerSelection::Requested),
            None => {
                let (container, _) = container_and_stream(&path);
                info!(container, "defaulted container");
                (container.to_string(), ContainerSelection::Defaulted)
            }
        };
        found.push(LogStream {
            path,
            container,
            selection,
            content,
        });
        if found.len() >= LOG_MATCH_LIMIT {
            break;
        }
    }

    Ok(found.into_iter().next())
}

/// Record type directory named by an archive path, if any.
fn resource_type_of(path: &str) -> Option<&str> {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        ["config", leaf] => leaf.strip_suffix(".json"),
        ["config", "storage", resource_type, _, ..] => Some(*resource_type),
        ["config", "storage", ..] => None,
        ["config", resource_type, _, ..] => Some(*resource_type),
        ["conditional", "namespaces", _, resource_type, _, ..] => Some(*resource_type),
        _ => None,
    }
}

/// Distinct record type directory names in the archive, sorted.
pub fn resource_types<R: Read>(stream: R) -> Result<BTreeSet<String>, ArchiveError> {
    let mut archive = tar::Archive::new(stream);
    let mut types = BTreeSet::new();
    for entry in archive.entries().map_err(ArchiveError::Read)? {
        let entry = entry.map_err(ArchiveError::Read)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry_path(&entry);
        if let Some(resource_type) = resource_type_of(&path) {
            types.insert(resource_type.to_string());
        }
    }
    Ok(types)
}
