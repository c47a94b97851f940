//! Insights archive access.
//!
//! An Insights archive is a gzip-compressed tarball written once by the
//! collector and never modified. Tar streams can only be read front to
//! back, so [`InsightsArchive`] keeps just the path and opens a fresh
//! stream for every scan.
//!
//! # Errors
//!
//! | Condition | Error |
//! |-----------|-------|
//! | File missing or unreadable | [`ArchiveError::Open`] |
//! | File present but not gzip | [`ArchiveError::InvalidArchive`] |
//! | Corrupt or truncated stream during a scan | [`ArchiveError::Read`] |
//! | Singleton record that cannot be deserialized | [`ArchiveError::Deserialize`] |

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use insights_lens_core::logs::LogQuery;
use insights_lens_core::normalize::NormalizeError;
use insights_lens_core::pattern::PatternError;
use insights_lens_core::{ResourceQuery, StructuredDocument};
use thiserror::Error;
use tracing::debug;

use crate::scan::{self, ExtractOptions, LogStream};

/// gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unable to open insights archive {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no valid insights (gzip compressed) archive provided: {}", .path.display())]
    InvalidArchive { path: PathBuf },

    #[error("error reading insights archive: {0}")]
    Read(#[source] io::Error),

    #[error("unable to deserialize {path}: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: NormalizeError,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A validated Insights archive on disk.
#[derive(Debug, Clone)]
pub struct InsightsArchive {
    path: PathBuf,
}

impl InsightsArchive {
    /// Checks that `path` exists and is gzip-framed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        open_stream(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All documents matching `query`; see [`scan::extract`].
    pub fn extract(
        &self,
        query: &ResourceQuery,
        options: &ExtractOptions,
    ) -> Result<Vec<StructuredDocument>, ArchiveError> {
        scan::extract(open_stream(&self.path)?, query, options)
    }

    /// The first log stream matching `query`; see [`scan::read_log`].
    pub fn read_log(&self, query: &LogQuery) -> Result<Option<LogStream>, ArchiveError> {
        scan::read_log(open_stream(&self.path)?, query)
    }

    /// Record type directory names present in the archive.
    pub fn resource_types(&self) -> Result<BTreeSet<String>, ArchiveError> {
        scan::resource_types(open_stream(&self.path)?)
    }
}

/// Opens `path` as a decompressed tar stream.
///
/// The gzip magic is checked up front so a plain file is reported as
/// [`ArchiveError::InvalidArchive`] rather than a read failure mid-scan.
pub fn open_stream(path: &Path) -> Result<MultiGzDecoder<BufReader<File>>, ArchiveError> {
    let open_err = |source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    let mut reader = BufReader::new(file);
    let head = reader.fill_buf().map_err(open_err)?;
    if head.len() < GZIP_MAGIC.len() || head[..2] != GZIP_MAGIC {
        debug!(path = %path.display(), "missing gzip magic");
        return Err(ArchiveError::InvalidArchive {
            path: path.to_path_buf(),
        });
    }
    Ok(MultiGzDecoder::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gzipped_tarball;
    use std::fs;
    use tempfile::TempDir;

    const FAKE_OBJ: &[u8] = br#"{"kind":"FakeKind","apiVersion":"v1","metadata":{}}"#;

    #[test]
    fn missing_file_is_open_error() {
        let tmp = TempDir::new().unwrap();
        let err = InsightsArchive::open(tmp.path().join("nope.tar.gz")).unwrap_err();
        match err {
            ArchiveError::Open { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("expected Open, got {other:?}"),
        }
    }

    #[test]
    fn plain_file_is_invalid_archive() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.tar");
        fs::write(&path, b"definitely not gzip").unwrap();
        let err = InsightsArchive::open(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArchive { .. }));
        assert!(err.to_string().contains("gzip"));
    }

    #[test]
    fn empty_file_is_invalid_archive() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.tar.gz");
        fs::write(&path, b"").unwrap();
        let err = InsightsArchive::open(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArchive { .. }));
    }

    #[test]
    fn each_query_rescans_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("insights.tar.gz");
        fs::write(
            &path,
            gzipped_tarball(&[
                ("config/pod/ns-a/p1.json", FAKE_OBJ),
                ("config/pod/ns-b/p2.json", FAKE_OBJ),
            ]),
        )
        .unwrap();

        let archive = InsightsArchive::open(&path).unwrap();
        let options = ExtractOptions::default();
        let ns_a = ResourceQuery::new("pod").with_scope(
            insights_lens_core::NamespaceScope::Namespace("ns-a".to_string()),
        );
        assert_eq!(archive.extract(&ns_a, &options).unwrap().len(), 1);
        let all = ResourceQuery::new("pod").with_scope(insights_lens_core::NamespaceScope::All);
        assert_eq!(archive.extract(&all, &options).unwrap().len(), 2);
        assert_eq!(
            archive.resource_types().unwrap().into_iter().collect::<Vec<_>>(),
            vec!["pod".to_string()]
        );
    }

    #[test]
    fn corrupt_stream_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corrupt.tar.gz");
        // valid gzip header, reserved deflate block type
        let mut bytes = vec![0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 0xff];
        bytes.extend_from_slice(&[0xff; 64]);
        fs::write(&path, bytes).unwrap();

        let archive = InsightsArchive::open(&path).unwrap();
        let err = archive
            .extract(&ResourceQuery::new("pod"), &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Read(_)));
    }
}
