//! In-memory archive fixtures for unit tests.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Uncompressed tarball holding `entries` in order.
pub(crate) fn tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, body) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o600);
        builder.append_data(&mut header, path, *body).unwrap();
    }
    builder.into_inner().unwrap()
}

/// `tarball(entries)` wrapped in gzip, as the collector writes it.
pub(crate) fn gzipped_tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tarball(entries)).unwrap();
    encoder.finish().unwrap()
}

/// A single entry whose header claims `claimed_size` bytes but whose
/// archive ends after `body`, with no padding or end-of-archive blocks.
pub(crate) fn truncated_tarball(path: &str, claimed_size: u64, body: &[u8]) -> Vec<u8> {
    let mut header = tar::Header::new_gnu();
    header.set_path(path).unwrap();
    header.set_size(claimed_size);
    header.set_mode(0o600);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();
    let mut bytes = header.as_bytes().to_vec();
    bytes.extend_from_slice(body);
    bytes
}
