//! `ilens use`: remember the archive later commands read from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::archive::InsightsArchive;
use crate::config::{load_config, save_config};

/// Validates `archive` and stores its absolute path as the active archive.
pub fn use_archive(config_path: &Path, archive: &Path) -> Result<PathBuf> {
    InsightsArchive::open(archive)?;
    let absolute = std::fs::canonicalize(archive)
        .with_context(|| format!("Failed to resolve archive path: {}", archive.display()))?;

    let mut config = load_config(config_path)?;
    config.active = Some(absolute.clone());
    save_config(config_path, &config)?;
    info!(archive = %absolute.display(), config = %config_path.display(), "active archive updated");
    Ok(absolute)
}

pub fn run_use(config_path: &Path, archive: &Path) -> Result<()> {
    let active = use_archive(config_path, archive)?;
    println!("Using insights archive {}", active.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gzipped_tarball;
    use tempfile::TempDir;

    #[test]
    fn stores_absolute_path() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("insights.tar.gz");
        std::fs::write(&archive, gzipped_tarball(&[])).unwrap();
        let config_path = tmp.path().join("cfg").join("config.toml");

        let active = use_archive(&config_path, &archive).unwrap();
        assert!(active.is_absolute());

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.active, Some(active));
    }

    #[test]
    fn keeps_other_settings() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("insights.tar.gz");
        std::fs::write(&archive, gzipped_tarball(&[])).unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();

        use_archive(&config_path, &archive).unwrap();
        let config = load_config(&config_path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.active.is_some());
    }

    #[test]
    fn invalid_archive_is_not_stored() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("notes.txt");
        std::fs::write(&archive, "hello").unwrap();
        let config_path = tmp.path().join("config.toml");

        assert!(use_archive(&config_path, &archive).is_err());
        assert!(!config_path.exists());
    }
}
