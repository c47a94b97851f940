//! Record type listing for `ilens api-resources`.

use std::io::Write;

use anyhow::{Context, Result};

use crate::archive::InsightsArchive;

/// Writes the `NAME` table of record types, sorted.
pub fn render<'a>(out: &mut impl Write, types: impl IntoIterator<Item = &'a str>) -> Result<()> {
    writeln!(out, "NAME")?;
    for resource_type in types {
        writeln!(out, "{resource_type}")?;
    }
    Ok(())
}

pub fn run_api_resources(archive: &InsightsArchive) -> Result<()> {
    let types = archive
        .resource_types()
        .with_context(|| format!("failed to list record types in {}", archive.path().display()))?;
    let stdout = std::io::stdout();
    render(&mut stdout.lock(), types.iter().map(String::as_str))
}
