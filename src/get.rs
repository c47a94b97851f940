//! Resource retrieval.
//!
//! Backs `ilens get`. Arguments follow kubectl: `<type>`, `<type>/<name>`
//! or `<type> <name>`, with the type unaliased (`cm`, `co`, `po`, ...).

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use insights_lens_core::alias::unalias;
use insights_lens_core::{NamespaceScope, ResourceQuery, StructuredDocument};
use serde_json::json;

use crate::archive::InsightsArchive;
use crate::config::Config;

/// `-o` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `NAME` header and one record name per line.
    #[default]
    Name,
    /// A single `List` document.
    Json,
}

/// Splits kubectl-style arguments into an unaliased type and optional name.
pub fn resource_args(args: &[String]) -> Result<(String, Option<String>)> {
    let (resource_type, name) = match args {
        [] => bail!("a resource type is required"),
        [single] => match single.split_once('/') {
            Some((resource_type, name)) => (resource_type, Some(name)),
            None => (single.as_str(), None),
        },
        [resource_type, name] => {
            if resource_type.contains('/') {
                bail!("there is no need to specify a name when using <type>/<name> form");
            }
            (resource_type.as_str(), Some(name.as_str()))
        }
        _ => bail!("expected at most a type and a name, got {} arguments", args.len()),
    };
    if resource_type.is_empty() {
        bail!("a resource type is required");
    }
    let resource_type = unalias(&resource_type.to_lowercase()).to_string();
    let name = name.filter(|n| !n.is_empty()).map(str::to_string);
    Ok((resource_type, name))
}

/// Query for `ilens get` arguments.
pub fn build_query(
    args: &[String],
    namespace: Option<&str>,
    all_namespaces: bool,
) -> Result<ResourceQuery> {
    let (resource_type, name) = resource_args(args)?;
    let mut query = ResourceQuery::new(resource_type)
        .with_scope(NamespaceScope::from_flags(namespace, all_namespaces));
    if let Some(name) = name {
        query = query.with_name(name);
    }
    Ok(query)
}

/// Core get function returning the matched documents.
pub fn get_resources(
    config: &Config,
    archive: &InsightsArchive,
    query: &ResourceQuery,
) -> Result<Vec<StructuredDocument>> {
    archive
        .extract(query, &config.extract.options())
        .with_context(|| format!("failed to read {} from {}", query.resource_type(), archive.path().display()))
}

/// Writes `documents` in the requested format.
pub fn render(
    out: &mut impl Write,
    documents: Vec<StructuredDocument>,
    scope: &NamespaceScope,
    format: OutputFormat,
) -> Result<()> {
    if documents.is_empty() && format == OutputFormat::Name {
        match scope.namespace() {
            Some(ns) => writeln!(out, "No resources found in {ns} namespace.")?,
            None => writeln!(out, "No resources found.")?,
        }
        return Ok(());
    }

    match format {
        OutputFormat::Name => {
            writeln!(out, "NAME")?;
            for doc in &documents {
                writeln!(out, "{}", doc.name().unwrap_or_default())?;
            }
        }
        OutputFormat::Json => {
            let list = json!({
                "apiVersion": "v1",
                "kind": "List",
                "items": documents,
            });
            serde_json::to_writer_pretty(&mut *out, &list)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// CLI entry point: extracts and prints to stdout.
pub fn run_get(
    config: &Config,
    archive: &InsightsArchive,
    args: &[String],
    namespace: Option<&str>,
    all_namespaces: bool,
    format: OutputFormat,
) -> Result<()> {
    let query = build_query(args, namespace, all_namespaces)?;
    let documents = get_resources(config, archive, &query)?;
    let stdout = std::io::stdout();
    render(&mut stdout.lock(), documents, query.scope(), format)
}
