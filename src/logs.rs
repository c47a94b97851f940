//! Container log retrieval for `ilens logs`.

use std::io::Write;

use anyhow::{bail, Context, Result};
use insights_lens_core::alias::unalias;
use insights_lens_core::logs::LogQuery;
use insights_lens_core::NamespaceScope;

use crate::archive::InsightsArchive;
use crate::scan::{ContainerSelection, LogStream};

/// Record type assumed when the target has no `<type>/` prefix.
pub const DEFAULT_LOG_TYPE: &str = "pod";

/// Splits `<name>` or `<type>/<name>` into an unaliased type and a name.
pub fn log_target(target: &str) -> Result<(String, String)> {
    let (resource_type, name) = match target.split_once('/') {
        Some((resource_type, name)) => (unalias(&resource_type.to_lowercase()).to_string(), name),
        None => (DEFAULT_LOG_TYPE.to_string(), target),
    };
    if resource_type.is_empty() || name.is_empty() {
        bail!("expected <name> or <type>/<name>, got '{target}'");
    }
    Ok((resource_type, name.to_string()))
}

pub fn build_log_query(
    target: &str,
    container: Option<&str>,
    previous: bool,
    namespace: Option<&str>,
) -> Result<LogQuery> {
    let (resource_type, name) = log_target(target)?;
    let mut query = LogQuery::new(resource_type, name)
        .with_scope(NamespaceScope::from_flags(namespace, false))
        .with_previous(previous);
    if let Some(container) = container {
        query = query.with_container(container);
    }
    Ok(query)
}

/// Core logs function returning the selected stream.
pub fn get_log(archive: &InsightsArchive, query: &LogQuery) -> Result<LogStream> {
    let found = archive
        .read_log(query)
        .with_context(|| format!("failed to read logs from {}", archive.path().display()))?;
    match found {
        Some(log) => Ok(log),
        None => bail!(
            "no logs found for {}/{}{}",
            query.resource_type(),
            query.name(),
            query
                .container()
                .map(|c| format!(" container {c}"))
                .unwrap_or_default()
        ),
    }
}

/// CLI entry point: writes the log body to stdout.
pub fn run_logs(
    archive: &InsightsArchive,
    target: &str,
    container: Option<&str>,
    previous: bool,
    namespace: Option<&str>,
) -> Result<()> {
    let query = build_log_query(target, container, previous, namespace)?;
    let log = get_log(archive, &query)?;
    if log.selection == ContainerSelection::Defaulted {
        eprintln!("Defaulted container \"{}\"", log.container);
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(log.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_forms() {
        assert_eq!(
            log_target("etcd-0").unwrap(),
            ("pod".to_string(), "etcd-0".to_string())
        );
        assert_eq!(
            log_target("po/etcd-0").unwrap(),
            ("pod".to_string(), "etcd-0".to_string())
        );
        assert!(log_target("pod/").is_err());
        assert!(log_target("/etcd-0").is_err());
        assert!(log_target("").is_err());
    }

    #[test]
    fn query_from_flags() {
        let query = build_log_query("etcd-0", Some("etcd"), true, Some("openshift-etcd")).unwrap();
        assert_eq!(query.resource_type(), "pod");
        assert_eq!(query.name(), "etcd-0");
        assert_eq!(query.container(), Some("etcd"));
        assert!(query.previous());
        assert_eq!(
            query.scope(),
            &NamespaceScope::Namespace("openshift-etcd".to_string())
        );
    }
}
