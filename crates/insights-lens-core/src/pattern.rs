//! Path pattern engine.
//!
//! Translates a [`ResourceQuery`] into the ordered list of [`PathPattern`]s
//! that locate its records inside an Insights archive. The archive has
//! grown several layouts for the same logical record:
//!
//! | Scheme | Layout |
//! |--------|--------|
//! | [`Scheme::Singleton`] | `config/<type>.json` |
//! | [`Scheme::PrimaryConfig`] | `config[/storage]/<plural>/[<namespace>/]<name>(.json\|/<subpath>)` |
//! | [`Scheme::ConditionalNamespace`] | `conditional/namespaces/<namespace>/<plural>/<name>(.json\|/<subpath>)` |
//!
//! Patterns are returned in that order and the first one matching an entry
//! claims it. Every pattern is a pure function of the query; nothing is
//! mutated while composing them.

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::models::{NamespaceScope, ResourceQuery, ALL_TYPES};

/// Open match for a single type or namespace segment.
const SEGMENT_WILDCARD: &str = r"[a-z0-9\-]+";

/// Open match for a leaf file name or a key below a record directory.
pub(crate) const LEAF_TOKEN: &str = r"[a-z0-9\-\.]+";

/// Record types whose archive paths never carry a namespace segment.
const CLUSTER_SCOPED: &[&str] = &[
    "machineconfig",
    "machineconfigpool",
    "clusteroperator",
    "node",
    "storageclass",
    "hostsubnet",
];

/// Archive layout a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `config/<type>.json`; a match ends the scan.
    Singleton,
    PrimaryConfig,
    ConditionalNamespace,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Regex(Regex),
}

#[derive(Debug, Error)]
#[error("invalid path pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// A compiled path matching rule tagged with its scheme.
#[derive(Debug, Clone)]
pub struct PathPattern {
    scheme: Scheme,
    matcher: Matcher,
}

impl PathPattern {
    pub fn exact(scheme: Scheme, path: impl Into<String>) -> Self {
        Self {
            scheme,
            matcher: Matcher::Exact(path.into()),
        }
    }

    pub fn regex(scheme: Scheme, pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        trace!(?scheme, pattern, "compiled path pattern");
        Ok(Self {
            scheme,
            matcher: Matcher::Regex(regex),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn as_str(&self) -> &str {
        match &self.matcher {
            Matcher::Exact(path) => path,
            Matcher::Regex(regex) => regex.as_str(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => expected == path,
            Matcher::Regex(regex) => regex.is_match(path),
        }
    }
}

/// Normalizes a type name to its singular stem.
///
/// `sses` loses its `es`, a trailing `ss` is kept, and otherwise one
/// trailing `s` is dropped.
pub fn singular(resource_type: &str) -> &str {
    if resource_type.ends_with("sses") {
        &resource_type[..resource_type.len() - 2]
    } else if resource_type.ends_with("ss") {
        resource_type
    } else {
        resource_type.strip_suffix('s').unwrap_or(resource_type)
    }
}

/// Regex fragment matching both the singular and plural directory name.
///
/// `pod` and `pods` give `pods?`; `storageclass` gives `storageclasses?`.
pub fn plural(resource_type: &str) -> String {
    let stem = singular(resource_type);
    if stem.ends_with('s') {
        format!("{stem}es?")
    } else {
        format!("{stem}s?")
    }
}

/// Whether archive paths for this type carry a namespace segment.
pub fn is_namespaced(resource_type: &str) -> bool {
    !CLUSTER_SCOPED.contains(&singular(resource_type))
}

/// Exact path of the top-level file some types are stored in.
pub fn singleton_path(resource_type: &str) -> String {
    format!("config/{resource_type}.json")
}

fn type_segment(resource_type: &str) -> String {
    if resource_type == ALL_TYPES {
        SEGMENT_WILDCARD.to_string()
    } else {
        plural(resource_type)
    }
}

fn namespace_segment(scope: &NamespaceScope) -> Option<String> {
    match scope {
        NamespaceScope::Unscoped => None,
        NamespaceScope::Namespace(ns) => Some(regex::escape(ns)),
        NamespaceScope::All => Some(SEGMENT_WILDCARD.to_string()),
    }
}

/// Anchored prefix of the primary config scheme, ending in `/`.
///
/// Cluster-scoped types never get a namespace segment, whatever the scope.
pub fn config_prefix(resource_type: &str, scope: &NamespaceScope) -> String {
    let mut prefix = format!("^config(/storage)?/{}/", type_segment(resource_type));
    if is_namespaced(resource_type) {
        if let Some(ns) = namespace_segment(scope) {
            prefix.push_str(&ns);
            prefix.push('/');
        }
    }
    prefix
}

/// Anchored prefix of the conditional scheme. Needs a namespace scope.
fn conditional_prefix(resource_type: &str, scope: &NamespaceScope) -> Option<String> {
    let ns = namespace_segment(scope)?;
    Some(format!(
        "^conditional/namespaces/{ns}/{}/",
        type_segment(resource_type)
    ))
}

/// Tail shared by the regex schemes.
///
/// A named record is `<name>.json` or a file directly under `<name>/`.
/// Without a name any leaf matches, and nested keys may carry an extra
/// `.json`.
fn name_suffix(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(r"{}(\.json|/{LEAF_TOKEN})$", regex::escape(name)),
        None => format!(r"{LEAF_TOKEN}(\.json|/{LEAF_TOKEN})(\.json)?$"),
    }
}

/// Ordered patterns for a query: singleton, primary config, conditional.
pub fn build_patterns(query: &ResourceQuery) -> Result<Vec<PathPattern>, PatternError> {
    let resource_type = query.resource_type();
    let suffix = name_suffix(query.name());

    let mut patterns = vec![PathPattern::exact(
        Scheme::Singleton,
        singleton_path(resource_type),
    )];
    patterns.push(PathPattern::regex(
        Scheme::PrimaryConfig,
        &format!("{}{suffix}", config_prefix(resource_type, query.scope())),
    )?);
    if let Some(prefix) = conditional_prefix(resource_type, query.scope()) {
        patterns.push(PathPattern::regex(
            Scheme::ConditionalNamespace,
            &format!("{prefix}{suffix}"),
        )?);
    }
    Ok(patterns)
}

/// First pattern matching `path`, in list order.
pub fn first_match<'a>(patterns: &'a [PathPattern], path: &str) -> Option<&'a PathPattern> {
    let found = patterns.iter().find(|p| p.is_match(path));
    if let Some(pattern) = found {
        trace!(path, pattern = pattern.as_str(), "path matched");
    }
    found
}
