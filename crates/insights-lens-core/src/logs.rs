//! Container log selection.
//!
//! Logs live below a record's primary config directory:
//!
//! ```text
//! config/pod/<namespace>/logs/<pod>/<container>_current.log
//! config/pod/<namespace>/logs/<pod>/<container>_previous.log
//! ```

use crate::models::NamespaceScope;
use crate::pattern::{config_prefix, PathPattern, PatternError, Scheme, LEAF_TOKEN};

/// Maximum number of log streams returned for one request.
///
/// Selection stops at the first matching entry. When no container is named
/// the other containers of the record are not collected.
pub const LOG_MATCH_LIMIT: usize = 1;

/// A request for one log stream of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    resource_type: String,
    name: String,
    scope: NamespaceScope,
    container: Option<String>,
    previous: bool,
}

impl LogQuery {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into().to_lowercase(),
            name: name.into(),
            scope: NamespaceScope::Unscoped,
            container: None,
            previous: false,
        }
    }

    pub fn with_scope(mut self, scope: NamespaceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Selects a container. An empty name means "whichever is found first".
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        let container = container.into();
        self.container = if container.is_empty() {
            None
        } else {
            Some(container)
        };
        self
    }

    /// Selects the log of the previous container instance.
    pub fn with_previous(mut self, previous: bool) -> Self {
        self.previous = previous;
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &NamespaceScope {
        &self.scope
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn previous(&self) -> bool {
        self.previous
    }
}

fn stream_suffix(previous: bool) -> &'static str {
    if previous {
        "previous"
    } else {
        "current"
    }
}

/// Pattern for the query's log file, or `None` when no record name is set.
///
/// Log files always sit below a namespace directory, so an unscoped query
/// searches every namespace.
pub fn build_log_pattern(query: &LogQuery) -> Result<Option<PathPattern>, PatternError> {
    if query.name.is_empty() {
        return Ok(None);
    }
    let container = match query.container() {
        Some(container) => regex::escape(container),
        None => LEAF_TOKEN.to_string(),
    };
    let scope = match &query.scope {
        NamespaceScope::Unscoped => &NamespaceScope::All,
        scope => scope,
    };
    let pattern = format!(
        r"{}logs/{}/{container}_{}\.log$",
        config_prefix(&query.resource_type, scope),
        regex::escape(&query.name),
        stream_suffix(query.previous),
    );
    PathPattern::regex(Scheme::PrimaryConfig, &pattern).map(Some)
}

/// Container name and stream (`current`/`previous`) from a log file path.
pub fn container_and_stream(path: &str) -> (&str, Option<&str>) {
    let base = path.rsplit('/').next().unwrap_or(path);
    let base = base.strip_suffix(".log").unwrap_or(base);
    let mut parts = base.split('_');
    let container = parts.next().unwrap_or(base);
    (container, parts.next())
}
