//! # Insights Lens
//!
//! Read-only queries over OpenShift Insights archives.
//!
//! An Insights archive is a gzip-compressed tarball of cluster state:
//! resource definitions as JSON files, ConfigMaps exploded into one file
//! per key, and container logs. Insights Lens answers kubectl-style
//! questions against it without unpacking it to disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │  CLI (ilens) │──▶│   archive     │──▶│  scan (one pass) │
//! │ get/logs/... │   │ gzip + paths  │   │  match+normalize │
//! └──────────────┘   └──────────────┘   └────────┬─────────┘
//!                                                 │
//!                          insights-lens-core ◀───┘
//!                   patterns · normalizer · reconstructor
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ilens use ./insights-2024-05-01.tar.gz
//! ilens get pods -n openshift-etcd
//! ilens get cm/openshift-install -n openshift-config -o json
//! ilens logs etcd-0 -c etcd -n openshift-etcd
//! ilens api-resources
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archive`] | Opening and validating archives |
//! | [`scan`] | Single-pass extraction, log and type scans |
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`get`] | `ilens get` |
//! | [`logs`] | `ilens logs` |
//! | [`api_resources`] | `ilens api-resources` |
//! | [`use_archive`] | `ilens use` |

pub mod api_resources;
pub mod archive;
pub mod config;
pub mod get;
pub mod logging;
pub mod logs;
pub mod scan;
pub mod use_archive;

#[cfg(test)]
mod test_support;
