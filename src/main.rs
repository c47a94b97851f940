//! # Insights Lens CLI (`ilens`)
//!
//! Query resources and container logs out of an Insights archive.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ilens use <archive>` | Select the archive later commands read from |
//! | `ilens get <type>[/<name>]` | List matching records |
//! | `ilens logs <name>` | Print a container log |
//! | `ilens api-resources` | List the record types in the archive |
//!
//! ## Examples
//!
//! ```bash
//! # Remember an archive
//! ilens use ./insights.tar.gz
//!
//! # Pods in every namespace
//! ilens get pods -A
//!
//! # One ConfigMap, rebuilt from its exploded keys, as JSON
//! ilens get cm openshift-install -n openshift-config -o json
//!
//! # Previous instance of a container, without touching the config
//! ilens logs etcd-0 -c etcd -p -n openshift-etcd --insights-file ./other.tar.gz
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use insights_lens::archive::InsightsArchive;
use insights_lens::get::OutputFormat;
use insights_lens::{api_resources, config, get, logging, logs, use_archive};

/// Insights Lens CLI: kubectl-style queries over Insights archives.
#[derive(Parser)]
#[command(
    name = "ilens",
    about = "Insights Lens: query Kubernetes resources and logs out of Insights archives",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `$HOME/.insights-lens/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Archive to read instead of the one selected with `ilens use`.
    #[arg(long, global = true)]
    insights_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error or off.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short = 'v', long, global = true)]
    loglevel: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Select the Insights archive to read from.
    ///
    /// The archive is validated and its absolute path stored in the config
    /// file.
    Use {
        /// Path to a gzip-compressed Insights archive.
        archive: PathBuf,
    },

    /// List records of one type.
    ///
    /// Accepts `<type>`, `<type>/<name>` or `<type> <name>`. Short aliases
    /// such as `po`, `cm`, `co` and `ns` are understood.
    Get {
        #[arg(required = true, num_args = 1..=2, value_name = "TYPE[/NAME] [NAME]")]
        args: Vec<String>,

        /// Namespace to search.
        #[arg(short = 'n', long)]
        namespace: Option<String>,

        /// Search every namespace.
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Output format.
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Name)]
        output: OutputFormat,
    },

    /// Print a container log.
    ///
    /// Accepts `<name>` (a pod) or `<type>/<name>`.
    Logs {
        target: String,

        /// Container to read. Defaults to the first one found.
        #[arg(short = 'c', long)]
        container: Option<String>,

        /// Read the log of the previous container instance.
        #[arg(short = 'p', long)]
        previous: bool,

        /// Namespace of the record. Every namespace is searched when omitted.
        #[arg(short = 'n', long)]
        namespace: Option<String>,
    },

    /// List the record types present in the archive.
    ApiResources,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path)?;
    logging::init(cli.loglevel.as_deref(), &cfg.logging.level)?;

    let insights_file = cli.insights_file.as_deref();
    let open_archive = || -> anyhow::Result<InsightsArchive> {
        Ok(InsightsArchive::open(cfg.resolve_archive(insights_file)?)?)
    };

    match cli.command {
        Commands::Use { archive } => {
            use_archive::run_use(&config_path, &archive)?;
        }
        Commands::Get {
            args,
            namespace,
            all_namespaces,
            output,
        } => {
            get::run_get(
                &cfg,
                &open_archive()?,
                &args,
                namespace.as_deref(),
                all_namespaces,
                output,
            )?;
        }
        Commands::Logs {
            target,
            container,
            previous,
            namespace,
        } => {
            logs::run_logs(
                &open_archive()?,
                &target,
                container.as_deref(),
                previous,
                namespace.as_deref(),
            )?;
        }
        Commands::ApiResources => {
            api_resources::run_api_resources(&open_archive()?)?;
        }
    }

    Ok(())
}
