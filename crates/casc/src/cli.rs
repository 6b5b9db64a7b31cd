//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// casc - Configuration-as-Code bundle utilities
#[derive(Parser, Debug)]
#[command(name = "casc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile plugins.yaml and plugin-catalog.yaml with the installed plugins
    UpdatePlugins(UpdatePluginsArgs),

    /// Show the expected plugin set without touching any file
    AnalyzePlugins(AnalyzePluginsArgs),
}

/// Where the installed plugin list and the bundle come from
#[derive(Args, Debug, Clone)]
pub struct PluginSourceArgs {
    /// Plugin manager JSON export to read instead of querying a controller
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub plugins_json: Option<Utf8PathBuf>,

    /// Controller URL
    #[arg(long, env = "BUNDLEUTILS_URL")]
    pub url: Option<String>,

    /// Controller username
    #[arg(long, env = "BUNDLEUTILS_USERNAME", requires = "password")]
    pub username: Option<String>,

    /// Controller password or API token
    #[arg(long, env = "BUNDLEUTILS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// How the expected list is derived: AUTO, ROOTS, ROOTS_AND_DEPS, ALL
    #[arg(
        long,
        env = "BUNDLEUTILS_PLUGINS_JSON_LIST_STRATEGY",
        default_value = "AUTO"
    )]
    pub list_strategy: String,

    /// Prune dependencies already guaranteed by the CAP envelope
    #[arg(long, env = "BUNDLEUTILS_PLUGINS_USE_CAP", requires = "envelope")]
    pub use_cap: bool,

    /// envelope.json of the target product version
    #[arg(long, value_name = "FILE")]
    pub envelope: Option<Utf8PathBuf>,

    /// Bundle directory holding bundle.yaml, plugins.yaml and plugin-catalog.yaml
    #[arg(
        long,
        env = "BUNDLEUTILS_FETCH_TARGET_DIR",
        default_value = "target/docs"
    )]
    pub target_dir: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdatePluginsArgs {
    #[command(flatten)]
    pub source: PluginSourceArgs,

    /// How existing entries are merged: DO_NOTHING, ADD_ONLY, ADD_DELETE, ADD_DELETE_SKIP_PINNED, ALL
    #[arg(
        long,
        env = "BUNDLEUTILS_PLUGINS_JSON_MERGE_STRATEGY",
        default_value = "ADD_DELETE_SKIP_PINNED"
    )]
    pub merge_strategy: String,

    /// Print the diff listings
    #[arg(long)]
    pub show_diffs: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzePluginsArgs {
    #[command(flatten)]
    pub source: PluginSourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
