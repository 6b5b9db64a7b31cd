//! CLI command implementations

pub mod analyze_plugins;
pub mod update_plugins;

use anyhow::{bail, Context, Result};
use casc_core::config::{load_envelope, load_plugin_list};
use casc_core::types::{EnvelopeManifest, ListStrategy, PluginList};
use casc_core::{BundleLayout, EngineConfig};
use casc_plugins::{analyze, fetch_plugin_list, resolve_list_strategy, Credentials, PluginAnalysis};
use tracing::debug;

use crate::cli::PluginSourceArgs;

/// Everything a plugin command needs after the sanity gate passed
pub struct PreparedAnalysis {
    pub config: EngineConfig,
    pub layout: BundleLayout,
    pub analysis: PluginAnalysis,
}

/// Load inputs and run the analysis pipeline up to and including the sanity gate
pub async fn prepare(source: &PluginSourceArgs, merge_strategy: &str) -> Result<PreparedAnalysis> {
    let config = EngineConfig::from_names(&source.list_strategy, merge_strategy, source.use_cap)?;
    let layout = BundleLayout::new(source.target_dir.clone());
    debug!("Bundle directory: {}", layout.dir());

    let api_version = if config.list_strategy == ListStrategy::Auto {
        layout.load_bundle()?.and_then(|b| b.api_version())
    } else {
        None
    };
    let strategy = resolve_list_strategy(
        config.list_strategy,
        api_version.as_deref(),
        layout.bundle_path().as_str(),
    )?;

    let plugins = load_plugins(source).await?;
    let envelope = load_cap_envelope(source)?;

    let analysis = analyze(&plugins.plugins, strategy, envelope.as_ref())?;
    Ok(PreparedAnalysis {
        config,
        layout,
        analysis,
    })
}

async fn load_plugins(source: &PluginSourceArgs) -> Result<PluginList> {
    if let Some(path) = &source.plugins_json {
        return load_plugin_list(path)
            .with_context(|| format!("Failed to read plugin list from {}", path));
    }
    let Some(url) = &source.url else {
        bail!("No plugin source given: use --plugins-json or --url (BUNDLEUTILS_URL)");
    };
    let credentials = match (&source.username, &source.password) {
        (Some(user), Some(password)) => Some(Credentials::new(user, password)),
        _ => None,
    };
    Ok(fetch_plugin_list(url, credentials.as_ref()).await?)
}

fn load_cap_envelope(source: &PluginSourceArgs) -> Result<Option<EnvelopeManifest>> {
    if !source.use_cap {
        return Ok(None);
    }
    let Some(path) = &source.envelope else {
        bail!("--use-cap needs an envelope manifest (--envelope FILE)");
    };
    let envelope =
        load_envelope(path).with_context(|| format!("Failed to read envelope from {}", path))?;
    Ok(Some(envelope))
}
