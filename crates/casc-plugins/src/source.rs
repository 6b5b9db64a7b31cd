//! Where plugin lists, envelopes and bundle descriptors come from

use casc_core::config::BundleLayout;
use casc_core::types::{BundleDescriptor, PluginList};
use casc_core::{Error, Result};
use camino::Utf8Path;
use tracing::{debug, info};

pub use casc_core::config::{load_envelope, load_plugin_list};

/// Plugin manager endpoint, relative to the controller URL
pub const PLUGIN_JSON_PATH: &str =
    "/manage/pluginManager/api/json?pretty&depth=1&tree=plugins[*[*]]";

/// Basic-auth credentials for the controller
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Full plugin manager URL for a controller base URL
pub fn plugin_json_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PLUGIN_JSON_PATH)
}

/// Fetch the installed plugin list from a running controller
///
/// One GET, no retry. Non-2xx responses become [`Error::Fetch`].
pub async fn fetch_plugin_list(base_url: &str, credentials: Option<&Credentials>) -> Result<PluginList> {
    let url = plugin_json_url(base_url);
    info!("Fetching plugin list from {}", url);

    let client = reqwest::Client::builder()
        .user_agent(concat!("casc/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::fetch(&url, e.to_string()))?;

    let mut request = client.get(&url);
    if let Some(creds) = credentials {
        debug!("Using basic auth as {}", creds.username);
        request = request.basic_auth(&creds.username, Some(&creds.password));
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::fetch(&url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::fetch(&url, format!("HTTP {}", response.status())));
    }

    let list: PluginList = response
        .json()
        .await
        .map_err(|e| Error::fetch(&url, e.to_string()))?;
    debug!("Fetched {} plugins", list.plugins.len());
    Ok(list)
}

/// `<dir>/bundle.yaml`, or `None` when the bundle has none
pub fn load_bundle_descriptor(dir: &Utf8Path) -> Result<Option<BundleDescriptor>> {
    BundleLayout::new(dir).load_bundle()
}
