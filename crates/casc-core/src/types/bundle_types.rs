//! Bundle file types (bundle.yaml, plugins.yaml, plugin-catalog.yaml, envelope.json)

use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};
use std::collections::BTreeMap;

/// Bundle descriptor (bundle.yaml), read only for its apiVersion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Bundle API version ("1" or "2")
    #[serde(rename = "apiVersion", default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<ApiVersion>,
}

/// apiVersion as written in bundle.yaml, either quoted or bare
///
/// Anything else (floats, booleans, collections) lands in `Other` so that it
/// is rejected as an invalid apiVersion instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiVersion {
    Text(String),
    Number(i64),
    Other(Value),
}

impl ApiVersion {
    /// Normalized string form (`1` and `"1"` are the same version)
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Other(Value::Number(n)) => n.to_string(),
            Self::Other(Value::Bool(b)) => b.to_string(),
            Self::Other(other) => format!("{other:?}"),
        }
    }
}

impl BundleDescriptor {
    /// Normalized apiVersion, treating an empty value as absent
    pub fn api_version(&self) -> Option<String> {
        self.api_version
            .as_ref()
            .map(ApiVersion::as_string)
            .filter(|v| !v.is_empty())
    }
}

/// Declared plugin list (plugins.yaml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginsFile {
    /// Declared entries
    #[serde(default)]
    pub plugins: Vec<DeclaredEntry>,

    /// Any other top-level keys, preserved on rewrite
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One entry of plugins.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredEntry {
    /// Plugin id
    pub id: String,

    /// Pinned version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Pinned download url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Any other keys, preserved on rewrite
    #[serde(flatten)]
    pub extra: Mapping,
}

impl DeclaredEntry {
    /// Unpinned entry
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            url: None,
            extra: Mapping::new(),
        }
    }

    /// Pin to a version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Pin to a url
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Carries a version or url
    pub fn is_pinned(&self) -> bool {
        self.version.is_some() || self.url.is_some()
    }
}

impl PluginsFile {
    /// Build from entries
    pub fn from_entries(plugins: Vec<DeclaredEntry>) -> Self {
        Self {
            plugins,
            extra: Mapping::new(),
        }
    }

    /// Declared ids, in file order
    pub fn ids(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.id.clone()).collect()
    }
}

/// Plugin catalog (plugin-catalog.yaml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog configurations
    #[serde(default)]
    pub configurations: Vec<CatalogConfiguration>,

    /// type, version, name, displayName...
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One configuration block of a plugin catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfiguration {
    /// Catalog-managed plugins keyed by id
    #[serde(
        rename = "includePlugins",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_plugins: Option<Mapping>,

    /// description, prerequisites...
    #[serde(flatten)]
    pub extra: Mapping,
}

impl CatalogConfiguration {
    /// Ids under includePlugins, in file order
    pub fn plugin_ids(&self) -> Vec<String> {
        self.include_plugins
            .iter()
            .flat_map(|m| m.keys())
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }

    /// Remove an id from includePlugins, keeping the order of the rest
    pub fn remove_plugin(&mut self, id: &str) -> bool {
        let Some(plugins) = self.include_plugins.as_mut() else {
            return false;
        };
        let before = plugins.len();
        plugins.retain(|key, _| key.as_str() != Some(id));
        plugins.len() != before
    }
}

impl CatalogFile {
    /// All catalog-managed ids across configurations, in file order
    pub fn plugin_ids(&self) -> Vec<String> {
        self.configurations
            .iter()
            .flat_map(CatalogConfiguration::plugin_ids)
            .collect()
    }
}

/// Distribution envelope manifest (envelope.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeManifest {
    /// Product-managed plugins keyed by id
    #[serde(default)]
    pub plugins: BTreeMap<String, EnvelopeEntry>,
}

/// Envelope entry for a product-managed plugin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeEntry {
    /// Distribution scope, e.g. "bootstrap" or "fat"
    #[serde(default)]
    pub scope: String,
}

impl EnvelopeEntry {
    /// Scope value marking plugins installed with the base product
    pub const BOOTSTRAP_SCOPE: &'static str = "bootstrap";

    /// Installed with the base product
    pub fn is_bootstrap(&self) -> bool {
        self.scope == Self::BOOTSTRAP_SCOPE
    }
}
