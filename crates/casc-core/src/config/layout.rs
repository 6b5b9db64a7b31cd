//! Bundle directory layout and file loading

use crate::error::{Error, Result};
use crate::types::{BundleDescriptor, CatalogFile, EnvelopeManifest, PluginList, PluginsFile};
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

/// Bundle descriptor file name
pub const BUNDLE_FILE: &str = "bundle.yaml";

/// Declared plugin list file name
pub const PLUGINS_FILE: &str = "plugins.yaml";

/// Plugin catalog file name
pub const CATALOG_FILE: &str = "plugin-catalog.yaml";

/// Files of a fetched bundle directory
#[derive(Debug, Clone)]
pub struct BundleLayout {
    dir: Utf8PathBuf,
}

impl BundleLayout {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn bundle_path(&self) -> Utf8PathBuf {
        self.dir.join(BUNDLE_FILE)
    }

    pub fn plugins_path(&self) -> Utf8PathBuf {
        self.dir.join(PLUGINS_FILE)
    }

    pub fn catalog_path(&self) -> Utf8PathBuf {
        self.dir.join(CATALOG_FILE)
    }

    /// bundle.yaml, if present
    pub fn load_bundle(&self) -> Result<Option<BundleDescriptor>> {
        read_optional_yaml(&self.bundle_path())
    }

    /// plugins.yaml, if present
    pub fn load_plugins(&self) -> Result<Option<PluginsFile>> {
        read_optional_yaml(&self.plugins_path())
    }

    /// plugin-catalog.yaml, if present
    pub fn load_catalog(&self) -> Result<Option<CatalogFile>> {
        read_optional_yaml(&self.catalog_path())
    }

    pub fn save_plugins(&self, plugins: &PluginsFile) -> Result<()> {
        write_yaml(&self.plugins_path(), plugins)
    }

    pub fn save_catalog(&self, catalog: &CatalogFile) -> Result<()> {
        write_yaml(&self.catalog_path(), catalog)
    }
}

/// Read a plugin-manager JSON export
pub fn load_plugin_list(path: &Utf8Path) -> Result<PluginList> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read an envelope.json manifest
pub fn load_envelope(path: &Utf8Path) -> Result<EnvelopeManifest> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_file(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })
}

/// Parse a YAML file, returning `None` when it does not exist
pub fn read_optional_yaml<T: DeserializeOwned>(path: &Utf8Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_yaml_ng::from_str(&content)?))
}

/// Serialize a value to a YAML file, replacing its content
pub fn write_yaml<T: Serialize>(path: &Utf8Path, value: &T) -> Result<()> {
    let content = serde_yaml_ng::to_string(value)?;
    fs::write(path, content)?;
    Ok(())
}
