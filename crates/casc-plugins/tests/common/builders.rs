//! Plugin builders for creating test fixtures

#![allow(dead_code)]

use casc_core::types::{DeclaredEntry, Plugin, PluginDependency, PluginsFile};

/// Builder for installed plugin records
pub struct PluginBuilder {
    id: String,
    version: String,
    bundled: bool,
    enabled: bool,
    deleted: bool,
    dependencies: Vec<PluginDependency>,
}

impl PluginBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: "1.0".to_string(),
            bundled: false,
            enabled: true,
            deleted: false,
            dependencies: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn requires(mut self, id: &str) -> Self {
        self.dependencies.push(PluginDependency::required(id));
        self
    }

    pub fn optionally(mut self, id: &str) -> Self {
        self.dependencies.push(PluginDependency::optional(id));
        self
    }

    pub fn bundled(mut self) -> Self {
        self.bundled = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn build(self) -> Plugin {
        let mut plugin = Plugin::new(self.id, self.version);
        plugin.bundled = self.bundled;
        plugin.enabled = self.enabled;
        plugin.deleted = self.deleted;
        plugin.dependencies = self.dependencies;
        plugin
    }
}

/// `plugins.yaml` with one unpinned entry per id
pub fn plugins_file(ids: &[&str]) -> PluginsFile {
    PluginsFile::from_entries(ids.iter().map(|id| DeclaredEntry::new(*id)).collect())
}
