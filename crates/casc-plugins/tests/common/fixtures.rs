//! Installed plugin lists and bundle directories

#![allow(dead_code)]

use super::builders::PluginBuilder;
use camino::Utf8PathBuf;
use casc_core::types::Plugin;
use std::collections::BTreeSet;
use tempfile::TempDir;

pub fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A -> B -> C, all user-installed and active
pub fn chain_abc() -> Vec<Plugin> {
    vec![
        PluginBuilder::new("a").requires("b").build(),
        PluginBuilder::new("b").requires("c").build(),
        PluginBuilder::new("c").build(),
    ]
}

/// A small controller:
///
/// - `git` -> `scm-api` -> `structs`
/// - `pipeline` -> `scm-api`, optional `ldap`
/// - `ldap` (active, unreferenced)
/// - `cloudbees-casc` (bundled) -> `structs`
/// - `old-theme` (disabled), `legacy` (deleted)
pub fn controller() -> Vec<Plugin> {
    vec![
        PluginBuilder::new("git").requires("scm-api").build(),
        PluginBuilder::new("scm-api").requires("structs").build(),
        PluginBuilder::new("structs").build(),
        PluginBuilder::new("pipeline")
            .requires("scm-api")
            .optionally("ldap")
            .build(),
        PluginBuilder::new("ldap").build(),
        PluginBuilder::new("cloudbees-casc")
            .bundled()
            .requires("structs")
            .build(),
        PluginBuilder::new("old-theme").disabled().build(),
        PluginBuilder::new("legacy").deleted().build(),
    ]
}

/// Temporary bundle directory
pub struct BundleDir {
    _temp: TempDir,
    pub path: Utf8PathBuf,
}

impl BundleDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
        Self { _temp: temp, path }
    }

    pub fn write(&self, name: &str, content: &str) -> &Self {
        std::fs::write(self.path.join(name), content).expect("write fixture");
        self
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path.join(name)).expect("read fixture")
    }
}
