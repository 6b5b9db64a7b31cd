//! Installed-plugin records as reported by the controller's plugin manager

use serde::{Deserialize, Serialize};

/// Plugin manager response (`/manage/pluginManager/api/json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginList {
    /// Installed plugins
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// A single installed plugin
///
/// Membership flags default to the value that excludes the plugin from the
/// filtered graph variants, so a record missing a flag is never mistaken for
/// a user-installed, active plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Plugin id
    #[serde(rename = "shortName")]
    pub id: String,

    /// Installed version
    #[serde(default)]
    pub version: String,

    /// Ships with the base product
    #[serde(default = "default_true")]
    pub bundled: bool,

    /// Enabled on the controller
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Marked for deletion on the controller
    #[serde(default = "default_true")]
    pub deleted: bool,

    /// Dependency edges, in declaration order
    #[serde(default)]
    pub dependencies: Vec<PluginDependency>,
}

/// Dependency edge of a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    /// Target plugin id
    #[serde(rename = "shortName")]
    pub id: String,

    /// Soft dependency
    #[serde(default)]
    pub optional: bool,
}

fn default_true() -> bool {
    true
}

impl Plugin {
    /// A user-installed, enabled, non-deleted plugin without dependencies
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            bundled: false,
            enabled: true,
            deleted: false,
            dependencies: Vec::new(),
        }
    }

    /// Ids of the non-optional dependencies
    pub fn required_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|d| !d.optional)
            .map(|d| d.id.as_str())
    }

    /// Disabled or marked for deletion
    pub fn is_inactive(&self) -> bool {
        !self.enabled || self.deleted
    }
}

impl PluginDependency {
    /// Non-optional edge
    pub fn required(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            optional: false,
        }
    }

    /// Optional edge
    pub fn optional(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            optional: true,
        }
    }
}
