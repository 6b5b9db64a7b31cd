//! Engine configuration and bundle file layout

pub mod layout;

pub use layout::{
    load_envelope, load_plugin_list, BundleLayout, BUNDLE_FILE, CATALOG_FILE, PLUGINS_FILE,
};

use crate::error::Result;
use crate::types::{ListStrategy, MergeStrategy};
use serde::{Deserialize, Serialize};

/// Settings for one plugin reconciliation run
///
/// Strategy names are validated when the config is built; the engine only
/// ever sees the parsed enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// How the expected list is derived
    pub list_strategy: ListStrategy,

    /// How the expected list is merged into the bundle
    pub merge_strategy: MergeStrategy,

    /// Prune plugins already guaranteed by product-managed plugins
    #[serde(default)]
    pub use_cap_envelope: bool,
}

impl EngineConfig {
    /// Build from raw strategy names
    pub fn from_names(list_strategy: &str, merge_strategy: &str, use_cap_envelope: bool) -> Result<Self> {
        Ok(Self {
            list_strategy: list_strategy.parse()?,
            merge_strategy: merge_strategy.parse()?,
            use_cap_envelope,
        })
    }
}
