//! Type definitions for plugin lists, bundle files and strategies

mod bundle_types;
mod plugin_types;
mod strategy_types;

pub use bundle_types::*;
pub use plugin_types::*;
pub use strategy_types::*;
