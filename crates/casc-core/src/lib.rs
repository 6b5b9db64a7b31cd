//! # casc-core
//!
//! Core library for the casc bundle utilities providing:
//! - Plugin-manager records and their dependency edges
//! - Bundle file types (bundle.yaml, plugins.yaml, plugin-catalog.yaml, envelope.json)
//! - List and merge strategies with validated parsing
//! - The error taxonomy shared by the plugin engine and the CLI

pub mod config;
pub mod error;
pub mod types;

pub use config::{BundleLayout, EngineConfig};
pub use error::{Error, ErrorKind, Result};
