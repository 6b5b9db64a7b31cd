//! Plugin dependency resolution for casc bundles
//!
//! This crate handles:
//! - Dependency graphs over the installed plugin list
//! - Roots, closures and dependency tree rendering
//! - List strategy resolution and CAP envelope pruning
//! - The sanity gate guarding every file mutation
//! - Reconciliation of plugins.yaml and plugin-catalog.yaml
//! - Fetching the plugin list from a running controller

pub mod analysis;
pub mod closure;
pub mod diff;
pub mod envelope;
pub mod graph;
pub mod reconcile;
pub mod sanity;
pub mod source;
pub mod strategy;

pub use analysis::{analyze, PluginAnalysis};
pub use diff::{DiffLine, DiffReport, DiffSide};
pub use graph::{DependencyGraph, GraphSet, GraphVariant};
pub use reconcile::{reconcile, FileAction, ReconcileOutcome, ReconcileState, Reconciler};
pub use source::{fetch_plugin_list, load_bundle_descriptor, Credentials};
pub use strategy::resolve_list_strategy;
