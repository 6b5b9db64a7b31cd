//! Merge the expected plugin set into plugins.yaml and plugin-catalog.yaml
//!
//! Both files are recomputed in memory first; [`ReconcileOutcome::persist`]
//! is the only place that writes, and only files whose content changed.
//!
//! State progression: `Loaded -> CatalogReconciled -> EntriesReconciled ->
//! {Written | SkippedNoDiff | SkippedDoNothing}`.

use crate::analysis::PluginAnalysis;
use crate::diff::DiffReport;
use casc_core::types::{CatalogFile, DeclaredEntry, MergeStrategy, PluginsFile};
use casc_core::{BundleLayout, Result};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Reconciler progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    Loaded,
    CatalogReconciled,
    EntriesReconciled,
    Written,
    SkippedNoDiff,
    SkippedDoNothing,
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loaded => "loaded",
            Self::CatalogReconciled => "catalog reconciled",
            Self::EntriesReconciled => "entries reconciled",
            Self::Written => "written",
            Self::SkippedNoDiff => "skipped (no diff)",
            Self::SkippedDoNothing => "skipped (DO_NOTHING)",
        };
        f.write_str(name)
    }
}

/// What happens to one file on persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Content changed and the strategy allows writing
    Write,
    /// Recomputed content equals the original
    SkipNoDiff,
    /// Strategy forbids mutation
    SkipDoNothing,
    /// File does not exist; nothing to reconcile
    Absent,
}

/// Reconciled, not yet persisted, bundle plugin files
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Stage reached in memory; [`ReconcileOutcome::persist`] returns the final one
    pub state: ReconcileState,
    pub catalog: Option<CatalogFile>,
    pub catalog_action: FileAction,
    pub plugins: Option<PluginsFile>,
    pub plugins_action: FileAction,
    /// Catalog ids after reconciliation
    pub catalog_tracked: BTreeSet<String>,
    /// Roots and CAP diffs from the analysis, then final-vs-expected and catalog diffs
    pub reports: Vec<DiffReport>,
}

/// Drives one reconciliation of an analysis against the bundle's plugin files
pub struct Reconciler<'a> {
    analysis: &'a PluginAnalysis,
    strategy: MergeStrategy,
    state: ReconcileState,
    catalog: Option<CatalogFile>,
    plugins: Option<PluginsFile>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        analysis: &'a PluginAnalysis,
        strategy: MergeStrategy,
        catalog: Option<CatalogFile>,
        plugins: Option<PluginsFile>,
    ) -> Self {
        Self {
            analysis,
            strategy,
            state: ReconcileState::Loaded,
            catalog,
            plugins,
        }
    }

    fn advance(&mut self, next: ReconcileState) {
        debug!("Reconcile state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Reconcile the catalog, then the declared entries
    pub fn run(mut self) -> ReconcileOutcome {
        info!("Plugins JSON merge strategy: {}", self.strategy);
        let mut reports = self.analysis.reports.clone();

        let (catalog, catalog_action, catalog_tracked) = self.reconcile_catalog(&mut reports);
        self.advance(ReconcileState::CatalogReconciled);

        let (plugins, plugins_action) = self.reconcile_entries(&catalog_tracked, &mut reports);
        self.advance(ReconcileState::EntriesReconciled);

        ReconcileOutcome {
            state: self.state,
            catalog,
            catalog_action,
            plugins,
            plugins_action,
            catalog_tracked,
            reports,
        }
    }

    fn action_for<T: PartialEq>(&self, original: &T, updated: &T, file: &str) -> FileAction {
        if !self.strategy.allows_mutation() {
            info!(
                "Skipping writing to {} according to merge strategy: {}",
                file, self.strategy
            );
            FileAction::SkipDoNothing
        } else if original == updated {
            info!("No changes detected in {}. Skipping write.", file);
            FileAction::SkipNoDiff
        } else {
            FileAction::Write
        }
    }

    fn reconcile_catalog(
        &mut self,
        reports: &mut Vec<DiffReport>,
    ) -> (Option<CatalogFile>, FileAction, BTreeSet<String>) {
        let Some(original) = self.catalog.take() else {
            info!("No plugin-catalog.yaml found. Skipping catalog reconciliation.");
            return (None, FileAction::Absent, BTreeSet::new());
        };

        info!("Looking for disabled/deleted plugins to remove from plugin-catalog.yaml");
        let previous: BTreeSet<String> = original.plugin_ids().into_iter().collect();
        let mut updated = original.clone();
        for configuration in &mut updated.configurations {
            for id in configuration.plugin_ids() {
                if !self.analysis.deleted_or_inactive.contains(&id) {
                    continue;
                }
                if self.strategy.should_delete() {
                    debug!(
                        " -> removing disabled/deleted plugin {} according to merge strategy: {}",
                        id, self.strategy
                    );
                    configuration.remove_plugin(&id);
                } else {
                    warn!(
                        " -> unexpected plugin {} found but not removed according to merge strategy: {}",
                        id, self.strategy
                    );
                }
            }
        }

        let tracked: BTreeSet<String> = updated.plugin_ids().into_iter().collect();
        if !previous.is_empty() {
            let report = DiffReport::new(
                "Final merged catalog < vs > previous catalog after merging",
                tracked.union(&previous),
                &tracked,
                &previous,
            );
            report.log();
            reports.push(report);
        }

        let action = self.action_for(&original, &updated, "plugin-catalog.yaml");
        (Some(updated), action, tracked)
    }

    fn reconcile_entries(
        &mut self,
        catalog_tracked: &BTreeSet<String>,
        reports: &mut Vec<DiffReport>,
    ) -> (Option<PluginsFile>, FileAction) {
        let Some(original) = self.plugins.take() else {
            info!("No plugins.yaml found. Skipping plugin list reconciliation.");
            return (None, FileAction::Absent);
        };

        let analysis = self.analysis;
        let strategy = self.strategy;
        info!("Looking for disabled/deleted plugins to remove from current plugins.yaml");

        let mut kept: Vec<DeclaredEntry> = Vec::with_capacity(original.plugins.len());
        for entry in &original.plugins {
            if self.keep_entry(entry, catalog_tracked) {
                kept.push(entry.clone());
            }
        }

        info!("Looking for plugins that are installed but not in the current plugins.yaml");
        let present: BTreeSet<String> = kept.iter().map(|e| e.id.clone()).collect();
        let declared: HashMap<&str, &DeclaredEntry> = original
            .plugins
            .iter()
            .map(|e| (e.id.as_str(), e))
            .collect();
        for id in analysis.expected.difference(&present) {
            if !strategy.allows_mutation() {
                warn!(
                    " -> found plugin installed on server but not present in bundle (skipping according to merge strategy: {}) : {}",
                    strategy, id
                );
            } else if let Some(entry) = declared.get(id.as_str()) {
                // expected but dropped as bootstrap: restore the declared entry with its pin
                debug!(
                    " -> restoring declared entry of expected plugin {} (merge strategy: {})",
                    id, strategy
                );
                kept.push((*entry).clone());
            } else {
                info!(
                    " -> adding plugin expected but not present (according to strategy: {}) : {}",
                    strategy, id
                );
                kept.push(DeclaredEntry::new(id.clone()));
            }
        }

        kept.sort_by(|a, b| a.id.cmp(&b.id));

        let final_ids: BTreeSet<String> = kept.iter().map(|e| e.id.clone()).collect();
        let report = DiffReport::new(
            "Final merged plugins < vs > expected plugins after merging",
            final_ids.union(&analysis.expected),
            &final_ids,
            &analysis.expected,
        );
        report.log();
        reports.push(report);

        let updated = PluginsFile {
            plugins: kept,
            extra: original.extra.clone(),
        };
        let action = self.action_for(&original, &updated, "plugins.yaml");
        (Some(updated), action)
    }

    /// Decide one existing plugins.yaml entry
    fn keep_entry(&self, entry: &DeclaredEntry, catalog_tracked: &BTreeSet<String>) -> bool {
        let id = entry.id.as_str();
        let strategy = self.strategy;

        if catalog_tracked.contains(id) {
            trace!(" -> skipping plugin {} due to entry in plugin-catalog.yaml", id);
            return true;
        }

        if self.analysis.bootstrap.contains(id) {
            if strategy == MergeStrategy::All {
                trace!(
                    " -> keeping bootstrap plugin {} according to merge strategy: {}",
                    id, strategy
                );
                return true;
            }
            debug!(" -> removing bootstrap plugin {}", id);
            return false;
        }

        if self.analysis.expected.contains(id) {
            return true;
        }

        if strategy.skip_pinned() && entry.is_pinned() {
            let pin = if entry.url.is_some() { "url" } else { "version" };
            trace!(
                " -> skipping plugin {} with pinned {} according to merge strategy: {}",
                id, pin, strategy
            );
            true
        } else if strategy.should_delete() {
            debug!(
                " -> removing plugin {} (parents: {}) according to merge strategy: {}",
                id,
                self.analysis.expected_parents(id).join(", "),
                strategy
            );
            false
        } else if strategy == MergeStrategy::DoNothing {
            warn!(
                " -> plugin {} found but strategy forbids mutation (merge strategy: {})",
                id, strategy
            );
            true
        } else {
            info!(
                " -> plugin {} not expected, not pinning/removing according to merge strategy: {}",
                id, strategy
            );
            true
        }
    }
}

/// Run every reconciliation stage
pub fn reconcile(
    analysis: &PluginAnalysis,
    strategy: MergeStrategy,
    catalog: Option<CatalogFile>,
    plugins: Option<PluginsFile>,
) -> ReconcileOutcome {
    Reconciler::new(analysis, strategy, catalog, plugins).run()
}

impl ReconcileOutcome {
    /// Nothing would be written
    pub fn is_noop(&self) -> bool {
        self.catalog_action != FileAction::Write && self.plugins_action != FileAction::Write
    }

    /// Write the files marked [`FileAction::Write`]
    pub fn persist(&self, layout: &BundleLayout) -> Result<ReconcileState> {
        let mut wrote = false;

        if let (FileAction::Write, Some(catalog)) = (self.catalog_action, &self.catalog) {
            info!("Writing updated plugin catalog to {}", layout.catalog_path());
            layout.save_catalog(catalog)?;
            wrote = true;
        }
        if let (FileAction::Write, Some(plugins)) = (self.plugins_action, &self.plugins) {
            info!("Writing updated plugins to {}", layout.plugins_path());
            layout.save_plugins(plugins)?;
            wrote = true;
        }

        let state = if wrote {
            ReconcileState::Written
        } else if self.catalog_action == FileAction::SkipDoNothing
            || self.plugins_action == FileAction::SkipDoNothing
        {
            ReconcileState::SkippedDoNothing
        } else {
            ReconcileState::SkippedNoDiff
        };
        debug!("Reconcile state: {}", state);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use casc_core::types::{Plugin, PluginDependency, ResolvedListStrategy};

    fn chain_analysis() -> PluginAnalysis {
        let mut a = Plugin::new("a", "1.0");
        a.dependencies = vec![PluginDependency::required("b")];
        let mut b = Plugin::new("b", "1.0");
        b.dependencies = vec![PluginDependency::required("c")];
        let c = Plugin::new("c", "1.0");
        analyze(&[a, b, c], ResolvedListStrategy::Roots, None).unwrap()
    }

    #[test]
    fn test_state_progression() {
        let analysis = chain_analysis();
        let reconciler = Reconciler::new(&analysis, MergeStrategy::AddOnly, None, None);
        assert_eq!(reconciler.state, ReconcileState::Loaded);

        let outcome = reconciler.run();
        assert_eq!(outcome.state, ReconcileState::EntriesReconciled);
        assert_eq!(outcome.catalog_action, FileAction::Absent);
        assert_eq!(outcome.plugins_action, FileAction::Absent);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_pinned_entry_survives_skip_pinned() {
        let analysis = chain_analysis();
        let plugins = PluginsFile::from_entries(vec![
            DeclaredEntry::new("a"),
            DeclaredEntry::new("d").with_version("1.2"),
        ]);

        let outcome = reconcile(
            &analysis,
            MergeStrategy::AddDeleteSkipPinned,
            None,
            Some(plugins.clone()),
        );
        assert_eq!(outcome.plugins.as_ref(), Some(&plugins));
        assert_eq!(outcome.plugins_action, FileAction::SkipNoDiff);
    }

    #[test]
    fn test_expected_bootstrap_entry_keeps_its_pin() {
        let mut user = Plugin::new("user", "1.0");
        user.dependencies = vec![PluginDependency::required("lib")];
        let mut lib = Plugin::new("lib", "1.0");
        lib.bundled = true;
        let analysis = analyze(&[user, lib], ResolvedListStrategy::RootsAndDeps, None).unwrap();
        assert!(analysis.expected.contains("lib"));

        let plugins = PluginsFile::from_entries(vec![
            DeclaredEntry::new("lib").with_version("9.9"),
            DeclaredEntry::new("user"),
        ]);
        let outcome = reconcile(
            &analysis,
            MergeStrategy::AddDeleteSkipPinned,
            None,
            Some(plugins.clone()),
        );
        assert_eq!(outcome.plugins, Some(plugins));
        assert_eq!(outcome.plugins_action, FileAction::SkipNoDiff);
    }

    #[test]
    fn test_missing_expected_entry_is_added() {
        let analysis = chain_analysis();
        let plugins = PluginsFile::from_entries(vec![DeclaredEntry::new("z").with_url("https://x/z.hpi")]);

        let outcome = reconcile(&analysis, MergeStrategy::AddDelete, None, Some(plugins));
        let ids = outcome.plugins.unwrap().ids();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(outcome.plugins_action, FileAction::Write);
    }
}
