//! CAP envelope pruning
//!
//! Plugins that a product-managed, non-bootstrap envelope plugin already pulls
//! in transitively do not need to be declared by the bundle.

use crate::closure::closure_of;
use crate::diff::DiffReport;
use crate::graph::GraphSet;
use casc_core::types::{EnvelopeManifest, ResolvedListStrategy};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Remove envelope-guaranteed dependencies from `candidates`
///
/// Returns the before/after report, or `None` when the strategy is ALL (an
/// "everything" list cannot be pruned).
pub fn apply_envelope(
    candidates: &mut BTreeSet<String>,
    envelope: &EnvelopeManifest,
    graphs: &GraphSet,
    strategy: ResolvedListStrategy,
) -> Option<DiffReport> {
    if strategy == ResolvedListStrategy::All {
        info!("CAP envelope option detected with ALL strategy. Ignoring...");
        return None;
    }

    info!("CAP envelope option detected. Removing CAP plugin dependencies...");
    let before = candidates.clone();

    for (plugin_id, entry) in &envelope.plugins {
        if entry.is_bootstrap() {
            continue;
        }
        for dep in closure_of(&graphs.all, plugin_id) {
            if candidates.remove(&dep) {
                debug!("Removing dependency of {}: {}", plugin_id, dep);
            }
        }
    }

    let report = DiffReport::new(
        "Expected root plugins < vs > expected root plugins after CAP dependencies removed",
        graphs.all.ids().iter(),
        &before,
        candidates,
    );
    report.log();
    Some(report)
}
