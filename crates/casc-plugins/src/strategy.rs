//! Expected-plugin candidates per list strategy

use crate::closure::{closure_of, roots_of};
use crate::graph::GraphSet;
use casc_core::types::{ListStrategy, ResolvedListStrategy};
use casc_core::Result;
use std::collections::BTreeSet;
use tracing::info;

/// Resolve AUTO against the bundle apiVersion and log the outcome
pub fn resolve_list_strategy(
    strategy: ListStrategy,
    api_version: Option<&str>,
    source: &str,
) -> Result<ResolvedListStrategy> {
    let resolved = strategy.resolve(api_version, source)?;
    if strategy == ListStrategy::Auto {
        info!(
            "Plugins JSON list strategy: {} (AUTO, apiVersion {} from {})",
            resolved,
            api_version.unwrap_or_default(),
            source
        );
    } else {
        info!("Plugins JSON list strategy: {}", resolved);
    }
    Ok(resolved)
}

/// Candidate expected set for a resolved strategy
///
/// Roots come from the minus-deleted-disabled graph; closures are always
/// taken against the full graph since chains can pass through excluded plugins.
pub fn expected_candidates(strategy: ResolvedListStrategy, graphs: &GraphSet) -> BTreeSet<String> {
    match strategy {
        ResolvedListStrategy::Roots => roots_of(&graphs.minus_deleted_disabled),
        ResolvedListStrategy::RootsAndDeps => {
            let roots = roots_of(&graphs.minus_deleted_disabled);
            let mut result = roots.clone();
            for root in &roots {
                result.extend(closure_of(&graphs.all, root));
            }
            result
        }
        ResolvedListStrategy::All => graphs.all.ids(),
    }
}
