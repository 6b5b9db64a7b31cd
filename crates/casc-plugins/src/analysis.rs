//! Plugin analysis pipeline
//!
//! graphs -> roots/trees -> list strategy -> CAP envelope -> sanity gate.
//! Nothing here touches the filesystem; a successful [`PluginAnalysis`] is the
//! only input the reconciler accepts.

use crate::closure::{dependents_in_tree, ensure_acyclic_from, render_dependency_tree, roots_of};
use crate::diff::DiffReport;
use crate::envelope::apply_envelope;
use crate::graph::{GraphSet, GraphVariant};
use crate::sanity;
use crate::strategy::expected_candidates;
use casc_core::types::{EnvelopeManifest, Plugin, ResolvedListStrategy};
use casc_core::Result;
use std::collections::BTreeSet;
use tracing::{debug, info, trace, Level};

/// Outcome of a successful analysis
#[derive(Debug, Clone)]
pub struct PluginAnalysis {
    /// Strategy the expected set was derived with
    pub strategy: ResolvedListStrategy,

    /// Plugins the bundle should declare, sorted
    pub expected: BTreeSet<String>,

    /// Plugins bundled with the base product
    pub bootstrap: BTreeSet<String>,

    /// Plugins excluded from the minus-deleted-disabled graph
    pub deleted_or_inactive: BTreeSet<String>,

    /// The three graph variants
    pub graphs: GraphSet,

    /// Roots diff, plus the CAP diff when an envelope was applied
    pub reports: Vec<DiffReport>,
}

impl PluginAnalysis {
    /// Expected plugins that transitively require `id`
    pub fn expected_parents(&self, id: &str) -> Vec<String> {
        dependents_in_tree(&self.graphs, id)
            .intersection(&self.expected)
            .cloned()
            .collect()
    }
}

/// Run the analysis; any error here must abort before files are touched
pub fn analyze(
    plugins: &[Plugin],
    strategy: ResolvedListStrategy,
    envelope: Option<&EnvelopeManifest>,
) -> Result<PluginAnalysis> {
    info!("Plugin Analysis - Analyzing server plugins...");
    let graphs = GraphSet::build(plugins)?;
    debug!("Plugin Analysis - Finished building dependency graphs");

    for variant in GraphVariant::ALL_VARIANTS {
        check_trees(&graphs, variant)?;
    }

    let universe = graphs.all.ids();
    let roots_report = DiffReport::new(
        "Expected root plugins < vs > expected root plugins after deleted/disabled removed \
         (any new roots on the right side are candidates for removal)",
        &universe,
        &roots_of(&graphs.minus_bootstrap),
        &roots_of(&graphs.minus_deleted_disabled),
    );
    roots_report.log();
    let mut reports = vec![roots_report];

    let mut expected = expected_candidates(strategy, &graphs);
    if let Some(envelope) = envelope {
        reports.extend(apply_envelope(&mut expected, envelope, &graphs, strategy));
    }
    info!("Plugin Analysis - finished analysis.");

    sanity::check(&expected, &graphs)?;

    Ok(PluginAnalysis {
        strategy,
        bootstrap: graphs.bootstrap_ids(),
        deleted_or_inactive: graphs.deleted_or_inactive_ids(),
        expected,
        graphs,
        reports,
    })
}

/// Render (at trace level) or just cycle-check the tree of every root
fn check_trees(graphs: &GraphSet, variant: GraphVariant) -> Result<()> {
    let graph = graphs.get(variant);
    let render = tracing::enabled!(Level::TRACE);

    for root in roots_of(graph) {
        if render {
            trace!("Dependency tree for root plugin: {} ({} graph)", root, variant);
            for line in render_dependency_tree(graph, &root)? {
                trace!("{}", line);
            }
        } else {
            ensure_acyclic_from(graph, &root)?;
        }
    }
    Ok(())
}
