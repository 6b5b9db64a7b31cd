//! Dependency graphs built from the installed plugin list
//!
//! Each [`GraphVariant`] keeps its own adjacency: membership differs per
//! variant, so edges are rebuilt per variant instead of being filtered out of
//! one shared graph.

use casc_core::types::Plugin;
use casc_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Which plugins a graph includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphVariant {
    /// Every installed plugin
    All,
    /// Excludes plugins bundled with the base product
    MinusBootstrap,
    /// Excludes bundled, disabled and deleted plugins
    MinusDeletedDisabled,
}

impl GraphVariant {
    pub const ALL_VARIANTS: [GraphVariant; 3] = [
        GraphVariant::All,
        GraphVariant::MinusBootstrap,
        GraphVariant::MinusDeletedDisabled,
    ];

    /// Membership predicate
    pub fn includes(&self, plugin: &Plugin) -> bool {
        match self {
            Self::All => true,
            Self::MinusBootstrap => !plugin.bundled,
            Self::MinusDeletedDisabled => !plugin.bundled && !plugin.is_inactive(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::MinusBootstrap => "minus-bootstrap",
            Self::MinusDeletedDisabled => "minus-deleted-disabled",
        }
    }
}

impl fmt::Display for GraphVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plugin and its classified outgoing edges
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub non_optional: Vec<String>,
    pub optional: Vec<String>,
    pub entry: Plugin,
}

/// Dependency graph for one variant
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    variant: GraphVariant,
    nodes: BTreeMap<String, GraphNode>,
    /// Dependency id -> ids that require it (non-optional edges only)
    reverse_deps: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph for `variant`; if an id repeats, the last record wins
    pub fn build(plugins: &[Plugin], variant: GraphVariant) -> Self {
        let mut graph = Self {
            variant,
            nodes: BTreeMap::new(),
            reverse_deps: BTreeMap::new(),
        };

        for plugin in plugins.iter().filter(|p| variant.includes(p)) {
            if graph.nodes.contains_key(&plugin.id) {
                warn!(
                    "Duplicate plugin id {} in plugin list ({} graph), keeping the last record",
                    plugin.id, variant
                );
                graph.withdraw_reverse_edges(&plugin.id);
            }
            graph.insert(plugin);
        }

        debug!(
            "Built {} dependency graph: {} plugins, {} required targets",
            variant,
            graph.nodes.len(),
            graph.reverse_deps.len()
        );
        graph
    }

    fn insert(&mut self, plugin: &Plugin) {
        let node = GraphNode {
            non_optional: plugin.required_ids().map(str::to_string).collect(),
            optional: plugin
                .dependencies
                .iter()
                .filter(|d| d.optional)
                .map(|d| d.id.clone())
                .collect(),
            entry: plugin.clone(),
        };
        for dep in &node.non_optional {
            self.reverse_deps
                .entry(dep.clone())
                .or_default()
                .push(plugin.id.clone());
        }
        self.nodes.insert(plugin.id.clone(), node);
    }

    fn withdraw_reverse_edges(&mut self, id: &str) {
        let Some(previous) = self.nodes.get(id) else {
            return;
        };
        for target in &previous.non_optional {
            if let Some(dependents) = self.reverse_deps.get_mut(target) {
                if let Some(pos) = dependents.iter().position(|d| d == id) {
                    dependents.remove(pos);
                }
                if dependents.is_empty() {
                    self.reverse_deps.remove(target);
                }
            }
        }
    }

    pub fn variant(&self) -> GraphVariant {
        self.variant
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Non-optional dependencies of `id`; absent ids have none
    pub fn non_optional(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|n| n.non_optional.as_slice())
            .unwrap_or(&[])
    }

    /// Plugins that non-optionally require `id`
    pub fn dependents(&self, id: &str) -> &[String] {
        self.reverse_deps
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Member ids, sorted
    pub fn ids(&self) -> BTreeSet<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Ids required by at least one member, sorted
    pub fn required_ids(&self) -> BTreeSet<String> {
        self.reverse_deps.keys().cloned().collect()
    }
}

/// Keep only the last record of each id, in first-seen order
fn last_record_per_id(plugins: &[Plugin]) -> Vec<Plugin> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<Plugin> = Vec::with_capacity(plugins.len());
    for plugin in plugins {
        match position.get(plugin.id.as_str()) {
            Some(&index) => {
                warn!(
                    "Duplicate plugin id {} in plugin list, keeping the last record",
                    plugin.id
                );
                unique[index] = plugin.clone();
            }
            None => {
                position.insert(plugin.id.as_str(), unique.len());
                unique.push(plugin.clone());
            }
        }
    }
    unique
}

/// The three graph variants of one plugin list
#[derive(Debug, Clone)]
pub struct GraphSet {
    pub all: DependencyGraph,
    pub minus_bootstrap: DependencyGraph,
    pub minus_deleted_disabled: DependencyGraph,
}

impl GraphSet {
    /// Build every variant, then reject non-optional edges to unknown plugins
    ///
    /// Repeated ids are collapsed first (last record wins), so every variant
    /// filters the same record.
    pub fn build(plugins: &[Plugin]) -> Result<Self> {
        let plugins = last_record_per_id(plugins);
        let set = Self {
            all: DependencyGraph::build(&plugins, GraphVariant::All),
            minus_bootstrap: DependencyGraph::build(&plugins, GraphVariant::MinusBootstrap),
            minus_deleted_disabled: DependencyGraph::build(
                &plugins,
                GraphVariant::MinusDeletedDisabled,
            ),
        };
        set.check_dependencies_present()?;
        Ok(set)
    }

    fn check_dependencies_present(&self) -> Result<()> {
        for (id, node) in &self.all.nodes {
            if let Some(missing) = node.non_optional.iter().find(|d| !self.all.contains(d)) {
                return Err(Error::missing_dependency(id, missing));
            }
        }
        Ok(())
    }

    pub fn get(&self, variant: GraphVariant) -> &DependencyGraph {
        match variant {
            GraphVariant::All => &self.all,
            GraphVariant::MinusBootstrap => &self.minus_bootstrap,
            GraphVariant::MinusDeletedDisabled => &self.minus_deleted_disabled,
        }
    }

    /// Plugins bundled with the base product
    pub fn bootstrap_ids(&self) -> BTreeSet<String> {
        self.all
            .ids()
            .difference(&self.minus_bootstrap.ids())
            .cloned()
            .collect()
    }

    /// Plugins excluded from the minus-deleted-disabled variant
    ///
    /// Bundled plugins fall in here as well, matching the variant's predicate.
    pub fn deleted_or_inactive_ids(&self) -> BTreeSet<String> {
        self.all
            .ids()
            .difference(&self.minus_deleted_disabled.ids())
            .cloned()
            .collect()
    }
}
