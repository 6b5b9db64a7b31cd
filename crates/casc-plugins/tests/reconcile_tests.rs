//! Reconciliation integration tests
//!
//! Tests plugins.yaml and plugin-catalog.yaml reconciliation including:
//! - Idempotence of repeated runs
//! - Pinned entries under ADD_DELETE_SKIP_PINNED
//! - DO_NOTHING never touching either file
//! - Catalog-tracked ids surviving every merge strategy
//! - Persisting through a bundle directory

mod common;

use casc_core::types::{DeclaredEntry, MergeStrategy, PluginsFile, ResolvedListStrategy};
use casc_core::BundleLayout;
use casc_plugins::{analyze, reconcile, FileAction, PluginAnalysis, ReconcileState};
use common::*;

const CATALOG_YAML: &str = r#"type: plugin-catalog
version: '1'
name: tier3-catalog
configurations:
- description: tier 3 plugins
  includePlugins:
    legacy:
      version: '1.0'
    extra-tier3:
      version: '2.1'
"#;

const CONTROLLER_PLUGINS_YAML: &str = r#"plugins:
- id: git
- id: cloudbees-casc
- id: extra-tier3
- id: old-theme
- id: legacy
  version: '0.9'
"#;

fn chain_analysis() -> PluginAnalysis {
    analyze(&chain_abc(), ResolvedListStrategy::Roots, None).unwrap()
}

fn controller_analysis() -> PluginAnalysis {
    analyze(&controller(), ResolvedListStrategy::Roots, None).unwrap()
}

fn controller_bundle() -> BundleDir {
    let dir = BundleDir::new();
    dir.write("plugin-catalog.yaml", CATALOG_YAML)
        .write("plugins.yaml", CONTROLLER_PLUGINS_YAML);
    dir
}

fn run(
    analysis: &PluginAnalysis,
    layout: &BundleLayout,
    strategy: MergeStrategy,
) -> (casc_plugins::ReconcileOutcome, ReconcileState) {
    let outcome = reconcile(
        analysis,
        strategy,
        layout.load_catalog().unwrap(),
        layout.load_plugins().unwrap(),
    );
    let state = outcome.persist(layout).unwrap();
    (outcome, state)
}

fn final_ids(outcome: &casc_plugins::ReconcileOutcome) -> Vec<String> {
    outcome.plugins.as_ref().map(PluginsFile::ids).unwrap_or_default()
}

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_pinned_entry_keeps_file_untouched() {
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

        // b and c are covered by a and never declared on their own
        assert_eq!(final_ids(&outcome), vec!["a", "d"]);
        assert_eq!(outcome.plugins, Some(plugins));
        assert_eq!(outcome.plugins_action, FileAction::SkipNoDiff);
        assert!(outcome.is_noop());
    }

    #[test_case(MergeStrategy::AddDelete, &["a"], FileAction::Write ; "add delete removes d")]
    #[test_case(MergeStrategy::AddDeleteSkipPinned, &["a"], FileAction::Write ; "skip pinned removes unpinned d")]
    #[test_case(MergeStrategy::AddOnly, &["a", "d"], FileAction::SkipNoDiff ; "add only keeps d")]
    #[test_case(MergeStrategy::All, &["a", "d"], FileAction::SkipNoDiff ; "all keeps d")]
    #[test_case(MergeStrategy::DoNothing, &["a", "d"], FileAction::SkipDoNothing ; "do nothing keeps d")]
    fn test_unpinned_unexpected_entry(strategy: MergeStrategy, expected: &[&str], action: FileAction) {
        let analysis = chain_analysis();
        let outcome = reconcile(&analysis, strategy, None, Some(plugins_file(&["a", "d"])));

        assert_eq!(final_ids(&outcome), expected);
        assert_eq!(outcome.plugins_action, action);
    }

    #[test]
    fn test_do_nothing_does_not_add_missing_entries() {
        let analysis = chain_analysis();
        let outcome = reconcile(&analysis, MergeStrategy::DoNothing, None, Some(plugins_file(&[])));
        assert!(final_ids(&outcome).is_empty());
    }

    #[test]
    fn test_entries_are_sorted_by_id() {
        let analysis = controller_analysis();
        let outcome = reconcile(
            &analysis,
            MergeStrategy::AddOnly,
            None,
            Some(plugins_file(&["pipeline", "git"])),
        );
        assert_eq!(final_ids(&outcome), vec!["git", "ldap", "pipeline"]);
        assert_eq!(outcome.plugins_action, FileAction::Write);
    }
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_skip_pinned_against_controller() {
        let dir = controller_bundle();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = controller_analysis();

        let (outcome, state) = run(&analysis, &layout, MergeStrategy::AddDeleteSkipPinned);

        assert_eq!(state, ReconcileState::Written);
        assert_eq!(outcome.catalog_tracked, ids(&["extra-tier3"]));
        assert_eq!(
            final_ids(&outcome),
            vec!["extra-tier3", "git", "ldap", "legacy", "pipeline"]
        );
        // roots, final vs expected, catalog
        assert_eq!(outcome.reports.len(), 3);

        let catalog = dir.read("plugin-catalog.yaml");
        assert!(catalog.contains("name: tier3-catalog"));
        assert!(catalog.contains("extra-tier3"));
        assert!(!catalog.contains("legacy"));
    }

    #[test]
    fn test_merge_all_keeps_bootstrap_and_inactive() {
        let dir = controller_bundle();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = controller_analysis();

        let (outcome, _) = run(&analysis, &layout, MergeStrategy::All);

        assert_eq!(outcome.catalog_tracked, ids(&["extra-tier3", "legacy"]));
        assert_eq!(outcome.catalog_action, FileAction::SkipNoDiff);
        assert_eq!(
            final_ids(&outcome),
            vec![
                "cloudbees-casc",
                "extra-tier3",
                "git",
                "ldap",
                "legacy",
                "old-theme",
                "pipeline"
            ]
        );
    }

    #[test_case(MergeStrategy::DoNothing ; "do nothing")]
    #[test_case(MergeStrategy::AddOnly ; "add only")]
    #[test_case(MergeStrategy::AddDelete ; "add delete")]
    #[test_case(MergeStrategy::AddDeleteSkipPinned ; "add delete skip pinned")]
    #[test_case(MergeStrategy::All ; "all")]
    fn test_catalog_tracked_ids_are_always_retained(strategy: MergeStrategy) {
        let dir = controller_bundle();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = controller_analysis();

        let (outcome, _) = run(&analysis, &layout, strategy);

        for id in &outcome.catalog_tracked {
            assert!(final_ids(&outcome).contains(id), "{id} dropped under {strategy}");
        }
        assert!(final_ids(&outcome).contains(&"extra-tier3".to_string()));
    }

    #[test]
    fn test_do_nothing_never_writes() {
        let dir = controller_bundle();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = controller_analysis();

        let (outcome, state) = run(&analysis, &layout, MergeStrategy::DoNothing);

        assert_eq!(state, ReconcileState::SkippedDoNothing);
        assert_eq!(outcome.catalog_action, FileAction::SkipDoNothing);
        assert_eq!(outcome.plugins_action, FileAction::SkipDoNothing);
        assert_eq!(dir.read("plugin-catalog.yaml"), CATALOG_YAML);
        assert_eq!(dir.read("plugins.yaml"), CONTROLLER_PLUGINS_YAML);
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;
    use test_case::test_case;

    #[test_case(MergeStrategy::AddOnly ; "add only")]
    #[test_case(MergeStrategy::AddDelete ; "add delete")]
    #[test_case(MergeStrategy::AddDeleteSkipPinned ; "add delete skip pinned")]
    #[test_case(MergeStrategy::All ; "all")]
    fn test_second_run_is_a_noop(strategy: MergeStrategy) {
        let dir = controller_bundle();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = controller_analysis();

        run(&analysis, &layout, strategy);
        let plugins_after_first = dir.read("plugins.yaml");
        let catalog_after_first = dir.read("plugin-catalog.yaml");

        let (outcome, state) = run(&analysis, &layout, strategy);

        assert!(outcome.is_noop());
        assert_eq!(state, ReconcileState::SkippedNoDiff);
        assert_eq!(dir.read("plugins.yaml"), plugins_after_first);
        assert_eq!(dir.read("plugin-catalog.yaml"), catalog_after_first);
    }

    #[test]
    fn test_missing_files_are_not_created() {
        let dir = BundleDir::new();
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = chain_analysis();

        let (outcome, state) = run(&analysis, &layout, MergeStrategy::AddDelete);

        assert_eq!(outcome.plugins_action, FileAction::Absent);
        assert_eq!(outcome.catalog_action, FileAction::Absent);
        assert_eq!(state, ReconcileState::SkippedNoDiff);
        assert!(!layout.plugins_path().exists());
        assert!(!layout.catalog_path().exists());
    }

    #[test]
    fn test_unknown_entry_fields_survive_rewrite() {
        let dir = BundleDir::new();
        dir.write(
            "plugins.yaml",
            "# managed\nplugins:\n- id: z\n- id: a\n  url: https://repo.example.com/a.hpi\n  note: keep me\n",
        );
        let layout = BundleLayout::new(dir.path.clone());
        let analysis = chain_analysis();

        let (_, state) = run(&analysis, &layout, MergeStrategy::AddDelete);
        assert_eq!(state, ReconcileState::Written);

        let written: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(&dir.read("plugins.yaml")).unwrap();
        let entries = written["plugins"].as_sequence().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"].as_str(), Some("a"));
        assert_eq!(entries[0]["note"].as_str(), Some("keep me"));
    }
}
