//! Analyze-plugins command

use anyhow::Result;
use casc_core::types::MergeStrategy;
use serde_json::json;

use super::prepare;
use crate::cli::AnalyzePluginsArgs;
use crate::output;

pub async fn run(args: AnalyzePluginsArgs) -> Result<()> {
    let prepared = prepare(&args.source, MergeStrategy::default().name()).await?;
    let analysis = &prepared.analysis;

    if args.json {
        let report = json!({
            "listStrategy": analysis.strategy.to_string(),
            "expected": analysis.expected,
            "bootstrap": analysis.bootstrap,
            "deletedOrInactive": analysis.deleted_or_inactive,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::kv("List strategy", &analysis.strategy.to_string());
    output::kv("Installed plugins", &analysis.graphs.all.len().to_string());
    output::id_list("Expected plugins", &analysis.expected);
    output::id_list("Bootstrap plugins", &analysis.bootstrap);
    output::id_list("Deleted or inactive plugins", &analysis.deleted_or_inactive);
    output::success("Sanity check passed");
    Ok(())
}
