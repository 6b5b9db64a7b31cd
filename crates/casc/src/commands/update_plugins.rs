//! Update-plugins command

use anyhow::Result;
use casc_plugins::{reconcile, ReconcileState};

use super::prepare;
use crate::cli::UpdatePluginsArgs;
use crate::output;

pub async fn run(args: UpdatePluginsArgs) -> Result<()> {
    let prepared = prepare(&args.source, &args.merge_strategy).await?;
    let layout = &prepared.layout;

    let outcome = reconcile(
        &prepared.analysis,
        prepared.config.merge_strategy,
        layout.load_catalog()?,
        layout.load_plugins()?,
    );

    if args.show_diffs {
        for report in &outcome.reports {
            output::header(&report.title);
            for line in &report.lines {
                println!("{}", line.to_string().trim_end());
            }
        }
    }

    match outcome.persist(layout)? {
        ReconcileState::Written => output::success(&format!("Updated plugin files in {}", layout.dir())),
        ReconcileState::SkippedDoNothing => output::warning(&format!(
            "Merge strategy {} forbids changes, nothing written",
            prepared.config.merge_strategy
        )),
        _ => output::info("Plugin files already up to date"),
    }
    Ok(())
}
