//! Coverage check gating every file mutation
//!
//! expected + bootstrap (each with their non-optional closures) + deleted or
//! inactive plugins must add up to exactly the installed plugin set.

use crate::closure::with_closures;
use crate::graph::GraphSet;
use casc_core::{Error, Result};
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Verify the partition invariant for `expected`
pub fn check(expected: &BTreeSet<String>, graphs: &GraphSet) -> Result<()> {
    debug!("Plugin Analysis - Performing sanity check...");

    let mut covered = with_closures(&graphs.all, expected);
    covered.extend(with_closures(&graphs.all, &graphs.bootstrap_ids()));
    covered.extend(graphs.deleted_or_inactive_ids());

    let all = graphs.all.ids();
    if covered == all {
        debug!("Plugin Analysis - Sanity check passed.");
        return Ok(());
    }

    let missing: Vec<String> = all.difference(&covered).cloned().collect();
    let extra: Vec<String> = covered.difference(&all).cloned().collect();
    error!(
        "Sanity check failed. Uncovered plugins: {:?}, unknown plugins: {:?}",
        missing, extra
    );
    Err(Error::sanity_check_failed(missing, extra))
}
