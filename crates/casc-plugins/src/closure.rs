//! Roots, transitive closures and dependency tree rendering
//!
//! `closure` and `render_dependency_tree` disagree on cycles on purpose:
//! the closure silently stops at an already visited id, while rendering a
//! tree treats a repeated id on the same chain as fatal.

use crate::graph::{DependencyGraph, GraphSet};
use casc_core::{Error, Result};
use std::collections::{BTreeSet, HashSet};

/// Plugins nothing else in `graph` non-optionally requires
pub fn roots_of(graph: &DependencyGraph) -> BTreeSet<String> {
    graph
        .ids()
        .difference(&graph.required_ids())
        .cloned()
        .collect()
}

/// Transitive non-optional dependencies of `id`, skipping anything in `visited`
///
/// Returns an empty set when `id` was already visited. `id` itself is only
/// part of the result when it sits on a cycle. Iterative, so pathological
/// chains cannot overflow the stack.
pub fn closure(graph: &DependencyGraph, id: &str, visited: &mut HashSet<String>) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    if !visited.insert(id.to_string()) {
        return result;
    }

    let mut stack = vec![id.to_string()];
    while let Some(current) = stack.pop() {
        for dep in graph.non_optional(&current) {
            result.insert(dep.clone());
            if visited.insert(dep.clone()) {
                stack.push(dep.clone());
            }
        }
    }
    result
}

/// [`closure`] with a fresh visited set
pub fn closure_of(graph: &DependencyGraph, id: &str) -> BTreeSet<String> {
    closure(graph, id, &mut HashSet::new())
}

/// Union of each id and its closure
pub fn with_closures<'a>(
    graph: &DependencyGraph,
    ids: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for id in ids {
        result.insert(id.clone());
        result.extend(closure_of(graph, id));
    }
    result
}

/// Every `root -> ... -> dep` path below `root_id`, one line per edge walked
///
/// Fails with [`Error::CyclicDependency`] when an id repeats on its own chain.
pub fn render_dependency_tree(graph: &DependencyGraph, root_id: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    // chain[i] is the node at depth i, cursor[i] the next dependency to walk from it
    let mut chain = vec![root_id.to_string()];
    let mut cursor = vec![0usize];

    while let (Some(current), Some(next)) = (chain.last(), cursor.last_mut()) {
        let Some(dep) = graph.non_optional(current).get(*next) else {
            chain.pop();
            cursor.pop();
            continue;
        };
        *next += 1;
        if chain.contains(dep) {
            return Err(Error::cyclic_dependency(&chain, dep));
        }
        chain.push(dep.clone());
        cursor.push(0);
        lines.push(chain.join(" -> "));
    }
    Ok(lines)
}

/// Same failure condition as [`render_dependency_tree`] without enumerating paths
pub fn ensure_acyclic_from(graph: &DependencyGraph, root_id: &str) -> Result<()> {
    let mut done: HashSet<String> = HashSet::new();
    let mut chain = vec![root_id.to_string()];
    let mut cursor = vec![0usize];

    while let (Some(current), Some(next)) = (chain.last(), cursor.last_mut()) {
        let Some(dep) = graph.non_optional(current).get(*next) else {
            done.insert(current.clone());
            chain.pop();
            cursor.pop();
            continue;
        };
        *next += 1;
        if chain.contains(dep) {
            return Err(Error::cyclic_dependency(&chain, dep));
        }
        if !done.contains(dep) {
            chain.push(dep.clone());
            cursor.push(0);
        }
    }
    Ok(())
}

/// Every plugin that transitively requires `id`, per the minus-bootstrap graph
pub fn dependents_in_tree(graphs: &GraphSet, id: &str) -> BTreeSet<String> {
    let graph = &graphs.minus_bootstrap;
    let mut result = BTreeSet::new();
    let mut to_visit = vec![id.to_string()];

    while let Some(current) = to_visit.pop() {
        if !result.insert(current.clone()) {
            continue;
        }
        to_visit.extend(graph.dependents(&current).iter().cloned());
    }

    result.remove(id);
    result
}
