//! Flattening of resolved dependency trees into direct declarations.
//!
//! A `.fpkg` archive already carries its own transitive requirements, so a
//! module whose artifacts are all archives does not need to be re-declared.
//! Anything else is declared directly. Traversal is depth-first, pre-order,
//! and always continues into children.

use std::collections::HashSet;

use crate::core::{ModuleId, ResolvedDependencyNode};

/// Flatten a resolved forest into the modules to declare directly.
///
/// Order follows traversal order. A module reached by two paths is emitted
/// twice; see [`flatten_unique`] for a deduplicated list.
pub fn flatten(forest: &[ResolvedDependencyNode]) -> Vec<ModuleId> {
    let mut out = Vec::new();
    for node in forest {
        visit(node, &mut out);
    }
    out
}

fn visit(node: &ResolvedDependencyNode, out: &mut Vec<ModuleId>) {
    if !node.is_self_describing() {
        out.push(node.module.module());
    }
    for child in &node.children {
        visit(child, out);
    }
}

/// Like [`flatten`], keeping only the first occurrence of each module.
pub fn flatten_unique(forest: &[ResolvedDependencyNode]) -> Vec<ModuleId> {
    let mut seen = HashSet::new();
    flatten(forest)
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
