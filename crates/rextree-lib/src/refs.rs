//! Utilities for working with capture groups and backreferences.

use indexmap::IndexSet;

use rextree_core::{NodeId, NodeKind, Tree};

/// Iterate over all capturing groups in source order. Position in this
/// sequence is the group's 1-based ordinal, counted across the whole
/// pattern.
pub fn capturing_groups(tree: &Tree) -> impl Iterator<Item = NodeId> + '_ {
    tree.descendants(tree.pattern())
        .filter(|&id| matches!(tree.kind(id), NodeKind::CapturingGroup { .. }))
}

/// Iterate over all backreferences in source order.
pub fn backreferences(tree: &Tree) -> impl Iterator<Item = NodeId> + '_ {
    tree.descendants(tree.pattern())
        .filter(|&id| matches!(tree.kind(id), NodeKind::Backreference { .. }))
}

/// Collect all group names as owned strings.
pub fn group_names(tree: &Tree) -> IndexSet<String> {
    capturing_groups(tree)
        .filter_map(|id| match tree.kind(id) {
            NodeKind::CapturingGroup {
                name: Some(name), ..
            } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Check if any backreference targets the given group.
pub fn is_referenced(tree: &Tree, group: NodeId) -> bool {
    match tree.kind(group) {
        NodeKind::CapturingGroup { references, .. } => !references.is_empty(),
        _ => false,
    }
}
