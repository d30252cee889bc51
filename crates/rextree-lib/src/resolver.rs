//! Backreference resolution.
//!
//! References may precede the group they name, so resolution is a
//! separate pass over the finished pattern rather than part of
//! construction. Two sweeps in source order: collect every capturing
//! group (ordinal position and name), then bind every backreference
//! and populate the inverse index on its group.

use std::collections::HashMap;

use indexmap::IndexMap;

use rextree_core::{GroupRef, NodeId, NodeKind, Tree};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mode::ModeGate;
use crate::refs;

pub(crate) fn resolve(tree: &mut Tree, gate: &ModeGate, diagnostics: &mut Diagnostics) {
    // Ordinals are 1-based positions of `(` across the whole pattern,
    // which preorder traversal yields directly.
    let groups: Vec<NodeId> = refs::capturing_groups(tree).collect();

    let mut by_name: IndexMap<String, Vec<NodeId>> = IndexMap::new();
    for &group in &groups {
        if let NodeKind::CapturingGroup {
            name: Some(name), ..
        } = tree.kind(group)
        {
            by_name.entry(name.clone()).or_default().push(group);
        }
    }

    audit_duplicate_names(tree, gate, &by_name, diagnostics);

    let references: Vec<NodeId> = refs::backreferences(tree).collect();

    for &reference in &references {
        let NodeKind::Backreference { target, .. } = tree.kind(reference) else {
            unreachable!("collected only backreferences");
        };
        let target = target.clone();

        let group = match &target {
            // Forward references are legal: the ordinal table covers
            // the entire pattern, not just what precedes the reference.
            GroupRef::Number(n) => n
                .checked_sub(1)
                .and_then(|i| groups.get(i as usize))
                .copied(),
            GroupRef::Name(name) => by_name
                .get(name)
                .map(|candidates| pick_named(tree, reference, candidates)),
        };

        let Some(group) = group else {
            diagnostics
                .report(DiagnosticKind::UnresolvedReference, tree.range(reference))
                .message(target.to_string())
                .emit();
            continue;
        };

        if let NodeKind::Backreference { resolved, .. } = tree.kind_mut(reference) {
            *resolved = Some(group);
        }
        if let NodeKind::CapturingGroup { references, .. } = tree.kind_mut(group) {
            references.push(reference);
        }
    }
}

/// Groups may share a name only when the gate says so, and then only
/// across mutually exclusive alternation branches.
fn audit_duplicate_names(
    tree: &Tree,
    gate: &ModeGate,
    by_name: &IndexMap<String, Vec<NodeId>>,
    diagnostics: &mut Diagnostics,
) {
    for (name, ids) in by_name {
        if ids.len() < 2 {
            continue;
        }
        if !gate.allows_duplicate_named_groups() {
            for &duplicate in &ids[1..] {
                diagnostics
                    .report(
                        DiagnosticKind::UnsupportedConstruct,
                        tree.range(duplicate),
                    )
                    .message(format!("duplicate capture group name `{name}`"))
                    .related_to("first declared here", tree.range(ids[0]))
                    .emit();
            }
            continue;
        }
        for (i, &first) in ids.iter().enumerate() {
            for &second in &ids[i + 1..] {
                if !mutually_exclusive(tree, first, second) {
                    diagnostics
                        .report(DiagnosticKind::UnsupportedConstruct, tree.range(second))
                        .message(format!(
                            "capture group name `{name}` reused within the same branch"
                        ))
                        .related_to("first declared here", tree.range(first))
                        .emit();
                }
            }
        }
    }
}

/// Among same-named groups, prefer the one the reference can actually
/// observe (not fenced off in a sibling branch); fall back to the
/// first in source order, where every candidate only ever captures the
/// empty string from the reference's point of view.
fn pick_named(tree: &Tree, reference: NodeId, candidates: &[NodeId]) -> NodeId {
    candidates
        .iter()
        .copied()
        .find(|&group| !mutually_exclusive(tree, reference, group))
        .unwrap_or(candidates[0])
}

/// Two nodes are mutually exclusive when their paths fork into
/// different alternatives of the same disjunction.
fn mutually_exclusive(tree: &Tree, a: NodeId, b: NodeId) -> bool {
    let mut step_to_a: HashMap<NodeId, NodeId> = HashMap::new();
    let mut cur = a;
    while let Some(parent) = tree.parent(cur) {
        step_to_a.insert(parent, cur);
        cur = parent;
    }

    let mut cur = b;
    while let Some(parent) = tree.parent(cur) {
        if let Some(&toward_a) = step_to_a.get(&parent) {
            return toward_a != cur
                && matches!(tree.kind(toward_a), NodeKind::Alternative { .. })
                && matches!(tree.kind(cur), NodeKind::Alternative { .. });
        }
        cur = parent;
    }
    false
}
