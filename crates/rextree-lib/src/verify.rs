//! Debug-only structural audit of finished trees.
//!
//! Re-checks everything the builder and resolver promise: parent
//! consistency, span containment, mode exclusivity, and bidirectional
//! resolution links. Runs on every successful build in debug builds,
//! zero cost in release.

use std::collections::HashSet;

use rextree_core::{ClassKind, Max, NodeId, NodeKind, Tree};

pub(crate) fn verify_tree(tree: &Tree) {
    let root = tree.root();
    assert!(
        matches!(tree.kind(root), NodeKind::RegExpLiteral { .. }),
        "root must be RegExpLiteral, found {}",
        tree.kind(root).type_name()
    );
    assert!(tree.parent(root).is_none(), "root must have no parent");

    let mut seen_as_child: HashSet<NodeId> = HashSet::new();
    let mut has_class_ranges = false;
    let mut has_unicode_sets = false;

    for id in tree.descendants(root) {
        verify_children(tree, id, &mut seen_as_child);
        verify_resolution(tree, root, id);

        match tree.kind(id) {
            NodeKind::CharacterClass {
                kind: ClassKind::ClassRanges,
                ..
            } => has_class_ranges = true,
            NodeKind::CharacterClass {
                kind: ClassKind::UnicodeSets,
                ..
            }
            | NodeKind::ClassStringDisjunction { .. }
            | NodeKind::ExpressionCharacterClass { .. } => has_unicode_sets = true,
            NodeKind::CharacterSet(set) if set.may_contain_strings() => has_unicode_sets = true,
            NodeKind::Pattern { alternatives } => {
                assert!(!alternatives.is_empty(), "pattern with no alternatives");
            }
            NodeKind::Quantifier { min, max, .. } => {
                assert!(
                    Max::Finite(*min) <= *max,
                    "quantifier bounds out of order at {:?}",
                    tree.range(id)
                );
            }
            _ => {}
        }
    }

    assert!(
        !(has_class_ranges && has_unicode_sets),
        "tree mixes the classic and unicode-sets class grammars"
    );
}

fn verify_children(tree: &Tree, id: NodeId, seen_as_child: &mut HashSet<NodeId>) {
    let range = tree.range(id);
    let mut prev_end = range.start();
    for child in tree.children(id) {
        assert!(
            seen_as_child.insert(child),
            "{} {} is owned by more than one slot",
            tree.kind(child).type_name(),
            child
        );
        assert_eq!(
            tree.parent(child),
            Some(id),
            "child {} does not point back at its owner {}",
            child,
            id
        );
        assert!(
            tree.kind(id).admits_child(tree.kind(child)),
            "{} does not admit {} child",
            tree.kind(id).type_name(),
            tree.kind(child).type_name()
        );

        let child_range = tree.range(child);
        assert!(
            range.start() <= child_range.start() && child_range.end() <= range.end(),
            "child span {child_range:?} escapes parent span {range:?}"
        );
        assert!(
            prev_end <= child_range.start(),
            "sibling spans overlap or are out of order at {child_range:?}"
        );
        prev_end = child_range.end();
    }
}

fn verify_resolution(tree: &Tree, root: NodeId, id: NodeId) {
    match tree.kind(id) {
        NodeKind::Backreference { resolved, .. } => {
            let group = resolved.expect("published tree has an unresolved backreference");
            let NodeKind::CapturingGroup { references, .. } = tree.kind(group) else {
                panic!(
                    "backreference resolved to {}, not a capturing group",
                    tree.kind(group).type_name()
                );
            };
            assert_eq!(
                references.iter().filter(|&&r| r == id).count(),
                1,
                "group {group} must index backreference {id} exactly once"
            );
            assert_eq!(
                tree.ancestors(group).last(),
                Some(root),
                "resolved group {group} is detached from the tree"
            );
        }
        NodeKind::CapturingGroup { references, .. } => {
            for &reference in references {
                let NodeKind::Backreference { resolved, .. } = tree.kind(reference) else {
                    panic!(
                        "references entry {} is a {}, not a backreference",
                        reference,
                        tree.kind(reference).type_name()
                    );
                };
                assert_eq!(
                    *resolved,
                    Some(id),
                    "backreference {reference} does not point back at group {id}"
                );
            }
        }
        _ => {}
    }
}
