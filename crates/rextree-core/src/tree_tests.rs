use rowan::TextRange;

use crate::flags::FlagSet;
use crate::nodes::NodeKind;
use crate::tree::{NodeId, Tree};

fn span(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

/// Hand-assemble the tree of `/ab/`.
fn literal_ab() -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new("/ab/");
    let a = tree.alloc(span(1, 2), NodeKind::Character { value: 97 });
    let b = tree.alloc(span(2, 3), NodeKind::Character { value: 98 });
    let alt = tree.alloc(span(1, 3), NodeKind::Alternative { elements: vec![a, b] });
    tree.set_parent(a, alt);
    tree.set_parent(b, alt);
    let pattern = tree.alloc(
        span(1, 3),
        NodeKind::Pattern {
            alternatives: vec![alt],
        },
    );
    tree.set_parent(alt, pattern);
    let flags = tree.alloc(span(4, 4), NodeKind::Flags(FlagSet::default()));
    let literal = tree.alloc(span(0, 4), NodeKind::RegExpLiteral { pattern, flags });
    tree.set_parent(pattern, literal);
    tree.set_parent(flags, literal);
    tree.set_root(literal);
    (tree, vec![a, b, alt, pattern, flags, literal])
}

#[test]
fn raw_matches_span() {
    let (tree, ids) = literal_ab();
    let [a, b, alt, _, flags, literal] = ids[..] else {
        unreachable!()
    };
    assert_eq!(tree.raw(a), "a");
    assert_eq!(tree.raw(b), "b");
    assert_eq!(tree.raw(alt), "ab");
    assert_eq!(tree.raw(flags), "");
    assert_eq!(tree.raw(literal), "/ab/");
}

#[test]
fn parent_links() {
    let (tree, ids) = literal_ab();
    let [a, _, alt, pattern, flags, literal] = ids[..] else {
        unreachable!()
    };
    assert_eq!(tree.parent(literal), None);
    assert_eq!(tree.parent(pattern), Some(literal));
    assert_eq!(tree.parent(flags), Some(literal));
    assert_eq!(tree.parent(alt), Some(pattern));
    assert_eq!(tree.parent(a), Some(alt));
}

#[test]
fn descendants_is_preorder_source_order() {
    let (tree, ids) = literal_ab();
    let [a, b, alt, pattern, flags, literal] = ids[..] else {
        unreachable!()
    };
    let visited: Vec<_> = tree.descendants(tree.root()).collect();
    assert_eq!(visited, vec![literal, pattern, alt, a, b, flags]);
}

#[test]
fn ancestors_walk_to_root() {
    let (tree, ids) = literal_ab();
    let [a, _, alt, pattern, _, literal] = ids[..] else {
        unreachable!()
    };
    let chain: Vec<_> = tree.ancestors(a).collect();
    assert_eq!(chain, vec![alt, pattern, literal]);
}

#[test]
fn pattern_and_flag_set_accessors() {
    let (tree, ids) = literal_ab();
    let pattern = ids[3];
    assert_eq!(tree.pattern(), pattern);
    assert_eq!(*tree.flag_set(), FlagSet::default());
}

#[test]
fn dump_shape() {
    let (tree, _) = literal_ab();
    assert_eq!(
        tree.dump(),
        "RegExpLiteral /ab/\n  Pattern\n    Alternative\n      Character U+0061\n      Character U+0062\n  Flags\n"
    );
}
