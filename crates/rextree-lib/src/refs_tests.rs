use rowan::{TextRange, TextSize};

use rextree_core::{GroupRef, Tree};

use crate::builder::TreeBuilder;
use crate::mode::RegExpOptions;
use crate::refs::{backreferences, capturing_groups, group_names, is_referenced};

fn span(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

fn at(offset: u32) -> TextSize {
    TextSize::new(offset)
}

/// Build `/(?<a>x)(?<b>y)\k<a>/`.
fn sample() -> Tree {
    let source = "/(?<a>x)(?<b>y)\\k<a>/";
    let mut b = TreeBuilder::new(source, RegExpOptions::default());
    b.flags(span(21, 21), "").unwrap();
    b.begin_pattern(at(1));
    b.begin_alternative(at(1));
    b.begin_capturing_group(at(1), Some("a")).unwrap();
    b.begin_alternative(at(6));
    b.character(span(6, 7), 'x' as u32).unwrap();
    b.end_alternative(at(7)).unwrap();
    b.end_capturing_group(at(8)).unwrap();
    b.begin_capturing_group(at(8), Some("b")).unwrap();
    b.begin_alternative(at(13));
    b.character(span(13, 14), 'y' as u32).unwrap();
    b.end_alternative(at(14)).unwrap();
    b.end_capturing_group(at(15)).unwrap();
    b.backreference(span(15, 20), GroupRef::Name("a".into()))
        .unwrap();
    b.end_alternative(at(20)).unwrap();
    b.end_pattern(at(20)).unwrap();
    b.finish_literal(at(21)).unwrap()
}

#[test]
fn collect_groups_in_source_order() {
    let tree = sample();
    let groups: Vec<_> = capturing_groups(&tree).collect();
    assert_eq!(groups.len(), 2);
    assert!(tree.range(groups[0]).start() < tree.range(groups[1]).start());
}

#[test]
fn collect_group_names() {
    let tree = sample();
    let names = group_names(&tree);
    assert_eq!(names.len(), 2);
    assert!(names.contains("a"));
    assert!(names.contains("b"));
}

#[test]
fn collect_backreferences() {
    let tree = sample();
    assert_eq!(backreferences(&tree).count(), 1);
}

#[test]
fn referenced_groups() {
    let tree = sample();
    let groups: Vec<_> = capturing_groups(&tree).collect();
    assert!(is_referenced(&tree, groups[0]));
    assert!(!is_referenced(&tree, groups[1]));
}
