use rowan::TextRange;

use crate::nodes::{
    BoundaryKind, CharacterSetKind, ClassKind, GroupRef, LookaroundKind, Max, NodeKind,
};
use crate::tree::Tree;

fn span(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn max_ordering() {
    assert!(Max::Finite(0) <= Max::Finite(0));
    assert!(Max::Finite(2) < Max::Finite(3));
    assert!(Max::Finite(u32::MAX) < Max::Infinite);
    assert!(Max::Infinite <= Max::Infinite);
}

#[test]
fn max_serializes_finite_as_number() {
    let json = serde_json::to_string(&Max::Finite(42)).unwrap();
    assert_eq!(json, "42");
    let back: Max = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Max::Finite(42));
}

#[test]
fn max_serializes_infinite_as_sentinel() {
    let json = serde_json::to_string(&Max::Infinite).unwrap();
    assert_eq!(json, "\"$$Infinity\"");
    let back: Max = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Max::Infinite);
}

#[test]
fn max_rejects_other_strings() {
    assert!(serde_json::from_str::<Max>("\"Infinity\"").is_err());
    assert!(serde_json::from_str::<Max>("-1").is_err());
}

#[test]
fn quantifiable_set_is_exact() {
    let mut tree = Tree::new("");
    let a = tree.alloc(span(0, 0), NodeKind::Character { value: 97 });

    assert!(NodeKind::Character { value: 97 }.is_quantifiable());
    assert!(NodeKind::Group { alternatives: vec![] }.is_quantifiable());
    assert!(
        NodeKind::CapturingGroup {
            name: None,
            alternatives: vec![],
            references: vec![],
        }
        .is_quantifiable()
    );
    assert!(
        NodeKind::Backreference {
            target: GroupRef::Number(1),
            resolved: None,
        }
        .is_quantifiable()
    );
    assert!(NodeKind::CharacterSet(CharacterSetKind::Any).is_quantifiable());
    assert!(
        NodeKind::CharacterClass {
            kind: ClassKind::ClassRanges,
            negate: false,
            elements: vec![],
        }
        .is_quantifiable()
    );
    assert!(
        NodeKind::ExpressionCharacterClass {
            negate: false,
            expression: a,
        }
        .is_quantifiable()
    );

    // Lookahead yes, lookbehind no.
    assert!(
        NodeKind::LookaroundAssertion {
            kind: LookaroundKind::Lookahead,
            negate: false,
            alternatives: vec![],
        }
        .is_quantifiable()
    );
    assert!(
        !NodeKind::LookaroundAssertion {
            kind: LookaroundKind::Lookbehind,
            negate: false,
            alternatives: vec![],
        }
        .is_quantifiable()
    );
    assert!(
        !NodeKind::BoundaryAssertion {
            kind: BoundaryKind::Start,
        }
        .is_quantifiable()
    );
}

#[test]
fn class_set_operands_exclude_ranges() {
    let mut tree = Tree::new("");
    let a = tree.alloc(span(0, 0), NodeKind::Character { value: 97 });
    let b = tree.alloc(span(0, 0), NodeKind::Character { value: 98 });

    assert!(NodeKind::Character { value: 97 }.is_class_set_operand());
    assert!(NodeKind::ClassStringDisjunction { alternatives: vec![] }.is_class_set_operand());
    assert!(!NodeKind::CharacterClassRange { min: a, max: b }.is_class_set_operand());
    assert!(!NodeKind::ClassIntersection { left: a, right: b }.is_class_set_operand());
}

#[test]
fn class_ranges_class_rejects_set_notation_children() {
    let classic = NodeKind::CharacterClass {
        kind: ClassKind::ClassRanges,
        negate: false,
        elements: vec![],
    };
    assert!(classic.admits_child(&NodeKind::Character { value: 97 }));
    assert!(!classic.admits_child(&NodeKind::ClassStringDisjunction { alternatives: vec![] }));
    assert!(!classic.admits_child(&NodeKind::CharacterClass {
        kind: ClassKind::UnicodeSets,
        negate: false,
        elements: vec![],
    }));
    // A property of strings never fits a classic class.
    assert!(!classic.admits_child(&NodeKind::CharacterSet(CharacterSetKind::Property {
        key: "RGI_Emoji".into(),
        value: None,
        negate: false,
        strings: true,
    })));
}

#[test]
fn unicode_sets_class_nests() {
    let sets = NodeKind::CharacterClass {
        kind: ClassKind::UnicodeSets,
        negate: false,
        elements: vec![],
    };
    assert!(sets.admits_child(&NodeKind::ClassStringDisjunction { alternatives: vec![] }));
    assert!(sets.admits_child(&NodeKind::CharacterClass {
        kind: ClassKind::UnicodeSets,
        negate: false,
        elements: vec![],
    }));
    assert!(!sets.admits_child(&NodeKind::CharacterClass {
        kind: ClassKind::ClassRanges,
        negate: false,
        elements: vec![],
    }));
}

#[test]
fn quantifier_only_admits_quantifiable() {
    let mut tree = Tree::new("");
    let a = tree.alloc(span(0, 0), NodeKind::Character { value: 97 });
    let quantifier = NodeKind::Quantifier {
        min: 0,
        max: Max::Infinite,
        greedy: true,
        element: a,
    };
    assert!(quantifier.admits_child(&NodeKind::Character { value: 97 }));
    assert!(!quantifier.admits_child(&NodeKind::BoundaryAssertion {
        kind: BoundaryKind::Word { negate: false },
    }));
    assert!(!quantifier.admits_child(&NodeKind::LookaroundAssertion {
        kind: LookaroundKind::Lookbehind,
        negate: true,
        alternatives: vec![],
    }));
}

#[test]
fn string_alternative_admits_characters_only() {
    let alt = NodeKind::StringAlternative { elements: vec![] };
    assert!(alt.admits_child(&NodeKind::Character { value: 97 }));
    assert!(!alt.admits_child(&NodeKind::CharacterSet(CharacterSetKind::Any)));
}

#[test]
fn group_ref_display() {
    assert_eq!(GroupRef::Number(3).to_string(), "\\3");
    assert_eq!(GroupRef::Name("n".into()).to_string(), "\\k<n>");
}
