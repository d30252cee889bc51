use rextree_core::{ClassKind, EcmaVersion, FlagSet, LookaroundKind, NodeKind};

use crate::mode::{DuplicateNamePolicy, ModeGate, RegExpOptions};

fn options(ecma_version: EcmaVersion, strict: bool) -> RegExpOptions {
    RegExpOptions {
        ecma_version,
        strict,
        duplicate_names: None,
    }
}

fn gate(ecma_version: EcmaVersion, strict: bool, flags: &str) -> ModeGate {
    let flags = FlagSet::from_text(flags).unwrap();
    ModeGate::new(&options(ecma_version, strict), &flags)
}

#[test]
fn class_kind_follows_flags() {
    assert_eq!(
        gate(EcmaVersion::LATEST, false, "").class_kind(),
        ClassKind::ClassRanges
    );
    assert_eq!(
        gate(EcmaVersion::LATEST, false, "u").class_kind(),
        ClassKind::ClassRanges
    );
    assert_eq!(
        gate(EcmaVersion::LATEST, false, "v").class_kind(),
        ClassKind::UnicodeSets
    );
}

#[test]
fn unicode_flags_force_strict() {
    assert!(!gate(EcmaVersion::LATEST, false, "").is_strict());
    assert!(gate(EcmaVersion::LATEST, true, "").is_strict());
    assert!(gate(EcmaVersion::LATEST, false, "u").is_strict());
    assert!(gate(EcmaVersion::LATEST, false, "v").is_strict());
}

#[test]
fn feature_thresholds() {
    assert!(!gate(EcmaVersion::Es2017, false, "").allows_named_groups());
    assert!(gate(EcmaVersion::Es2018, false, "").allows_named_groups());

    assert!(!gate(EcmaVersion::Es2017, false, "").allows_lookbehind());
    assert!(gate(EcmaVersion::Es2018, false, "").allows_lookbehind());

    assert!(!gate(EcmaVersion::Es2023, false, "").allows_unicode_sets());
    assert!(gate(EcmaVersion::Es2024, false, "").allows_unicode_sets());
}

#[test]
fn property_escapes_need_unicode_mode() {
    assert!(!gate(EcmaVersion::Es2018, false, "").allows_property_escapes());
    assert!(gate(EcmaVersion::Es2018, false, "u").allows_property_escapes());
    assert!(gate(EcmaVersion::LATEST, false, "v").allows_property_escapes());
    assert!(!gate(EcmaVersion::Es2017, false, "u").allows_property_escapes());
}

#[test]
fn set_notation_needs_v_flag() {
    let classic = gate(EcmaVersion::LATEST, false, "u");
    assert!(!classic.allows_expression_class());
    assert!(!classic.allows_string_disjunction());
    assert!(!classic.allows_nested_class());

    let sets = gate(EcmaVersion::LATEST, false, "v");
    assert!(sets.allows_expression_class());
    assert!(sets.allows_string_disjunction());
    assert!(sets.allows_nested_class());
}

#[test]
fn duplicate_name_policy_defaults_by_version() {
    assert_eq!(
        gate(EcmaVersion::Es2024, false, "").duplicate_names(),
        DuplicateNamePolicy::Forbid
    );
    assert_eq!(
        gate(EcmaVersion::Es2025, false, "").duplicate_names(),
        DuplicateNamePolicy::AlternationScoped
    );
}

#[test]
fn duplicate_name_policy_is_overridable() {
    let options = RegExpOptions {
        ecma_version: EcmaVersion::Es2018,
        strict: false,
        duplicate_names: Some(DuplicateNamePolicy::AlternationScoped),
    };
    let gate = ModeGate::new(&options, &FlagSet::default());
    assert!(gate.allows_duplicate_named_groups());
}

#[test]
fn quantifier_ruling() {
    let legacy = gate(EcmaVersion::LATEST, false, "");
    let strict = gate(EcmaVersion::LATEST, true, "");

    let group = NodeKind::Group {
        alternatives: vec![],
    };
    assert!(legacy.permits_quantifier_over(&group));
    assert!(strict.permits_quantifier_over(&group));

    let lookahead = NodeKind::LookaroundAssertion {
        kind: LookaroundKind::Lookahead,
        negate: false,
        alternatives: vec![],
    };
    assert!(legacy.permits_quantifier_over(&lookahead));
    assert!(!strict.permits_quantifier_over(&lookahead));

    let lookbehind = NodeKind::LookaroundAssertion {
        kind: LookaroundKind::Lookbehind,
        negate: false,
        alternatives: vec![],
    };
    assert!(!legacy.permits_quantifier_over(&lookbehind));
    assert!(!strict.permits_quantifier_over(&lookbehind));
}
