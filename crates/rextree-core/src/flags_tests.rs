use crate::flags::{FlagError, FlagErrorKind, FlagSet};

#[test]
fn parse_empty() {
    let flags = FlagSet::from_text("").unwrap();
    assert_eq!(flags, FlagSet::default());
}

#[test]
fn parse_all_classic() {
    let flags = FlagSet::from_text("dgimsuy").unwrap();
    assert!(flags.has_indices);
    assert!(flags.global);
    assert!(flags.ignore_case);
    assert!(flags.multiline);
    assert!(flags.dot_all);
    assert!(flags.unicode);
    assert!(flags.sticky);
    assert!(!flags.unicode_sets);
}

#[test]
fn display_is_canonical_order() {
    let flags = FlagSet::from_text("yig").unwrap();
    assert_eq!(flags.to_string(), "giy");
}

#[test]
fn unknown_flag_rejected() {
    let err = FlagSet::from_text("gx").unwrap_err();
    assert_eq!(
        err,
        FlagError {
            kind: FlagErrorKind::Unknown,
            flag: 'x',
            index: 1,
        }
    );
}

#[test]
fn duplicate_flag_rejected() {
    let err = FlagSet::from_text("gig").unwrap_err();
    assert_eq!(err.kind, FlagErrorKind::Duplicate);
    assert_eq!(err.flag, 'g');
    assert_eq!(err.index, 2);
}

#[test]
fn unicode_and_unicode_sets_exclusive() {
    let err = FlagSet::from_text("uv").unwrap_err();
    assert_eq!(err.kind, FlagErrorKind::Incompatible);
    assert_eq!(err.index, 1);

    let err = FlagSet::from_text("vu").unwrap_err();
    assert_eq!(err.kind, FlagErrorKind::Incompatible);
}

#[test]
fn unicode_sets_alone_is_fine() {
    let flags = FlagSet::from_text("v").unwrap();
    assert!(flags.unicode_sets);
    assert!(!flags.unicode);
}
