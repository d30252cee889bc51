use rowan::TextRange;

use super::*;

fn span(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    assert_eq!(format!("{}", Severity::Error), "error");
    assert_eq!(format!("{}", Severity::Warning), "warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::MalformedRange, span(2, 7))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(
        diagnostics.first(),
        Some((DiagnosticKind::MalformedRange, span(2, 7)))
    );
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnresolvedReference, span(1, 12))
        .message("\\k<missing>")
        .emit();

    let rendered = diagnostics.printer().render();
    assert_eq!(
        rendered,
        "error at 1..12: `\\k<missing>` does not resolve to a capturing group"
    );
}

#[test]
fn plain_format_includes_related_and_hints() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnsupportedConstruct, span(3, 5))
        .message("duplicate capture group name `n`")
        .related_to("first declared here", span(0, 2))
        .hint("duplicate names require ES2025")
        .emit();

    let rendered = diagnostics.printer().render();
    assert_eq!(
        rendered,
        "error at 3..5: duplicate capture group name `n` \
         (related: first declared here at 0..2) \
         (hint: duplicate names require ES2025)"
    );
}

#[test]
fn render_with_source_underlines_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::MalformedRange, span(2, 7))
        .message("{3,2} repeats at most 2 times but at least 3")
        .emit();

    let rendered = diagnostics.render("/a{3,2}/");
    assert!(rendered.contains("error"));
    assert!(rendered.contains("/a{3,2}/"));
    assert!(rendered.contains("^^^^^"));
}

#[test]
fn error_count_and_extend() {
    let mut a = Diagnostics::new();
    a.report(DiagnosticKind::UnsupportedConstruct, span(0, 1)).emit();
    let mut b = Diagnostics::new();
    b.report(DiagnosticKind::UnresolvedReference, span(1, 2)).emit();

    a.extend(b);
    assert_eq!(a.error_count(), 2);
    assert_eq!(
        a.kinds().collect::<Vec<_>>(),
        vec![
            DiagnosticKind::UnsupportedConstruct,
            DiagnosticKind::UnresolvedReference
        ]
    );
}
