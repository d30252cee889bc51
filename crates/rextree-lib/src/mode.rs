//! Dialect gating.
//!
//! Every mode- and version-dependent construction decision is answered
//! here, so dialect differences stay auditable in one place instead of
//! being scattered through the builder.

use rextree_core::{ClassKind, EcmaVersion, FlagSet, LookaroundKind, NodeKind};

/// How duplicate capture group names are treated.
///
/// The scoping rule for duplicates is version-dependent and kept as an
/// explicit policy rather than a constant, so callers targeting an
/// engine with different semantics can override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateNamePolicy {
    /// Every group name must be unique in the pattern.
    Forbid,
    /// Groups may share a name when they sit in mutually exclusive
    /// alternation branches; a named backreference prefers the group
    /// reachable from its own branch.
    AlternationScoped,
}

/// Validation options supplied by the driver alongside the token
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegExpOptions {
    pub ecma_version: EcmaVersion,
    /// Reject Annex-B-only syntax even without the `u`/`v` flags.
    pub strict: bool,
    /// Override for the duplicate-name rule; `None` derives it from
    /// the version.
    pub duplicate_names: Option<DuplicateNamePolicy>,
}

impl Default for RegExpOptions {
    fn default() -> Self {
        Self {
            ecma_version: EcmaVersion::LATEST,
            strict: false,
            duplicate_names: None,
        }
    }
}

/// The policy object consulted at every construction step.
#[derive(Debug, Clone, Copy)]
pub struct ModeGate {
    ecma_version: EcmaVersion,
    strict: bool,
    unicode: bool,
    unicode_sets: bool,
    duplicate_names: DuplicateNamePolicy,
}

impl ModeGate {
    pub fn new(options: &RegExpOptions, flags: &FlagSet) -> Self {
        let duplicate_names = options.duplicate_names.unwrap_or({
            if options.ecma_version >= EcmaVersion::Es2025 {
                DuplicateNamePolicy::AlternationScoped
            } else {
                DuplicateNamePolicy::Forbid
            }
        });
        Self {
            ecma_version: options.ecma_version,
            strict: options.strict,
            unicode: flags.unicode,
            unicode_sets: flags.unicode_sets,
            duplicate_names,
        }
    }

    pub fn ecma_version(&self) -> EcmaVersion {
        self.ecma_version
    }

    /// Either flag forces strict pattern syntax; Annex B only applies
    /// to legacy non-unicode literals.
    pub fn is_strict(&self) -> bool {
        self.strict || self.unicode || self.unicode_sets
    }

    pub fn unicode_mode(&self) -> bool {
        self.unicode
    }

    pub fn unicode_sets_mode(&self) -> bool {
        self.unicode_sets
    }

    /// Which character-class grammar is active. The two grammars never
    /// mix within one literal.
    pub fn class_kind(&self) -> ClassKind {
        if self.unicode_sets {
            ClassKind::UnicodeSets
        } else {
            ClassKind::ClassRanges
        }
    }

    pub fn duplicate_names(&self) -> DuplicateNamePolicy {
        self.duplicate_names
    }

    pub fn allows_duplicate_named_groups(&self) -> bool {
        self.duplicate_names == DuplicateNamePolicy::AlternationScoped
    }

    pub fn allows_named_groups(&self) -> bool {
        self.ecma_version >= EcmaVersion::Es2018
    }

    pub fn allows_lookbehind(&self) -> bool {
        self.ecma_version >= EcmaVersion::Es2018
    }

    pub fn allows_property_escapes(&self) -> bool {
        self.ecma_version >= EcmaVersion::Es2018 && (self.unicode || self.unicode_sets)
    }

    pub fn allows_unicode_sets(&self) -> bool {
        self.ecma_version >= EcmaVersion::Es2024
    }

    /// `\q{...}` and string-valued property escapes.
    pub fn allows_string_disjunction(&self) -> bool {
        self.unicode_sets
    }

    /// `[a--b]`, `[a&&b]`.
    pub fn allows_expression_class(&self) -> bool {
        self.unicode_sets
    }

    /// Nested `[...]` inside a class.
    pub fn allows_nested_class(&self) -> bool {
        self.unicode_sets
    }

    /// Annex-B-only escape shapes and quantified lookahead.
    pub fn allows_legacy_syntax(&self) -> bool {
        !self.is_strict()
    }

    /// Whether a quantifier may wrap this element in the active mode.
    ///
    /// The lattice decides what is quantifiable at all; on top of that,
    /// quantified lookahead is an Annex-B leftover rejected in strict
    /// mode.
    pub fn permits_quantifier_over(&self, element: &NodeKind) -> bool {
        if !element.is_quantifiable() {
            return false;
        }
        match element {
            NodeKind::LookaroundAssertion {
                kind: LookaroundKind::Lookahead,
                ..
            } => self.allows_legacy_syntax(),
            _ => true,
        }
    }
}
