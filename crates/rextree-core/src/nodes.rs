//! Node variants of the regexp syntax tree.
//!
//! One enum case per node kind. Composite kinds hold `NodeId` slots into
//! the owning [`Tree`](crate::Tree); exhaustive matches over [`NodeKind`]
//! are how consumers dispatch, there is no virtual hierarchy.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::flags::FlagSet;
use crate::tree::NodeId;

/// Sentinel token standing in for an unbounded quantifier maximum in
/// persisted fixtures, where JSON has no infinity.
pub const UNBOUNDED_SENTINEL: &str = "$$Infinity";

/// Upper bound of a quantifier.
///
/// Derived ordering places every `Finite` bound below `Infinite`, so
/// `Max::Finite(min) <= max` is the whole bound law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Max {
    Finite(u32),
    Infinite,
}

impl Max {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Max::Infinite)
    }

    pub fn as_finite(&self) -> Option<u32> {
        match self {
            Max::Finite(n) => Some(*n),
            Max::Infinite => None,
        }
    }
}

impl std::fmt::Display for Max {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Max::Finite(n) => write!(f, "{n}"),
            Max::Infinite => f.write_str("Inf"),
        }
    }
}

impl Serialize for Max {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Max::Finite(n) => serializer.serialize_u32(*n),
            Max::Infinite => serializer.serialize_str(UNBOUNDED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Max {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaxVisitor;

        impl de::Visitor<'_> for MaxVisitor {
            type Value = Max;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a non-negative integer or \"{UNBOUNDED_SENTINEL}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Max, E> {
                u32::try_from(v)
                    .map(Max::Finite)
                    .map_err(|_| E::custom("quantifier bound out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Max, E> {
                if v == UNBOUNDED_SENTINEL {
                    Ok(Max::Infinite)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(MaxVisitor)
    }
}

impl From<Max> for serde_json::Value {
    fn from(max: Max) -> Self {
        match max {
            Max::Finite(n) => serde_json::Value::from(n),
            Max::Infinite => serde_json::Value::from(UNBOUNDED_SENTINEL),
        }
    }
}

/// Direction of a lookaround assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}

/// Zero-width assertions that are not lookarounds: `^`, `$`, `\b`, `\B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Start,
    End,
    Word { negate: bool },
}

/// Which character-class grammar a class node belongs to.
///
/// The two grammars are mutually exclusive per literal: classic bracket
/// classes under the `u` (or no) flag, set-notation classes under `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    ClassRanges,
    UnicodeSets,
}

/// Predefined character sets: `.`, `\d`, `\s`, `\w`, `\p{...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterSetKind {
    Any,
    Digit {
        negate: bool,
    },
    Space {
        negate: bool,
    },
    Word {
        negate: bool,
    },
    /// Unicode property escape. `strings: true` marks properties of
    /// strings (`\p{RGI_Emoji}`), which may match multi-code-point
    /// sequences and only exist in unicode-sets mode.
    Property {
        key: String,
        value: Option<String>,
        negate: bool,
        strings: bool,
    },
}

impl CharacterSetKind {
    /// Whether this set can match a multi-code-point string.
    pub fn may_contain_strings(&self) -> bool {
        matches!(self, CharacterSetKind::Property { strings: true, .. })
    }
}

/// Target of a backreference: `\1` or `\k<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupRef {
    Number(u32),
    Name(String),
}

impl std::fmt::Display for GroupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupRef::Number(n) => write!(f, "\\{n}"),
            GroupRef::Name(name) => write!(f, "\\k<{name}>"),
        }
    }
}

/// The closed set of node variants.
///
/// Child slots hold ids in source order. `Backreference::resolved` and
/// `CapturingGroup::references` are the only fields written after
/// construction: the resolver fills them exactly once, before the tree
/// is handed to any consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    RegExpLiteral {
        pattern: NodeId,
        flags: NodeId,
    },
    Flags(FlagSet),
    Pattern {
        alternatives: Vec<NodeId>,
    },
    Alternative {
        elements: Vec<NodeId>,
    },
    /// A `\q{...}` branch: a plain character sequence.
    StringAlternative {
        elements: Vec<NodeId>,
    },
    Group {
        alternatives: Vec<NodeId>,
    },
    CapturingGroup {
        name: Option<String>,
        alternatives: Vec<NodeId>,
        references: Vec<NodeId>,
    },
    LookaroundAssertion {
        kind: LookaroundKind,
        negate: bool,
        alternatives: Vec<NodeId>,
    },
    BoundaryAssertion {
        kind: BoundaryKind,
    },
    Quantifier {
        min: u32,
        max: Max,
        greedy: bool,
        element: NodeId,
    },
    CharacterClass {
        kind: ClassKind,
        negate: bool,
        elements: Vec<NodeId>,
    },
    CharacterClassRange {
        min: NodeId,
        max: NodeId,
    },
    /// The `\q{a|bc}` construct.
    ClassStringDisjunction {
        alternatives: Vec<NodeId>,
    },
    /// A bracket class whose body is a single set expression, `[a--b]`.
    ExpressionCharacterClass {
        negate: bool,
        expression: NodeId,
    },
    ClassIntersection {
        left: NodeId,
        right: NodeId,
    },
    ClassSubtraction {
        left: NodeId,
        right: NodeId,
    },
    /// A single resolved code point. `raw` may be a multi-code-unit
    /// escape; lone surrogates are representable, hence `u32`.
    Character {
        value: u32,
    },
    CharacterSet(CharacterSetKind),
    Backreference {
        target: GroupRef,
        resolved: Option<NodeId>,
    },
}

impl NodeKind {
    /// Stable discriminant for pattern matching and serialization.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::RegExpLiteral { .. } => "RegExpLiteral",
            NodeKind::Flags(_) => "Flags",
            NodeKind::Pattern { .. } => "Pattern",
            NodeKind::Alternative { .. } => "Alternative",
            NodeKind::StringAlternative { .. } => "StringAlternative",
            NodeKind::Group { .. } => "Group",
            NodeKind::CapturingGroup { .. } => "CapturingGroup",
            NodeKind::LookaroundAssertion { .. } | NodeKind::BoundaryAssertion { .. } => {
                "Assertion"
            }
            NodeKind::Quantifier { .. } => "Quantifier",
            NodeKind::CharacterClass { .. } => "CharacterClass",
            NodeKind::CharacterClassRange { .. } => "CharacterClassRange",
            NodeKind::ClassStringDisjunction { .. } => "ClassStringDisjunction",
            NodeKind::ExpressionCharacterClass { .. } => "ExpressionCharacterClass",
            NodeKind::ClassIntersection { .. } => "ClassIntersection",
            NodeKind::ClassSubtraction { .. } => "ClassSubtraction",
            NodeKind::Character { .. } => "Character",
            NodeKind::CharacterSet(_) => "CharacterSet",
            NodeKind::Backreference { .. } => "Backreference",
        }
    }

    /// Whether this node may sit directly under a `Quantifier`.
    ///
    /// Lookbehind and boundary assertions are deliberately absent;
    /// lookahead is present but additionally mode-gated (legacy only).
    pub fn is_quantifiable(&self) -> bool {
        match self {
            NodeKind::Backreference { .. }
            | NodeKind::CapturingGroup { .. }
            | NodeKind::Character { .. }
            | NodeKind::CharacterClass { .. }
            | NodeKind::CharacterSet(_)
            | NodeKind::ExpressionCharacterClass { .. }
            | NodeKind::Group { .. } => true,
            NodeKind::LookaroundAssertion { kind, .. } => *kind == LookaroundKind::Lookahead,
            _ => false,
        }
    }

    /// Whether this node may appear as an operand of `&&` or `--`.
    ///
    /// Strictly smaller than the class-element set: ranges are excluded.
    pub fn is_class_set_operand(&self) -> bool {
        matches!(
            self,
            NodeKind::Character { .. }
                | NodeKind::CharacterSet(_)
                | NodeKind::CharacterClass { .. }
                | NodeKind::ClassStringDisjunction { .. }
                | NodeKind::ExpressionCharacterClass { .. }
        )
    }

    /// Whether this node may appear directly inside an ordinary
    /// `Alternative`.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            NodeKind::Backreference { .. }
                | NodeKind::BoundaryAssertion { .. }
                | NodeKind::CapturingGroup { .. }
                | NodeKind::Character { .. }
                | NodeKind::CharacterClass { .. }
                | NodeKind::CharacterSet(_)
                | NodeKind::ExpressionCharacterClass { .. }
                | NodeKind::Group { .. }
                | NodeKind::LookaroundAssertion { .. }
                | NodeKind::Quantifier { .. }
        )
    }

    /// Closed legal parent/child table.
    ///
    /// Slot-specific asymmetries (the `left`-only chaining of set
    /// operators, ranges holding exactly two characters) are tighter
    /// than this per-kind check; the builder enforces those at the
    /// individual slot.
    pub fn admits_child(&self, child: &NodeKind) -> bool {
        match self {
            NodeKind::RegExpLiteral { .. } => {
                matches!(child, NodeKind::Pattern { .. } | NodeKind::Flags(_))
            }
            NodeKind::Pattern { .. }
            | NodeKind::Group { .. }
            | NodeKind::CapturingGroup { .. }
            | NodeKind::LookaroundAssertion { .. } => {
                matches!(child, NodeKind::Alternative { .. })
            }
            NodeKind::Alternative { .. } => child.is_element(),
            NodeKind::StringAlternative { .. } => matches!(child, NodeKind::Character { .. }),
            NodeKind::Quantifier { .. } => child.is_quantifiable(),
            NodeKind::CharacterClass {
                kind: ClassKind::ClassRanges,
                ..
            } => match child {
                NodeKind::Character { .. } | NodeKind::CharacterClassRange { .. } => true,
                NodeKind::CharacterSet(set) => !set.may_contain_strings(),
                _ => false,
            },
            NodeKind::CharacterClass {
                kind: ClassKind::UnicodeSets,
                ..
            } => matches!(
                child,
                NodeKind::Character { .. }
                    | NodeKind::CharacterClassRange { .. }
                    | NodeKind::CharacterSet(_)
                    | NodeKind::CharacterClass {
                        kind: ClassKind::UnicodeSets,
                        ..
                    }
                    | NodeKind::ClassStringDisjunction { .. }
                    | NodeKind::ExpressionCharacterClass { .. }
            ),
            NodeKind::CharacterClassRange { .. } => matches!(child, NodeKind::Character { .. }),
            NodeKind::ClassStringDisjunction { .. } => {
                matches!(child, NodeKind::StringAlternative { .. })
            }
            NodeKind::ExpressionCharacterClass { .. } => matches!(
                child,
                NodeKind::ClassIntersection { .. } | NodeKind::ClassSubtraction { .. }
            ),
            NodeKind::ClassIntersection { .. } => {
                child.is_class_set_operand() || matches!(child, NodeKind::ClassIntersection { .. })
            }
            NodeKind::ClassSubtraction { .. } => {
                child.is_class_set_operand() || matches!(child, NodeKind::ClassSubtraction { .. })
            }
            // Leaves own nothing.
            NodeKind::Flags(_)
            | NodeKind::BoundaryAssertion { .. }
            | NodeKind::Character { .. }
            | NodeKind::CharacterSet(_)
            | NodeKind::Backreference { .. } => false,
        }
    }

    /// Child ids in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::RegExpLiteral { pattern, flags } => vec![*pattern, *flags],
            NodeKind::Pattern { alternatives }
            | NodeKind::Group { alternatives }
            | NodeKind::CapturingGroup { alternatives, .. }
            | NodeKind::LookaroundAssertion { alternatives, .. }
            | NodeKind::ClassStringDisjunction { alternatives } => alternatives.clone(),
            NodeKind::Alternative { elements }
            | NodeKind::StringAlternative { elements }
            | NodeKind::CharacterClass { elements, .. } => elements.clone(),
            NodeKind::Quantifier { element, .. } => vec![*element],
            NodeKind::CharacterClassRange { min, max } => vec![*min, *max],
            NodeKind::ExpressionCharacterClass { expression, .. } => vec![*expression],
            NodeKind::ClassIntersection { left, right }
            | NodeKind::ClassSubtraction { left, right } => vec![*left, *right],
            NodeKind::Flags(_)
            | NodeKind::BoundaryAssertion { .. }
            | NodeKind::Character { .. }
            | NodeKind::CharacterSet(_)
            | NodeKind::Backreference { .. } => Vec::new(),
        }
    }
}
