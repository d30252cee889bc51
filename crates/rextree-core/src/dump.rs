//! Indented tree dump for inspection and snapshot tests.

use std::fmt::Write;

use crate::nodes::{BoundaryKind, CharacterSetKind, ClassKind, LookaroundKind, NodeKind};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// One node per line, two-space indents, children in source order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(&mut out, self.root(), 0);
        out
    }

    fn dump_node(&self, out: &mut String, id: NodeId, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.label(id));
        out.push('\n');
        for child in self.children(id) {
            self.dump_node(out, child, depth + 1);
        }
    }

    fn label(&self, id: NodeId) -> String {
        let mut label = String::new();
        match self.kind(id) {
            NodeKind::RegExpLiteral { .. } => {
                let _ = write!(label, "RegExpLiteral {}", self.raw(id));
            }
            NodeKind::Flags(set) => {
                label.push_str("Flags");
                let text = set.to_string();
                if !text.is_empty() {
                    let _ = write!(label, " {text}");
                }
            }
            NodeKind::Pattern { .. } => label.push_str("Pattern"),
            NodeKind::Alternative { .. } => label.push_str("Alternative"),
            NodeKind::StringAlternative { .. } => label.push_str("StringAlternative"),
            NodeKind::Group { .. } => label.push_str("Group"),
            NodeKind::CapturingGroup { name, .. } => {
                label.push_str("CapturingGroup");
                if let Some(name) = name {
                    let _ = write!(label, " <{name}>");
                }
            }
            NodeKind::LookaroundAssertion { kind, negate, .. } => {
                label.push_str(match kind {
                    LookaroundKind::Lookahead => "Assertion lookahead",
                    LookaroundKind::Lookbehind => "Assertion lookbehind",
                });
                if *negate {
                    label.push_str(" negate");
                }
            }
            NodeKind::BoundaryAssertion { kind } => match kind {
                BoundaryKind::Start => label.push_str("Assertion start"),
                BoundaryKind::End => label.push_str("Assertion end"),
                BoundaryKind::Word { negate } => {
                    label.push_str("Assertion word");
                    if *negate {
                        label.push_str(" negate");
                    }
                }
            },
            NodeKind::Quantifier {
                min, max, greedy, ..
            } => {
                let mode = if *greedy { "greedy" } else { "lazy" };
                let _ = write!(label, "Quantifier {min}..{max} {mode}");
            }
            NodeKind::CharacterClass { kind, negate, .. } => {
                label.push_str(match kind {
                    ClassKind::ClassRanges => "CharacterClass classRanges",
                    ClassKind::UnicodeSets => "CharacterClass unicodeSets",
                });
                if *negate {
                    label.push_str(" negate");
                }
            }
            NodeKind::CharacterClassRange { .. } => label.push_str("CharacterClassRange"),
            NodeKind::ClassStringDisjunction { .. } => label.push_str("ClassStringDisjunction"),
            NodeKind::ExpressionCharacterClass { negate, .. } => {
                label.push_str("ExpressionCharacterClass");
                if *negate {
                    label.push_str(" negate");
                }
            }
            NodeKind::ClassIntersection { .. } => label.push_str("ClassIntersection"),
            NodeKind::ClassSubtraction { .. } => label.push_str("ClassSubtraction"),
            NodeKind::Character { value } => {
                let _ = write!(label, "Character U+{value:04X}");
            }
            NodeKind::CharacterSet(kind) => {
                label.push_str("CharacterSet ");
                match kind {
                    CharacterSetKind::Any => label.push_str("any"),
                    CharacterSetKind::Digit { negate } => {
                        label.push_str("digit");
                        if *negate {
                            label.push_str(" negate");
                        }
                    }
                    CharacterSetKind::Space { negate } => {
                        label.push_str("space");
                        if *negate {
                            label.push_str(" negate");
                        }
                    }
                    CharacterSetKind::Word { negate } => {
                        label.push_str("word");
                        if *negate {
                            label.push_str(" negate");
                        }
                    }
                    CharacterSetKind::Property {
                        key,
                        value,
                        negate,
                        strings,
                    } => {
                        let _ = write!(label, "property {key}");
                        if let Some(value) = value {
                            let _ = write!(label, "={value}");
                        }
                        if *negate {
                            label.push_str(" negate");
                        }
                        if *strings {
                            label.push_str(" strings");
                        }
                    }
                }
            }
            NodeKind::Backreference { target, resolved } => {
                let _ = write!(label, "Backreference {target}");
                if let Some(group) = resolved {
                    let _ = write!(label, " -> {}..{}", self.start(*group), self.end(*group));
                }
            }
        }
        label
    }
}
