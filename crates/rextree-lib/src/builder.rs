//! Incremental tree construction.
//!
//! The driver (a tokenizer, out of scope here) feeds construction
//! events with source spans; the builder assembles arena nodes under
//! mode-gate supervision. Children are allocated before their parent
//! exists, so attachment is two-phase: a composite patches the parent
//! backlinks of its children the moment it is itself allocated.
//!
//! Any structural refusal aborts the literal: the first diagnostic is
//! returned as an error and no tree escapes. Violations of the call
//! protocol itself (mismatched begin/end, events no token stream can
//! produce) panic instead.

use rowan::{TextRange, TextSize};

use rextree_core::{
    BoundaryKind, CharacterSetKind, EcmaVersion, FlagSet, GroupRef, LookaroundKind, Max, NodeId,
    NodeKind, Tree,
};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mode::{ModeGate, RegExpOptions};
use crate::{Error, Result, resolver};

enum Frame {
    Pattern {
        start: TextSize,
        alternatives: Vec<NodeId>,
    },
    Alternative {
        start: TextSize,
        elements: Vec<NodeId>,
    },
    StringAlternative {
        start: TextSize,
        elements: Vec<NodeId>,
    },
    Group {
        start: TextSize,
        alternatives: Vec<NodeId>,
    },
    CapturingGroup {
        start: TextSize,
        name: Option<String>,
        alternatives: Vec<NodeId>,
    },
    Lookaround {
        start: TextSize,
        kind: LookaroundKind,
        negate: bool,
        alternatives: Vec<NodeId>,
    },
    Class {
        start: TextSize,
        negate: bool,
        elements: Vec<NodeId>,
    },
    StringDisjunction {
        start: TextSize,
        alternatives: Vec<NodeId>,
    },
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Pattern { .. } => "pattern",
            Frame::Alternative { .. } => "alternative",
            Frame::StringAlternative { .. } => "string alternative",
            Frame::Group { .. } => "group",
            Frame::CapturingGroup { .. } => "capturing group",
            Frame::Lookaround { .. } => "lookaround",
            Frame::Class { .. } => "character class",
            Frame::StringDisjunction { .. } => "string disjunction",
        }
    }
}

/// Assembles one literal's tree from driver events.
pub struct TreeBuilder {
    tree: Tree,
    options: RegExpOptions,
    gate: Option<ModeGate>,
    frames: Vec<Frame>,
    flags_node: Option<NodeId>,
    pattern_node: Option<NodeId>,
    diagnostics: Diagnostics,
}

impl TreeBuilder {
    pub fn new(source: impl Into<String>, options: RegExpOptions) -> Self {
        Self {
            tree: Tree::new(source),
            options,
            gate: None,
            frames: Vec::new(),
            flags_node: None,
            pattern_node: None,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn gate(&self) -> &ModeGate {
        self.gate
            .as_ref()
            .expect("flags must be declared before pattern construction")
    }

    fn build_failed(&self) -> Error {
        Error::Build(self.diagnostics.clone())
    }

    fn unsupported(&mut self, range: TextRange, detail: impl Into<String>) -> Error {
        self.diagnostics
            .report(DiagnosticKind::UnsupportedConstruct, range)
            .message(detail)
            .emit();
        self.build_failed()
    }

    /// Declare the literal's flags. Must precede all pattern events:
    /// the mode gate is derived from the flag set.
    pub fn flags(&mut self, range: TextRange, text: &str) -> Result<()> {
        match FlagSet::from_text(text) {
            Ok(flags) => {
                if flags.unicode && self.options.ecma_version < EcmaVersion::Es2015 {
                    return Err(self.unsupported(range, "flag `u` requires ES2015 or later"));
                }
                let gate = ModeGate::new(&self.options, &flags);
                if flags.unicode_sets && !gate.allows_unicode_sets() {
                    return Err(self.unsupported(range, "flag `v` requires ES2024 or later"));
                }
                self.gate = Some(gate);
                self.flags_node = Some(self.tree.alloc(range, NodeKind::Flags(flags)));
                Ok(())
            }
            Err(err) => {
                let at = u32::from(range.start()) + err.index as u32;
                let flag_range = TextRange::new(at.into(), (at + 1).into());
                Err(self.unsupported(flag_range, err.to_string()))
            }
        }
    }

    // ------------------------------------------------------------------
    // Disjunctions and alternatives
    // ------------------------------------------------------------------

    pub fn begin_pattern(&mut self, start: TextSize) {
        assert!(
            self.frames.is_empty(),
            "pattern must be the outermost frame"
        );
        let _ = self.gate();
        self.frames.push(Frame::Pattern {
            start,
            alternatives: Vec::new(),
        });
    }

    pub fn end_pattern(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::Pattern {
            start,
            alternatives,
        }) = self.frames.pop()
        else {
            panic!("end_pattern without matching begin_pattern");
        };
        let range = TextRange::new(start, end);
        let id = self.finish_disjunction(range, NodeKind::Pattern { alternatives })?;
        self.pattern_node = Some(id);
        Ok(id)
    }

    pub fn begin_alternative(&mut self, start: TextSize) {
        match self.frames.last() {
            Some(
                Frame::Pattern { .. }
                | Frame::Group { .. }
                | Frame::CapturingGroup { .. }
                | Frame::Lookaround { .. },
            ) => {}
            other => panic!(
                "alternative must open inside a disjunction, not {:?}",
                other.map(Frame::name)
            ),
        }
        self.frames.push(Frame::Alternative {
            start,
            elements: Vec::new(),
        });
    }

    pub fn end_alternative(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::Alternative { start, elements }) = self.frames.pop() else {
            panic!("end_alternative without matching begin_alternative");
        };
        let range = TextRange::new(start, end);
        let id = self.tree.alloc(range, NodeKind::Alternative { elements });
        self.attach_children(id);
        match self.frames.last_mut() {
            Some(
                Frame::Pattern { alternatives, .. }
                | Frame::Group { alternatives, .. }
                | Frame::CapturingGroup { alternatives, .. }
                | Frame::Lookaround { alternatives, .. },
            ) => alternatives.push(id),
            _ => unreachable!("alternative frame had no enclosing disjunction"),
        }
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Groups and assertions
    // ------------------------------------------------------------------

    pub fn begin_group(&mut self, start: TextSize) {
        self.frames.push(Frame::Group {
            start,
            alternatives: Vec::new(),
        });
    }

    pub fn end_group(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::Group {
            start,
            alternatives,
        }) = self.frames.pop()
        else {
            panic!("end_group without matching begin_group");
        };
        let range = TextRange::new(start, end);
        let id = self.finish_disjunction(range, NodeKind::Group { alternatives })?;
        self.push_element(id)
    }

    pub fn begin_capturing_group(
        &mut self,
        start: TextSize,
        name: Option<&str>,
    ) -> Result<()> {
        if name.is_some() && !self.gate().allows_named_groups() {
            let range = TextRange::new(start, start);
            return Err(self.unsupported(range, "named capture groups require ES2018 or later"));
        }
        self.frames.push(Frame::CapturingGroup {
            start,
            name: name.map(str::to_owned),
            alternatives: Vec::new(),
        });
        Ok(())
    }

    pub fn end_capturing_group(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::CapturingGroup {
            start,
            name,
            alternatives,
        }) = self.frames.pop()
        else {
            panic!("end_capturing_group without matching begin_capturing_group");
        };
        let range = TextRange::new(start, end);
        let id = self.finish_disjunction(
            range,
            NodeKind::CapturingGroup {
                name,
                alternatives,
                references: Vec::new(),
            },
        )?;
        self.push_element(id)
    }

    pub fn begin_lookaround(
        &mut self,
        start: TextSize,
        kind: LookaroundKind,
        negate: bool,
    ) -> Result<()> {
        if kind == LookaroundKind::Lookbehind && !self.gate().allows_lookbehind() {
            let range = TextRange::new(start, start);
            return Err(self.unsupported(range, "lookbehind assertions require ES2018 or later"));
        }
        self.frames.push(Frame::Lookaround {
            start,
            kind,
            negate,
            alternatives: Vec::new(),
        });
        Ok(())
    }

    pub fn end_lookaround(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::Lookaround {
            start,
            kind,
            negate,
            alternatives,
        }) = self.frames.pop()
        else {
            panic!("end_lookaround without matching begin_lookaround");
        };
        let range = TextRange::new(start, end);
        let id = self.finish_disjunction(
            range,
            NodeKind::LookaroundAssertion {
                kind,
                negate,
                alternatives,
            },
        )?;
        self.push_element(id)
    }

    pub fn boundary_assertion(&mut self, range: TextRange, kind: BoundaryKind) -> Result<NodeId> {
        let id = self.tree.alloc(range, NodeKind::BoundaryAssertion { kind });
        self.push_element(id)
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    pub fn character(&mut self, range: TextRange, value: u32) -> Result<NodeId> {
        let id = self.tree.alloc(range, NodeKind::Character { value });
        self.push_element(id)
    }

    pub fn character_set(&mut self, range: TextRange, kind: CharacterSetKind) -> Result<NodeId> {
        if let CharacterSetKind::Property { strings, .. } = &kind {
            if !self.gate().allows_property_escapes() {
                return Err(self.unsupported(
                    range,
                    "unicode property escapes require the u or v flag and ES2018 or later",
                ));
            }
            if *strings && !self.gate().allows_string_disjunction() {
                return Err(self.unsupported(range, "properties of strings require the v flag"));
            }
        }
        let id = self.tree.alloc(range, NodeKind::CharacterSet(kind));
        self.push_element(id)
    }

    pub fn backreference(&mut self, range: TextRange, target: GroupRef) -> Result<NodeId> {
        if matches!(target, GroupRef::Name(_)) && !self.gate().allows_named_groups() {
            return Err(self.unsupported(range, "named backreferences require ES2018 or later"));
        }
        let id = self.tree.alloc(
            range,
            NodeKind::Backreference {
                target,
                resolved: None,
            },
        );
        self.push_element(id)
    }

    // ------------------------------------------------------------------
    // Quantifiers
    // ------------------------------------------------------------------

    /// Wrap the most recently finished element of the current
    /// alternative. `range` spans the element plus the quantifier text.
    pub fn quantifier(
        &mut self,
        range: TextRange,
        min: u32,
        max: Max,
        greedy: bool,
    ) -> Result<NodeId> {
        if Max::Finite(min) > max {
            self.diagnostics
                .report(DiagnosticKind::MalformedRange, range)
                .message(format!("quantifier minimum {min} exceeds maximum {max}"))
                .emit();
            return Err(self.build_failed());
        }

        let Some(Frame::Alternative { elements, .. }) = self.frames.last_mut() else {
            panic!("quantifier outside an alternative");
        };
        let Some(element) = elements.pop() else {
            return Err(self.unsupported(range, "nothing to repeat"));
        };

        let element_kind = self.tree.kind(element);
        if !self.gate().permits_quantifier_over(element_kind) {
            let detail = if element_kind.is_quantifiable() {
                "quantified lookahead is only allowed in legacy mode"
            } else {
                "this element cannot be quantified"
            };
            return Err(self.unsupported(range, detail));
        }

        let id = self.tree.alloc(
            range,
            NodeKind::Quantifier {
                min,
                max,
                greedy,
                element,
            },
        );
        self.tree.set_parent(element, id);
        self.push_element(id)
    }

    // ------------------------------------------------------------------
    // Character classes
    // ------------------------------------------------------------------

    pub fn begin_character_class(&mut self, start: TextSize, negate: bool) -> Result<()> {
        let nested = matches!(self.frames.last(), Some(Frame::Class { .. }));
        if nested && !self.gate().allows_nested_class() {
            let range = TextRange::new(start, start);
            return Err(self.unsupported(range, "nested character classes require the v flag"));
        }
        self.frames.push(Frame::Class {
            start,
            negate,
            elements: Vec::new(),
        });
        Ok(())
    }

    pub fn end_character_class(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::Class {
            start,
            negate,
            elements,
        }) = self.frames.pop()
        else {
            panic!("end_character_class without matching begin_character_class");
        };
        let range = TextRange::new(start, end);

        let is_expression = |kind: &NodeKind| {
            matches!(
                kind,
                NodeKind::ClassIntersection { .. } | NodeKind::ClassSubtraction { .. }
            )
        };

        // A lone set expression turns the whole class into an
        // expression class; an expression mixed with other elements
        // has no valid reading.
        let lone_expression =
            elements.len() == 1 && is_expression(self.tree.kind(elements[0]));
        let id = if lone_expression {
            let expression = elements[0];
            let id = self.tree.alloc(
                range,
                NodeKind::ExpressionCharacterClass { negate, expression },
            );
            self.tree.set_parent(expression, id);
            id
        } else {
            if elements.iter().any(|&e| is_expression(self.tree.kind(e))) {
                return Err(self.unsupported(
                    range,
                    "a set operation must combine the whole character class",
                ));
            }
            let id = self.tree.alloc(
                range,
                NodeKind::CharacterClass {
                    kind: self.gate().class_kind(),
                    negate,
                    elements,
                },
            );
            self.attach_children(id);
            id
        };
        self.push_element(id)
    }

    /// Fuse the last two class elements into a range. Both endpoints
    /// must be single characters.
    pub fn class_range(&mut self, range: TextRange) -> Result<NodeId> {
        let Some(Frame::Class { elements, .. }) = self.frames.last_mut() else {
            panic!("class_range outside a character class");
        };
        assert!(elements.len() >= 2, "class_range requires two endpoints");
        let max = elements.pop().expect("checked above");
        let min = elements.pop().expect("checked above");

        let (NodeKind::Character { value: lo }, NodeKind::Character { value: hi }) =
            (self.tree.kind(min), self.tree.kind(max))
        else {
            return Err(self.unsupported(range, "range endpoints must be single characters"));
        };
        if lo > hi {
            let detail = format!("`{}` to `{}`", self.tree.raw(min), self.tree.raw(max));
            self.diagnostics
                .report(DiagnosticKind::MalformedRange, range)
                .message(detail)
                .emit();
            return Err(self.build_failed());
        }

        let id = self
            .tree
            .alloc(range, NodeKind::CharacterClassRange { min, max });
        self.tree.set_parent(min, id);
        self.tree.set_parent(max, id);
        self.push_element(id)
    }

    // ------------------------------------------------------------------
    // Set notation (unicode-sets mode)
    // ------------------------------------------------------------------

    pub fn begin_class_string_disjunction(&mut self, start: TextSize) -> Result<()> {
        if !self.gate().allows_string_disjunction() {
            let range = TextRange::new(start, start);
            return Err(self.unsupported(range, "string disjunctions require the v flag"));
        }
        self.frames.push(Frame::StringDisjunction {
            start,
            alternatives: Vec::new(),
        });
        Ok(())
    }

    pub fn end_class_string_disjunction(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::StringDisjunction {
            start,
            alternatives,
        }) = self.frames.pop()
        else {
            panic!("end_class_string_disjunction without matching begin");
        };
        let range = TextRange::new(start, end);
        let id =
            self.finish_disjunction(range, NodeKind::ClassStringDisjunction { alternatives })?;
        self.push_element(id)
    }

    pub fn begin_string_alternative(&mut self, start: TextSize) {
        assert!(
            matches!(self.frames.last(), Some(Frame::StringDisjunction { .. })),
            "string alternative must open inside a string disjunction"
        );
        self.frames.push(Frame::StringAlternative {
            start,
            elements: Vec::new(),
        });
    }

    pub fn end_string_alternative(&mut self, end: TextSize) -> Result<NodeId> {
        let Some(Frame::StringAlternative { start, elements }) = self.frames.pop() else {
            panic!("end_string_alternative without matching begin");
        };
        let range = TextRange::new(start, end);
        let id = self
            .tree
            .alloc(range, NodeKind::StringAlternative { elements });
        self.attach_children(id);
        match self.frames.last_mut() {
            Some(Frame::StringDisjunction { alternatives, .. }) => alternatives.push(id),
            _ => unreachable!("string alternative had no enclosing disjunction"),
        }
        Ok(id)
    }

    pub fn class_intersection(&mut self, range: TextRange) -> Result<NodeId> {
        self.class_set_operation(range, SetOperator::Intersection)
    }

    pub fn class_subtraction(&mut self, range: TextRange) -> Result<NodeId> {
        self.class_set_operation(range, SetOperator::Subtraction)
    }

    /// Fold the last two class elements under a set operator. The left
    /// operand may be another node of the *same* operator, which is how
    /// `a&&b&&c` chains; the right operand is always plain.
    fn class_set_operation(&mut self, range: TextRange, op: SetOperator) -> Result<NodeId> {
        if !self.gate().allows_expression_class() {
            return Err(self.unsupported(
                range,
                "character class set operations require the v flag",
            ));
        }
        let Some(Frame::Class { elements, .. }) = self.frames.last_mut() else {
            panic!("set operation outside a character class");
        };
        if elements.len() < 2 {
            return Err(self.unsupported(range, "a set operation requires two operands"));
        }
        let right = elements.pop().expect("checked above");
        let left = elements.pop().expect("checked above");

        let left_ok = self.tree.kind(left).is_class_set_operand()
            || op.matches(self.tree.kind(left));
        if !left_ok {
            return Err(self.unsupported(
                range,
                "set operators cannot be mixed; bracket the left operand",
            ));
        }
        if !self.tree.kind(right).is_class_set_operand() {
            return Err(
                self.unsupported(range, "this operand cannot be used in a set operation")
            );
        }

        let kind = match op {
            SetOperator::Intersection => NodeKind::ClassIntersection { left, right },
            SetOperator::Subtraction => NodeKind::ClassSubtraction { left, right },
        };
        let id = self.tree.alloc(range, kind);
        self.tree.set_parent(left, id);
        self.tree.set_parent(right, id);
        self.push_element(id)
    }

    // ------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------

    /// Close the literal: allocate the root, resolve backreferences,
    /// and publish the finished tree. Consumes the builder; on error no
    /// tree state survives.
    pub fn finish_literal(mut self, end: TextSize) -> Result<Tree> {
        assert!(
            self.frames.is_empty(),
            "finish_literal with open {} frame",
            self.frames.last().map(Frame::name).unwrap_or("?")
        );
        let pattern = self.pattern_node.expect("pattern was never built");
        let flags = self.flags_node.expect("flags were never declared");

        let range = TextRange::new(0.into(), end);
        let root = self
            .tree
            .alloc(range, NodeKind::RegExpLiteral { pattern, flags });
        self.tree.set_parent(pattern, root);
        self.tree.set_parent(flags, root);
        self.tree.set_root(root);

        let gate = *self.gate();
        resolver::resolve(&mut self.tree, &gate, &mut self.diagnostics);
        if self.diagnostics.has_errors() {
            return Err(Error::Resolve(self.diagnostics));
        }

        #[cfg(debug_assertions)]
        crate::verify::verify_tree(&self.tree);

        Ok(self.tree)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Attach an element to the innermost collecting frame, checking
    /// that the frame's node kind admits it.
    fn push_element(&mut self, id: NodeId) -> Result<NodeId> {
        let frame = self
            .frames
            .last()
            .expect("element constructed outside any frame");
        let admitted = match frame {
            Frame::Alternative { .. } => self.tree.kind(id).is_element(),
            Frame::StringAlternative { .. } => {
                matches!(self.tree.kind(id), NodeKind::Character { .. })
            }
            Frame::Class { .. } => self.is_class_element(self.tree.kind(id)),
            other => panic!("{} frame does not collect elements", other.name()),
        };
        if !admitted {
            let range = self.tree.range(id);
            let detail = match (frame, self.tree.kind(id)) {
                (Frame::Alternative { .. }, NodeKind::ClassStringDisjunction { .. }) => {
                    "string disjunctions are only allowed inside a character class"
                }
                (Frame::StringAlternative { .. }, _) => {
                    "only characters may appear in a string alternative"
                }
                (Frame::Class { .. }, _) => "not a valid character class element in this mode",
                _ => "this element is not allowed here",
            };
            return Err(self.unsupported(range, detail));
        }
        match self.frames.last_mut() {
            Some(
                Frame::Alternative { elements, .. }
                | Frame::StringAlternative { elements, .. }
                | Frame::Class { elements, .. },
            ) => elements.push(id),
            _ => unreachable!("admitted element has a collecting frame"),
        }
        Ok(id)
    }

    fn is_class_element(&self, kind: &NodeKind) -> bool {
        match kind {
            NodeKind::Character { .. } | NodeKind::CharacterClassRange { .. } => true,
            NodeKind::CharacterSet(set) => {
                !set.may_contain_strings() || self.gate().unicode_sets_mode()
            }
            NodeKind::CharacterClass { .. }
            | NodeKind::ClassStringDisjunction { .. }
            | NodeKind::ExpressionCharacterClass { .. }
            | NodeKind::ClassIntersection { .. }
            | NodeKind::ClassSubtraction { .. } => self.gate().unicode_sets_mode(),
            _ => false,
        }
    }

    /// Allocate a disjunction node, requiring at least one branch, and
    /// patch its alternatives' backlinks.
    fn finish_disjunction(&mut self, range: TextRange, kind: NodeKind) -> Result<NodeId> {
        if kind.children().is_empty() {
            return Err(self.unsupported(range, "disjunction requires at least one alternative"));
        }
        let id = self.tree.alloc(range, kind);
        self.attach_children(id);
        Ok(id)
    }

    fn attach_children(&mut self, id: NodeId) {
        for child in self.tree.children(id) {
            debug_assert!(
                self.tree.kind(id).admits_child(self.tree.kind(child)),
                "{} does not admit {}",
                self.tree.kind(id).type_name(),
                self.tree.kind(child).type_name()
            );
            self.tree.set_parent(child, id);
        }
    }
}

#[derive(Clone, Copy)]
enum SetOperator {
    Intersection,
    Subtraction,
}

impl SetOperator {
    fn matches(self, kind: &NodeKind) -> bool {
        match self {
            SetOperator::Intersection => matches!(kind, NodeKind::ClassIntersection { .. }),
            SetOperator::Subtraction => matches!(kind, NodeKind::ClassSubtraction { .. }),
        }
    }
}
