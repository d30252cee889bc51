//! Arena-backed syntax tree.
//!
//! All nodes live in one `Vec`; [`NodeId`] is an index handle. Parent
//! links are plain indices, so upward navigation is O(1) and there is
//! no ownership cycle to manage. A tree is assembled by the
//! construction layer and read-only afterwards.

use rowan::{TextRange, TextSize};

use crate::flags::FlagSet;
use crate::nodes::NodeKind;

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node: backlink, source span, and the typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    range: TextRange,
    kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// The syntax tree of one regexp literal, plus its source text.
///
/// During construction nodes are allocated parentless and patched when
/// their parent materializes; `root` is set last. Every published tree
/// is rooted at a `RegExpLiteral` and fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    source: String,
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node with no parent. The owner attaches it later via
    /// [`Tree::set_parent`].
    pub fn alloc(&mut self, range: TextRange, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node count exceeds u32"));
        self.nodes.push(Node {
            parent: None,
            range,
            kind,
        });
        id
    }

    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Root `RegExpLiteral`. Panics on a tree that was never finished.
    pub fn root(&self) -> NodeId {
        self.root.expect("tree has no root; construction not finished")
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].range
    }

    pub fn start(&self, id: NodeId) -> u32 {
        self.range(id).start().into()
    }

    pub fn end(&self, id: NodeId) -> u32 {
        self.range(id).end().into()
    }

    /// Exact source slice the node covers; its length equals
    /// `end - start` by construction.
    pub fn raw(&self, id: NodeId) -> &str {
        let range = self.range(id);
        &self.source[usize::from(range.start())..usize::from(range.end())]
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Preorder traversal of `id` and everything below it. Child slots
    /// are stored in source order, so this visits nodes left to right.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Ancestor chain starting at `id`'s parent, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&cur| self.parent(cur))
    }

    /// The root's `Pattern` slot.
    pub fn pattern(&self) -> NodeId {
        match self.kind(self.root()) {
            NodeKind::RegExpLiteral { pattern, .. } => *pattern,
            kind => panic!("root is {}, not RegExpLiteral", kind.type_name()),
        }
    }

    /// The flag set of the literal.
    pub fn flag_set(&self) -> &FlagSet {
        let flags = match self.kind(self.root()) {
            NodeKind::RegExpLiteral { flags, .. } => *flags,
            kind => panic!("root is {}, not RegExpLiteral", kind.type_name()),
        };
        match self.kind(flags) {
            NodeKind::Flags(set) => set,
            kind => panic!("flags slot holds {}", kind.type_name()),
        }
    }

    /// End offset of the source text, as a span position.
    pub fn source_end(&self) -> TextSize {
        TextSize::new(u32::try_from(self.source.len()).expect("source exceeds u32"))
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}
