//! Core data structures for ECMAScript regular-expression syntax trees.
//!
//! Three layers:
//! - **Node lattice**: the closed [`NodeKind`] sum type and its
//!   structural capability sets (quantifiable elements, class-set
//!   operands, legal parent/child shapes).
//! - **Arena tree**: [`Tree`] owns every node by value; [`NodeId`]
//!   handles give O(1) parent and child navigation without ownership
//!   cycles.
//! - **Fixture format**: JSON persistence for golden test expectations,
//!   including the `"$$Infinity"` sentinel for unbounded quantifiers.
//!
//! Construction and validation live in `rextree-lib`; this crate only
//! defines what a well-formed tree is made of.

pub mod fixture;

mod dump;
mod flags;
mod nodes;
mod tree;
mod version;

#[cfg(test)]
mod flags_tests;
#[cfg(test)]
mod nodes_tests;
#[cfg(test)]
mod tree_tests;

pub use flags::{FlagError, FlagErrorKind, FlagSet};
pub use nodes::{
    BoundaryKind, CharacterSetKind, ClassKind, GroupRef, LookaroundKind, Max, NodeKind,
    UNBOUNDED_SENTINEL,
};
pub use tree::{Descendants, Node, NodeId, Tree};
pub use version::EcmaVersion;
