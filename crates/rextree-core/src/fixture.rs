//! Golden-fixture persistence.
//!
//! A fixture file maps case names to validation options and expected
//! outcomes per pattern: either a serialized tree or an error with its
//! offset. Unbounded quantifier maxima are written as the literal
//! sentinel `"$$Infinity"` and decoded back exactly; JSON numbers
//! cannot carry infinity.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::nodes::{BoundaryKind, CharacterSetKind, ClassKind, GroupRef, LookaroundKind, NodeKind};
use crate::tree::{NodeId, Tree};

/// Error during fixture load/save.
#[derive(Debug)]
pub enum FixtureError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "fixture I/O error: {e}"),
            Self::Json(e) => write!(f, "fixture JSON error: {e}"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

/// A whole fixture file: case name → case, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixture {
    pub cases: IndexMap<String, FixtureCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    pub options: FixtureOptions,
    /// Pattern source → expected outcome, in file order.
    pub patterns: IndexMap<String, Expectation>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixtureOptions {
    #[serde(default)]
    pub strict: bool,
    #[serde(rename = "ecmaVersion")]
    pub ecma_version: u16,
}

/// Expected outcome for one pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expectation {
    Ast { ast: Value },
    Error { error: ExpectedError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedError {
    pub message: String,
    pub index: u32,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        serde_json::from_str(json).map_err(FixtureError::Json)
    }

    pub fn to_json(&self) -> Result<String, FixtureError> {
        serde_json::to_string_pretty(self).map_err(FixtureError::Json)
    }

    /// Load `<dir>/<name>.json`.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> Result<Self, FixtureError> {
        let path = dir.as_ref().join(format!("{name}.json"));
        let text = std::fs::read_to_string(path).map_err(FixtureError::Io)?;
        Self::from_json(&text)
    }

    /// Save as `<dir>/<name>.json`.
    pub fn save(&self, dir: impl AsRef<Path>, name: &str) -> Result<(), FixtureError> {
        let path = dir.as_ref().join(format!("{name}.json"));
        std::fs::write(path, self.to_json()?).map_err(FixtureError::Io)
    }
}

/// Serialize a finished tree into the expectation shape.
///
/// Parent backlinks are omitted (they would cycle); the two resolver
/// cross-links are flattened to spans, which identify nodes uniquely.
pub fn ast_value(tree: &Tree) -> Value {
    node_value(tree, tree.root())
}

fn span_value(tree: &Tree, id: NodeId) -> Value {
    json!({ "start": tree.start(id), "end": tree.end(id) })
}

fn list_value(tree: &Tree, ids: &[NodeId]) -> Value {
    Value::Array(ids.iter().map(|&id| node_value(tree, id)).collect())
}

fn node_value(tree: &Tree, id: NodeId) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), tree.kind(id).type_name().into());
    obj.insert("start".into(), tree.start(id).into());
    obj.insert("end".into(), tree.end(id).into());
    obj.insert("raw".into(), tree.raw(id).into());

    match tree.kind(id) {
        NodeKind::RegExpLiteral { pattern, flags } => {
            obj.insert("pattern".into(), node_value(tree, *pattern));
            obj.insert("flags".into(), node_value(tree, *flags));
        }
        NodeKind::Flags(set) => {
            obj.insert("dotAll".into(), set.dot_all.into());
            obj.insert("global".into(), set.global.into());
            obj.insert("hasIndices".into(), set.has_indices.into());
            obj.insert("ignoreCase".into(), set.ignore_case.into());
            obj.insert("multiline".into(), set.multiline.into());
            obj.insert("sticky".into(), set.sticky.into());
            obj.insert("unicode".into(), set.unicode.into());
            obj.insert("unicodeSets".into(), set.unicode_sets.into());
        }
        NodeKind::Pattern { alternatives }
        | NodeKind::Group { alternatives }
        | NodeKind::ClassStringDisjunction { alternatives } => {
            obj.insert("alternatives".into(), list_value(tree, alternatives));
        }
        NodeKind::Alternative { elements } | NodeKind::StringAlternative { elements } => {
            obj.insert("elements".into(), list_value(tree, elements));
        }
        NodeKind::CapturingGroup {
            name,
            alternatives,
            references,
        } => {
            obj.insert("name".into(), name.clone().map_or(Value::Null, Value::from));
            obj.insert("alternatives".into(), list_value(tree, alternatives));
            obj.insert(
                "references".into(),
                Value::Array(references.iter().map(|&r| span_value(tree, r)).collect()),
            );
        }
        NodeKind::LookaroundAssertion {
            kind,
            negate,
            alternatives,
        } => {
            let kind = match kind {
                LookaroundKind::Lookahead => "lookahead",
                LookaroundKind::Lookbehind => "lookbehind",
            };
            obj.insert("kind".into(), kind.into());
            obj.insert("negate".into(), (*negate).into());
            obj.insert("alternatives".into(), list_value(tree, alternatives));
        }
        NodeKind::BoundaryAssertion { kind } => match kind {
            BoundaryKind::Start => {
                obj.insert("kind".into(), "start".into());
            }
            BoundaryKind::End => {
                obj.insert("kind".into(), "end".into());
            }
            BoundaryKind::Word { negate } => {
                obj.insert("kind".into(), "word".into());
                obj.insert("negate".into(), (*negate).into());
            }
        },
        NodeKind::Quantifier {
            min,
            max,
            greedy,
            element,
        } => {
            obj.insert("min".into(), (*min).into());
            obj.insert("max".into(), Value::from(*max));
            obj.insert("greedy".into(), (*greedy).into());
            obj.insert("element".into(), node_value(tree, *element));
        }
        NodeKind::CharacterClass {
            kind,
            negate,
            elements,
        } => {
            let kind = match kind {
                ClassKind::ClassRanges => "classRanges",
                ClassKind::UnicodeSets => "unicodeSets",
            };
            obj.insert("kind".into(), kind.into());
            obj.insert("negate".into(), (*negate).into());
            obj.insert("elements".into(), list_value(tree, elements));
        }
        NodeKind::CharacterClassRange { min, max } => {
            obj.insert("min".into(), node_value(tree, *min));
            obj.insert("max".into(), node_value(tree, *max));
        }
        NodeKind::ExpressionCharacterClass { negate, expression } => {
            obj.insert("negate".into(), (*negate).into());
            obj.insert("expression".into(), node_value(tree, *expression));
        }
        NodeKind::ClassIntersection { left, right }
        | NodeKind::ClassSubtraction { left, right } => {
            obj.insert("left".into(), node_value(tree, *left));
            obj.insert("right".into(), node_value(tree, *right));
        }
        NodeKind::Character { value } => {
            obj.insert("value".into(), (*value).into());
        }
        NodeKind::CharacterSet(kind) => match kind {
            CharacterSetKind::Any => {
                obj.insert("kind".into(), "any".into());
            }
            CharacterSetKind::Digit { negate } => {
                obj.insert("kind".into(), "digit".into());
                obj.insert("negate".into(), (*negate).into());
            }
            CharacterSetKind::Space { negate } => {
                obj.insert("kind".into(), "space".into());
                obj.insert("negate".into(), (*negate).into());
            }
            CharacterSetKind::Word { negate } => {
                obj.insert("kind".into(), "word".into());
                obj.insert("negate".into(), (*negate).into());
            }
            CharacterSetKind::Property {
                key,
                value,
                negate,
                strings,
            } => {
                obj.insert("kind".into(), "property".into());
                obj.insert("key".into(), key.clone().into());
                obj.insert("value".into(), value.clone().map_or(Value::Null, Value::from));
                obj.insert("negate".into(), (*negate).into());
                obj.insert("strings".into(), (*strings).into());
            }
        },
        NodeKind::Backreference { target, resolved } => {
            let target = match target {
                GroupRef::Number(n) => Value::from(*n),
                GroupRef::Name(name) => Value::from(name.clone()),
            };
            obj.insert("ref".into(), target);
            obj.insert(
                "resolved".into(),
                resolved.map_or(Value::Null, |g| span_value(tree, g)),
            );
        }
    }

    Value::Object(obj)
}
