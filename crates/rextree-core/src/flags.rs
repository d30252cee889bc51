//! RegExp flag set.

use serde::{Deserialize, Serialize};

/// The eight independent literal flags.
///
/// `unicode` and `unicode_sets` select mutually exclusive class
/// grammars and are never both set; [`FlagSet::from_text`] rejects the
/// combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FlagSet {
    pub dot_all: bool,
    pub global: bool,
    pub has_indices: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub sticky: bool,
    pub unicode: bool,
    pub unicode_sets: bool,
}

/// Why a flag string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagErrorKind {
    Unknown,
    Duplicate,
    /// `u` and `v` in the same literal.
    Incompatible,
}

/// A rejected flag, with its offset inside the flag text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagError {
    pub kind: FlagErrorKind,
    pub flag: char,
    pub index: usize,
}

impl std::fmt::Display for FlagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FlagErrorKind::Unknown => write!(f, "unknown flag `{}`", self.flag),
            FlagErrorKind::Duplicate => write!(f, "duplicate flag `{}`", self.flag),
            FlagErrorKind::Incompatible => {
                write!(f, "flags `u` and `v` cannot be combined")
            }
        }
    }
}

impl std::error::Error for FlagError {}

impl FlagSet {
    /// Parse a flag string such as `"gimsy"`.
    pub fn from_text(text: &str) -> Result<Self, FlagError> {
        let mut flags = FlagSet::default();
        for (index, flag) in text.char_indices() {
            let slot = match flag {
                'd' => &mut flags.has_indices,
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'v' => &mut flags.unicode_sets,
                'y' => &mut flags.sticky,
                _ => {
                    return Err(FlagError {
                        kind: FlagErrorKind::Unknown,
                        flag,
                        index,
                    });
                }
            };
            if *slot {
                return Err(FlagError {
                    kind: FlagErrorKind::Duplicate,
                    flag,
                    index,
                });
            }
            *slot = true;
            if flags.unicode && flags.unicode_sets {
                return Err(FlagError {
                    kind: FlagErrorKind::Incompatible,
                    flag,
                    index,
                });
            }
        }
        Ok(flags)
    }
}

impl std::fmt::Display for FlagSet {
    /// Canonical order `dgimsuvy`, independent of the order parsed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (set, ch) in [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ] {
            if set {
                f.write_fmt(format_args!("{ch}"))?;
            }
        }
        Ok(())
    }
}
