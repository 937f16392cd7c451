//! Named character sets and per-request repertoire resolution.
//!
//! The registry is built once at startup and shared read-only across all
//! requests. Lookups accept both `-` and `_` as id separators, so
//! `latin-ext` and `latin_ext` resolve to the same set.

mod tables;

pub mod repertoire;

pub use repertoire::{Repertoire, RepertoireError};

use serde::Serialize;
use std::collections::BTreeMap;

/// Available charset ids, grouped the way clients select them.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableCharsets {
    pub standard: Vec<String>,
    pub combined: Vec<String>,
}

/// Immutable table of named character sets.
///
/// Standard sets are the individual script/symbol tables; combined sets are
/// pre-merged conveniences built from them at construction time.
pub struct CharsetRegistry {
    standard: BTreeMap<&'static str, &'static str>,
    combined: BTreeMap<&'static str, String>,
}

impl CharsetRegistry {
    pub fn new() -> Self {
        let standard = BTreeMap::from([
            ("digits", tables::DIGITS),
            ("latin_basic", tables::LATIN_BASIC),
            ("punctuation_basic", tables::PUNCTUATION_BASIC),
            ("latin", tables::LATIN),
            ("latin_ext", tables::LATIN_EXT),
            ("cyrillic", tables::CYRILLIC),
            ("cyrillic_ext", tables::CYRILLIC_EXT),
            ("greek", tables::GREEK),
            ("vietnamese", tables::VIETNAMESE),
            ("chinese_level1", tables::CHINESE_LEVEL1),
            ("chinese_common", tables::CHINESE_COMMON),
            ("math", tables::MATH),
            ("currency", tables::CURRENCY),
            ("arrows", tables::ARROWS),
        ]);

        let mut registry = Self {
            standard,
            combined: BTreeMap::new(),
        };

        let combinations: [(&'static str, &[&str]); 4] = [
            ("basic", &["digits", "latin_basic", "punctuation_basic"]),
            ("web_safe", &["latin"]),
            ("european", &["latin", "latin_ext"]),
            ("pan-european", &["latin", "latin_ext", "cyrillic", "greek"]),
        ];
        for (name, parts) in combinations {
            let merged = registry.combine(parts);
            registry.combined.insert(name, merged);
        }

        registry
    }

    /// Look up a charset by id. Standard sets are checked before combined
    /// sets; `-`/`_` separator variants of the id are all accepted.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        let underscored = id.replace('-', "_");
        let hyphenated = id.replace('_', "-");
        let candidates = [underscored.as_str(), id, hyphenated.as_str()];

        for candidate in candidates {
            if let Some(chars) = self.standard.get(candidate) {
                return Some(chars);
            }
        }
        for candidate in candidates {
            if let Some(chars) = self.combined.get(candidate) {
                return Some(chars.as_str());
            }
        }
        None
    }

    /// Concatenate the characters of every resolvable id, in order.
    /// Unknown ids contribute nothing.
    pub fn combine(&self, ids: &[&str]) -> String {
        ids.iter().filter_map(|id| self.resolve(id)).collect()
    }

    pub fn list_available(&self) -> AvailableCharsets {
        AvailableCharsets {
            standard: self.standard.keys().map(|k| k.to_string()).collect(),
            combined: self.combined.keys().map(|k| k.to_string()).collect(),
        }
    }
}

impl Default for CharsetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
