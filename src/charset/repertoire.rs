//! Per-request character repertoire resolution.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use super::CharsetRegistry;

#[derive(Debug, Error)]
pub enum RepertoireError {
    #[error("no usable characters to subset; provide text or a valid charset id")]
    Empty,
}

/// The resolved set of characters a subsetted font must retain.
///
/// User-supplied text comes first, verbatim; each preset then contributes
/// only the characters not already present. Membership is per Unicode
/// scalar value; no case folding or normalization is applied.
#[derive(Debug, Clone)]
pub struct Repertoire {
    text: String,
}

impl Repertoire {
    /// Merge user text with the named presets, skipping unknown preset ids
    /// with a warning. Fails only when the accumulated result is empty.
    pub fn resolve(
        registry: &CharsetRegistry,
        user_text: &str,
        preset_ids: &[String],
    ) -> Result<Self, RepertoireError> {
        let mut text = String::from(user_text);
        let mut seen: HashSet<char> = user_text.chars().collect();

        for id in preset_ids {
            let Some(charset) = registry.resolve(id) else {
                warn!(charset = %id, "unknown charset id, skipping");
                continue;
            };

            let mut added = 0usize;
            for ch in charset.chars() {
                if seen.insert(ch) {
                    text.push(ch);
                    added += 1;
                }
            }
            debug!(charset = %id, added, "merged charset into repertoire");
        }

        if text.is_empty() {
            return Err(RepertoireError::Empty);
        }
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CharsetRegistry {
        CharsetRegistry::new()
    }

    #[test]
    fn text_only() {
        let repertoire = Repertoire::resolve(&registry(), "ABC", &[]).unwrap();
        assert_eq!(repertoire.as_str(), "ABC");
    }

    #[test]
    fn presets_only() {
        let repertoire =
            Repertoire::resolve(&registry(), "", &["digits".to_string()]).unwrap();
        assert_eq!(repertoire.as_str(), "0123456789");
    }

    #[test]
    fn preset_contributes_only_novel_characters() {
        let repertoire =
            Repertoire::resolve(&registry(), "2468", &["digits".to_string()]).unwrap();
        assert_eq!(repertoire.as_str(), "2468013579");
    }

    #[test]
    fn user_text_duplicates_are_preserved() {
        let repertoire = Repertoire::resolve(&registry(), "aab", &[]).unwrap();
        assert_eq!(repertoire.as_str(), "aab");
    }

    #[test]
    fn no_duplicates_across_presets() {
        let repertoire = Repertoire::resolve(
            &registry(),
            "",
            &["digits".to_string(), "basic".to_string()],
        )
        .unwrap();

        let chars: Vec<char> = repertoire.as_str().chars().collect();
        let unique: HashSet<char> = chars.iter().copied().collect();
        assert_eq!(chars.len(), unique.len());
        // digits came first and keep their position even though "basic"
        // also contains them
        assert!(repertoire.as_str().starts_with("0123456789"));
    }

    #[test]
    fn multibyte_membership_is_per_scalar() {
        let repertoire = Repertoire::resolve(
            &registry(),
            "一二",
            &["chinese_level1".to_string()],
        )
        .unwrap();
        assert!(repertoire.as_str().starts_with("一二三"));
        assert_eq!(
            repertoire.char_count(),
            registry().resolve("chinese_level1").unwrap().chars().count()
        );
    }

    #[test]
    fn unknown_preset_is_skipped_not_fatal() {
        let repertoire = Repertoire::resolve(
            &registry(),
            "",
            &["nope".to_string(), "digits".to_string()],
        )
        .unwrap();
        assert_eq!(repertoire.as_str(), "0123456789");
    }

    #[test]
    fn only_unknown_preset_is_empty() {
        let err = Repertoire::resolve(&registry(), "", &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, RepertoireError::Empty));
    }

    #[test]
    fn empty_everything_is_empty() {
        let err = Repertoire::resolve(&registry(), "", &[]).unwrap_err();
        assert!(matches!(err, RepertoireError::Empty));
    }
}
