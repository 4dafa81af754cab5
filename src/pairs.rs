use crate::error::Result;
use crate::transcript::Segment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// One (original fragment, translated fragment) pair from a list-mode
/// translation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationPair {
    pub origin: String,
    pub target: String,
}

/// Result of reconciling returned pairs against the original segments.
#[derive(Debug, Clone)]
pub struct MatchedPairs {
    /// Per-segment translation, `None` where no pair matched positionally.
    pub targets: Vec<Option<String>>,
    pub mismatched: usize,
}

impl MatchedPairs {
    pub fn any_matched(&self) -> bool {
        self.targets.iter().any(Option::is_some)
    }
}

/// Match returned pairs against segments strictly by position.
///
/// A pair is accepted only when its origin equals the segment text at the
/// same index; anything else is logged and left untranslated. Deliberately
/// no fuzzy search elsewhere in the pair list: a provider that reorders or
/// drops entries produces visible gaps instead of silent misassignments.
///
/// An empty pair list means list-mode translation was never requested and is
/// not an error.
pub fn match_pairs(segments: &[Segment], pairs: &[TranslationPair]) -> MatchedPairs {
    if pairs.is_empty() {
        return MatchedPairs {
            targets: vec![None; segments.len()],
            mismatched: 0,
        };
    }

    let mut targets = Vec::with_capacity(segments.len());
    let mut mismatched = 0usize;

    for (index, segment) in segments.iter().enumerate() {
        match pairs.get(index) {
            Some(pair) if pair.origin == segment.text => {
                targets.push(Some(pair.target.clone()));
            }
            Some(pair) => {
                warn!(
                    "{}: target not found, origin = {:?} (pair has {:?})",
                    index, segment.text, pair.origin
                );
                mismatched += 1;
                targets.push(None);
            }
            None => {
                warn!("{}: no pair returned, origin = {:?}", index, segment.text);
                mismatched += 1;
                targets.push(None);
            }
        }
    }

    MatchedPairs { targets, mismatched }
}

/// Load a pairs artifact from disk.
///
/// An absent file is the normal state when list-mode translation was not
/// requested and yields an empty list, not an error.
pub fn load_pairs(path: &Path) -> Result<Vec<TranslationPair>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(order: usize, text: &str) -> Segment {
        Segment {
            order,
            start: "00:00:00,000".to_string(),
            end: "00:00:01,000".to_string(),
            text: text.to_string(),
        }
    }

    fn pair(origin: &str, target: &str) -> TranslationPair {
        TranslationPair {
            origin: origin.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_all_pairs_match_positionally() {
        let segments = vec![segment(1, "a"), segment(2, "b"), segment(3, "c")];
        let pairs = vec![pair("a", "X"), pair("b", "Y"), pair("c", "Z")];

        let matched = match_pairs(&segments, &pairs);

        assert_eq!(matched.mismatched, 0);
        assert_eq!(
            matched.targets,
            vec![
                Some("X".to_string()),
                Some("Y".to_string()),
                Some("Z".to_string())
            ]
        );
    }

    #[test]
    fn test_swapped_pair_is_not_searched_for() {
        let segments = vec![segment(1, "a"), segment(2, "b"), segment(3, "c")];
        // Position 1 carries the wrong origin; its true pair sits at
        // position 2 but must not be hunted down.
        let pairs = vec![pair("a", "X"), pair("c", "Z"), pair("b", "Y")];

        let matched = match_pairs(&segments, &pairs);

        assert_eq!(matched.targets[0], Some("X".to_string()));
        assert_eq!(matched.targets[1], None);
        assert_eq!(matched.targets[2], None);
        assert_eq!(matched.mismatched, 2);
    }

    #[test]
    fn test_short_pair_list_leaves_tail_untranslated() {
        let segments = vec![segment(1, "a"), segment(2, "b"), segment(3, "c")];
        let pairs = vec![pair("a", "X")];

        let matched = match_pairs(&segments, &pairs);

        assert_eq!(matched.targets[0], Some("X".to_string()));
        assert_eq!(matched.targets[1], None);
        assert_eq!(matched.targets[2], None);
        assert_eq!(matched.mismatched, 2);
    }

    #[test]
    fn test_empty_pairs_is_not_an_error() {
        let segments = vec![segment(1, "a"), segment(2, "b")];

        let matched = match_pairs(&segments, &[]);

        assert_eq!(matched.mismatched, 0);
        assert!(!matched.any_matched());
        assert_eq!(matched.targets.len(), 2);
    }

    #[test]
    fn test_load_pairs_missing_file_is_empty() {
        let pairs = load_pairs(Path::new("/nonexistent/pairs.json")).unwrap();
        assert!(pairs.is_empty());
    }
}
