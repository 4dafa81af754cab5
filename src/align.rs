//! Lockstep alignment of translated sentences onto original timed segments.
//!
//! The original transcript is cut into fixed-duration speech segments while
//! the translation arrives as whole sentences. Each segment's extended
//! sentence-boundary count says how many translated sentences belong to it;
//! walking both sequences in order reassembles a 1:1 pairing. The two counts
//! are expected to drift, so running out of translated sentences degrades to
//! a partial result instead of failing the run.

use crate::sentence::extended_count;
use crate::transcript::Segment;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A segment together with its reconstructed translated fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSegment {
    pub order: usize,
    pub start: String,
    pub end: String,
    pub text: String,
    pub translated_text: String,
}

/// Alignment output: the aligned prefix plus an explicit completeness
/// signal, instead of a log line buried in the pass.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub segments: Vec<AlignedSegment>,
    pub complete: bool,
    /// Segments fully aligned before the translated sentences ran out.
    pub processed: usize,
    pub total: usize,
}

/// Assign translated sentences to segments in order.
///
/// A segment with boundary count 0 still receives exactly one sentence; a
/// positive count consumes that many sentences joined with a line break; a
/// negative count (over-subtracted heuristics) consumes none. When the
/// sentence cursor is exhausted the current segment keeps whatever was
/// concatenated so far and the remaining segments are left unprocessed.
pub fn align(segments: &[Segment], sentences: &[String]) -> Alignment {
    let total = segments.len();
    let mut cursor = 0usize;
    let mut aligned = Vec::new();
    let mut complete = true;
    let mut processed = total;

    for (idx, segment) in segments.iter().enumerate() {
        let count = extended_count(&segment.text);

        if cursor >= sentences.len() {
            if complete {
                complete = false;
                processed = idx;
                warn!(
                    "Translated sentences exhausted: {}/{} segments aligned",
                    idx, total
                );
            }
            continue;
        }

        let translated_text = if count == 0 {
            let sentence = sentences[cursor].clone();
            cursor += 1;
            sentence
        } else {
            let mut parts: Vec<&str> = Vec::new();
            for _ in 0..count.max(0) {
                if cursor >= sentences.len() {
                    complete = false;
                    processed = idx;
                    warn!(
                        "Ran out of translated sentences mid-segment at order {}",
                        segment.order
                    );
                    break;
                }
                parts.push(&sentences[cursor]);
                cursor += 1;
            }
            parts.join("\n")
        };

        aligned.push(AlignedSegment {
            order: segment.order,
            start: segment.start.clone(),
            end: segment.end.clone(),
            text: segment.text.clone(),
            translated_text,
        });
    }

    Alignment {
        segments: aligned,
        complete,
        processed,
        total,
    }
}
