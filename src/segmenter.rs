use crate::transcript::Segment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A group of consecutive segments submitted to translation as one unit.
///
/// `last_order` is a cumulative member-count cursor across all batches so
/// far, not the `order` of the last segment. `char_count` is the running
/// buffer length at close time: for a batch closed by an overflow it stops
/// before the member that triggered the close; the final batch counts
/// everything left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationBatch {
    pub char_count: usize,
    pub member_count: usize,
    pub last_order: usize,
    pub members: Vec<String>,
    pub joined_text: String,
}

impl TranslationBatch {
    fn close(members: Vec<String>, char_count: usize, last_order: usize) -> Self {
        Self {
            char_count,
            member_count: members.len(),
            last_order,
            joined_text: members.join(" "),
            members,
        }
    }
}

/// Group ordered segments into batches whose accumulated text stays within
/// `char_limit` characters.
///
/// The batches partition the input: concatenating all members in order
/// reproduces the segment text sequence exactly, including when the final
/// segment is the one that overflows the buffer.
pub fn group_segments(segments: &[Segment], char_limit: usize) -> Vec<TranslationBatch> {
    let mut batches = Vec::new();
    let mut members: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut last_order = 0usize;

    for segment in segments {
        let before_len = buffer.chars().count();
        buffer.push_str(&segment.text);
        buffer.push(' ');

        if buffer.chars().count() > char_limit && !members.is_empty() {
            last_order += members.len();
            batches.push(TranslationBatch::close(
                std::mem::take(&mut members),
                before_len,
                last_order,
            ));
            buffer = segment.text.clone();
        }
        members.push(segment.text.clone());
    }

    if !members.is_empty() {
        last_order += members.len();
        let char_count = buffer.chars().count();
        batches.push(TranslationBatch::close(members, char_count, last_order));
    }

    debug!(
        "Grouped {} segments into {} batches (limit {} chars)",
        segments.len(),
        batches.len(),
        char_limit
    );
    batches
}
