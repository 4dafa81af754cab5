use crate::error::{Result, SubalignError};
use crate::timecode::seconds_to_display;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One timed unit of original-language text.
///
/// `order` is 1-based and matches the external subtitle numbering. The
/// timestamps are display-form strings; legacy `M:SS.f` values from older
/// artifacts are re-normalized by the subtitle writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub order: usize,
    pub start: String,
    pub end: String,
    pub text: String,
}

/// A normalized transcript: ordered segments plus the detected language.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub language: Option<String>,
}

// Whisper export schema. Only the fields we consume; the rest of the
// verbose JSON (tokens, logprobs, ...) is ignored.

#[derive(Debug, Deserialize)]
struct WhisperExport {
    segments: Vec<WhisperSegment>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    id: usize,
    start: f64,
    end: f64,
    text: String,
}

/// Parse a Whisper JSON export into an ordered segment list.
///
/// Whisper ids start at 0; subtitle orders start at 1.
pub fn parse_whisper(json: &str) -> Result<Transcript> {
    let export: WhisperExport = serde_json::from_str(json)?;

    let segments = export
        .segments
        .into_iter()
        .map(|seg| Segment {
            order: seg.id + 1,
            start: seconds_to_display(seg.start),
            end: seconds_to_display(seg.end),
            text: seg.text,
        })
        .collect();

    Ok(Transcript {
        segments,
        language: export.language,
    })
}

/// Load and normalize a Whisper JSON export from disk.
///
/// A missing transcript file is fatal; there is nothing to align without it.
pub fn load_whisper(path: &Path) -> Result<Transcript> {
    if !path.exists() {
        return Err(SubalignError::FileNotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    let transcript = parse_whisper(&contents)?;
    debug!(
        "Loaded {} segments from {:?} (language: {})",
        transcript.segments.len(),
        path,
        transcript.language.as_deref().unwrap_or("unknown")
    );
    Ok(transcript)
}
