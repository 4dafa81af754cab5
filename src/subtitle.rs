//! SRT block formatting and writing.

use crate::error::Result;
use crate::linewrap::wrap;
use crate::timecode::normalize_legacy;
use std::fs;
use std::path::Path;

/// One subtitle block: index, timing, primary text and an optional second
/// (translated) text line.
#[derive(Debug, Clone)]
pub struct SubtitleBlock {
    pub order: usize,
    pub start: String,
    pub end: String,
    pub primary: String,
    pub secondary: Option<String>,
}

/// Format blocks as SRT.
///
/// Every line is CRLF-terminated and blocks are separated by a blank line.
/// Timestamps are re-normalized so legacy `M:SS.f` artifacts still render;
/// a timestamp matching neither form fails the record hard. The secondary
/// text is wrapped to `line_limit` characters.
pub fn format_blocks(blocks: &[SubtitleBlock], line_limit: usize) -> Result<String> {
    let mut out = String::new();

    for block in blocks {
        let start = normalize_legacy(&block.start)?;
        let end = normalize_legacy(&block.end)?;

        out.push_str(&format!("{}\r\n", block.order));
        out.push_str(&format!("{} --> {}\r\n", start, end));
        push_text(&mut out, block.primary.trim_matches(' '));
        if let Some(secondary) = &block.secondary {
            let wrapped = wrap(secondary.trim_matches(' '), line_limit);
            push_text(&mut out, &wrapped);
        }
        out.push_str("\r\n");
    }

    Ok(out)
}

fn push_text(out: &mut String, text: &str) {
    out.push_str(&text.replace('\n', "\r\n"));
    out.push_str("\r\n");
}

/// Format and write blocks to an SRT file.
pub fn write_srt(path: &Path, blocks: &[SubtitleBlock], line_limit: usize) -> Result<()> {
    let content = format_blocks(blocks, line_limit)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(order: usize, primary: &str, secondary: Option<&str>) -> SubtitleBlock {
        SubtitleBlock {
            order,
            start: "00:00:01,500".to_string(),
            end: "00:00:04,000".to_string(),
            primary: primary.to_string(),
            secondary: secondary.map(str::to_string),
        }
    }

    #[test]
    fn test_format_single_block() {
        let blocks = vec![block(1, "Hello, world.", None)];
        let output = format_blocks(&blocks, 25).unwrap();

        assert_eq!(
            output,
            "1\r\n00:00:01,500 --> 00:00:04,000\r\nHello, world.\r\n\r\n"
        );
    }

    #[test]
    fn test_format_bilingual_block() {
        let blocks = vec![block(1, "Hello, world.", Some("你好，世界。"))];
        let output = format_blocks(&blocks, 25).unwrap();

        assert!(output.contains("Hello, world.\r\n你好，世界。\r\n\r\n"));
    }

    #[test]
    fn test_secondary_text_is_wrapped() {
        let long = "这是一个很长的子句，这是另一个很长的子句，还有一个结尾的子句";
        let blocks = vec![block(1, "A long sentence.", Some(long))];
        let output = format_blocks(&blocks, 12).unwrap();

        // The wrap's embedded newline becomes a CRLF display line break.
        let body: Vec<&str> = output.split("\r\n").collect();
        assert_eq!(body[2], "A long sentence.");
        assert_eq!(body[3], "这是一个很长的子句");
        assert_eq!(body[4], "这是另一个很长的子句，还有一个结尾的子句");
    }

    #[test]
    fn test_legacy_timestamps_normalized() {
        let blocks = vec![SubtitleBlock {
            order: 1,
            start: "00:00.4".to_string(),
            end: "00:00.7".to_string(),
            primary: "Mr.".to_string(),
            secondary: None,
        }];
        let output = format_blocks(&blocks, 25).unwrap();

        assert!(output.contains("00:00:00,400 --> 00:00:00,700"));
    }

    #[test]
    fn test_malformed_timestamp_fails_hard() {
        let blocks = vec![SubtitleBlock {
            order: 1,
            start: "bogus".to_string(),
            end: "00:00:04,000".to_string(),
            primary: "text".to_string(),
            secondary: None,
        }];

        assert!(format_blocks(&blocks, 25).is_err());
    }

    #[test]
    fn test_primary_whitespace_trimmed() {
        let blocks = vec![block(1, "  padded text  ", None)];
        let output = format_blocks(&blocks, 25).unwrap();

        assert!(output.contains("\r\npadded text\r\n"));
    }

    #[test]
    fn test_multi_sentence_translation_spans_lines() {
        let blocks = vec![block(1, "Two sentences. Right here.", Some("第一句。\n第二句。"))];
        let output = format_blocks(&blocks, 25).unwrap();

        assert!(output.contains("第一句。\r\n第二句。\r\n"));
    }

    #[test]
    fn test_write_srt_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let blocks = vec![block(1, "Hello.", None), block(2, "World.", None)];

        write_srt(&path, &blocks, 25).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("1\r\n"));
        assert!(written.contains("2\r\n"));
    }
}
