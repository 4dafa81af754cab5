use crate::align::{align, Alignment};
use crate::config::Config;
use crate::error::{Result, SubalignError};
use crate::pairs::{load_pairs, match_pairs, TranslationPair};
use crate::segmenter::{group_segments, TranslationBatch};
use crate::sentence::split_target_sentences;
use crate::subtitle::{write_srt, SubtitleBlock};
use crate::transcript::{load_whisper, Segment};
use crate::translate::Translator;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A translation batch together with its translated forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedBatch {
    #[serde(flatten)]
    pub batch: TranslationBatch,
    /// Translation of `joined_text` as one unit.
    pub joined_translation: String,
    /// Per-member translations when list mode was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_translations: Option<Vec<String>>,
}

/// Statistics from a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub total_time: Duration,
    pub translation_time: Duration,
    pub segments: usize,
    pub batches: usize,
    pub translated_sentences: usize,
    /// Segments fully aligned before the translated sentences ran out.
    pub aligned: usize,
    pub alignment_complete: bool,
    pub pair_mismatches: usize,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Subtitle files written, in the order they were produced.
    pub outputs: Vec<PathBuf>,
    pub stats: PipelineStats,
}

/// Generate bilingual subtitles from a Whisper transcript JSON.
///
/// Stages: normalize the transcript, group segments into translation
/// batches, translate each batch in strict sequence (joined text always;
/// per-fragment list mode optionally), then re-split the translated text
/// into sentences and align them back onto the original segments. Every
/// intermediate shape is persisted as a JSON artifact in the output
/// directory for inspection.
///
/// With `translator` set to `None` the translation stage is skipped and the
/// previously persisted artifacts are loaded instead; a missing translated
/// artifact is fatal, a missing pairs artifact just means list mode was
/// never requested.
pub async fn run_pipeline(
    input: &Path,
    translator: Option<&dyn Translator>,
    config: &Config,
    show_progress: bool,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    // Stage 1: transcript ingestion
    let transcript = load_whisper(input)?;
    let segments = transcript.segments;
    info!(
        "Stage 1/4: loaded {} segments from {:?}",
        segments.len(),
        input
    );

    fs::create_dir_all(&config.output_dir)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());

    write_artifact(&config.output_dir.join("segments.json"), &segments)?;

    // Stage 2: batching
    let batches = group_segments(&segments, config.batch_char_limit);
    info!(
        "Stage 2/4: grouped {} segments into {} batches",
        segments.len(),
        batches.len()
    );
    write_artifact(&config.output_dir.join("batches.json"), &batches)?;

    // Stage 3: translation (or artifact reload)
    let translation_start = Instant::now();
    let (translated, pairs) = match translator {
        Some(translator) => {
            let result = translate_batches(translator, &batches, config, show_progress).await?;
            write_artifact(&config.output_dir.join("translated.json"), &result.0)?;
            if !result.1.is_empty() {
                write_artifact(&config.output_dir.join("pairs.json"), &result.1)?;
            }
            result
        }
        None => {
            info!("Translation skipped, loading persisted artifacts");
            let translated: Vec<TranslatedBatch> =
                read_artifact(&config.output_dir.join("translated.json"))?;
            let pairs = load_pairs(&config.output_dir.join("pairs.json"))?;
            (translated, pairs)
        }
    };
    let translation_time = translation_start.elapsed();
    info!(
        "Stage 3/4: {} batches translated in {:.2}s",
        translated.len(),
        translation_time.as_secs_f64()
    );

    // Stage 4: alignment and subtitle output
    let mut outputs = Vec::new();

    let original_path = config
        .output_dir
        .join(format!("transcripts_{}.srt", config.source_lang));
    write_srt(&original_path, &original_blocks(&segments), config.line_char_limit)?;
    outputs.push(original_path);

    let matched = match_pairs(&segments, &pairs);
    if matched.any_matched() {
        let target_path = config
            .output_dir
            .join(format!("transcripts_{}.srt", config.target_lang));
        write_srt(
            &target_path,
            &pair_target_blocks(&segments, &matched.targets),
            config.line_char_limit,
        )?;
        outputs.push(target_path);

        let bilingual_path = config.output_dir.join(format!(
            "transcripts_{}_{}.srt",
            config.source_lang, config.target_lang
        ));
        write_srt(
            &bilingual_path,
            &pair_bilingual_blocks(&segments, &matched.targets),
            config.line_char_limit,
        )?;
        outputs.push(bilingual_path);
    }

    let joined_translation_all = translated
        .iter()
        .map(|t| t.joined_translation.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let sentences = split_target_sentences(&joined_translation_all);
    info!("Stage 4/4: {} translated sentences to align", sentences.len());

    let alignment = align(&segments, &sentences);
    if !alignment.complete {
        warn!(
            "Alignment incomplete: {}/{} segments processed",
            alignment.processed, alignment.total
        );
    }
    write_artifact(&config.output_dir.join("aligned.json"), &alignment.segments)?;

    let sentences_path = config
        .output_dir
        .join(format!("sentences_{}.srt", config.target_lang));
    write_srt(
        &sentences_path,
        &aligned_target_blocks(&alignment),
        config.line_char_limit,
    )?;
    outputs.push(sentences_path);

    let main_path = config.output_dir.join(format!("{}.srt", stem));
    write_srt(
        &main_path,
        &aligned_bilingual_blocks(&alignment),
        config.line_char_limit,
    )?;
    outputs.push(main_path);

    let stats = PipelineStats {
        total_time: start_time.elapsed(),
        translation_time,
        segments: segments.len(),
        batches: batches.len(),
        translated_sentences: sentences.len(),
        aligned: alignment.processed,
        alignment_complete: alignment.complete,
        pair_mismatches: matched.mismatched,
    };

    Ok(PipelineResult { outputs, stats })
}

/// Translate every batch in strict sequence.
async fn translate_batches(
    translator: &dyn Translator,
    batches: &[TranslationBatch],
    config: &Config,
    show_progress: bool,
) -> Result<(Vec<TranslatedBatch>, Vec<TranslationPair>)> {
    let progress = if show_progress {
        let pb = ProgressBar::new(batches.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut translated = Vec::with_capacity(batches.len());
    let mut pairs: Vec<TranslationPair> = Vec::new();

    for (i, batch) in batches.iter().enumerate() {
        debug!(
            "Translating batch {}: {} chars, {} members",
            i + 1,
            batch.char_count,
            batch.member_count
        );

        let joined_translation = translator.translate_joined(&batch.joined_text).await?;

        let member_translations = if config.list_mode {
            let batch_pairs = translator.translate_list(&batch.members).await?;
            let targets: Vec<String> = batch_pairs.iter().map(|p| p.target.clone()).collect();
            pairs.extend(batch_pairs);
            Some(targets)
        } else {
            None
        };

        translated.push(TranslatedBatch {
            batch: batch.clone(),
            joined_translation,
            member_translations,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Translation complete");
    }

    Ok((translated, pairs))
}

fn original_blocks(segments: &[Segment]) -> Vec<SubtitleBlock> {
    segments
        .iter()
        .map(|s| SubtitleBlock {
            order: s.order,
            start: s.start.clone(),
            end: s.end.clone(),
            primary: s.text.clone(),
            secondary: None,
        })
        .collect()
}

/// Translated-only blocks from list-mode pairs; unmatched segments are left
/// out rather than rendered empty.
fn pair_target_blocks(segments: &[Segment], targets: &[Option<String>]) -> Vec<SubtitleBlock> {
    segments
        .iter()
        .zip(targets)
        .filter_map(|(s, target)| {
            target.as_ref().map(|t| SubtitleBlock {
                order: s.order,
                start: s.start.clone(),
                end: s.end.clone(),
                primary: t.clone(),
                secondary: None,
            })
        })
        .collect()
}

fn pair_bilingual_blocks(segments: &[Segment], targets: &[Option<String>]) -> Vec<SubtitleBlock> {
    segments
        .iter()
        .zip(targets)
        .map(|(s, target)| SubtitleBlock {
            order: s.order,
            start: s.start.clone(),
            end: s.end.clone(),
            primary: s.text.clone(),
            secondary: target.clone(),
        })
        .collect()
}

fn aligned_target_blocks(alignment: &Alignment) -> Vec<SubtitleBlock> {
    alignment
        .segments
        .iter()
        .map(|s| SubtitleBlock {
            order: s.order,
            start: s.start.clone(),
            end: s.end.clone(),
            primary: s.translated_text.clone(),
            secondary: None,
        })
        .collect()
}

fn aligned_bilingual_blocks(alignment: &Alignment) -> Vec<SubtitleBlock> {
    alignment
        .segments
        .iter()
        .map(|s| SubtitleBlock {
            order: s.order,
            start: s.start.clone(),
            end: s.end.clone(),
            primary: s.text.clone(),
            secondary: Some(s.translated_text.clone()),
        })
        .collect()
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!("Wrote artifact {:?}", path);
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(SubalignError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                  Subtitle Alignment Complete                    ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Segments:    {}", result.stats.segments);
    println!("  Batches:     {}", result.stats.batches);
    println!("  Sentences:   {}", result.stats.translated_sentences);
    if result.stats.alignment_complete {
        println!("  Alignment:   all {} segments processed", result.stats.segments);
    } else {
        println!(
            "  Alignment:   PARTIAL, {}/{} segments processed",
            result.stats.aligned, result.stats.segments
        );
    }
    if result.stats.pair_mismatches > 0 {
        println!("  Pair mismatches: {}", result.stats.pair_mismatches);
    }
    println!();
    println!("  Timing:");
    println!(
        "    Translate:   {:.2}s",
        result.stats.translation_time.as_secs_f64()
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("  Outputs:");
    for path in &result.outputs {
        println!("    {}", path.display());
    }
    println!();
    println!("═══════════════════════════════════════════════════════════════");
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

    #[test]
    fn test_original_blocks_carry_segments() {
        let segments = vec![segment(1, "Hello."), segment(2, "World.")];
        let blocks = original_blocks(&segments);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].order, 1);
        assert_eq!(blocks[0].primary, "Hello.");
        assert!(blocks[0].secondary.is_none());
    }

    #[test]
    fn test_pair_target_blocks_skip_unmatched() {
        let segments = vec![segment(1, "a"), segment(2, "b"), segment(3, "c")];
        let targets = vec![Some("甲".to_string()), None, Some("丙".to_string())];

        let blocks = pair_target_blocks(&segments, &targets);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].order, 1);
        assert_eq!(blocks[1].order, 3);
    }

    #[test]
    fn test_pair_bilingual_blocks_keep_all_segments() {
        let segments = vec![segment(1, "a"), segment(2, "b")];
        let targets = vec![Some("甲".to_string()), None];

        let blocks = pair_bilingual_blocks(&segments, &targets);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].secondary.as_deref(), Some("甲"));
        assert!(blocks[1].secondary.is_none());
    }

    #[test]
    fn test_translated_batch_artifact_round_trip() {
        let batch = TranslatedBatch {
            batch: TranslationBatch {
                char_count: 12,
                member_count: 2,
                last_order: 2,
                members: vec!["Hello.".to_string(), "World.".to_string()],
                joined_text: "Hello. World.".to_string(),
            },
            joined_translation: "你好。世界。".to_string(),
            member_translations: None,
        };

        let json = serde_json::to_string(&batch).unwrap();
        let back: TranslatedBatch = serde_json::from_str(&json).unwrap();

        assert_eq!(back.batch.joined_text, "Hello. World.");
        assert_eq!(back.joined_translation, "你好。世界。");
        assert!(back.member_translations.is_none());
        assert!(!json.contains("member_translations"));
    }
}
