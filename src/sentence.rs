//! Sentence-boundary detection heuristics.
//!
//! The aligner re-splits a translated text back onto the original timed
//! segments using nothing but sentence-boundary counts, so these counters
//! have to correct for the usual false positives: abbreviations, decimal
//! numbers, ellipses and middle-initial names.

use regex::Regex;
use std::sync::LazyLock;

/// Abbreviations whose trailing dot must not count as a sentence boundary.
/// Applied as a declarative table so the rule set stays auditable.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Mr.", "Mr"),
    ("U.S.", "US"),
    ("US.", "US"),
    ("Dr.", "Dr"),
    ("A.I.", "AI"),
];

/// Additional neutralizations used only by the extended policy.
const EXTENDED_ABBREVIATIONS: &[(&str, &str)] = &[("St.", "St")];

/// Decimal numbers such as `88.6` whose dot is not a boundary.
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());

static ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\.\.").unwrap());

static SPACE_DOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\. +").unwrap());

/// Middle-initial names like `Howard K. Smith`: the dot-followed-by-space
/// rule counts these, so each match is subtracted back out.
static INITIAL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+ [A-Z]\. [A-Z][a-z]+").unwrap());

fn neutralize(text: &str, tables: &[&[(&str, &str)]]) -> String {
    let mut out = text.to_string();
    for table in tables {
        for (pattern, replacement) in *table {
            out = out.replace(pattern, replacement);
        }
    }
    out
}

/// Count sentence boundaries with the basic policy: `?` and `.` after
/// abbreviation neutralization, minus decimal-number dots, floored at zero.
pub fn basic_count(text: &str) -> usize {
    let neutral = neutralize(text, &[ABBREVIATIONS]);
    let punct = neutral.chars().filter(|c| *c == '?' || *c == '.').count();
    let decimals = DECIMAL_RE.find_iter(&neutral).count();
    punct.saturating_sub(decimals)
}

/// Count sentence boundaries with the extended policy used by the aligner.
///
/// Counts `?` and `!` directly, three-dot ellipses (removed afterwards so
/// their dots are not recounted), dot-before-space and dot-at-end
/// occurrences, and subtracts middle-initial name matches. The result is
/// deliberately not floored; pathological input can drive it negative and
/// the aligner treats that the same as an over-subtracted zero.
pub fn extended_count(text: &str) -> i64 {
    let neutral = neutralize(text, &[ABBREVIATIONS, EXTENDED_ABBREVIATIONS]);

    let questions = neutral.matches('?').count() as i64;
    let ellipses = ELLIPSIS_RE.find_iter(&neutral).count() as i64;
    let neutral = ELLIPSIS_RE.replace_all(&neutral, "");

    let space_dots = SPACE_DOT_RE.find_iter(&neutral).count() as i64;
    let initials = INITIAL_NAME_RE.find_iter(&neutral).count() as i64;
    let end_dots = i64::from(neutral.ends_with('.'));
    let exclamations = neutral.matches('!').count() as i64;

    questions + space_dots + end_dots + exclamations + ellipses - initials
}

/// Split translated text into discrete sentences on the target language's
/// sentence-ending punctuation. Each sentence keeps its terminal punctuation;
/// a trailing empty element is dropped.
pub fn split_target_sentences(text: &str) -> Vec<String> {
    let marked = text
        .replace('。', "。\n")
        .replace('？', "？\n")
        .replace("……", "……\n")
        .replace('！', "！\n")
        .replace("......", "......\n");

    let mut sentences: Vec<String> = marked.split('\n').map(str::to_string).collect();
    if sentences.last().is_some_and(|s| s.is_empty()) {
        sentences.pop();
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_count_simple() {
        assert_eq!(basic_count("Hello. How are you?"), 2);
        assert_eq!(basic_count("no punctuation here"), 0);
    }

    #[test]
    fn test_basic_count_neutralizes_abbreviations() {
        assert_eq!(basic_count("Mr. Smith works for the U.S. government."), 1);
        assert_eq!(basic_count("Dr. Lee studies A.I. systems."), 1);
    }

    #[test]
    fn test_basic_count_excludes_decimals() {
        assert_eq!(basic_count("Inflation hit 88.6 percent."), 1);
        assert_eq!(basic_count("88.6"), 0);
    }

    #[test]
    fn test_extended_count_question() {
        assert_eq!(extended_count("Is this it?"), 1);
    }

    #[test]
    fn test_extended_count_middle_initial_not_double_counted() {
        assert_eq!(extended_count("Howard K. Smith spoke."), 1);
    }

    #[test]
    fn test_extended_count_thousands_amount() {
        // Comma neutralization happens upstream; the counter itself only
        // sees the trailing dot.
        assert_eq!(extended_count("It costs $35,000."), 1);
    }

    #[test]
    fn test_extended_count_ellipsis_counted_once() {
        assert_eq!(extended_count("Well... I guess so."), 2);
        assert_eq!(extended_count("Wait..."), 1);
    }

    #[test]
    fn test_extended_count_exclamations() {
        assert_eq!(extended_count("Stop! Come back! Now."), 3);
    }

    #[test]
    fn test_extended_count_mid_sentence_fragment() {
        assert_eq!(extended_count("inequalities. We have seen how biases"), 1);
        assert_eq!(extended_count("a fragment with no ending"), 0);
    }

    #[test]
    fn test_extended_count_st_neutralized() {
        assert_eq!(extended_count("He lives on St. Mark's street."), 1);
    }

    #[test]
    fn test_split_target_sentences() {
        let sentences = split_target_sentences("你好。你是谁？我不知道……好吧！");
        assert_eq!(sentences, vec!["你好。", "你是谁？", "我不知道……", "好吧！"]);
    }

    #[test]
    fn test_split_keeps_nonterminated_tail() {
        let sentences = split_target_sentences("第一句。还没说完的");
        assert_eq!(sentences, vec!["第一句。", "还没说完的"]);
    }

    #[test]
    fn test_split_ascii_ellipsis() {
        let sentences = split_target_sentences("等等......然后呢？");
        assert_eq!(sentences, vec!["等等......", "然后呢？"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_target_sentences("").is_empty());
    }
}
