//! Two-line wrapping for translated subtitle text.
//!
//! Splits a line that exceeds its character budget into two display lines,
//! preferring the clause separator `，` as the break point. Lengths are
//! counted in chars, not bytes, since the target text is CJK.

use regex::Regex;
use std::sync::LazyLock;

/// Clause separator in the translated text (fullwidth comma).
const CLAUSE_SEP: char = '，';

/// Digit groups with embedded thousands separators, e.g. `35,000`.
static THOUSANDS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:,\d{3})+").unwrap());

/// Break `text` into at most two lines within `char_limit` characters.
///
/// The effective budget is `max(char_limit, len/2)` so a long line is never
/// split worse than in half. Clauses are accumulated greedily onto the first
/// line; the clause that crosses the budget starts the second line, unless it
/// is the very first clause (an empty first line is never produced).
pub fn wrap(text: &str, char_limit: usize) -> String {
    let len_text = text.chars().count();
    let max_chars = (char_limit as f64).max(len_text as f64 / 2.0);
    if len_text as f64 <= max_chars {
        return text.to_string();
    }

    // Strip thousands separators so `35,000` is not mistaken for a clause
    // boundary. The stripped form is what ends up on screen.
    let text = THOUSANDS_RE.replace_all(text, |caps: &regex::Captures| caps[0].replace(',', ""));

    let clauses: Vec<&str> = text.split(CLAUSE_SEP).collect();
    let mut first: Vec<&str> = Vec::new();
    let mut second: Vec<&str> = Vec::new();
    let mut running = 0usize;

    for (i, clause) in clauses.iter().enumerate() {
        running += clause.chars().count() + 1;
        if (running as f64) < max_chars || i == 0 {
            first.push(clause);
        } else {
            second.push(clause);
        }
    }

    let line1 = first.join(&CLAUSE_SEP.to_string());
    if second.is_empty() {
        line1
    } else {
        format!("{}\n{}", line1, second.join(&CLAUSE_SEP.to_string()))
    }
}
