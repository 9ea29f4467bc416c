// src/text.rs
//! Text primitives shared by every analysis stage: normalization,
//! whitespace tokenization, and sentence splitting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentence terminators: one or more of `.!?`, plus any trailing whitespace.
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s*").expect("sentence split regex"));

/// Lowercase and replace every character outside `[a-z0-9\s'-]` with a space,
/// then collapse whitespace and trim.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = true;
    for ch in input.chars() {
        for lc in ch.to_lowercase() {
            if lc.is_ascii_alphanumeric() || lc == '\'' || lc == '-' {
                out.push(lc);
                last_space = false;
            } else if !last_space {
                out.push(' ');
                last_space = true;
            }
        }
    }
    out.trim_end().to_string()
}

/// Normalized, whitespace-delimited tokens. Empty input yields an empty vec.
pub fn tokenize(input: &str) -> Vec<String> {
    normalize(input)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Split raw text into sentences on `.`/`!`/`?` runs, newlines treated as
/// spaces. Sentences keep their original casing; callers re-tokenize them.
pub fn split_sentences(input: &str) -> Vec<String> {
    let flat = input.replace(['\n', '\r'], " ");
    SENTENCE_SPLIT
        .split(&flat)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
