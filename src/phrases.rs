// src/phrases.rs
//! Multi-word phrase overrides.
//!
//! Phrases are matched whole-word against the normalized text and applied as
//! an additive override on top of token-level scoring, each occurrence
//! contributing `weight * 1.2`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

const PHRASE_MULTIPLIER: f32 = 1.2;

#[derive(Debug, Deserialize)]
struct PhraseCfg {
    pub phrase: String,
    pub weight: f32,
}

#[derive(Debug, Deserialize)]
struct PhraseFile {
    #[serde(default)]
    pub phrases: Vec<PhraseCfg>,
}

#[derive(Debug)]
struct CompiledPhrase {
    phrase: String,
    weight: f32,
    re: Regex,
}

static PHRASES: Lazy<Vec<CompiledPhrase>> = Lazy::new(|| {
    let raw = include_str!("../phrase_overrides.json");
    let file: PhraseFile = serde_json::from_str(raw).expect("valid phrase table");
    file.phrases
        .into_iter()
        .map(|p| {
            let pattern = format!(r"\b{}\b", regex::escape(&p.phrase));
            let re = Regex::new(&pattern).expect("phrase regex");
            CompiledPhrase {
                phrase: p.phrase,
                weight: p.weight,
                re,
            }
        })
        .collect()
});

/// Scan normalized text for configured phrases.
/// Returns `(override_score, matched_phrases)`; one match entry per
/// non-overlapping occurrence, in table order.
pub fn match_phrases(normalized: &str) -> (f32, Vec<String>) {
    let mut score = 0.0f32;
    let mut matched: Vec<String> = Vec::new();

    for cp in PHRASES.iter() {
        let hits = cp.re.find_iter(normalized).count();
        if hits == 0 {
            continue;
        }
        score += cp.weight * PHRASE_MULTIPLIER * hits as f32;
        for _ in 0..hits {
            matched.push(cp.phrase.clone());
        }
    }

    (score, matched)
}
