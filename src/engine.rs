// src/engine.rs
//! # Analysis Engine
//! Pure, testable logic mapping raw text → `Analysis`. No I/O, no shared
//! mutable state; every call only reads the static tables and allocates its
//! own result, so concurrent callers need no locking.
//!
//! Combination order: phrase overrides are added to the token score *before*
//! the comparative is computed; risk detection runs on the raw text after
//! the label is known (it needs the label only for the trend flag).

use crate::analysis::{Analysis, EmotionVector, Label, SentenceScore};
use crate::lexicon;
use crate::phrases;
use crate::risk::{anon_hash, dev_logging_enabled, RiskEngine};
use crate::scoring;
use crate::text;
use tracing::info;

/// Analyze one input with the built-in risk configuration.
pub fn analyze(input: &str) -> Analysis {
    analyze_with(RiskEngine::builtin(), input)
}

/// Analyze one input against an explicit risk engine (custom config, tests).
pub fn analyze_with(risk: &RiskEngine, input: &str) -> Analysis {
    let tokens = text::tokenize(input);
    let normalized = text::normalize(input);

    // 1) Token-level score plus additive phrase overrides.
    let (token_score, signals) = scoring::score_tokens(&tokens);
    let (override_score, matched_phrases) = phrases::match_phrases(&normalized);
    let score = token_score + override_score;

    // 2) Length-normalized comparative and label.
    let comparative = if tokens.is_empty() {
        0.0
    } else {
        score / (tokens.len() as f32).sqrt()
    };
    let label = Label::from_comparative(comparative);

    // 3) Emotion presence, normalized by the max raw count (floor 1).
    let emotions = emotion_vector(&tokens);

    // 4) Per-sentence breakdowns: the token scorer re-run independently.
    let sentences: Vec<SentenceScore> = text::split_sentences(input)
        .into_iter()
        .map(|s| {
            let toks = text::tokenize(&s);
            let (sc, _) = scoring::score_tokens(&toks);
            let comp = if toks.is_empty() {
                0.0
            } else {
                sc / (toks.len() as f32).sqrt()
            };
            SentenceScore {
                text: s,
                score: sc,
                comparative: comp,
                label: Label::from_comparative(comp),
            }
        })
        .collect();

    // 5) Trend across sentences: shift and possible masking.
    let shift = match (sentences.first(), sentences.last()) {
        (Some(first), Some(last)) => last.comparative - first.comparative,
        _ => 0.0,
    };
    let masking_possible = if sentences.len() >= 2 {
        let last = sentences.last().map(|s| s.comparative).unwrap_or(0.0);
        let earlier = &sentences[..sentences.len() - 1];
        let earlier_avg =
            earlier.iter().map(|s| s.comparative).sum::<f32>() / earlier.len() as f32;
        last > 0.2 && earlier_avg < -0.5
    } else {
        false
    };

    // 6) Risk runs on the raw text, independent of polarity.
    let risk = risk.detect(input, &tokens, label, comparative);

    let intensity = comparative.abs().clamp(0.0, 1.0);

    let analysis = Analysis {
        score,
        comparative,
        label,
        tokens,
        signals,
        emotions,
        risk,
        sentences,
        intensity,
        shift,
        phrases: matched_phrases,
        masking_possible,
    };

    if dev_logging_enabled() {
        // Never log raw text. Only hashed id + coarse outcome.
        info!(
            target: "analysis",
            id = %anon_hash(input),
            label = ?analysis.label,
            comparative = %analysis.comparative,
            flags = analysis.risk.flags.len(),
            masking = analysis.masking_possible,
            "analyzed"
        );
    }

    analysis
}

fn emotion_vector(tokens: &[String]) -> EmotionVector {
    let mut counts = [0usize; 6];
    for t in tokens {
        for e in lexicon::emotions_for(t) {
            if let Some(idx) = lexicon::Emotion::ALL.iter().position(|x| x == e) {
                counts[idx] += 1;
            }
        }
    }
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f32;
    let mut v = EmotionVector::default();
    for (i, e) in lexicon::Emotion::ALL.into_iter().enumerate() {
        v.set(e, counts[i] as f32 / max);
    }
    v
}
