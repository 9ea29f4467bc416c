// src/lexicon.rs
//! Static scoring tables: the polarity lexicon, emotion category sets, and
//! the closed-class negator/intensifier words.
//!
//! All tables are built once at first touch and shared read-only across
//! calls. `validate_tables()` lets embedding apps fail fast at boot instead
//! of on the first analysis.

use anyhow::{bail, Context};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f32>>(raw).expect("valid sentiment lexicon")
});

/// Lexicon polarity weight for a normalized token, if any.
#[inline]
pub fn word_score(token: &str) -> Option<f32> {
    LEXICON.get(token).copied()
}

/// Emotion categories tracked by the engine. Variant order is the tie-break
/// order when picking a dominant emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Anxiety,
    Stress,
    Calm,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Anxiety,
        Emotion::Stress,
        Emotion::Calm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Anxiety => "anxiety",
            Emotion::Stress => "stress",
            Emotion::Calm => "calm",
        }
    }
}

/// Category membership used for presence counting, not polarity.
const EMOTION_MEMBERS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "happy", "glad", "joy", "joyful", "excited", "fun", "smile", "smiled", "laughed",
            "love", "loved", "grateful", "thankful", "proud", "blessed", "enjoyed", "wonderful",
            "amazing",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "sad", "unhappy", "depressed", "miserable", "crying", "cried", "tears", "grief",
            "grieving", "lonely", "heartbroken", "hurt", "broken", "empty", "hopeless",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "angry", "mad", "furious", "rage", "hate", "hated", "annoyed", "irritated",
            "frustrated", "frustrating", "resentful", "bitter", "betrayed",
        ],
    ),
    (
        Emotion::Anxiety,
        &[
            "anxious", "anxiety", "worried", "worry", "nervous", "panic", "panicking", "afraid",
            "scared", "fear", "terrified", "dread", "dreading", "uneasy", "restless",
        ],
    ),
    (
        Emotion::Stress,
        &[
            "stress", "stressed", "overwhelmed", "pressure", "exhausted", "drained", "tense",
            "tired", "suffocating", "breakdown",
        ],
    ),
    (
        Emotion::Calm,
        &[
            "calm", "peaceful", "relaxed", "rested", "settled", "grounded", "steady", "quiet",
            "still", "balanced", "refreshed",
        ],
    ),
];

/// Inverse token → category map, built once so the per-token lookup is a
/// single hash probe instead of six set scans.
static TOKEN_EMOTIONS: Lazy<HashMap<&'static str, Vec<Emotion>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Vec<Emotion>> = HashMap::new();
    for (emotion, members) in EMOTION_MEMBERS {
        for m in *members {
            map.entry(*m).or_default().push(*emotion);
        }
    }
    map
});

/// Categories a normalized token belongs to (empty slice for most tokens).
pub fn emotions_for(token: &str) -> &[Emotion] {
    TOKEN_EMOTIONS.get(token).map(Vec::as_slice).unwrap_or(&[])
}

/// Negators open a decaying 3-token inversion window in the scorer.
/// Any `n't` contraction counts alongside the closed set.
pub fn is_negator(token: &str) -> bool {
    token.ends_with("n't")
        || matches!(
            token,
            "not" | "no" | "never" | "none" | "cannot" | "without" | "hardly" | "barely"
        )
}

/// Intensifiers set a multiplicative boost consumed by the next
/// sentiment-bearing token.
pub fn intensifier_weight(token: &str) -> Option<f32> {
    let w = match token {
        "very" | "really" | "truly" | "super" => 1.5,
        "so" => 1.3,
        "quite" | "pretty" => 1.2,
        "deeply" | "totally" => 1.6,
        "absolutely" | "completely" => 1.8,
        "utterly" => 1.9,
        "extremely" | "incredibly" | "insanely" => 2.0,
        _ => return None,
    };
    Some(w)
}

/// One-off startup validation of the static tables (fail fast, not per call).
pub fn validate_tables() -> anyhow::Result<()> {
    if LEXICON.is_empty() {
        bail!("sentiment lexicon is empty");
    }
    for (word, weight) in LEXICON.iter() {
        if !weight.is_finite() {
            bail!("lexicon weight for `{word}` is not finite");
        }
    }
    for (emotion, members) in EMOTION_MEMBERS {
        if members.is_empty() {
            bail!("emotion category `{}` has no members", emotion.as_str());
        }
    }
    for tok in ["very", "extremely"] {
        let w = intensifier_weight(tok).context("intensifier table missing core entries")?;
        if w < 1.0 {
            bail!("intensifier `{tok}` must boost, got {w}");
        }
    }
    Ok(())
}
