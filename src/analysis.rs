// src/analysis.rs
//! Output types for the analysis pipeline: label, per-sentence breakdowns,
//! the emotion vector, and the risk summary.
//!
//! These are the shapes the embedding app persists and renders; field names
//! are camelCase on the wire.

use crate::lexicon::Emotion;
use serde::{Deserialize, Serialize};

/// Whole-text tone label derived from the comparative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// `positive` iff comparative > 0.8, `negative` iff < -0.8, else
    /// `neutral`. Boundary values resolve to neutral.
    pub fn from_comparative(comparative: f32) -> Self {
        if comparative > 0.8 {
            Label::Positive
        } else if comparative < -0.8 {
            Label::Negative
        } else {
            Label::Neutral
        }
    }
}

/// Normalized 0..1 presence per emotion category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionVector {
    pub joy: f32,
    pub sadness: f32,
    pub anger: f32,
    pub anxiety: f32,
    pub stress: f32,
    pub calm: f32,
}

impl EmotionVector {
    pub fn get(&self, e: Emotion) -> f32 {
        match e {
            Emotion::Joy => self.joy,
            Emotion::Sadness => self.sadness,
            Emotion::Anger => self.anger,
            Emotion::Anxiety => self.anxiety,
            Emotion::Stress => self.stress,
            Emotion::Calm => self.calm,
        }
    }

    pub fn set(&mut self, e: Emotion, v: f32) {
        match e {
            Emotion::Joy => self.joy = v,
            Emotion::Sadness => self.sadness = v,
            Emotion::Anger => self.anger = v,
            Emotion::Anxiety => self.anxiety = v,
            Emotion::Stress => self.stress = v,
            Emotion::Calm => self.calm = v,
        }
    }

    /// Strongest category, ties broken by enumeration order
    /// (joy > sadness > anger > anxiety > stress > calm).
    /// `None` when no category registered at all.
    pub fn dominant(&self) -> Option<Emotion> {
        let mut best: Option<(Emotion, f32)> = None;
        for e in Emotion::ALL {
            let v = self.get(e);
            if v > 0.0 && best.map_or(true, |(_, bv)| v > bv) {
                best = Some((e, v));
            }
        }
        best.map(|(e, _)| e)
    }
}

/// Per-sentence breakdown: same scoring shape as the whole text, minus
/// emotion and risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceScore {
    pub text: String,
    pub score: f32,
    pub comparative: f32,
    pub label: Label,
}

/// Risk flags and precursor trend for one input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub self_harm: bool,
    pub harm_to_others: bool,
    pub crisis: bool,
    /// Flag labels, deduplicated, first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Precursor vocabulary terms that occurred, first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub precursors: Vec<String>,
    pub precursor_score: f32,
}

/// The engine's sole output: one fresh record per input string, owned by the
/// caller, never cached or merged across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub score: f32,
    /// score / sqrt(token count); 0 for empty input.
    pub comparative: f32,
    pub label: Label,
    pub tokens: Vec<String>,
    /// Lexicon tokens that contributed to the score, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<String>,
    pub emotions: EmotionVector,
    pub risk: RiskSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<SentenceScore>,
    /// |comparative| clamped to 0..1.
    pub intensity: f32,
    /// Last-sentence comparative minus first-sentence comparative.
    pub shift: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phrases: Vec<String>,
    /// Late positive close after a predominantly negative lead.
    pub masking_possible: bool,
}
