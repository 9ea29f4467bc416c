// src/reply.rs
//! Templated reply selection: a deterministic decision tree over an
//! `Analysis`, never free text generation.
//!
//! Priority is fixed: crisis escalation is terminal and overrides every
//! other signal; the ambiguous "i'm dead" check-in comes next; only then do
//! tone/emotion templates apply. Every follow-up turn re-runs the full risk
//! detector on the new utterance — risk status is never inherited.

use crate::analysis::{Analysis, Label};
use crate::engine::analyze_with;
use crate::lexicon::Emotion;
use crate::risk::RiskEngine;
use crate::text;
use strsim::normalized_damerau_levenshtein;

/// Fixed safety-escalation message. Must always be deliverable, regardless
/// of any other UI state.
pub const ESCALATION_MESSAGE: &str = "What you're describing sounds really serious, and I'm glad you said it here. \
     Please reach out right now to a crisis line (in the US, call or text 988) \
     or to someone you trust who can be with you. You don't have to carry this alone.";

/// Clarifying check-in for the ambiguous "i'm dead" case.
pub const IM_DEAD_CHECKIN: &str = "Quick check-in: when you say you're \"dead\", is that a figure of speech, \
     or is something heavier going on? I'm here either way.";

const GENERIC_PROMPT: &str =
    "I'm here with you. Would you like to tell me a bit more about how today has felt?";

const SNIPPET_MAX_TOKENS: usize = 20;
const SNIPPET_MIN_TOKENS: usize = 3;
const FUZZY_THRESHOLD: f64 = 0.8;
const FUZZY_MIN_LEN: usize = 4;

const THANKS_WORDS: &[&str] = &["thanks", "thank", "thx", "ty", "appreciate", "appreciated"];
const AGREEMENT_WORDS: &[&str] = &["yes", "yeah", "yep", "ok", "okay", "sure", "alright", "will"];
const REFUSAL_WORDS: &[&str] = &["no", "nope", "nah", "can't", "cant", "don't", "dont", "won't", "wont"];

fn tone_descriptor(label: Label) -> &'static str {
    match label {
        Label::Positive => "upbeat",
        Label::Neutral => "steady, in-between",
        Label::Negative => "heavy",
    }
}

fn coping_tip(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Joy => {
            "Naming what went well helps it stick - what made the biggest difference today?"
        }
        Emotion::Sadness => {
            "When sadness is present, being gentle with yourself matters. Could you give yourself a few minutes of warmth, like a short walk or a favorite song?"
        }
        Emotion::Anger => {
            "Anger usually carries information. Before acting on it, try one slow breath out, longer than the breath in, and notice where it sits in your body."
        }
        Emotion::Anxiety => {
            "When worry spins, grounding can help: name five things you can see and four you can touch, then come back to the page."
        }
        Emotion::Stress => {
            "That load sounds real. Try writing down the three heaviest items and moving only the smallest one today."
        }
        Emotion::Calm => {
            "There's a settled quality here. Noting what supported that calm makes it easier to return to."
        }
    }
}

fn reflection(label: Label) -> &'static str {
    match label {
        Label::Positive => "It sounds like things have been leaning brighter, and that's worth holding onto.",
        Label::Neutral => "It sounds like today has been a mixed, in-between kind of day.",
        Label::Negative => "It sounds like things have been genuinely hard lately.",
    }
}

fn next_step(emotion: Option<Emotion>) -> &'static str {
    match emotion {
        Some(Emotion::Joy) => "Maybe jot down one thing you want to remember about today.",
        Some(Emotion::Sadness) => {
            "Maybe reach out to one person who feels safe, even with a short message."
        }
        Some(Emotion::Anger) => {
            "Maybe step away from the situation for ten minutes before deciding anything."
        }
        Some(Emotion::Anxiety) => {
            "Maybe take one slow breath and write down the single biggest worry."
        }
        Some(Emotion::Stress) => "Maybe pick the smallest task on your plate and do only that one.",
        Some(Emotion::Calm) => "Maybe note what helped today feel steadier so you can repeat it.",
        None => "Would you like to tell me more about what's underneath that?",
    }
}

/// First ≤20 tokens of the input, quoted back; omitted for very short inputs.
fn snippet(input: &str) -> Option<String> {
    let tokens = text::tokenize(input);
    if tokens.len() < SNIPPET_MIN_TOKENS {
        return None;
    }
    if tokens.len() <= SNIPPET_MAX_TOKENS {
        Some(tokens.join(" "))
    } else {
        Some(format!("{}...", tokens[..SNIPPET_MAX_TOKENS].join(" ")))
    }
}

/// Lead-in reply for a fresh journal entry or first chat turn.
pub fn reply(analysis: &Analysis, input: &str) -> String {
    if analysis.risk.crisis {
        return ESCALATION_MESSAGE.to_string();
    }
    if analysis.risk.flags.iter().any(|f| f == "ambiguous-im-dead") {
        return IM_DEAD_CHECKIN.to_string();
    }

    let Some(dominant) = analysis.emotions.dominant() else {
        return GENERIC_PROMPT.to_string();
    };

    let tone = tone_descriptor(analysis.label);
    let tip = coping_tip(dominant);
    match snippet(input) {
        Some(s) => format!(
            "Thank you for sharing. What you wrote comes across as {tone}, especially \"{s}\". {tip}"
        ),
        None => format!("Thank you for sharing. What you wrote comes across as {tone}. {tip}"),
    }
}

/// True when any token of `tokens` matches a keyword exactly, or fuzzily for
/// longer words (typos like "thansk").
fn matches_keyword_set(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| {
        words.iter().any(|w| {
            t == w
                || (t.len() >= FUZZY_MIN_LEN
                    && w.len() >= FUZZY_MIN_LEN
                    && normalized_damerau_levenshtein(t, w) >= FUZZY_THRESHOLD)
        })
    })
}

/// Conversational second-stage reply for the *next* user utterance.
///
/// `previous` is the caller-held context from the prior turn; the utterance
/// itself is re-analyzed in full, so crisis language in a follow-up always
/// escalates no matter how the conversation started.
pub fn follow_up(previous: &Analysis, utterance: &str) -> String {
    follow_up_with(RiskEngine::builtin(), previous, utterance)
}

/// `follow_up` against an explicit risk engine (custom config, tests).
pub fn follow_up_with(risk: &RiskEngine, previous: &Analysis, utterance: &str) -> String {
    let fresh = analyze_with(risk, utterance);
    if fresh.risk.crisis {
        return ESCALATION_MESSAGE.to_string();
    }
    if fresh.risk.flags.iter().any(|f| f == "ambiguous-im-dead") {
        return IM_DEAD_CHECKIN.to_string();
    }

    let dominant = previous.emotions.dominant();

    if matches_keyword_set(&fresh.tokens, THANKS_WORDS) {
        return "You're very welcome. I'm glad it helped a little - I'm here whenever you want to write more.".to_string();
    }
    if matches_keyword_set(&fresh.tokens, AGREEMENT_WORDS) {
        return format!("Good - let's keep it small and doable. {}", next_step(dominant));
    }
    if matches_keyword_set(&fresh.tokens, REFUSAL_WORDS) {
        return "That's okay - nothing here is forced. Would it help to just describe what feels hardest right now?".to_string();
    }

    format!("{} {}", reflection(previous.label), next_step(dominant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;

    #[test]
    fn crisis_always_escalates() {
        let text = "I feel fine mostly but I want to end it all.";
        let a = analyze(text);
        assert!(a.risk.crisis);
        assert_eq!(reply(&a, text), ESCALATION_MESSAGE);
    }

    #[test]
    fn ambiguous_im_dead_gets_checkin() {
        let text = "haha i'm dead lol";
        let a = analyze(text);
        assert!(!a.risk.crisis);
        assert_eq!(reply(&a, text), IM_DEAD_CHECKIN);
    }

    #[test]
    fn lead_in_quotes_snippet_and_keys_tip_on_dominant_emotion() {
        let text = "I have been so anxious and worried about everything";
        let a = analyze(text);
        let r = reply(&a, text);
        assert!(r.contains("heavy") || r.contains("steady"));
        assert!(r.contains("anxious and worried"));
        assert!(r.contains("grounding"), "anxiety tip expected: {r}");
    }

    #[test]
    fn no_emotion_signal_falls_back_to_generic_prompt() {
        let text = "went to the store for milk";
        let a = analyze(text);
        assert_eq!(reply(&a, text), GENERIC_PROMPT);
    }

    #[test]
    fn snippet_truncates_at_twenty_tokens() {
        let long = "one two three four five six seven eight nine ten \
                    eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty twentyone";
        let s = snippet(long).unwrap();
        assert!(s.ends_with("..."));
        assert!(!s.contains("twentyone"));
        assert_eq!(snippet("hi"), None);
    }

    #[test]
    fn follow_up_matches_thanks_even_with_typos() {
        let prev = analyze("I have been sad all week");
        let r = follow_up(&prev, "thansk, that helps");
        assert!(r.contains("welcome"));
    }

    #[test]
    fn follow_up_agreement_uses_previous_dominant_emotion() {
        let prev = analyze("I have been sad and crying all week");
        let r = follow_up(&prev, "okay");
        assert!(r.contains("small and doable"));
        assert!(r.contains("feels safe"), "sadness next-step expected: {r}");
    }

    #[test]
    fn follow_up_refusal_is_non_forcing() {
        let prev = analyze("I am stressed about work");
        let r = follow_up(&prev, "nope");
        assert!(r.contains("nothing here is forced"));
    }

    #[test]
    fn follow_up_fallback_pairs_reflection_with_next_step() {
        let prev = analyze("I am stressed and overwhelmed by deadlines");
        let r = follow_up(&prev, "it keeps piling higher every single day");
        assert!(r.contains("genuinely hard") || r.contains("in-between"));
        assert!(r.contains("smallest task"), "stress next-step expected: {r}");
    }

    #[test]
    fn follow_up_rechecks_risk_every_turn() {
        let prev = analyze("Today was wonderful and calm.");
        assert!(!prev.risk.crisis);
        let r = follow_up(&prev, "actually I want to kill myself");
        assert_eq!(r, ESCALATION_MESSAGE);
    }
}
