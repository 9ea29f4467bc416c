// src/scoring.rs
//! Token-level polarity scoring.
//!
//! A single left-to-right walk with a small scanner state: a 3-token
//! negation window, an intensifier boost consumed by the next
//! sentiment-bearing token (decaying by 0.9 per non-sentiment token), and
//! same-token repetition amplification capped at +50%.

use crate::lexicon;

const NEGATION_WINDOW: u8 = 3;
const BOOST_DECAY: f32 = 0.9;
const REPEAT_STEP: f32 = 0.25;
const REPEAT_CAP: u32 = 2;

/// Mutable scanner state threaded through the token walk.
#[derive(Debug)]
struct ScanState {
    negate_window: u8,
    boost: f32,
    last_sentiment: Option<String>,
    repeat_count: u32,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            negate_window: 0,
            boost: 1.0,
            last_sentiment: None,
            repeat_count: 0,
        }
    }
}

/// Walk `tokens` and return `(score, signals)`, where `signals` are the
/// lexicon tokens that contributed, in input order.
///
/// Order matters: intensifiers and negators are consumed without ticking the
/// negation window; non-sentiment tokens decay the boost and tick the window.
pub fn score_tokens(tokens: &[String]) -> (f32, Vec<String>) {
    let mut score = 0.0f32;
    let mut signals: Vec<String> = Vec::new();
    let mut st = ScanState::default();

    for tok in tokens {
        if let Some(w) = lexicon::intensifier_weight(tok) {
            st.boost = st.boost.max(w);
            continue;
        }
        if lexicon::is_negator(tok) {
            st.negate_window = NEGATION_WINDOW;
            continue;
        }
        if let Some(base) = lexicon::word_score(tok) {
            if st.last_sentiment.as_deref() == Some(tok.as_str()) {
                st.repeat_count += 1;
            } else {
                st.repeat_count = 0;
                st.last_sentiment = Some(tok.clone());
            }
            let repeat_boost = 1.0 + st.repeat_count.min(REPEAT_CAP) as f32 * REPEAT_STEP;
            let mut s = base * st.boost * repeat_boost;
            if st.negate_window > 0 {
                s = -s;
                st.negate_window -= 1;
            }
            score += s;
            signals.push(tok.clone());
            st.boost = 1.0;
        } else {
            st.boost = (st.boost * BOOST_DECAY).max(1.0);
            if st.negate_window > 0 {
                st.negate_window -= 1;
            }
        }
    }

    (score, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn score(text: &str) -> f32 {
        score_tokens(&tokenize(text)).0
    }

    #[test]
    fn negation_flips_sign_same_magnitude() {
        let plain = score("good");
        let negated = score("not good");
        assert!(plain > 0.0);
        assert!((negated + plain).abs() < 1e-6);
    }

    #[test]
    fn negation_window_reaches_three_tokens() {
        // Two filler tokens between negator and sentiment word still invert.
        assert!(score("not at all good") < 0.0);
        // Four non-sentiment tokens exhaust the window.
        assert!(score("not one bit of it was good") > 0.0);
    }

    #[test]
    fn intensifier_scopes_to_next_sentiment_token_only() {
        let plain = score("good");
        let boosted = score("very good");
        assert!(boosted > plain);

        // `very` must boost `tired`, not carry over to `okay`.
        let toks = tokenize("very tired okay");
        let (total, signals) = score_tokens(&toks);
        let tired = crate::lexicon::word_score("tired").unwrap();
        let okay = crate::lexicon::word_score("okay").unwrap();
        let very = crate::lexicon::intensifier_weight("very").unwrap();
        assert!((total - (tired * very + okay)).abs() < 1e-6);
        assert_eq!(signals, vec!["tired", "okay"]);
    }

    #[test]
    fn boost_decays_across_non_sentiment_tokens() {
        // One filler token: boost 1.5 * 0.9 = 1.35 still applies.
        let one_gap = score("very much good");
        let plain = score("good");
        assert!(one_gap > plain);
        assert!((one_gap - plain * 1.35).abs() < 1e-6);
    }

    #[test]
    fn repetition_amplifies_with_cap() {
        let once = score("sad");
        let thrice = score("sad sad sad");
        // 1.0 + 1.25 + 1.5 multiples of the base weight.
        assert!((thrice - once * 3.75).abs() < 1e-6);
        let many = score("sad sad sad sad sad");
        // Cap at +50%: further repeats add 1.5x each.
        assert!((many - once * (1.0 + 1.25 + 1.5 + 1.5 + 1.5)).abs() < 1e-6);
    }

    #[test]
    fn unknown_tokens_contribute_zero() {
        assert_eq!(score("the quick brown fox"), 0.0);
        assert_eq!(score(""), 0.0);
    }
}
