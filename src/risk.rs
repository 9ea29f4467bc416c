// src/risk.rs
//! Risk gate primitives: pattern config types, regex compilation, the
//! "i'm dead" ambiguity split, and precursor trend scoring.
//!
//! Patterns run over the *raw* text so punctuation and casing quirks never
//! hide a match. Detection is independent of sentiment polarity; only the
//! `risk-trend` flag consults the overall label. False positives are
//! preferred over false negatives throughout.

use crate::analysis::{Label, RiskSummary};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

// --- env defaults & names ---
pub const ENV_RISK_CONFIG_PATH: &str = "RISK_CONFIG_PATH";

const DEFAULT_RISK_CONFIG: &str = include_str!("../config/risk.toml");

const FLAG_AMBIGUOUS_IM_DEAD: &str = "ambiguous-im-dead";
const FLAG_WATCH_IM_DEAD: &str = "watch-im-dead";
const FLAG_RISK_TREND: &str = "risk-trend";

// Dev logging gate: ANALYZER_DEV_LOG=1 AND dev env (debug build or ANALYZER_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("ANALYZER_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("ANALYZER_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short anonymized id for a text. Journal content must never be logged;
/// only this hash plus flag/score metadata.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

/// Risk type a pattern is classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    SelfHarm,
    HarmToOthers,
    Crisis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskRoot {
    pub risk: RiskSection,
    #[serde(default)]
    pub patterns: Vec<PatternCfg>,
    pub imdead: ImDeadCfg,
    pub precursors: PrecursorCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskSection {
    pub precursor_floor: f32,
    pub precursor_divisor: f32,
    pub trend_threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternCfg {
    /// Doubles as the flag label emitted on match.
    pub id: String,
    pub kind: RiskKind,
    pub pattern: String, // regex (case-insensitivity via (?i) in the pattern)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImDeadCfg {
    pub pattern: String,
    /// Tunable safety parameter; absence of a marker keeps the cautious flag.
    #[serde(default)]
    pub humor_markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrecursorCfg {
    pub terms: Vec<String>,
}

/* ----------------------------
Compiled engine
---------------------------- */

#[derive(Debug)]
struct CompiledPattern {
    cfg: PatternCfg,
    re: Regex,
}

/// Holds compiled regexes; built once, shared read-only across calls.
#[derive(Debug)]
pub struct RiskEngine {
    section: RiskSection,
    patterns: Vec<CompiledPattern>,
    imdead: Regex,
    humor_markers: Vec<String>,
    precursor_terms: Vec<String>,
    precursor_set: HashSet<String>,
}

static BUILTIN: Lazy<RiskEngine> =
    Lazy::new(|| RiskEngine::from_toml_str(DEFAULT_RISK_CONFIG).expect("valid built-in risk config"));

impl RiskEngine {
    /// The compiled-in configuration (config/risk.toml at build time).
    pub fn builtin() -> &'static RiskEngine {
        &BUILTIN
    }

    /// Load from a TOML file. Uses RISK_CONFIG_PATH when set, otherwise the
    /// compiled-in default.
    pub fn from_toml() -> anyhow::Result<Self> {
        match std::env::var(ENV_RISK_CONFIG_PATH).map(PathBuf::from) {
            Ok(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to read risk config at {}: {}", path.display(), e)
                })?;
                Self::from_toml_str(&content)
            }
            Err(_) => Self::from_toml_str(DEFAULT_RISK_CONFIG),
        }
    }

    /// Load from a TOML string, compiling every pattern up front.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: RiskRoot = toml::from_str(toml_str)?;

        let patterns = cfg
            .patterns
            .iter()
            .cloned()
            .map(|p| {
                let re = Regex::new(&p.pattern)
                    .map_err(|e| anyhow::anyhow!("risk pattern `{}` regex error: {}", p.id, e))?;
                Ok(CompiledPattern { cfg: p, re })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let imdead = Regex::new(&cfg.imdead.pattern)
            .map_err(|e| anyhow::anyhow!("imdead regex error: {}", e))?;

        let humor_markers = cfg
            .imdead
            .humor_markers
            .iter()
            .map(|m| m.to_lowercase())
            .collect();

        let precursor_terms = cfg.precursors.terms.clone();
        let precursor_set = cfg.precursors.terms.iter().map(|t| t.to_lowercase()).collect();

        Ok(Self {
            section: cfg.risk,
            patterns,
            imdead,
            humor_markers,
            precursor_terms,
            precursor_set,
        })
    }

    /// Number of compiled patterns (diagnostics only).
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Configured precursor vocabulary, in config order.
    pub fn precursor_terms(&self) -> &[String] {
        &self.precursor_terms
    }

    fn has_humor_marker(&self, raw: &str, tokens: &[String]) -> bool {
        let lower = raw.to_lowercase();
        self.humor_markers.iter().any(|m| {
            if m.chars().all(|c| c.is_ascii_alphanumeric()) {
                tokens.iter().any(|t| t == m)
            } else {
                // Emoji and other non-word markers survive only in raw text.
                lower.contains(m.as_str())
            }
        })
    }

    /// Evaluate all risk signals for one input.
    ///
    /// `label`/`comparative` come from the aggregate scoring pass and gate
    /// only the `risk-trend` flag; pattern detection itself never consults
    /// them. Every call is fresh — risk is never inherited across turns.
    pub fn detect(&self, raw: &str, tokens: &[String], label: Label, comparative: f32) -> RiskSummary {
        let mut flags: Vec<String> = Vec::new();
        let mut self_harm = false;
        let mut harm_to_others = false;
        let mut crisis_pattern = false;

        for p in &self.patterns {
            if !p.re.is_match(raw) {
                continue;
            }
            match p.cfg.kind {
                RiskKind::SelfHarm => self_harm = true,
                RiskKind::HarmToOthers => harm_to_others = true,
                RiskKind::Crisis => crisis_pattern = true,
            }
            push_unique(&mut flags, &p.cfg.id);
        }

        // Standalone "i'm dead": a soft flag either way, never a crisis by itself.
        if self.imdead.is_match(raw) {
            if self.has_humor_marker(raw, tokens) {
                push_unique(&mut flags, FLAG_AMBIGUOUS_IM_DEAD);
            } else {
                push_unique(&mut flags, FLAG_WATCH_IM_DEAD);
            }
        }

        // Precursor vocabulary trend, distinct from explicit pattern matches.
        let mut precursors: Vec<String> = Vec::new();
        let mut hits = 0usize;
        for t in tokens {
            if self.precursor_set.contains(t.as_str()) {
                hits += 1;
                push_unique(&mut precursors, t);
            }
        }
        let denom = self
            .section
            .precursor_floor
            .max(tokens.len() as f32 / self.section.precursor_divisor);
        let precursor_score = if hits == 0 {
            0.0
        } else {
            (hits as f32 / denom).min(1.0)
        };
        if precursor_score > self.section.trend_threshold
            && (label == Label::Negative || comparative < -0.8)
        {
            push_unique(&mut flags, FLAG_RISK_TREND);
        }

        let crisis = self_harm || harm_to_others || crisis_pattern;

        if crisis {
            // Audit trail for counselor-facing alerting. Hash + flags only,
            // never the text.
            warn!(
                target: "risk",
                id = %anon_hash(raw),
                self_harm,
                harm_to_others,
                flags = ?flags,
                "crisis language detected"
            );
        } else if dev_logging_enabled() && !flags.is_empty() {
            info!(
                target: "risk",
                id = %anon_hash(raw),
                flags = ?flags,
                %precursor_score,
                "soft risk flags"
            );
        }

        RiskSummary {
            self_harm,
            harm_to_others,
            crisis,
            flags,
            precursors,
            precursor_score,
        }
    }
}

fn push_unique(flags: &mut Vec<String>, flag: &str) {
    if !flags.iter().any(|f| f == flag) {
        flags.push(flag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    // Minimal, deterministic config used only for tests.
    const TEST_TOML: &str = r#"
[risk]
precursor_floor = 5.0
precursor_divisor = 5.0
trend_threshold = 0.4

[[patterns]]
id = "self-harm-direct"
kind = "self-harm"
pattern = "(?i)\\bhurt\\s+myself\\b"

[[patterns]]
id = "harm-others-direct"
kind = "harm-to-others"
pattern = "(?i)\\bhurt\\s+them\\b"

[[patterns]]
id = "crisis-no-way-out"
kind = "crisis"
pattern = "(?i)\\bno\\s+way\\s+out\\b"

[imdead]
pattern = "(?i)\\b(i'?m|i\\s+am)\\s+dead\\b"
humor_markers = ["lol", "😂"]

[precursors]
terms = ["hopeless", "numb", "empty"]
"#;

    fn eng() -> RiskEngine {
        RiskEngine::from_toml_str(TEST_TOML).expect("load test config")
    }

    fn detect(e: &RiskEngine, text: &str, label: Label, comparative: f32) -> RiskSummary {
        e.detect(text, &tokenize(text), label, comparative)
    }

    #[test]
    fn self_harm_sets_crisis() {
        let r = detect(&eng(), "I want to hurt myself", Label::Neutral, 0.0);
        assert!(r.self_harm);
        assert!(r.crisis);
        assert_eq!(r.flags, vec!["self-harm-direct"]);
    }

    #[test]
    fn crisis_kind_alone_sets_crisis() {
        let r = detect(&eng(), "There is NO WAY OUT.", Label::Neutral, 0.0);
        assert!(!r.self_harm);
        assert!(!r.harm_to_others);
        assert!(r.crisis);
    }

    #[test]
    fn imdead_splits_on_humor_marker() {
        let e = eng();
        let joking = detect(&e, "i'm dead lol", Label::Neutral, 0.0);
        assert_eq!(joking.flags, vec!["ambiguous-im-dead"]);
        assert!(!joking.crisis);

        let emoji = detect(&e, "im dead 😂", Label::Neutral, 0.0);
        assert_eq!(emoji.flags, vec!["ambiguous-im-dead"]);

        let flat = detect(&e, "I am dead inside.", Label::Neutral, 0.0);
        assert_eq!(flat.flags, vec!["watch-im-dead"]);
        assert!(!flat.crisis);
    }

    #[test]
    fn precursor_trend_requires_negative_reading() {
        let e = eng();
        let text = "hopeless numb empty hopeless numb";
        // Negative label: trend flag fires.
        let neg = detect(&e, text, Label::Negative, -1.2);
        assert!(neg.precursor_score > 0.4);
        assert!(neg.flags.iter().any(|f| f == "risk-trend"));
        assert_eq!(neg.precursors, vec!["hopeless", "numb", "empty"]);

        // Same precursors but neutral reading: no trend flag.
        let neu = detect(&e, text, Label::Neutral, 0.0);
        assert!(!neu.flags.iter().any(|f| f == "risk-trend"));
        assert!(neu.precursor_score > 0.4);
    }

    #[test]
    fn flags_dedup_first_seen_order() {
        let r = detect(
            &eng(),
            "hurt myself, then hurt myself again, no way out",
            Label::Neutral,
            0.0,
        );
        assert_eq!(r.flags, vec!["self-harm-direct", "crisis-no-way-out"]);
    }

    #[test]
    fn empty_input_yields_no_flags() {
        let r = detect(&eng(), "", Label::Neutral, 0.0);
        assert_eq!(r, RiskSummary::default());
    }

    #[test]
    fn builtin_config_compiles_and_covers_all_kinds() {
        let e = RiskEngine::builtin();
        assert!(e.pattern_count() >= 3);
        let r = detect(e, "I want to end it all", Label::Neutral, 0.0);
        assert!(r.self_harm && r.crisis);
    }
}
