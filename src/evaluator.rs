//! Analysis orchestration and score aggregation.

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::advice;
use crate::reference::ReferenceData;
use crate::signals::{classify, detect_patterns, estimate, find_matches, normalize};
use crate::types::{
    AnalysisOptions, AnalysisResult, CharacterClasses, DetectedPattern, DictionaryMatch,
    HibpResult, MatchKind, Severity, Strength,
};

#[cfg(feature = "async")]
use crate::oracle::{self, BreachOracle, DEFAULT_ORACLE_TIMEOUT};

/// Entropy-to-score calibration: one point per bit puts a fully mixed
/// 12-character password (~78.7 bits) in the upper STRONG band.
const SCORE_PER_BIT: f64 = 1.0;
/// Flat penalty per absent character class.
const MISSING_CLASS_PENALTY: f64 = 5.0;
/// Dictionary-match penalties, scaled by how much of the input is covered.
const EXACT_MATCH_PENALTY: f64 = 20.0;
const FUZZY_MATCH_PENALTY: f64 = 10.0;
/// Flat penalty for common-password membership, plus a hard cap below STRONG.
const COMMON_PENALTY: f64 = 30.0;
const COMMON_CEILING: f64 = 59.0;
/// Breached passwords are capped well inside WEAK no matter what.
const BREACH_BASE_PENALTY: f64 = 25.0;
const BREACH_COUNT_PENALTY_CAP: f64 = 20.0;
const BREACH_CEILING: f64 = 35.0;

/// The password analysis engine.
///
/// Holds only immutable reference data, so one instance can serve any number
/// of concurrent requests. No password or intermediate result outlives the
/// call that produced it.
#[derive(Debug, Clone)]
pub struct Analyzer {
    reference: ReferenceData,
}

impl Analyzer {
    pub fn new(reference: ReferenceData) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Analyzes a password against already-resolved breach evidence.
    ///
    /// Pure and synchronous: identical input and evidence produce a
    /// bit-identical result. Callers without breach evidence pass
    /// `HibpResult::default()` (or disable the check in `options`).
    pub fn analyze(
        &self,
        password: &SecretString,
        options: &AnalysisOptions,
        hibp: HibpResult,
    ) -> AnalysisResult {
        let pwd = password.expose_secret();
        if pwd.is_empty() {
            return empty_result();
        }

        let length = pwd.chars().count();
        let classes = classify(pwd);
        let raw_lower = pwd.to_lowercase();
        let normalized = normalize(pwd);

        let dictionary_matches = find_matches(&raw_lower, &normalized, &self.reference);
        let patterns_detected = if options.analyze_patterns {
            detect_patterns(&raw_lower, &self.reference)
        } else {
            Vec::new()
        };
        let entropy = round2(estimate(pwd, &classes, &dictionary_matches));
        let is_common_password = self.reference.is_common(pwd);
        let hibp_check = if options.check_hibp {
            hibp
        } else {
            HibpResult::default()
        };

        let score = aggregate_score(
            length,
            entropy,
            &classes,
            &dictionary_matches,
            &patterns_detected,
            is_common_password,
            &hibp_check,
        );
        let strength = Strength::from_score(score);

        let suggestions = advice::suggestions(
            length,
            &classes,
            &dictionary_matches,
            &patterns_detected,
            is_common_password,
            &hibp_check,
        );
        let recommendations = advice::recommendations(
            length,
            &classes,
            &dictionary_matches,
            &patterns_detected,
            is_common_password,
            &hibp_check,
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(
            length,
            score,
            matches = dictionary_matches.len(),
            patterns = patterns_detected.len(),
            "analysis complete"
        );

        AnalysisResult {
            length,
            character_classes: classes,
            entropy,
            dictionary_matches,
            patterns_detected,
            is_common_password,
            hibp_check,
            score,
            strength,
            crack_time_estimate: strength.crack_time_label(),
            suggestions,
            recommendations,
        }
    }

    /// Analyzes a password, resolving breach evidence through `oracle` first.
    ///
    /// The lookup runs under [`DEFAULT_ORACLE_TIMEOUT`]; timeout, error, or a
    /// cancelled `token` all degrade to clean evidence and the evaluation
    /// proceeds regardless.
    #[cfg(feature = "async")]
    pub async fn analyze_with_oracle<O: BreachOracle>(
        &self,
        password: &SecretString,
        options: &AnalysisOptions,
        oracle: &O,
        token: Option<CancellationToken>,
    ) -> AnalysisResult {
        let hibp = if options.check_hibp && !password.expose_secret().is_empty() {
            match &token {
                Some(t) if t.is_cancelled() => HibpResult::default(),
                Some(t) => {
                    tokio::select! {
                        _ = t.cancelled() => HibpResult::default(),
                        result = oracle::resolve(oracle, password.expose_secret(), DEFAULT_ORACLE_TIMEOUT) => result,
                    }
                }
                None => {
                    oracle::resolve(oracle, password.expose_secret(), DEFAULT_ORACLE_TIMEOUT).await
                }
            }
        } else {
            HibpResult::default()
        };

        self.analyze(password, options, hibp)
    }

    /// Async variant that delivers the result via channel.
    #[cfg(feature = "async")]
    pub async fn analyze_with_oracle_tx<O: BreachOracle>(
        &self,
        password: &SecretString,
        options: &AnalysisOptions,
        oracle: &O,
        token: CancellationToken,
        tx: mpsc::Sender<AnalysisResult>,
    ) {
        let result = self
            .analyze_with_oracle(password, options, oracle, Some(token))
            .await;

        if let Err(_e) = tx.send(result).await {
            #[cfg(feature = "tracing")]
            tracing::error!("failed to send analysis result: {}", _e);
        }
    }
}

/// The fixed-order scoring pipeline. Later steps clamp earlier ones, so the
/// order is part of the contract: baseline, additive penalties, common-
/// password cap, breach cap, final clamp.
fn aggregate_score(
    length: usize,
    entropy: f64,
    classes: &CharacterClasses,
    matches: &[DictionaryMatch],
    patterns: &[DetectedPattern],
    is_common: bool,
    hibp: &HibpResult,
) -> u8 {
    let mut score = (entropy * SCORE_PER_BIT).min(100.0);

    score -= MISSING_CLASS_PENALTY * classes.missing() as f64;

    for m in matches {
        let coverage = (m.matched_word.chars().count() as f64 / length as f64).min(1.0);
        let weight = match m.kind {
            MatchKind::Exact => EXACT_MATCH_PENALTY,
            MatchKind::Fuzzy => FUZZY_MATCH_PENALTY,
        };
        score -= weight * coverage;
    }

    for p in patterns {
        score -= match p.severity {
            Severity::High => 20.0,
            Severity::Medium => 10.0,
            Severity::Low => 5.0,
        };
    }

    if is_common {
        score -= COMMON_PENALTY;
        score = score.min(COMMON_CEILING);
    }

    if hibp.pwned {
        score -= BREACH_BASE_PENALTY
            + (hibp.count as f64 / 1000.0).min(BREACH_COUNT_PENALTY_CAP);
        score = score.min(BREACH_CEILING);
    }

    score.clamp(0.0, 100.0).round() as u8
}

/// The explicit zero verdict for empty input: flagged through its suggestion
/// rather than scored, so a misleading number is never produced.
fn empty_result() -> AnalysisResult {
    AnalysisResult {
        length: 0,
        character_classes: CharacterClasses::default(),
        entropy: 0.0,
        dictionary_matches: Vec::new(),
        patterns_detected: Vec::new(),
        is_common_password: false,
        hibp_check: HibpResult::default(),
        score: 0,
        strength: Strength::VeryWeak,
        crack_time_estimate: Strength::VeryWeak.crack_time_label(),
        suggestions: vec!["Please enter a password to analyze".to_string()],
        recommendations: Vec::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
