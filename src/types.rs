//! Domain types for password analysis verdicts.
//!
//! Everything here is plain data: the engine produces these, downstream
//! consumers (HTTP layer, prose generation) serialize them. None of these
//! types carries the raw password.

use serde::{Deserialize, Serialize};

/// Request flags controlling which optional stages run.
///
/// The password itself travels separately as a `SecretString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Run the pattern detector (keyboard, sequential, repeated, common base).
    pub analyze_patterns: bool,
    /// Consult the breach oracle for pwned status.
    pub check_hibp: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            analyze_patterns: true,
            check_hibp: true,
        }
    }
}

/// Presence flags for the four character classes, derived from the raw string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClasses {
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub special: bool,
}

impl CharacterClasses {
    /// Number of classes present (0..=4).
    pub fn count(&self) -> usize {
        [self.upper, self.lower, self.digit, self.special]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    /// Number of classes absent (0..=4).
    pub fn missing(&self) -> usize {
        4 - self.count()
    }
}

/// How a dictionary word was found in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// A dictionary word found inside the input, exactly or approximately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryMatch {
    /// Language code of the wordlist that matched (e.g. `english`).
    pub language: String,
    /// The reference word that matched.
    pub matched_word: String,
    /// The substring of the input (raw-lowercased) that triggered the match.
    pub matched_variant: String,
    #[serde(rename = "match_type")]
    pub kind: MatchKind,
    /// Present only for fuzzy matches; `1.0 - distance / word_len`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    /// 0-based character offset into the input.
    pub position: usize,
}

/// Severity of a detected structural weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// The structural weakness classes the pattern detector reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternKind {
    /// A known keyboard-adjacency sequence appears in the input.
    KeyboardPattern { sequence: String },
    /// A run of codepoints stepping by exactly +1 or -1.
    SequentialChars { run: String },
    /// A run of one character repeated 3+ times.
    RepeatedChars { run: String },
    /// Stripping trivial prefixes/suffixes leaves a common/dictionary word.
    CommonBase { base_word: String },
}

impl PatternKind {
    /// Stable discriminant used for one-template-per-kind advice generation.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::KeyboardPattern { .. } => "keyboard_pattern",
            PatternKind::SequentialChars { .. } => "sequential_chars",
            PatternKind::RepeatedChars { .. } => "repeated_chars",
            PatternKind::CommonBase { .. } => "common_base",
        }
    }
}

/// One weakness found by the pattern detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedPattern {
    #[serde(flatten)]
    pub kind: PatternKind,
    pub severity: Severity,
}

/// Breach-oracle evidence for the raw password.
///
/// `Default` is the degraded "unknown, assume clean" value used when the
/// oracle is disabled, unavailable, or times out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HibpResult {
    pub pwned: bool,
    pub count: u64,
}

/// Recommendation priority, highest first so ascending sort orders output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// A structured, prioritized improvement recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: &'static str,
    pub description: String,
    pub action: &'static str,
}

/// Strength bands over the final 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl Strength {
    /// Maps a clamped score onto its band. Bands are closed-open except the
    /// top: [0,20) [20,40) [40,60) [60,80) [80,100].
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => Strength::VeryWeak,
            20..=39 => Strength::Weak,
            40..=59 => Strength::Fair,
            60..=79 => Strength::Strong,
            _ => Strength::VeryStrong,
        }
    }

    /// Coarse crack-time label, presentation sugar over the same band.
    pub fn crack_time_label(&self) -> &'static str {
        match self {
            Strength::VeryWeak => "Instantly",
            Strength::Weak => "Minutes",
            Strength::Fair => "Hours",
            Strength::Strong => "Days",
            Strength::VeryStrong => "Years",
        }
    }
}

/// The terminal aggregate verdict for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Character count of the raw input.
    pub length: usize,
    pub character_classes: CharacterClasses,
    /// Adjusted entropy estimate in bits, non-negative, uncapped.
    pub entropy: f64,
    pub dictionary_matches: Vec<DictionaryMatch>,
    pub patterns_detected: Vec<DetectedPattern>,
    pub is_common_password: bool,
    pub hibp_check: HibpResult,
    pub score: u8,
    pub strength: Strength,
    pub crack_time_estimate: &'static str,
    pub suggestions: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}
