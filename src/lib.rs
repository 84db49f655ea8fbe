//! Password analysis engine
//!
//! Turns a raw credential string into a structured, explainable verdict:
//! an entropy estimate, character-class flags, dictionary and pattern
//! weaknesses, a 0-100 score with strength band, and prioritized
//! improvement guidance.
//!
//! # Features
//!
//! - `async` (default): Enables breach-oracle lookups with timeout and
//!   cancellation support
//! - `tracing`: Enables logging via tracing crate (never logs passwords)
//!
//! # Environment Variables
//!
//! - `PWD_WORDLISTS_DIR`: directory of per-language wordlists
//!   (default: `./assets/wordlists`)
//! - `PWD_COMMON_PASSWORDS_PATH`: common-password file
//!   (default: `./assets/common_passwords.txt`)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_analyzer::{Analyzer, AnalysisOptions, HibpResult, ReferenceData};
//! use secrecy::SecretString;
//!
//! // Load reference data once at startup; missing or empty data is fatal.
//! let reference = ReferenceData::load().expect("Failed to load reference data");
//! let analyzer = Analyzer::new(reference);
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let result = analyzer.analyze(
//!     &password,
//!     &AnalysisOptions::default(),
//!     HibpResult::default(),
//! );
//!
//! println!("Score: {}", result.score);
//! println!("Strength: {:?}", result.strength);
//! for tip in &result.suggestions {
//!     println!("- {tip}");
//! }
//! ```

// Internal modules
mod advice;
mod evaluator;
#[cfg(feature = "async")]
mod oracle;
mod reference;
mod signals;
mod types;

// Public API
pub use evaluator::Analyzer;
pub use reference::{DEFAULT_KEYBOARD_PATTERNS, Language, ReferenceData, ReferenceError};
pub use signals::{classify, normalize};
pub use types::{
    AnalysisOptions, AnalysisResult, CharacterClasses, DetectedPattern, DictionaryMatch,
    HibpResult, MatchKind, PatternKind, Priority, Recommendation, Severity, Strength,
};

#[cfg(feature = "async")]
pub use oracle::{BreachOracle, DEFAULT_ORACLE_TIMEOUT, DisabledOracle, OracleError};
