//! Improvement guidance.
//!
//! Every fired weakness maps to exactly one suggestion template and one
//! recommendation template, so guidance is deterministic and reproducible
//! for identical input. Breach and common-password findings always surface
//! at critical/high priority regardless of the numeric score.

use crate::types::{
    CharacterClasses, DetectedPattern, DictionaryMatch, HibpResult, Priority, Recommendation,
};

/// Length below which a length suggestion fires.
const SUGGESTED_MIN_LENGTH: usize = 12;

pub(crate) fn suggestions(
    length: usize,
    classes: &CharacterClasses,
    matches: &[DictionaryMatch],
    patterns: &[DetectedPattern],
    is_common: bool,
    hibp: &HibpResult,
) -> Vec<String> {
    let mut out = Vec::new();

    if length < SUGGESTED_MIN_LENGTH {
        out.push("Use at least 12 characters for better security".to_string());
    }
    if !classes.upper {
        out.push("Include uppercase letters".to_string());
    }
    if !classes.lower {
        out.push("Include lowercase letters".to_string());
    }
    if !classes.digit {
        out.push("Include numbers".to_string());
    }
    if !classes.special {
        out.push("Include special characters (!@#$%^&*)".to_string());
    }
    if !matches.is_empty() {
        out.push("Avoid dictionary words from any language".to_string());
    }
    for name in fired_pattern_kinds(patterns) {
        out.push(pattern_tip(name).to_string());
    }
    if is_common {
        out.push("This is a very common password - choose something more unique".to_string());
    }
    if hibp.pwned {
        out.push(format!(
            "This password has been exposed in {} data breaches - DO NOT USE!",
            hibp.count
        ));
    }

    if out.is_empty() {
        out.push(
            "Great password! Consider using a password manager for all your accounts".to_string(),
        );
    }
    out
}

pub(crate) fn recommendations(
    length: usize,
    classes: &CharacterClasses,
    matches: &[DictionaryMatch],
    patterns: &[DetectedPattern],
    is_common: bool,
    hibp: &HibpResult,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if hibp.pwned {
        out.push(Recommendation {
            priority: Priority::Critical,
            title: "Password found in data breaches",
            description: format!(
                "This exact password appears in {} known credential leaks; attackers try leaked passwords first.",
                hibp.count
            ),
            action: "Stop using this password and change it everywhere immediately",
        });
    }
    if is_common {
        out.push(Recommendation {
            priority: Priority::High,
            title: "Extremely common password",
            description: "This password is on lists of the most frequently used passwords."
                .to_string(),
            action: "Pick something unique that does not appear on any common-password list",
        });
    }
    if !matches.is_empty() {
        let mut languages: Vec<&str> = Vec::new();
        for m in matches {
            if !languages.contains(&m.language.as_str()) {
                languages.push(m.language.as_str());
            }
        }
        out.push(Recommendation {
            priority: Priority::High,
            title: "Dictionary words detected",
            description: format!(
                "Found {} dictionary match(es) across: {}.",
                matches.len(),
                languages.join(", ")
            ),
            action: "Avoid real words; use unrelated random words or a generated password",
        });
    }
    for name in fired_pattern_kinds(patterns) {
        let (title, action) = pattern_advice(name);
        out.push(Recommendation {
            priority: Priority::Medium,
            title,
            description: "Predictable structure drastically shrinks the search space for attackers."
                .to_string(),
            action,
        });
    }
    for (present, title, action) in [
        (classes.upper, "No uppercase letters", "Mix in uppercase letters"),
        (classes.lower, "No lowercase letters", "Mix in lowercase letters"),
        (classes.digit, "No digits", "Mix in digits"),
        (
            classes.special,
            "No special characters",
            "Mix in special characters such as !@#$%^&*",
        ),
    ] {
        if !present {
            out.push(Recommendation {
                priority: Priority::Medium,
                title,
                description: "Each missing character class shrinks the effective alphabet."
                    .to_string(),
                action,
            });
        }
    }
    if length < SUGGESTED_MIN_LENGTH {
        out.push(Recommendation {
            priority: Priority::Medium,
            title: "Short password",
            description: format!(
                "{length} characters is below the recommended minimum of {SUGGESTED_MIN_LENGTH}."
            ),
            action: "Lengthen the password; every added character multiplies the search space",
        });
    }

    // Stable: equal priorities keep the emission order above.
    out.sort_by_key(|r| r.priority);
    out
}

/// Distinct pattern kinds in first-occurrence order.
fn fired_pattern_kinds(patterns: &[DetectedPattern]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for p in patterns {
        let name = p.kind.name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn pattern_tip(name: &str) -> &'static str {
    match name {
        "keyboard_pattern" => "Avoid keyboard patterns (qwerty, asdf, etc.)",
        "sequential_chars" => "Avoid sequential characters (abcd, 1234, etc.)",
        "repeated_chars" => "Avoid repeated characters (aaa, 111, etc.)",
        _ => "Avoid common words with digits or symbols tacked on",
    }
}

fn pattern_advice(name: &str) -> (&'static str, &'static str) {
    match name {
        "keyboard_pattern" => (
            "Keyboard pattern detected",
            "Remove key-adjacency sequences like qwerty or asdf",
        ),
        "sequential_chars" => (
            "Sequential characters detected",
            "Break up ascending or descending runs like 1234 or dcba",
        ),
        "repeated_chars" => (
            "Repeated characters detected",
            "Replace repeated runs with varied characters",
        ),
        _ => (
            "Common word with trivial additions",
            "Do not just append digits or symbols to a common word",
        ),
    }
}
