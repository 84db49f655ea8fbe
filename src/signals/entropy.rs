//! Entropy estimation.

use super::repeated_runs;
use crate::types::{CharacterClasses, DictionaryMatch, MatchKind};

/// Fixed size assumed for the printable special-character alphabet.
const SPECIAL_ALPHABET: usize = 32;
/// Fraction of a repeated run's contribution removed from the estimate.
const REPEAT_PENALTY: f64 = 0.7;
/// Fraction of an exact dictionary match's contribution removed.
const DICT_PENALTY: f64 = 0.5;

/// Effective alphabet size given the classes actually present (94 max).
fn alphabet_size(classes: &CharacterClasses) -> usize {
    let mut size = 0;
    if classes.lower {
        size += 26;
    }
    if classes.upper {
        size += 26;
    }
    if classes.digit {
        size += 10;
    }
    if classes.special {
        size += SPECIAL_ALPHABET;
    }
    size
}

/// Shannon-style entropy estimate in bits.
///
/// Base entropy is `length x log2(alphabet)` over the raw string. Each
/// repeated-character run (length >= 3) and each exact dictionary match then
/// subtracts a fixed fraction of its own contribution, so `aaaaaaaa` and
/// `password1` are not credited as if every character were independent.
/// The result is floored at zero and deliberately has no upper cap; the
/// aggregator clamps the score, not the entropy.
pub fn estimate(raw: &str, classes: &CharacterClasses, matches: &[DictionaryMatch]) -> f64 {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 1 {
        return 0.0;
    }
    let alphabet = alphabet_size(classes);
    if alphabet == 0 {
        return 0.0;
    }

    let bits_per_char = (alphabet as f64).log2();
    let mut entropy = chars.len() as f64 * bits_per_char;

    for (_, run_len) in repeated_runs(&chars) {
        entropy -= REPEAT_PENALTY * run_len as f64 * bits_per_char;
    }
    for m in matches {
        if m.kind == MatchKind::Exact {
            entropy -= DICT_PENALTY * m.matched_word.chars().count() as f64 * bits_per_char;
        }
    }

    entropy.max(0.0)
}
