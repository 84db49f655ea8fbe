//! Leetspeak normalization.

/// Canonicalizes the input for matching: lowercases, then applies a fixed
/// character-for-character leet substitution.
///
/// Ambiguous characters resolve to a single frozen choice so matching stays
/// deterministic: `1` is always `i` (never `l`), `6` always `g` (never `b`).
/// The mapping is total; unmapped characters pass through unchanged. The raw
/// string stays the source of truth for length, classes, and entropy.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(substitute)
        .collect()
}

fn substitute(c: char) -> char {
    match c {
        '0' => 'o',
        '1' => 'i',
        '2' => 'z',
        '3' => 'e',
        '4' => 'a',
        '5' => 's',
        '6' => 'g',
        '7' => 't',
        '8' => 'b',
        '$' => 's',
        '@' => 'a',
        '!' => 'i',
        '+' => 't',
        '#' => 'h',
        other => other,
    }
}
