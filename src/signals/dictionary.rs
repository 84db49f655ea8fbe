//! Multilingual dictionary matching, exact and fuzzy.
//!
//! Reference sets can hold tens of thousands of words, so the exact scan
//! enumerates input substrings (bounded by password length, not dictionary
//! size) and the fuzzy scan uses a budget-bounded Levenshtein with a
//! row-minimum early exit instead of full O(n*m) distance per candidate.

use std::collections::HashSet;

use crate::reference::ReferenceData;
use crate::types::{DictionaryMatch, MatchKind};

/// Shortest reference word considered; avoids matching incidental short words.
const MIN_WORD_LEN: usize = 4;

/// Finds dictionary words inside the input, per language.
///
/// `raw_lower` is the lowercased input as typed; `normalized` is its
/// leet-deobfuscated form. Three scans feed the result:
/// - exact: a word appears verbatim in `raw_lower`;
/// - leet-revealed: a word appears only after deobfuscation, reported as
///   fuzzy with similarity measured against the raw span;
/// - fuzzy: a word within a small edit-distance budget of some substring.
///
/// One match is emitted per (language, word), at its lowest position, with
/// exact taking precedence. Matches in different languages are never
/// deduplicated.
/// Output is ordered by position, exact before fuzzy at equal position,
/// then language priority.
pub fn find_matches(
    raw_lower: &str,
    normalized: &str,
    reference: &ReferenceData,
) -> Vec<DictionaryMatch> {
    let raw_chars: Vec<char> = raw_lower.chars().collect();
    let norm_chars: Vec<char> = normalized.chars().collect();
    if raw_chars.len() < MIN_WORD_LEN {
        return Vec::new();
    }

    // Carry the language index so the final sort can apply priority order.
    let mut found: Vec<(usize, DictionaryMatch)> = Vec::new();
    let mut matched_words: Vec<HashSet<String>> =
        vec![HashSet::new(); reference.languages().len()];

    scan_exact(&raw_chars, reference, &mut found, &mut matched_words);
    scan_leet_revealed(&raw_chars, &norm_chars, reference, &mut found, &mut matched_words);
    scan_fuzzy(&raw_chars, &norm_chars, reference, &mut found, &matched_words);

    found.sort_by(|(la, ma), (lb, mb)| {
        ma.position
            .cmp(&mb.position)
            .then_with(|| kind_rank(ma.kind).cmp(&kind_rank(mb.kind)))
            .then_with(|| la.cmp(lb))
            .then_with(|| ma.matched_word.cmp(&mb.matched_word))
    });
    found.into_iter().map(|(_, m)| m).collect()
}

fn kind_rank(kind: MatchKind) -> u8 {
    match kind {
        MatchKind::Exact => 0,
        MatchKind::Fuzzy => 1,
    }
}

/// Every substring of length >= MIN_WORD_LEN that is a reference word, in
/// every language. Set lookups keep this independent of dictionary size.
/// One record per (language, word), at its first occurrence; repeats of the
/// same word carry no extra evidence and would compound the penalties.
fn scan_exact(
    raw_chars: &[char],
    reference: &ReferenceData,
    found: &mut Vec<(usize, DictionaryMatch)>,
    matched_words: &mut [HashSet<String>],
) {
    let n = raw_chars.len();
    for start in 0..n {
        for end in (start + MIN_WORD_LEN)..=n {
            let candidate: String = raw_chars[start..end].iter().collect();
            for (li, lang) in reference.languages().iter().enumerate() {
                if lang.contains(&candidate) && !matched_words[li].contains(&candidate) {
                    matched_words[li].insert(candidate.clone());
                    found.push((
                        li,
                        DictionaryMatch {
                            language: lang.code().to_string(),
                            matched_word: candidate.clone(),
                            matched_variant: candidate.clone(),
                            kind: MatchKind::Exact,
                            similarity: None,
                            position: start,
                        },
                    ));
                }
            }
        }
    }
}

/// Words visible only after leet deobfuscation. Reported as fuzzy, with
/// similarity measured between the word and the raw span that hid it.
fn scan_leet_revealed(
    raw_chars: &[char],
    norm_chars: &[char],
    reference: &ReferenceData,
    found: &mut Vec<(usize, DictionaryMatch)>,
    matched_words: &mut [HashSet<String>],
) {
    if norm_chars == raw_chars {
        return;
    }
    // Substitution is char-for-char, so spans stay index-aligned unless a
    // rare case folding expanded the string; fall back to the normalized
    // span itself in that case.
    let aligned = norm_chars.len() == raw_chars.len();

    let n = norm_chars.len();
    for start in 0..n {
        for end in (start + MIN_WORD_LEN)..=n {
            let candidate: String = norm_chars[start..end].iter().collect();
            for (li, lang) in reference.languages().iter().enumerate() {
                if !lang.contains(&candidate) || matched_words[li].contains(&candidate) {
                    continue;
                }
                let raw_span: String = if aligned {
                    raw_chars[start..end].iter().collect()
                } else {
                    candidate.clone()
                };
                if raw_span == candidate {
                    // The span was untouched by substitution, so the exact
                    // scan has already seen it.
                    continue;
                }
                let word_len = end - start;
                let span_chars: Vec<char> = raw_span.chars().collect();
                let word_chars: Vec<char> = candidate.chars().collect();
                let distance =
                    bounded_levenshtein(&span_chars, &word_chars, word_len).unwrap_or(word_len);
                matched_words[li].insert(candidate.clone());
                found.push((
                    li,
                    DictionaryMatch {
                        language: lang.code().to_string(),
                        matched_word: candidate.clone(),
                        matched_variant: raw_span,
                        kind: MatchKind::Fuzzy,
                        similarity: Some(1.0 - distance as f64 / word_len as f64),
                        position: start,
                    },
                ));
            }
        }
    }
}

/// Near-miss matching: substrings within an edit-distance budget of a word.
/// The budget is `max(1, word_len / 5)`, i.e. roughly 20% of the word.
fn scan_fuzzy(
    raw_chars: &[char],
    norm_chars: &[char],
    reference: &ReferenceData,
    found: &mut Vec<(usize, DictionaryMatch)>,
    matched_words: &[HashSet<String>],
) {
    for (li, lang) in reference.languages().iter().enumerate() {
        for word in lang.words() {
            let word_chars: Vec<char> = word.chars().collect();
            let word_len = word_chars.len();
            if word_len < MIN_WORD_LEN || matched_words[li].contains(word) {
                continue;
            }
            let budget = (word_len / 5).max(1);

            let hit = best_fuzzy_hit(raw_chars, &word_chars, budget)
                .or_else(|| best_fuzzy_hit(norm_chars, &word_chars, budget));
            if let Some((position, distance, span)) = hit {
                found.push((
                    li,
                    DictionaryMatch {
                        language: lang.code().to_string(),
                        matched_word: word.clone(),
                        matched_variant: span,
                        kind: MatchKind::Fuzzy,
                        similarity: Some(1.0 - distance as f64 / word_len as f64),
                        position,
                    },
                ));
            }
        }
    }
}

/// The lowest-position substring within `budget` edits of `word`, preferring
/// the smallest distance among candidate lengths at that position. Distance
/// zero is an exact hit and is left to the exact scan.
fn best_fuzzy_hit(
    chars: &[char],
    word_chars: &[char],
    budget: usize,
) -> Option<(usize, usize, String)> {
    let n = chars.len();
    let word_len = word_chars.len();
    let min_len = word_len.saturating_sub(budget).max(MIN_WORD_LEN);
    let max_len = word_len + budget;
    if min_len > n {
        return None;
    }

    for start in 0..n {
        let mut best: Option<(usize, usize)> = None; // (distance, sub_len)
        for sub_len in min_len..=max_len.min(n - start) {
            let span = &chars[start..start + sub_len];
            if let Some(d) = bounded_levenshtein(span, word_chars, budget) {
                if d >= 1 && best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, sub_len));
                }
            }
        }
        if let Some((distance, sub_len)) = best {
            let span: String = chars[start..start + sub_len].iter().collect();
            return Some((start, distance, span));
        }
    }
    None
}

/// Levenshtein distance, abandoned as soon as every cell of the current row
/// exceeds `budget`. Returns `None` when the distance is above the budget.
fn bounded_levenshtein(a: &[char], b: &[char], budget: usize) -> Option<usize> {
    if a.len().abs_diff(b.len()) > budget {
        return None;
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > budget {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= budget).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Language, ReferenceData, test_reference};
    use crate::signals::normalize;

    fn matches_for(pwd: &str) -> Vec<DictionaryMatch> {
        let lower = pwd.to_lowercase();
        let normalized = normalize(pwd);
        find_matches(&lower, &normalized, &test_reference())
    }

    #[test]
    fn test_exact_match_at_position_zero() {
        let matches = matches_for("password123");
        let exact = matches
            .iter()
            .find(|m| m.kind == MatchKind::Exact)
            .expect("exact match present");
        assert_eq!(exact.matched_word, "password");
        assert_eq!(exact.language, "english");
        assert_eq!(exact.position, 0);
        assert!(exact.similarity.is_none());
    }

    #[test]
    fn test_exact_match_reported_once_per_word() {
        // The word repeats, but repetition is not extra dictionary evidence:
        // one record, at the first occurrence.
        let matches = matches_for("passwordpassword");
        let exact: Vec<_> = matches
            .iter()
            .filter(|m| {
                m.matched_word == "password"
                    && m.language == "english"
                    && m.kind == MatchKind::Exact
            })
            .collect();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].position, 0);
    }

    #[test]
    fn test_position_is_a_character_offset() {
        // Multibyte prefix: "ñ" is one char but two bytes.
        let matches = matches_for("ñ-password");
        let exact = matches
            .iter()
            .find(|m| m.matched_word == "password" && m.kind == MatchKind::Exact)
            .expect("password found");
        assert_eq!(exact.position, 2);
    }

    #[test]
    fn test_exact_match_mid_string() {
        let matches = matches_for("xx1welcome");
        let exact = matches
            .iter()
            .find(|m| m.matched_word == "welcome" && m.kind == MatchKind::Exact)
            .expect("welcome found");
        assert_eq!(exact.position, 3);
    }

    #[test]
    fn test_leet_match_is_fuzzy_with_similarity() {
        let matches = matches_for("p4ssw0rd");
        let fuzzy = matches
            .iter()
            .find(|m| m.matched_word == "password")
            .expect("leet-obscured word found");
        assert_eq!(fuzzy.kind, MatchKind::Fuzzy);
        assert_eq!(fuzzy.matched_variant, "p4ssw0rd");
        assert_eq!(fuzzy.position, 0);
        // Two substituted characters out of eight.
        let similarity = fuzzy.similarity.expect("fuzzy carries similarity");
        assert!((similarity - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_exact_hit_suppresses_fuzzy_duplicate() {
        // "welcome2024": "welcome" matches exactly; no extra fuzzy entry
        // for the same word from the trailing-digit neighborhood.
        let matches = matches_for("welcome2024");
        let welcome: Vec<_> = matches
            .iter()
            .filter(|m| m.matched_word == "welcome" && m.language == "english")
            .collect();
        assert_eq!(welcome.len(), 1);
        assert_eq!(welcome[0].kind, MatchKind::Exact);
    }

    #[test]
    fn test_genuine_fuzzy_within_budget() {
        // One deletion from "password"; budget for an 8-char word is 1.
        let matches = matches_for("passwrd99");
        let fuzzy = matches
            .iter()
            .find(|m| m.matched_word == "password")
            .expect("near-miss found");
        assert_eq!(fuzzy.kind, MatchKind::Fuzzy);
        let similarity = fuzzy.similarity.unwrap();
        assert!((similarity - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_beyond_budget_is_rejected() {
        // Three edits away from "password" with a budget of one.
        let matches = matches_for("pXsswXXd9");
        assert!(matches.iter().all(|m| m.matched_word != "password"));
    }

    #[test]
    fn test_multi_language_hits() {
        let swahili = matches_for("jambo2024");
        assert!(
            swahili
                .iter()
                .any(|m| m.language == "swahili" && m.matched_word == "jambo")
        );

        let spanish = matches_for("hola123x");
        assert!(
            spanish
                .iter()
                .any(|m| m.language == "spanish" && m.matched_word == "hola")
        );
    }

    #[test]
    fn test_cross_language_matches_not_deduplicated() {
        let english: std::collections::HashSet<String> =
            ["amigo".to_string(), "password".to_string()].into_iter().collect();
        let spanish: std::collections::HashSet<String> =
            ["amigo".to_string()].into_iter().collect();
        let common: std::collections::HashSet<String> =
            ["123456".to_string()].into_iter().collect();
        let reference = ReferenceData::from_parts(
            vec![
                Language::new("spanish", spanish),
                Language::new("english", english),
            ],
            common,
            Vec::new(),
        )
        .unwrap();

        let matches = find_matches("amigo77", &normalize("amigo77"), &reference);
        let amigo: Vec<_> = matches.iter().filter(|m| m.matched_word == "amigo").collect();
        assert_eq!(amigo.len(), 2);
        // Same position and kind: English outranks the other language.
        assert_eq!(amigo[0].language, "english");
        assert_eq!(amigo[1].language, "spanish");
    }

    #[test]
    fn test_ordering_by_position_then_kind() {
        // "hola" exact at 0, "amigo" exact at 4.
        let matches = matches_for("holaamigo");
        let positions: Vec<usize> = matches.iter().map(|m| m.position).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_short_and_empty_inputs() {
        assert!(matches_for("").is_empty());
        assert!(matches_for("abc").is_empty());
    }

    #[test]
    fn test_deterministic_across_calls() {
        let a = matches_for("p4ssword123welcome");
        let b = matches_for("p4ssword123welcome");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bounded_levenshtein() {
        let a: Vec<char> = "password".chars().collect();
        let b: Vec<char> = "passwrd".chars().collect();
        assert_eq!(bounded_levenshtein(&a, &b, 1), Some(1));
        assert_eq!(bounded_levenshtein(&a, &a, 0), Some(0));

        let c: Vec<char> = "dragonfly".chars().collect();
        assert_eq!(bounded_levenshtein(&a, &c, 2), None);
    }

    #[test]
    fn test_bounded_levenshtein_length_gap_short_circuits() {
        let a: Vec<char> = "ab".chars().collect();
        let b: Vec<char> = "abcdefgh".chars().collect();
        assert_eq!(bounded_levenshtein(&a, &b, 2), None);
    }
}
