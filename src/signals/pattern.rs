//! Structural pattern detection.
//!
//! Four independent scans over the lowercased input. Scans never
//! short-circuit each other and overlapping findings are all reported;
//! multiplicity is itself evidence of weakness.

use super::normalize;
use crate::reference::ReferenceData;
use crate::types::{DetectedPattern, PatternKind, Severity};

/// Keyboard matches covering at least this share of the input are High.
const KEYBOARD_HIGH_COVERAGE: f64 = 0.40;
/// Minimum run length reported by the sequential and repeated scans.
const MIN_RUN: usize = 3;
/// Sequential runs at least this long are High.
const SEQUENTIAL_HIGH_RUN: usize = 5;
/// Shortest base word the common-base scan will accept.
const MIN_BASE_LEN: usize = 3;
/// Decoration characters stripped from either end by the common-base scan.
const BASE_DECOR_TOKENS: &[char] = &['!', '?', '.', '@', '#', '$', '*', '_', '-'];

/// Runs all four pattern scans over the lowercased input.
pub fn detect_patterns(lower: &str, reference: &ReferenceData) -> Vec<DetectedPattern> {
    let chars: Vec<char> = lower.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut patterns = Vec::new();
    scan_keyboard(lower, chars.len(), reference, &mut patterns);
    scan_sequential(&chars, &mut patterns);
    scan_repeated(&chars, &mut patterns);
    scan_common_base(&chars, reference, &mut patterns);
    patterns
}

fn scan_keyboard(
    lower: &str,
    input_len: usize,
    reference: &ReferenceData,
    out: &mut Vec<DetectedPattern>,
) {
    for sequence in reference.keyboard_patterns() {
        if lower.contains(sequence.as_str()) {
            let coverage = sequence.chars().count() as f64 / input_len as f64;
            let severity = if coverage >= KEYBOARD_HIGH_COVERAGE {
                Severity::High
            } else {
                Severity::Medium
            };
            out.push(DetectedPattern {
                kind: PatternKind::KeyboardPattern {
                    sequence: sequence.clone(),
                },
                severity,
            });
        }
    }
}

fn scan_sequential(chars: &[char], out: &mut Vec<DetectedPattern>) {
    let mut start = 0;
    while start + MIN_RUN <= chars.len() {
        let step = chars[start + 1] as i64 - chars[start] as i64;
        if step != 1 && step != -1 {
            start += 1;
            continue;
        }
        // Extend the maximal run with this step.
        let mut end = start + 1;
        while end + 1 < chars.len() && chars[end + 1] as i64 - chars[end] as i64 == step {
            end += 1;
        }
        let run_len = end - start + 1;
        if run_len >= MIN_RUN {
            let severity = if run_len >= SEQUENTIAL_HIGH_RUN {
                Severity::High
            } else {
                Severity::Medium
            };
            out.push(DetectedPattern {
                kind: PatternKind::SequentialChars {
                    run: chars[start..=end].iter().collect(),
                },
                severity,
            });
            start = end; // a new run may begin at the last char
        } else {
            start += 1;
        }
    }
}

fn scan_repeated(chars: &[char], out: &mut Vec<DetectedPattern>) {
    for (start, run_len) in repeated_runs(chars) {
        let severity = match run_len {
            0..=3 => Severity::Low,
            4..=5 => Severity::Medium,
            _ => Severity::High,
        };
        out.push(DetectedPattern {
            kind: PatternKind::RepeatedChars {
                run: chars[start..start + run_len].iter().collect(),
            },
            severity,
        });
    }
}

/// Maximal same-character runs of length >= 3 as `(start, len)` pairs.
/// Shared with the entropy estimator.
pub(crate) fn repeated_runs(chars: &[char]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        if i == chars.len() || chars[i] != chars[start] {
            if i - start >= MIN_RUN {
                runs.push((start, i - start));
            }
            start = i;
        }
    }
    runs
}

fn scan_common_base(
    chars: &[char],
    reference: &ReferenceData,
    out: &mut Vec<DetectedPattern>,
) {
    let mut lo = 0;
    let mut hi = chars.len();
    while lo < hi && (chars[lo].is_ascii_digit() || BASE_DECOR_TOKENS.contains(&chars[lo])) {
        lo += 1;
    }
    while hi > lo && (chars[hi - 1].is_ascii_digit() || BASE_DECOR_TOKENS.contains(&chars[hi - 1]))
    {
        hi -= 1;
    }
    // Nothing stripped means no decoration to flag.
    if lo == 0 && hi == chars.len() {
        return;
    }
    if hi - lo < MIN_BASE_LEN {
        return;
    }

    let stripped: String = chars[lo..hi].iter().collect();
    let base_word = if reference.is_known_base(&stripped) {
        Some(stripped)
    } else {
        // The base itself may be leet-obscured, e.g. "p4ssw0rd123".
        let deobfuscated = normalize(&stripped);
        reference.is_known_base(&deobfuscated).then_some(deobfuscated)
    };

    if let Some(base_word) = base_word {
        out.push(DetectedPattern {
            kind: PatternKind::CommonBase { base_word },
            severity: Severity::High,
        });
    }
}
