//! Character class detection.

use crate::types::CharacterClasses;

/// Derives presence flags for the four character classes in one pass over
/// the raw string. Unicode letters count as upper/lower by case property;
/// digits are the ASCII range; anything else that is not whitespace counts
/// as special. Presence is binary, no minimum counts.
pub fn classify(raw: &str) -> CharacterClasses {
    let mut classes = CharacterClasses::default();
    for c in raw.chars() {
        if c.is_uppercase() {
            classes.upper = true;
        } else if c.is_lowercase() {
            classes.lower = true;
        } else if c.is_ascii_digit() {
            classes.digit = true;
        } else if !c.is_whitespace() {
            classes.special = true;
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_classes() {
        let c = classify("Password123!");
        assert!(c.upper && c.lower && c.digit && c.special);
        assert_eq!(c.count(), 4);
    }

    #[test]
    fn test_classify_single_class() {
        let c = classify("lowercase");
        assert!(c.lower);
        assert!(!c.upper && !c.digit && !c.special);
    }

    #[test]
    fn test_classify_whitespace_is_not_special() {
        let c = classify("ab cd");
        assert!(!c.special);
    }

    #[test]
    fn test_classify_unicode_case_properties() {
        let c = classify("Straße");
        assert!(c.upper && c.lower);
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(""), CharacterClasses::default());
    }
}
