//! Reference lookup key derivation.
//!
//! Standardized names often carry strength, dosage form, salt and brand, e.g.
//! `atorvastatin 80 MG Oral Tablet [Lipitor]`. The reference table is keyed on
//! the bare generic name.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum length of a stripped key before falling back to the first token.
pub const MIN_KEY_LEN: usize = 3;

static DOSAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?\s*(?:(?:mg|mcg|ml|meq|unt|g)\b|%)(?:\s*/\s*(?:ml|actuat|hr)\b)?")
        .expect("dosage pattern is valid")
});

static FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"\b(?:oral tablet|oral capsule|oral solution|oral suspension|chewable tablet",
            r"|extended release|delayed release|injectable solution|injection|topical cream",
            r"|cream|gel|transdermal system|patch|tablet|capsule)\b",
        ),
    )
    .expect("dosage form pattern is valid")
});

static BRAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("brand pattern is valid"));

static SALT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:sodium|hydrochloride|sulfate|phosphate|acetate|citrate|tartrate)\b")
        .expect("salt pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Bare generic name used to look up a reference URL.
pub fn lookup_key(canonical_name: &str) -> String {
    let lower = canonical_name.to_lowercase();

    let stripped = DOSAGE_PATTERN.replace_all(&lower, " ");
    let stripped = FORM_PATTERN.replace_all(&stripped, " ");
    let stripped = BRAND_PATTERN.replace_all(&stripped, " ");
    let stripped = SALT_PATTERN.replace_all(&stripped, " ");
    let key = WHITESPACE.replace_all(&stripped, " ").trim().to_string();

    if key.chars().count() < MIN_KEY_LEN {
        return lower
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_dose_form_and_brand() {
        assert_eq!(lookup_key("atorvastatin 80 MG Oral Tablet [Lipitor]"), "atorvastatin");
    }

    #[test]
    fn test_strips_salt() {
        assert_eq!(lookup_key("warfarin sodium 5 MG Oral Tablet"), "warfarin");
        assert_eq!(lookup_key("metformin hydrochloride 500 MG Oral Tablet"), "metformin");
    }

    #[test]
    fn test_salt_inside_word_is_kept() {
        assert_eq!(lookup_key("sodiumfoo"), "sodiumfoo");
    }

    #[test]
    fn test_concentration_units() {
        assert_eq!(lookup_key("insulin glargine 100 UNT/ML Injection"), "insulin glargine");
        assert_eq!(lookup_key("hydrocortisone 1 % Topical Cream"), "hydrocortisone");
    }

    #[test]
    fn test_plain_generic_unchanged() {
        assert_eq!(lookup_key("simvastatin"), "simvastatin");
        assert_eq!(lookup_key("Simvastatin"), "simvastatin");
    }

    #[test]
    fn test_short_result_falls_back_to_first_token() {
        // Only a salt remains after stripping.
        assert_eq!(lookup_key("sodium 5 MG Oral Tablet"), "sodium");
        assert_eq!(lookup_key("[Lipitor] 10 MG"), "[lipitor]");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lookup_key(""), "");
        assert_eq!(lookup_key("   "), "");
    }

    proptest! {
        #[test]
        fn lookup_key_is_lowercase_and_trimmed(s in "[A-Za-z0-9 \\[\\]%/.]{0,60}") {
            let key = lookup_key(&s);
            prop_assert_eq!(key.clone(), key.to_lowercase());
            prop_assert_eq!(key.trim(), key.as_str());
        }
    }
}
