//! Property-based tests for the similarity and fingerprint primitives.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Similarity is symmetric, bounded, and 1.0 on identity
//! - Trim-identical texts are always duplicates
//! - Fingerprints are deterministic and normalization-stable
//! - Category parsing round-trips

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use prompthive::{Category, PromptId, fingerprint, is_duplicate, levenshtein, similarity};
use proptest::prelude::*;

proptest! {
    /// Property: similarity of a text with itself is exactly 1.0.
    #[test]
    fn prop_similarity_identity(s in ".{0,200}") {
        prop_assert!((similarity(&s, &s) - 1.0).abs() < f64::EPSILON);
    }

    /// Property: similarity is symmetric.
    #[test]
    fn prop_similarity_symmetric(a in ".{0,100}", b in ".{0,100}") {
        prop_assert!((similarity(&a, &b) - similarity(&b, &a)).abs() < f64::EPSILON);
    }

    /// Property: similarity stays within [0, 1].
    #[test]
    fn prop_similarity_bounded(a in ".{0,100}", b in ".{0,100}") {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    /// Property: distance is zero iff the strings are equal.
    #[test]
    fn prop_distance_zero_iff_equal(a in ".{0,80}", b in ".{0,80}") {
        let d = levenshtein(&a, &b);
        let equal_chars = a.chars().eq(b.chars());
        prop_assert_eq!(d == 0, equal_chars);
    }

    /// Property: distance is bounded by the longer length.
    #[test]
    fn prop_distance_bounded(a in ".{0,80}", b in ".{0,80}") {
        let d = levenshtein(&a, &b);
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
    }

    /// Property: distance is at least the length difference.
    #[test]
    fn prop_distance_at_least_length_gap(a in ".{0,80}", b in ".{0,80}") {
        let d = levenshtein(&a, &b);
        let gap = a.chars().count().abs_diff(b.chars().count());
        prop_assert!(d >= gap);
    }

    /// Property: texts identical after trimming are always duplicates,
    /// regardless of what the ratio would say.
    #[test]
    fn prop_trim_identical_is_duplicate(s in ".{0,120}", pad_left in " {0,5}", pad_right in " {0,5}") {
        let padded = format!("{pad_left}{s}{pad_right}");
        prop_assert!(is_duplicate(&padded, &s));
    }

    /// Property: fingerprint is deterministic across repeated calls.
    #[test]
    fn prop_fingerprint_deterministic(text in ".{0,200}", ctx in ".{0,60}") {
        prop_assert_eq!(fingerprint(&text, &ctx), fingerprint(&text, &ctx));
    }

    /// Property: fingerprint ignores leading/trailing whitespace and case.
    #[test]
    fn prop_fingerprint_normalization_stable(text in "[a-zA-Z ]{1,100}", ctx in "[a-z]{0,20}") {
        let noisy = format!("  {}  ", text.to_uppercase());
        prop_assert_eq!(fingerprint(&noisy, &ctx), fingerprint(&text, &ctx));
    }

    /// Property: `PromptId` preserves its input string exactly.
    #[test]
    fn prop_prompt_id_preserves_string(s in "[a-zA-Z0-9_-]{1,100}") {
        let id = PromptId::new(&s);
        prop_assert_eq!(id.as_str(), s.as_str());
        prop_assert_eq!(id.to_string(), s);
    }

    /// Property: Category::as_str round-trips through parse, case-insensitively.
    #[test]
    fn prop_category_roundtrips(idx in 0usize..5) {
        let category = Category::all()[idx];
        prop_assert_eq!(Category::parse(category.as_str()), Some(category));
        prop_assert_eq!(Category::parse(&category.as_str().to_uppercase()), Some(category));
    }

    /// Property: detected categories are stable under case changes.
    #[test]
    fn prop_category_detect_case_insensitive(s in "[a-zA-Z ]{0,120}") {
        prop_assert_eq!(Category::detect(&s), Category::detect(&s.to_uppercase()));
    }
}
