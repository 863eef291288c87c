//! Text similarity for fuzzy-duplicate detection.
//!
//! Classic unit-cost edit distance (insertions, deletions, substitutions)
//! normalized into a `[0, 1]` ratio. Cost is O(|a|·|b|), so callers bound the
//! candidate set before invoking this per candidate; see the save
//! coordinator's length pre-filter.

/// Default ratio above which two texts count as duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.9;

/// Computes the Levenshtein distance between two strings.
///
/// Operates on Unicode scalar values, not bytes. Uses the two-row dynamic
/// programming formulation, with the shorter string as the row to keep the
/// working set small.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (row, col) = if a.len() < b.len() { (&a, &b) } else { (&b, &a) };

    if row.is_empty() {
        return col.len();
    }

    let mut prev: Vec<usize> = (0..=row.len()).collect();
    let mut curr = vec![0usize; row.len() + 1];

    for (i, &cc) in col.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &rc) in row.iter().enumerate() {
            let substitution = prev[j] + usize::from(cc != rc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[row.len()]
}

/// Computes a normalized similarity ratio in `[0, 1]`.
///
/// Ratio is `(max_len - distance) / max_len` over character counts.
/// Symmetric, and `1.0` for identical strings, including two empty strings.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Reports whether two texts are near-duplicates.
///
/// True when the texts are character-identical after trimming (short-circuits
/// the distance computation) or their similarity exceeds
/// [`DUPLICATE_THRESHOLD`].
#[must_use]
pub fn is_duplicate(a: &str, b: &str) -> bool {
    is_duplicate_with_threshold(a, b, DUPLICATE_THRESHOLD)
}

/// [`is_duplicate`] with a caller-chosen similarity threshold.
#[must_use]
pub fn is_duplicate_with_threshold(a: &str, b: &str, threshold: f64) -> bool {
    if a.trim() == b.trim() {
        return true;
    }
    similarity(a, b) > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_distance_unicode_chars_not_bytes() {
        // One substitution, regardless of UTF-8 byte widths.
        assert_eq!(levenshtein("caf\u{e9}", "cafe"), 1);
    }

    #[test]
    fn test_similarity_identity() {
        assert!((similarity("hello", "hello") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_symmetric() {
        let a = "Explain quantum entanglement";
        let b = "Explain quantum mechanics";
        assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert!(similarity("aaaa", "bbbb").abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_exact_after_trim() {
        assert!(is_duplicate("  hello world  ", "hello world"));
    }

    #[test]
    fn test_duplicate_near_match() {
        let a = "Explain quantum entanglement in simple terms";
        let b = "Explain quantum entanglement in simple terms!";
        assert!(is_duplicate(a, b));
    }

    #[test]
    fn test_not_duplicate_below_threshold() {
        assert!(!is_duplicate("write a poem", "debug this stack trace"));
    }

    #[test]
    fn test_custom_threshold() {
        let a = "abcdefghij";
        let b = "abcdefghxx"; // similarity 0.8
        assert!(!is_duplicate_with_threshold(a, b, 0.9));
        assert!(is_duplicate_with_threshold(a, b, 0.7));
    }
}
