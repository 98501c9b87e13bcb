//! Lexical strategy: normalized edit distance between raw statements

use strsim::normalized_levenshtein;

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, computed on the raw text
///
/// Identical strings score `1.0`; strings with no characters in common score
/// `0.0` because every position needs an edit.
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(lexical_similarity("The sky is blue.", "The sky is blue."), 1.0);
    }

    #[test]
    fn test_one_edit() {
        let sim = lexical_similarity("The sky is blue.", "The sky is blue!");
        assert!((sim - 15.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_characters() {
        assert_eq!(lexical_similarity("abc", "xyz"), 0.0);
        assert_eq!(lexical_similarity("ab", "wxyz"), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = "Paris is the capital of France.";
        let b = "Water boils at 100C.";
        assert_eq!(lexical_similarity(a, b), lexical_similarity(b, a));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(lexical_similarity("ABC", "abc") < 1.0);
    }
}
