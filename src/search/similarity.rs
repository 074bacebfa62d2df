//! Edit-distance similarity scoring for search ranking
//!
//! Provides a normalized, case-insensitive Levenshtein similarity used by
//! the fuzzy search bucket. Pure functions, no state.

/// Case-insensitive Levenshtein distance between two strings
///
/// Substitution, insertion and deletion each cost 1; transpositions are
/// not recognized. Operates on the `char` sequences of the lowercased
/// inputs. Uses the two-row formulation, so space is O(min(len)).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();

    // Keep the shorter string on the row axis
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if shorter.is_empty() {
        return longer.len();
    }

    let mut prev_row: Vec<usize> = (0..=shorter.len()).collect();
    let mut curr_row = vec![0usize; shorter.len() + 1];

    for (i, lc) in longer.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, sc) in shorter.iter().enumerate() {
            let cost = if lc == sc { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[shorter.len()]
}

/// Normalized similarity between two strings in `[0.0, 1.0]`
///
/// Returns `1 - distance / max(len(a), len(b))` over the lowercased char
/// counts. Callers must not invoke this with two empty strings; if they
/// do anyway, 1.0 is returned instead of dividing by zero.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.to_lowercase().chars().count();
    let len_b = b.to_lowercase().chars().count();

    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    #[case("cat", "cat", 0)]
    #[case("cat", "", 3)]
    #[case("", "dog", 3)]
    #[case("ct", "cat.png", 5)]
    fn known_distances(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein_distance(a, b), expected);
    }

    #[test]
    fn distance_ignores_case() {
        assert_eq!(levenshtein_distance("CAT.PNG", "cat.png"), 0);
        assert_eq!(levenshtein_distance("Kitten", "sitting"), 3);
    }

    #[test]
    fn similarity_is_symmetric() {
        let pairs = [("cat", "cats_playing"), ("dog.png", "d"), ("a", "b")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("cat.png", "cat.png"), 1.0);
        assert_eq!(similarity("CAT.png", "cat.PNG"), 1.0);
    }

    #[test]
    fn both_empty_is_degenerate_but_safe() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_low() {
        // "xyz" vs "cat": distance 3, max len 3
        assert_eq!(similarity("xyz", "cat"), 0.0);
    }

    #[test]
    fn score_matches_normalization_formula() {
        // "ct" vs "cat": one insertion, max len 3
        let expected = 1.0 - 1.0 / 3.0;
        assert!((similarity("ct", "cat") - expected).abs() < 1e-12);
    }
}
