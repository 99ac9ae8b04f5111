//! Answer normalization and string similarity.

/// Normalize an answer for comparison.
///
/// Trims, collapses whitespace runs to a single space, then strips
/// punctuation (anything that is not alphanumeric, `_`, or whitespace) and
/// lowercases unless `case_sensitive` is set. Punctuation between spaces
/// leaves both spaces behind.
pub fn normalize_answer(answer: &str, case_sensitive: bool) -> String {
    let collapsed = answer.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped: String = collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    if case_sensitive {
        stripped
    } else {
        stripped.to_lowercase()
    }
}

/// Levenshtein edit distance over chars.
pub use strsim::levenshtein;

/// Normalized similarity in `[0, 1]`: `(longer - distance) / longer`.
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (longer - distance) as f64 / longer as f64
}
