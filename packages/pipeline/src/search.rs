//! Fuzzy license-plate search.

/// Lowercases `s` and strips all whitespace.
///
/// Punctuation is kept, so `"ABC-123"` normalizes to `"abc-123"` and a query
/// of `"abc123"` still matches it as a subsequence.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` if every character of the normalized `query` appears, in
/// order, somewhere in the normalized `candidate`.
///
/// An empty query matches everything.
#[must_use]
pub fn fuzzy_search(query: &str, candidate: &str) -> bool {
    let query = normalize(query);
    if query.is_empty() {
        return true;
    }

    let candidate = normalize(candidate);
    let mut remaining = candidate.chars();
    query.chars().all(|q| remaining.any(|c| c == q))
}
