//! Small string helpers shared by the scorers. All inputs are expected lowercased.

/// True when `term` occurs in `haystack` with no alphanumeric character directly
/// before or after it (`lead` matches "team lead," but not "leadership").
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let clean_before = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let clean_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        clean_before && clean_after
    })
}

/// True when any of `terms` is a plain substring of `haystack`.
pub fn contains_any<S: AsRef<str>>(haystack: &str, terms: &[S]) -> bool {
    terms
        .iter()
        .any(|t| !t.as_ref().is_empty() && haystack.contains(t.as_ref()))
}

/// True when any of `terms` occurs on word boundaries in `haystack`.
pub fn contains_any_term<S: AsRef<str>>(haystack: &str, terms: &[S]) -> bool {
    terms.iter().any(|t| contains_term(haystack, t.as_ref()))
}

/// Non-overlapping occurrences of `needle`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// True when `cue` appears within `window` bytes of any occurrence of `needle`.
pub fn is_near(haystack: &str, needle: &str, cue: &str, window: usize) -> bool {
    if needle.is_empty() || cue.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let from = floor_boundary(haystack, start.saturating_sub(window));
        let to = ceil_boundary(haystack, start + needle.len() + window);
        haystack[from..to].contains(cue)
    })
}

fn floor_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
