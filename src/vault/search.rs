//! Fuzzy lookup of secret names.
//!
//! A name qualifies when it equals the pattern, contains it, or lies
//! within an edit-distance tolerance that grows with the pattern length.
//! Qualifying names are ranked by a score (lower is better):
//!
//! | match                        | score             |
//! |------------------------------|-------------------|
//! | exact (case-insensitive)     | 0                 |
//! | name starts with the pattern | 1                 |
//! | name contains the pattern    | 2                 |
//! | edit distance only           | 10 + distance     |
//!
//! Equal scores are ordered by the original name, so results are
//! reproducible regardless of map iteration order.

/// Score offset that keeps every edit-distance match below any
/// substring match.
const FUZZY_BASE_SCORE: usize = 10;

/// Maximum edit distance accepted for a trimmed pattern of `len` chars.
pub fn tolerance(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=4 => 1,
        5..=7 => 2,
        _ => 3,
    }
}

/// Rank `names` against `pattern` and keep at most `max_results`.
///
/// Comparisons are case-insensitive; the returned names are the
/// originals.  A blank pattern yields no results.
pub fn rank<'a, I>(names: I, pattern: &str, max_results: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let pattern = pattern.trim().to_lowercase();
    if pattern.is_empty() || max_results == 0 {
        return Vec::new();
    }

    let max_distance = tolerance(pattern.chars().count());

    let mut scored: Vec<(usize, &'a str)> = names
        .into_iter()
        .filter_map(|name| score(name, &pattern, max_distance).map(|s| (s, name)))
        .collect();

    scored.sort_unstable_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.truncate(max_results);
    scored.into_iter().map(|(_, name)| name).collect()
}

/// Score one candidate, or `None` if it does not qualify.
///
/// `pattern` must already be trimmed and lowercased.
fn score(name: &str, pattern: &str, max_distance: usize) -> Option<usize> {
    if name.trim().is_empty() {
        return None;
    }
    let candidate = name.to_lowercase();

    if candidate == pattern {
        return Some(0);
    }
    if candidate.starts_with(pattern) {
        return Some(1);
    }
    if candidate.contains(pattern) {
        return Some(2);
    }

    // Short patterns only ever match as substrings.
    if max_distance == 0 {
        return None;
    }

    let distance = levenshtein(&candidate, pattern);
    (distance <= max_distance).then_some(FUZZY_BASE_SCORE + distance)
}

/// Classic Levenshtein distance over Unicode scalar values.
///
/// Insertions, deletions and substitutions each cost 1.  Only two rows
/// of the (len(a)+1) x (len(b)+1) table are kept in memory.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
