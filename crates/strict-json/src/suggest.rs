//! Closest-match suggestions for unknown keys.
//!
//! Two phases, both ranked by the field map's discovery order:
//!
//!   1. case-insensitive exact match — catches the common wrong-case
//!      mistake with certainty, and
//!   2. Levenshtein distance at most 2 — catches small typos.
//!
//! Pure functions; the walker only calls in here when the
//! `suggest_closest` switch is on, so the default fail-fast path never
//! pays for the distance scans.

/// The edit-distance threshold below which a known name counts as "did
/// you mean".
const MAX_SUGGEST_DISTANCE: usize = 2;

/// Find the closest known name to an unknown key, if any is close
/// enough.
#[must_use]
pub fn closest_match<'a>(unknown: &str, known: &[&'a str]) -> Option<&'a str> {
    let unknown_lower = unknown.to_lowercase();
    for &name in known {
        if name.to_lowercase() == unknown_lower {
            return Some(name);
        }
    }

    known
        .iter()
        .find(|name| levenshtein(unknown, name) <= MAX_SUGGEST_DISTANCE)
        .copied()
}

/// Classic Levenshtein distance over bytes: insertion, deletion, and
/// substitution each cost 1. Two-row DP.
fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, &byte_a) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &byte_b) in b.iter().enumerate() {
            let cost = usize::from(byte_a != byte_b);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Distance ──────────────────────────────────────────────────────

    #[test]
    fn distance_of_identical_strings_is_zero() {
        assert_eq!(levenshtein("name", "name"), 0);
    }

    #[test]
    fn distance_from_empty_is_the_other_length() {
        assert_eq!(levenshtein("", "name"), 4);
        assert_eq!(levenshtein("name", ""), 4);
    }

    #[test]
    fn single_edits_cost_one() {
        assert_eq!(levenshtein("name", "names"), 1); // insertion
        assert_eq!(levenshtein("name", "nam"), 1); // deletion
        assert_eq!(levenshtein("name", "nime"), 1); // substitution
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(
            levenshtein("kitten", "sitting"),
            levenshtein("sitting", "kitten")
        );
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    // ── Suggestions ───────────────────────────────────────────────────

    #[test]
    fn case_insensitive_match_wins() {
        assert_eq!(closest_match("Name", &["name", "age"]), Some("name"));
        assert_eq!(closest_match("NAME", &["name", "age"]), Some("name"));
        assert_eq!(closest_match("Priority", &["priority"]), Some("priority"));
    }

    #[test]
    fn small_typos_match_by_distance() {
        assert_eq!(closest_match("nmae", &["name", "age"]), Some("name"));
        assert_eq!(closest_match("agee", &["name", "age"]), Some("age"));
    }

    #[test]
    fn discovery_order_breaks_distance_ties() {
        // Both candidates are within distance 2 of "nb".
        assert_eq!(closest_match("nb", &["na", "nc"]), Some("na"));
        assert_eq!(closest_match("nb", &["nc", "na"]), Some("nc"));
    }

    #[test]
    fn distant_keys_get_no_suggestion() {
        assert_eq!(closest_match("completely_different", &["name", "age"]), None);
        assert_eq!(closest_match("anything", &[]), None);
    }
}
