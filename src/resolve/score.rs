//! Path similarity scoring.
//!
//! Both paths are compared segment by segment from the filename towards the
//! root. Every exact match is worth 1.0; the first mismatch contributes the
//! character-set Jaccard similarity of the two segments and ends the scan.

use crate::utils::paths::{absolutize, segments};
use std::collections::HashSet;

/// Jaccard similarity of the character sets of `a` and `b`.
pub fn char_jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Segments of `original` that are expected to reappear in the real path.
///
/// Everything after `build_root_marker` when the marker is present, else the
/// last `fallback` segments.
pub fn suffix_segments<'a>(original: &'a str, build_root_marker: &str, fallback: usize) -> Vec<&'a str> {
    if !build_root_marker.is_empty() {
        if let Some(idx) = original.find(build_root_marker) {
            return segments(&original[idx + build_root_marker.len()..]);
        }
    }
    let all = segments(original);
    let start = all.len().saturating_sub(fallback);
    all[start..].to_vec()
}

pub fn score(candidate: &[&str], suffix: &[&str]) -> f64 {
    let mut total = 0.0;
    for (cand, orig) in candidate.iter().rev().zip(suffix.iter().rev()) {
        if cand == orig {
            total += 1.0;
        } else {
            total += char_jaccard(orig, cand);
            break;
        }
    }
    total
}

/// Highest-scoring candidate for `original`, first one wins on ties.
///
/// Returns the candidate made absolute together with its score; applying a
/// confidence threshold is left to the caller.
pub fn best_match(
    candidates: &[String],
    original: &str,
    build_root_marker: &str,
    fallback: usize,
) -> Option<(String, f64)> {
    let original = crate::utils::normalize_path(original);
    let suffix = suffix_segments(&original, build_root_marker, fallback);

    let mut best: Option<(&String, f64)> = None;
    for candidate in candidates {
        let value = score(&segments(candidate), &suffix);
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((candidate, value));
        }
    }
    best.map(|(path, value)| (absolutize(path), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "output/build/";

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_char_jaccard() {
        assert_eq!(char_jaccard("", ""), 0.0);
        assert_eq!(char_jaccard("abc", "abc"), 1.0);
        assert_eq!(char_jaccard("abc", "abd"), 0.5);
        assert_eq!(char_jaccard("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_suffix_after_build_root_marker() {
        let parts = suffix_segments("/w/output/build/src/driver/uart.c", MARKER, 4);
        assert_eq!(parts, vec!["src", "driver", "uart.c"]);
    }

    #[test]
    fn test_suffix_falls_back_to_last_segments() {
        let parts = suffix_segments("/w/output/obj/a/b/c/d.c", MARKER, 4);
        assert_eq!(parts, vec!["a", "b", "c", "d.c"]);
        assert_eq!(suffix_segments("x/y.c", MARKER, 4), vec!["x", "y.c"]);
    }

    #[test]
    fn test_exact_trailing_segments() {
        let suffix = ["src", "driver", "uart.c"];
        assert_eq!(score(&["proj", "driver", "uart.c"], &suffix), 2.0 + char_jaccard("src", "proj"));
        assert_eq!(score(&["root", "src", "driver", "uart.c"], &suffix), 3.0);
    }

    #[test]
    fn test_single_fractional_term_stops_scan() {
        let suffix = ["src", "abc", "uart.c"];
        // "abd" mismatches; "src" further left must not be counted
        assert_eq!(score(&["src", "abd", "uart.c"], &suffix), 1.5);
    }

    #[test]
    fn test_more_exact_segments_score_higher() {
        let suffix = ["src", "driver", "uart.c"];
        let a = score(&["x", "src", "driver", "uart.c"], &suffix);
        let b = score(&["x", "lib", "driver", "uart.c"], &suffix);
        assert!(a >= b);
    }

    #[test]
    fn test_best_match_first_wins_on_tie() {
        let candidates = owned(&["/r1/driver/uart.c", "/r2/driver/uart.c"]);
        let (path, value) =
            best_match(&candidates, "/w/output/build/driver/uart.c", MARKER, 4).unwrap();
        assert_eq!(path, "/r1/driver/uart.c");
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_best_match_prefers_deeper_agreement() {
        let candidates = owned(&["/r/lib/uart.c", "/r/src/driver/uart.c"]);
        let (path, _) = best_match(&candidates, "/w/output/build/src/driver/uart.c", MARKER, 4).unwrap();
        assert_eq!(path, "/r/src/driver/uart.c");
    }

    #[test]
    fn test_best_match_empty() {
        assert!(best_match(&[], "/w/output/build/a.c", MARKER, 4).is_none());
    }
}
