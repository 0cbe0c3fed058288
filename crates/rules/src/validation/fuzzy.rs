//! Fuzzy string matching utilities: Levenshtein distance and snake_case validation.

/// Find the closest match using Levenshtein distance. Returns None if best
/// distance exceeds half the candidate length (too dissimilar).
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for &candidate in candidates {
        let dist = levenshtein(&input_lower, &candidate.to_lowercase());
        match best {
            None => best = Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => best = Some((candidate, dist)),
            _ => {}
        }
    }

    best.and_then(|(name, dist)| {
        // Only suggest if edit distance is reasonable (≤ half the longer string)
        let max_len = input.len().max(name.len());
        if dist <= max_len / 2 {
            Some(name)
        } else {
            None
        }
    })
}

/// Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Check if a string is snake_case: `^[a-z][a-z0-9]*(_[a-z0-9]+)*$`
pub(crate) fn is_snake_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    let mut prev_was_underscore = false;
    for ch in chars {
        if ch == '_' {
            if prev_was_underscore {
                return false;
            }
            prev_was_underscore = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            prev_was_underscore = false;
        } else {
            return false;
        }
    }
    !prev_was_underscore
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &[&str] = &[
        "drawdown_rate",
        "drawdown_duration",
        "rising_limb_rate",
        "baseline_trend",
        "baseline_below_pool",
        "baseline_above_pool",
    ];

    #[test]
    fn levenshtein_basic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn fuzzy_match_finds_close() {
        assert_eq!(fuzzy_match("drawdown_rat", FEATURES), Some("drawdown_rate"));
        assert_eq!(fuzzy_match("Baseline_Trend", FEATURES), Some("baseline_trend"));
    }

    #[test]
    fn fuzzy_match_rejects_distant() {
        assert_eq!(fuzzy_match("zzzzzzzzzzzzz", FEATURES), None);
    }

    #[test]
    fn snake_case_check() {
        assert!(is_snake_case("leak_seep"));
        assert!(is_snake_case("rule2"));
        assert!(!is_snake_case("leak-seep"));
        assert!(!is_snake_case("LeakSeep"));
        assert!(!is_snake_case("_leak"));
        assert!(!is_snake_case("leak__seep"));
        assert!(!is_snake_case("leak_"));
        assert!(!is_snake_case(""));
    }
}
