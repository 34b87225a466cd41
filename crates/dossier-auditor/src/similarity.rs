//! Label similarity for duplicate detection
//!
//! Jaro-Winkler string similarity plus the trailing-token guard that
//! keeps labels like "Worked at TechCorp" and "Worked at StartupXYZ"
//! from being flagged: a shared prefix means nothing when the final
//! token names a different entity.

/// Winkler prefix bonus scale
const PREFIX_SCALE: f64 = 0.1;

/// Maximum common-prefix length counted toward the Winkler bonus
const MAX_PREFIX_LEN: usize = 4;

/// Tokens too generic to distinguish two labels on their own
const FILLER_WORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "at", "in", "on", "for", "with", "to",
];

/// Jaro similarity between two strings, in [0, 1]
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for i in 0..a.len() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && a[i] == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Count transpositions among matched characters
    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..a.len() {
        if a_matched[i] {
            while !b_matched[k] {
                k += 1;
            }
            if a[i] != b[k] {
                transpositions += 1;
            }
            k += 1;
        }
    }

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - (transpositions / 2) as f64) / m) / 3.0
}

/// Jaro-Winkler similarity between two strings, in [0, 1]
///
/// Boosts the Jaro score for a shared prefix of up to
/// [`MAX_PREFIX_LEN`] characters, scaled by [`PREFIX_SCALE`].
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let base = jaro(a, b);

    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take(MAX_PREFIX_LEN)
        .take_while(|(x, y)| x == y)
        .count();

    base + prefix_len as f64 * PREFIX_SCALE * (1.0 - base)
}

/// Whether two labels end in distinguishing tokens
///
/// True when the final non-filler tokens differ and at least one of them
/// looks like a proper noun or identifier (interior uppercase or a
/// digit). Such labels describe different entities no matter how similar
/// the rest of the text is, so the duplicate rule stands down.
pub fn distinct_trailing_tokens(a: &str, b: &str) -> bool {
    let (Some(ta), Some(tb)) = (final_token(a), final_token(b)) else {
        return false;
    };

    if ta.eq_ignore_ascii_case(tb) {
        return false;
    }

    identifier_like(ta) || identifier_like(tb)
}

/// Last whitespace token of a label, skipping filler words
fn final_token(label: &str) -> Option<&str> {
    label
        .split_whitespace()
        .rev()
        .find(|token| !FILLER_WORDS.iter().any(|f| token.eq_ignore_ascii_case(f)))
}

/// Whether a token reads as a proper noun or identifier rather than a
/// plain word: an uppercase letter past the first character, or a digit
fn identifier_like(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        || token.chars().skip(1).any(|c| c.is_uppercase())
}
