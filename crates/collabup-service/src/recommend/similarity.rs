//! Fuzzy text similarity used to score recommendation candidates.

/// ## Summary
/// Case-insensitive similarity in `0.0..=1.0`:
///
/// - `1.0` for equal strings
/// - `0.8` when one contains the other
/// - Jaccard word overlap scaled by `0.6` when both strings have words, so
///   word-disjoint strings score `0.0`
/// - the Ratcliff/Obershelp ratio scaled by `0.4` when either side is only whitespace
#[must_use]
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.8;
    }

    let words_a: Vec<&str> = unique_words(&a);
    let words_b: Vec<&str> = unique_words(&b);
    if !words_a.is_empty() && !words_b.is_empty() {
        let shared = words_a.iter().filter(|w| words_b.contains(w)).count();
        let union = words_a.len() + words_b.len() - shared;
        return ratio(shared, union) * 0.6;
    }

    sequence_ratio(&a, &b) * 0.4
}

fn unique_words(text: &str) -> Vec<&str> {
    let mut words: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

#[expect(clippy::cast_precision_loss, reason = "Counts are far below 2^52")]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// ## Summary
/// Ratcliff/Obershelp similarity `2M / T`, where `M` counts characters in the
/// recursively found longest common blocks and `T` is the combined length.
#[must_use]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    ratio(2 * matching_chars(&a, &b), total)
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common block as `(start_a, start_b, len)`. Ties go to the block that
/// starts earliest in `a`, then earliest in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = previous[j] + 1;
                current[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        previous = current;
    }
    best
}
