//! Partial-ratio fuzzy scoring.
//!
//! The shorter of the two strings is slid across the longer one; each window
//! is scored by normalised Levenshtein distance and the best window wins.
//! Windows range from one character shorter to one character longer than the
//! shorter string so that a single insertion or deletion still lines up.

/// Scores how well a search term matches a haystack, on a 0–100 scale.
pub trait Scorer {
    fn score(&self, term: &str, haystack: &str) -> u8;
}

/// The default [`Scorer`]: best window alignment, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl Scorer for PartialRatio {
    fn score(&self, term: &str, haystack: &str) -> u8 {
        similarity(term, haystack)
    }
}

/// Partial fuzzy ratio between `term` and `haystack`. Empty input scores 0.
pub fn similarity(term: &str, haystack: &str) -> u8 {
    let term = term.to_lowercase();
    let haystack = haystack.to_lowercase();
    let term_len = term.chars().count();
    let haystack_len = haystack.chars().count();
    if term_len == 0 || haystack_len == 0 {
        return 0;
    }

    let (short, short_len, long, long_len) = if term_len <= haystack_len {
        (&term, term_len, &haystack, haystack_len)
    } else {
        (&haystack, haystack_len, &term, term_len)
    };

    // Byte offset of every char boundary, so windows can be sliced as &str.
    let bounds: Vec<usize> = long
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(long.len()))
        .collect();

    let min_width = short_len.saturating_sub(1).max(1);
    let max_width = (short_len + 1).min(long_len);

    let mut best = 0.0_f64;
    for width in min_width..=max_width {
        for start in 0..=(long_len - width) {
            let window = &long[bounds[start]..bounds[start + width]];
            let distance = strsim::levenshtein(short, window);
            let ratio = 1.0 - distance as f64 / short_len.max(width) as f64;
            if distance == 0 {
                return 100;
            }
            best = best.max(ratio);
        }
    }
    (best * 100.0).round() as u8
}
