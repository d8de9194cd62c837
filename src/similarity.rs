//! Edit-distance and token-set similarity between labels.

/// Edit distance beyond which two labels are never considered the same.
pub const DEFAULT_MAX_DISTANCE: usize = 3;

/// Minimum similarity ratio for a fuzzy match.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Bounded edit-distance similarity with a fuzzy-match threshold.
///
/// All comparisons count characters, not bytes.
///
/// # Examples
///
/// ```
/// use tagnorm::Similarity;
///
/// let sim = Similarity::default();
/// assert_eq!(sim.edit_distance("latex", "latx"), 1);
/// assert!((sim.similarity("latex", "latx") - 0.8).abs() < 1e-9);
/// assert!(sim.is_subset("red dress", "long red dress"));
/// assert!(sim.are_rearrangements("dress red", "red dress"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    max_distance: usize,
    threshold: f64,
}

impl Default for Similarity {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE, DEFAULT_THRESHOLD)
    }
}

impl Similarity {
    /// Creates a similarity engine with the given distance cap and threshold.
    pub fn new(max_distance: usize, threshold: f64) -> Self {
        Self {
            max_distance,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Returns the distance cap.
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Returns the fuzzy-match threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Levenshtein distance between `a` and `b`.
    ///
    /// If one side is empty the length of the other is returned. If the
    /// lengths differ by more than the cap, `max_distance + 1` is returned
    /// without computing the full table.
    pub fn edit_distance(&self, a: &str, b: &str) -> usize {
        let len_a = a.chars().count();
        let len_b = b.chars().count();

        if len_a == 0 {
            return len_b;
        }
        if len_b == 0 {
            return len_a;
        }
        if len_a.abs_diff(len_b) > self.max_distance {
            return self.max_distance + 1;
        }

        strsim::levenshtein(a, b)
    }

    /// `1 - distance / longest length`, or 1.0 for identical strings.
    ///
    /// Uses the full Levenshtein distance; the length-gap shortcut of
    /// [`Similarity::edit_distance`] only bounds the distance from below.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let longest = a.chars().count().max(b.chars().count());
        if longest == 0 {
            return 1.0;
        }
        1.0 - strsim::levenshtein(a, b) as f64 / longest as f64
    }

    /// Returns true if the similarity reaches the threshold.
    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        self.similarity(a, b) >= self.threshold
    }

    /// Direct fuzzy match: within the distance cap and above the threshold.
    pub fn is_direct_match(&self, a: &str, b: &str) -> bool {
        self.edit_distance(a, b) <= self.max_distance && self.is_similar(a, b)
    }

    /// Returns true if `a` is a shorter phrase whose every word has a similar
    /// word in `b`.
    pub fn is_subset(&self, a: &str, b: &str) -> bool {
        let words_a: Vec<&str> = a.split_whitespace().collect();
        let words_b: Vec<&str> = b.split_whitespace().collect();

        !words_a.is_empty()
            && words_a.len() < words_b.len()
            && words_a
                .iter()
                .all(|wa| words_b.iter().any(|wb| self.is_similar(wa, wb)))
    }

    /// Returns true if `a` and `b` have the same number of words and, once
    /// both word lists are sorted, every pair is similar.
    pub fn are_rearrangements(&self, a: &str, b: &str) -> bool {
        let mut words_a: Vec<&str> = a.split_whitespace().collect();
        let mut words_b: Vec<&str> = b.split_whitespace().collect();
        if words_a.is_empty() || words_a.len() != words_b.len() {
            return false;
        }
        words_a.sort_unstable();
        words_b.sort_unstable();

        words_a
            .iter()
            .zip(&words_b)
            .all(|(wa, wb)| self.is_similar(wa, wb))
    }
}
