//! Grading strategies for repertory entries.
//!
//! Every repertory entry receives a grade in `1..=3` exactly once, at
//! creation. The assignment policy sits behind [`GradeStrategy`] so it can
//! be swapped without touching the parser. The default strategy is
//! pseudo-random, which means grades are NOT stable across rebuilds of the
//! same source text; [`FrequencyGrading`] is the deterministic alternative.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Assigns a grade in `1..=3` to a repertory entry at creation time.
pub trait GradeStrategy {
    fn assign(&mut self, remedy: &str, category: &str, description: &str) -> u8;
}

/// Historical default: an unseeded pseudo-random grade per entry.
pub struct PseudoRandomGrading {
    rng: StdRng,
}

impl PseudoRandomGrading {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for PseudoRandomGrading {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeStrategy for PseudoRandomGrading {
    fn assign(&mut self, _remedy: &str, _category: &str, _description: &str) -> u8 {
        self.rng.gen_range(1..=3)
    }
}

/// Deterministic alternative: the grade grows with how often the remedy has
/// been cited so far in the pass (2 from the third citation, 3 from the
/// tenth).
#[derive(Default)]
pub struct FrequencyGrading {
    citations: HashMap<String, usize>,
}

impl FrequencyGrading {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GradeStrategy for FrequencyGrading {
    fn assign(&mut self, remedy: &str, _category: &str, _description: &str) -> u8 {
        let count = self.citations.entry(remedy.to_string()).or_insert(0);
        *count += 1;
        match *count {
            c if c >= 10 => 3,
            c if c >= 3 => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_random_stays_in_range() {
        let mut grading = PseudoRandomGrading::new();
        for _ in 0..200 {
            let grade = grading.assign("Aconitum", "Mind", "Fear of death");
            assert!((1..=3).contains(&grade), "grade out of range: {}", grade);
        }
    }

    #[test]
    fn test_frequency_grading_is_deterministic() {
        let run = || {
            let mut grading = FrequencyGrading::new();
            (0..12)
                .map(|_| grading.assign("Belladonna", "Head", "Throbbing"))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_frequency_grading_thresholds() {
        let mut grading = FrequencyGrading::new();
        let grades: Vec<u8> = (0..10)
            .map(|_| grading.assign("Belladonna", "Head", "Throbbing"))
            .collect();
        assert_eq!(grades[0], 1);
        assert_eq!(grades[1], 1);
        assert_eq!(grades[2], 2);
        assert_eq!(grades[8], 2);
        assert_eq!(grades[9], 3);
        // Counts are tracked per remedy, not globally.
        assert_eq!(grading.assign("Aconitum", "Head", "Throbbing"), 1);
    }
}
