//! Word analysis command
//!
//! Expected information and solution prior of one word against the initial
//! candidate set.

use crate::core::Word;
use crate::solver::Solver;
use crate::solver::evaluator::{expected_entropy_exhaustive, expected_entropy_with};
use anyhow::{Result, bail};

/// Result of analyzing a word
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub word: Word,
    /// Expected information (bits) of the word as a first guess
    pub entropy: f64,
    /// Prior that the word is the solution
    pub prior: f64,
    /// Entropy (bits) of the initial candidate distribution
    pub candidate_entropy: f64,
    pub total_candidates: usize,
}

impl AnalysisResult {
    /// Expected candidate shrink factor
    #[must_use]
    pub fn expected_reduction(&self) -> f64 {
        self.entropy.exp2()
    }

    #[must_use]
    pub fn expected_remaining(&self) -> f64 {
        self.total_candidates as f64 / self.expected_reduction()
    }
}

/// Analyze `word` as a first guess
///
/// With `exhaustive`, the entropy is computed reply by reply through the
/// candidate filter instead of by bucketing candidates.
///
/// # Errors
///
/// Returns an error if:
/// - The word is invalid (not 5 letters or contains non-ASCII)
/// - The word is not in the guess vocabulary
/// - The evaluator's self-check fails
pub fn analyze_word(word: &str, solver: &Solver, exhaustive: bool) -> Result<AnalysisResult> {
    let word = Word::new(word)?;
    if !solver.guesses().contains(&word) {
        bail!("Word '{word}' not in word list");
    }

    let candidates = solver.candidates();
    let weights = solver.weights(candidates);
    let entropy = if exhaustive {
        expected_entropy_exhaustive(&word, candidates, solver.frequencies())?
    } else {
        expected_entropy_with(&word, candidates, &weights)?
    };
    let prior = candidates
        .iter()
        .position(|c| c == &word)
        .map_or(0.0, |i| weights[i]);

    Ok(AnalysisResult {
        word,
        entropy,
        prior,
        candidate_entropy: solver.entropy_of(candidates),
        total_candidates: candidates.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{FrequencyMap, SolverConfig};
    use crate::wordlists::loader::words_from_slice;

    fn setup_solver() -> Solver {
        let guesses = words_from_slice(&[
            "aback", "abase", "abate", "abbey", "abbot", "abhor", "abide", "abled", "abode",
            "abort", "about", "above", "abuse", "abyss", "acorn", "acrid", "actor", "acute",
        ]);
        let candidates = guesses[..12].to_vec();
        let freq = FrequencyMap::uniform(&guesses);
        Solver::new(guesses, candidates, freq, SolverConfig::default()).unwrap()
    }

    #[test]
    fn analyze_valid_word() {
        let solver = setup_solver();
        let result = analyze_word("aback", &solver, false).unwrap();

        assert_eq!(result.word.text(), "aback");
        assert!(result.entropy > 0.0);
        assert!(result.expected_reduction() >= 1.0);
        assert_eq!(result.total_candidates, 12);
        assert!((result.prior - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn analyze_non_candidate_has_zero_prior() {
        let solver = setup_solver();
        let result = analyze_word("acrid", &solver, false).unwrap();
        assert_eq!(result.prior, 0.0);
    }

    #[test]
    fn analyze_invalid_word() {
        let solver = setup_solver();
        assert!(analyze_word("zzzzz", &solver, false).is_err());
        assert!(analyze_word("abc", &solver, false).is_err());
    }

    #[test]
    fn exhaustive_agrees_with_bucketing() {
        let solver = setup_solver();
        for word in ["aback", "abyss", "acute"] {
            let fast = analyze_word(word, &solver, false).unwrap();
            let slow = analyze_word(word, &solver, true).unwrap();
            assert!((fast.entropy - slow.entropy).abs() < 1e-9);
        }
    }

    #[test]
    fn entropy_properties() {
        let solver = setup_solver();
        let result = analyze_word("about", &solver, false).unwrap();

        // Entropy should be bounded
        assert!(result.entropy >= 0.0);
        assert!(result.entropy <= result.candidate_entropy + 1e-9);

        // Expected remaining should be sensible
        assert!(result.expected_remaining() >= 1.0 - 1e-9);
        assert!(result.expected_remaining() <= 12.0);
    }
}
