//! Word frequency priors and Shannon entropy
//!
//! A `FrequencyMap` holds raw, unnormalized weights. Standardizing it against a
//! candidate set drops every word outside the set and rescales the rest to sum
//! to 1, giving the prior probability that each candidate is the solution.

use super::error::SolverError;
use crate::core::Word;
use rustc_hash::FxHashMap;

/// Non-negative weight per word; words absent from the map weigh 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyMap {
    weights: FxHashMap<Word, f64>,
}

impl FrequencyMap {
    /// An empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight 1 for every word
    #[must_use]
    pub fn uniform(words: &[Word]) -> Self {
        words.iter().map(|w| (w.clone(), 1.0)).collect()
    }

    /// Set the weight of `word`
    ///
    /// Negative and non-finite weights are stored as 0.
    pub fn insert(&mut self, word: Word, weight: f64) {
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };
        self.weights.insert(word, weight);
    }

    /// Weight of `word`, 0 if unknown
    #[inline]
    #[must_use]
    pub fn weight(&self, word: &Word) -> f64 {
        self.weights.get(word).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all stored weights
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&Word, f64)> {
        self.weights.iter().map(|(w, &p)| (w, p))
    }
}

impl FromIterator<(Word, f64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (Word, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (word, weight) in iter {
            map.insert(word, weight);
        }
        map
    }
}

/// Candidate-aligned probabilities: `result[i]` is the prior of `candidates[i]`
///
/// # Errors
/// Returns `SolverError::DegenerateDistribution` if the candidates' weights sum to 0
/// (this includes an empty candidate set).
pub fn standardized_weights(
    freq: &FrequencyMap,
    candidates: &[Word],
) -> Result<Vec<f64>, SolverError> {
    let raw: Vec<f64> = candidates.iter().map(|w| freq.weight(w)).collect();
    let total: f64 = raw.iter().sum();

    if total <= 0.0 {
        return Err(SolverError::DegenerateDistribution);
    }

    Ok(raw.into_iter().map(|w| w / total).collect())
}

/// Restrict `freq` to `candidates` and renormalize to sum to 1
///
/// # Errors
/// Returns `SolverError::DegenerateDistribution` if no candidate has nonzero weight.
pub fn standardize(freq: &FrequencyMap, candidates: &[Word]) -> Result<FrequencyMap, SolverError> {
    let probabilities = standardized_weights(freq, candidates)?;
    Ok(candidates.iter().cloned().zip(probabilities).collect())
}

/// Uniform probabilities over `n` candidates
#[must_use]
pub fn uniform_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Shannon entropy in bits: Σ p·log₂(1/p) over the nonzero probabilities
///
/// # Examples
/// ```
/// use entropy_wordle::solver::distribution::shannon_entropy;
///
/// assert!((shannon_entropy([0.5, 0.5]) - 1.0).abs() < 1e-12);
/// assert!((shannon_entropy([0.25; 4]) - 2.0).abs() < 1e-12);
/// assert_eq!(shannon_entropy([1.0, 0.0]), 0.0);
/// ```
#[must_use]
pub fn shannon_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.log2())
        .sum::<f64>()
        .max(0.0)
}

/// Entropy (bits) of the standardized distribution over `candidates`
///
/// A single candidate carries no uncertainty and yields 0.
///
/// # Errors
/// Returns `SolverError::DegenerateDistribution` if no candidate has nonzero weight.
pub fn entropy(freq: &FrequencyMap, candidates: &[Word]) -> Result<f64, SolverError> {
    Ok(shannon_entropy(standardized_weights(freq, candidates)?))
}
