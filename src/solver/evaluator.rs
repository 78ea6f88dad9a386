//! Expected information of a guess
//!
//! A guess splits the candidates into reply buckets. The probability of a
//! bucket is the summed prior of its candidates, and the expected information
//! of the guess is the Shannon entropy of those bucket probabilities.

use super::distribution::{FrequencyMap, shannon_entropy, standardized_weights};
use super::error::SolverError;
use crate::core::{Reply, ReplyConstraints, Word, all_valid_replies};
use log::error;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How far reply probabilities may drift from 1 before the evaluator gives up
pub const PROBABILITY_TOLERANCE: f64 = 1e-5;

fn check_total(guess: &Word, total: f64) -> Result<(), SolverError> {
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        error!("reply probabilities for {guess} sum to {total}; filter and reply universe disagree");
        return Err(SolverError::InconsistentDistribution { total });
    }
    Ok(())
}

/// Probability of each reply to `guess`, given candidate-aligned priors
///
/// Only replies with nonzero probability appear.
#[must_use]
pub fn reply_distribution(
    guess: &Word,
    candidates: &[Word],
    weights: &[f64],
) -> FxHashMap<Reply, f64> {
    let mut buckets: FxHashMap<Reply, f64> = FxHashMap::default();

    for (candidate, &p) in candidates.iter().zip(weights) {
        if p > 0.0 {
            *buckets.entry(Reply::evaluate(candidate, guess)).or_insert(0.0) += p;
        }
    }

    buckets
}

/// Expected entropy of `guess` for candidate-aligned priors that sum to 1
///
/// Buckets come straight from [`Reply::evaluate`] rather than from running the
/// candidate filter once per reply in the universe; the two partitions agree,
/// which [`expected_entropy_exhaustive`] and its tests check. Here the
/// self-check only catches priors that were not normalized.
///
/// # Errors
/// Returns `SolverError::InconsistentDistribution` if the bucket probabilities
/// do not sum to 1 within [`PROBABILITY_TOLERANCE`].
pub fn expected_entropy_with(
    guess: &Word,
    candidates: &[Word],
    weights: &[f64],
) -> Result<f64, SolverError> {
    let buckets = reply_distribution(guess, candidates, weights);
    check_total(guess, buckets.values().sum())?;
    Ok(shannon_entropy(buckets.into_values()))
}

/// Expected information (bits) gained by guessing `guess`
///
/// # Errors
/// - `SolverError::DegenerateDistribution` if no candidate has nonzero frequency
/// - `SolverError::InconsistentDistribution` on a failed self-check
///
/// # Examples
/// ```
/// use entropy_wordle::core::Word;
/// use entropy_wordle::solver::distribution::FrequencyMap;
/// use entropy_wordle::solver::evaluator::expected_entropy;
///
/// let candidates = vec![Word::new("cigar").unwrap(), Word::new("bones").unwrap()];
/// let freq = FrequencyMap::uniform(&candidates);
///
/// // "cigar" tells the two apart perfectly: one full bit
/// let bits = expected_entropy(&candidates[0], &candidates, &freq).unwrap();
/// assert!((bits - 1.0).abs() < 1e-12);
/// ```
pub fn expected_entropy(
    guess: &Word,
    candidates: &[Word],
    freq: &FrequencyMap,
) -> Result<f64, SolverError> {
    let weights = standardized_weights(freq, candidates)?;
    expected_entropy_with(guess, candidates, &weights)
}

/// [`expected_entropy`] computed reply by reply over the whole reply universe
///
/// Each reply's bucket is found with the candidate filter instead of the reply
/// engine. Slower, but checks that the filter partitions the candidates.
///
/// # Errors
/// Same as [`expected_entropy`].
pub fn expected_entropy_exhaustive(
    guess: &Word,
    candidates: &[Word],
    freq: &FrequencyMap,
) -> Result<f64, SolverError> {
    let weights = standardized_weights(freq, candidates)?;

    let probabilities: Vec<f64> = all_valid_replies()
        .iter()
        .map(|&reply| {
            let constraints = ReplyConstraints::new(guess, reply);
            candidates
                .iter()
                .zip(&weights)
                .filter(|(c, _)| constraints.allows(c))
                .map(|(_, &p)| p)
                .sum::<f64>()
        })
        .filter(|&p| p > 0.0)
        .collect();

    check_total(guess, probabilities.iter().sum())?;
    Ok(shannon_entropy(probabilities))
}

/// One row of an entropy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub word: Word,
    /// Expected information (bits) if this word is guessed next
    pub expected_entropy: f64,
    /// Standardized prior that this word is the solution (0 if not a candidate)
    pub prior: f64,
}

/// Expected entropy and prior of every allowed guess for one game state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyTable {
    entries: Vec<TableEntry>,
}

impl EntropyTable {
    /// Evaluate every word in `guesses` against the candidates, in parallel
    ///
    /// `weights` are the candidate-aligned standardized priors. Entries keep
    /// the order of `guesses`.
    ///
    /// # Errors
    /// Propagates the first `SolverError::InconsistentDistribution`.
    pub fn compute(
        guesses: &[Word],
        candidates: &[Word],
        weights: &[f64],
    ) -> Result<Self, SolverError> {
        let priors: FxHashMap<&Word, f64> = candidates.iter().zip(weights.iter().copied()).collect();

        let entries = guesses
            .par_iter()
            .map(|guess| {
                Ok(TableEntry {
                    word: guess.clone(),
                    expected_entropy: expected_entropy_with(guess, candidates, weights)?,
                    prior: priors.get(guess).copied().unwrap_or(0.0),
                })
            })
            .collect::<Result<Vec<_>, SolverError>>()?;

        Ok(Self { entries })
    }

    /// Build a table from precomputed rows
    #[must_use]
    pub const fn from_entries(entries: Vec<TableEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Row for `word`, if it is an allowed guess
    #[must_use]
    pub fn get(&self, word: &Word) -> Option<&TableEntry> {
        self.entries.iter().find(|e| &e.word == word)
    }

    /// Rows by descending expected entropy, alphabetical among equals
    #[must_use]
    pub fn ranked(&self) -> Vec<&TableEntry> {
        let mut rows: Vec<&TableEntry> = self.entries.iter().collect();
        rows.sort_by(|a, b| {
            b.expected_entropy
                .total_cmp(&a.expected_entropy)
                .then_with(|| a.word.cmp(&b.word))
        });
        rows
    }
}
