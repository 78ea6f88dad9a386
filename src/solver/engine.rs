//! Main solver interface
//!
//! A `Solver` owns everything that stays fixed across games: the guess
//! vocabulary, the initial candidate set, the frequency map, its fingerprint and
//! the configuration. Individual games borrow it.

use super::distribution::{FrequencyMap, shannon_entropy, standardized_weights, uniform_weights};
use super::error::SolverError;
use super::evaluator::{EntropyTable, TableEntry};
use super::game::Game;
use super::memo::{EntropyCache, Fingerprint, History};
use super::policy::{Choice, ScoringPolicy, select_guess};
use crate::core::Word;
use log::{debug, warn};
use std::sync::Arc;

/// Default hard cap on guesses per game
pub const DEFAULT_MAX_ITERATIONS: usize = 16;

/// Per-game settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub policy: ScoringPolicy,
    /// A game that has not been solved after this many guesses is a failure
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::PURE_ENTROPY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// The best guess for a game state, with the table it was picked from
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub choice: Choice,
    /// `None` when the state had a single candidate and no table was needed
    pub table: Option<Arc<EntropyTable>>,
}

/// Shared context for playing games
#[derive(Debug, Clone)]
pub struct Solver {
    guesses: Vec<Word>,
    candidates: Vec<Word>,
    freq: FrequencyMap,
    fingerprint: Fingerprint,
    config: SolverConfig,
}

impl Solver {
    /// Create a solver
    ///
    /// # Parameters
    /// - `guesses`: every word the solver may play
    /// - `candidates`: words that may be the solution at the start of a game
    /// - `freq`: raw prior weights; standardized over the candidates as needed
    ///
    /// # Errors
    /// Returns `SolverError::NoCandidates` if either list is empty.
    pub fn new(
        guesses: Vec<Word>,
        candidates: Vec<Word>,
        freq: FrequencyMap,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        if guesses.is_empty() || candidates.is_empty() {
            return Err(SolverError::NoCandidates);
        }

        let fingerprint = Fingerprint::new(&guesses, &candidates, &freq);
        Ok(Self {
            guesses,
            candidates,
            freq,
            fingerprint,
            config,
        })
    }

    #[must_use]
    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    #[must_use]
    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    #[must_use]
    pub const fn frequencies(&self) -> &FrequencyMap {
        &self.freq
    }

    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Start a game from the full candidate set
    #[must_use]
    pub fn new_game(&self) -> Game<'_> {
        Game::new(self)
    }

    /// Candidate-aligned priors for `candidates`
    ///
    /// When every candidate has zero frequency the priors fall back to uniform.
    #[must_use]
    pub fn weights(&self, candidates: &[Word]) -> Vec<f64> {
        standardized_weights(&self.freq, candidates).unwrap_or_else(|err| {
            warn!(
                "{err} among {} candidates; using uniform priors",
                candidates.len()
            );
            uniform_weights(candidates.len())
        })
    }

    /// Entropy (bits) of the prior over `candidates`
    #[must_use]
    pub fn entropy_of(&self, candidates: &[Word]) -> f64 {
        shannon_entropy(self.weights(candidates))
    }

    /// Entropy table for the state reached by `history`
    ///
    /// Served from `cache` when present; otherwise computed over the whole
    /// guess vocabulary and recorded.
    ///
    /// # Errors
    /// Propagates `SolverError::InconsistentDistribution` from the evaluator.
    pub fn table<C: EntropyCache + ?Sized>(
        &self,
        history: &History,
        candidates: &[Word],
        weights: &[f64],
        cache: &mut C,
    ) -> Result<Arc<EntropyTable>, SolverError> {
        let key = history.key();
        if let Some(table) = cache.lookup(&key) {
            debug!("memo hit after {} guesses ({key})", history.len());
            return Ok(table);
        }

        debug!(
            "memo miss after {} guesses; evaluating {} guesses against {} candidates",
            history.len(),
            self.guesses.len(),
            candidates.len()
        );
        let table = Arc::new(EntropyTable::compute(&self.guesses, candidates, weights)?);
        cache.record(key, Arc::clone(&table));
        Ok(table)
    }

    /// Best next guess for a game state
    ///
    /// `turn` is the 1-based number of the guess being chosen. A single
    /// remaining candidate is returned directly with zero expected entropy.
    ///
    /// # Errors
    /// - `SolverError::NoCandidates` if `candidates` is empty
    /// - `SolverError::InconsistentDistribution` from the evaluator
    pub fn suggest<C: EntropyCache + ?Sized>(
        &self,
        history: &History,
        candidates: &[Word],
        weights: &[f64],
        cache: &mut C,
    ) -> Result<Suggestion, SolverError> {
        let turn = history.len() + 1;
        let current_entropy = shannon_entropy(weights.iter().copied());

        match candidates {
            [] => Err(SolverError::NoCandidates),
            [only] => {
                let entry = TableEntry {
                    word: only.clone(),
                    expected_entropy: 0.0,
                    prior: 1.0,
                };
                let score = self.config.policy.score(turn, 0.0, &entry);
                Ok(Suggestion {
                    choice: Choice::from_entry(&entry, score),
                    table: None,
                })
            }
            _ => {
                let table = self.table(history, candidates, weights, cache)?;
                let choice = select_guess(
                    &table,
                    candidates,
                    current_entropy,
                    turn,
                    &self.config.policy,
                )
                .ok_or(SolverError::NoCandidates)?;
                Ok(Suggestion {
                    choice,
                    table: Some(table),
                })
            }
        }
    }
}
