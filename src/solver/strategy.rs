//! Guess strategies
//!
//! The entropy solver plays the evaluator's pick. The two random strategies
//! are baselines for batch comparisons: one walks a shuffled copy of the
//! vocabulary, the other guesses a random word that is still a candidate.

use super::engine::Solver;
use super::game::{Automatic, GuessSource};
use crate::core::Word;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::fmt;

/// Which guess strategy a game is played with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Highest expected information (default)
    #[default]
    Entropy,
    /// Vocabulary words in random order, ignoring replies
    Random,
    /// A random word among the remaining candidates
    FilteredRandom,
}

impl Strategy {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entropy => "entropy",
            Self::Random => "random",
            Self::FilteredRandom => "filtered-random",
        }
    }

    /// Whether games rely on memoized entropy tables
    #[must_use]
    pub const fn uses_entropy(self) -> bool {
        matches!(self, Self::Entropy)
    }

    /// A guess source for one game, seeded for reproducibility
    #[must_use]
    pub fn source(self, solver: &Solver, seed: u64) -> StrategySource {
        let mut rng = StdRng::seed_from_u64(seed);
        match self {
            Self::Entropy => StrategySource::Entropy(Automatic),
            Self::Random => StrategySource::Random(RandomGuesses::new(solver.guesses(), &mut rng)),
            Self::FilteredRandom => StrategySource::FilteredRandom(FilteredRandom::new(rng)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plays the vocabulary in a fixed random order without repeats
///
/// Once the order is exhausted the evaluator's pick takes over.
#[derive(Debug, Clone)]
pub struct RandomGuesses {
    order: Vec<Word>,
    next: usize,
}

impl RandomGuesses {
    #[must_use]
    pub fn new(vocabulary: &[Word], rng: &mut StdRng) -> Self {
        let mut order = vocabulary.to_vec();
        order.shuffle(rng);
        Self { order, next: 0 }
    }
}

impl GuessSource for RandomGuesses {
    fn guess_for(&mut self, _turn: usize, _candidates: &[Word]) -> Option<Word> {
        let word = self.order.get(self.next).cloned();
        self.next += 1;
        word
    }
}

/// Guesses a uniformly random remaining candidate
#[derive(Debug, Clone)]
pub struct FilteredRandom {
    rng: StdRng,
}

impl FilteredRandom {
    #[must_use]
    pub const fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl GuessSource for FilteredRandom {
    fn guess_for(&mut self, _turn: usize, candidates: &[Word]) -> Option<Word> {
        candidates.choose(&mut self.rng).cloned()
    }
}

/// Runtime-selected guess source
#[derive(Debug, Clone)]
pub enum StrategySource {
    Entropy(Automatic),
    Random(RandomGuesses),
    FilteredRandom(FilteredRandom),
}

impl GuessSource for StrategySource {
    fn guess_for(&mut self, turn: usize, candidates: &[Word]) -> Option<Word> {
        match self {
            Self::Entropy(s) => s.guess_for(turn, candidates),
            Self::Random(s) => s.guess_for(turn, candidates),
            Self::FilteredRandom(s) => s.guess_for(turn, candidates),
        }
    }
}
