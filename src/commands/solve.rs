//! Word solving command
//!
//! Plays one game against a known target and returns every step.

use crate::core::Word;
use crate::solver::{EntropyCache, GameReport, KnownSolution, Openers, Solver, Strategy, play};
use anyhow::{Result, bail};

/// Result of solving a word
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub target: Word,
    pub report: GameReport,
}

impl SolveResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.report.is_solved()
    }
}

/// How a single game is played
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Played first, before the strategy takes over
    pub openers: Vec<Word>,
    pub strategy: Strategy,
    /// Seed for the random strategies; random when absent
    pub seed: Option<u64>,
}

/// Solve `target` with the given openers and strategy
///
/// # Errors
///
/// Returns an error if the target is not a 5-letter word or is not one of the
/// solver's candidates.
pub fn solve_word<C: EntropyCache + ?Sized>(
    target: &str,
    options: &SolveOptions,
    solver: &Solver,
    cache: &mut C,
) -> Result<SolveResult> {
    let target = Word::new(target)?;
    if !solver.candidates().contains(&target) {
        bail!("'{target}' is not a possible solution");
    }

    let seed = options.seed.unwrap_or_else(rand::random);
    let strategy = options.strategy.source(solver, seed);
    let report = play(
        solver.new_game(),
        &mut Openers::followed_by(options.openers.clone(), strategy),
        &mut KnownSolution(target.clone()),
        cache,
    );

    Ok(SolveResult { target, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{FrequencyMap, MemoStore, Outcome, SolverConfig};
    use crate::wordlists::loader::words_from_slice;

    fn setup_solver(max_iterations: usize) -> Solver {
        let words = words_from_slice(&[
            "aback", "abase", "abate", "abbey", "abbot", "abhor", "abide", "abled", "abode",
            "abort", "about", "above", "abuse", "abyss", "acorn", "acrid", "actor", "acute",
        ]);
        let freq = FrequencyMap::uniform(&words);
        let config = SolverConfig {
            max_iterations,
            ..SolverConfig::default()
        };
        Solver::new(words.clone(), words, freq, config).unwrap()
    }

    #[test]
    fn solve_word_succeeds() {
        let solver = setup_solver(16);
        let result = solve_word("abase", &SolveOptions::default(), &solver, &mut MemoStore::new()).unwrap();

        assert!(result.success());
        assert_eq!(result.report.steps.last().unwrap().guess, result.target);
    }

    #[test]
    fn solve_records_history() {
        let solver = setup_solver(16);
        let result = solve_word("acute", &SolveOptions::default(), &solver, &mut MemoStore::new()).unwrap();

        assert!(!result.report.steps.is_empty());
        for step in &result.report.steps {
            assert!(step.candidates_after <= step.candidates_before);
        }
    }

    #[test]
    fn solve_invalid_target_returns_error() {
        let solver = setup_solver(16);
        let mut cache = MemoStore::new();

        assert!(solve_word("zzzzz", &SolveOptions::default(), &solver, &mut cache).is_err());
        assert!(solve_word("toolong", &SolveOptions::default(), &solver, &mut cache).is_err());
    }

    #[test]
    fn solve_plays_openers() {
        let solver = setup_solver(16);
        let options = SolveOptions {
            openers: words_from_slice(&["acrid"]),
            ..SolveOptions::default()
        };
        let result = solve_word("abbey", &options, &solver, &mut MemoStore::new()).unwrap();

        assert!(result.success());
        assert_eq!(result.report.steps[0].guess.text(), "acrid");
    }

    #[test]
    fn solve_respects_iteration_cap() {
        let solver = setup_solver(1);
        let options = SolveOptions {
            openers: words_from_slice(&["acorn"]),
            ..SolveOptions::default()
        };
        let result = solve_word("abbey", &options, &solver, &mut MemoStore::new()).unwrap();

        assert!(!result.success());
        assert!(matches!(result.report.outcome, Outcome::Failed(_)));
        assert_eq!(result.report.guesses(), 1);
    }

    #[test]
    fn solve_with_filtered_random_is_seeded() {
        let solver = setup_solver(16);
        let options = SolveOptions {
            strategy: Strategy::FilteredRandom,
            seed: Some(9),
            ..SolveOptions::default()
        };
        let mut cache = MemoStore::new();
        let first = solve_word("abide", &options, &solver, &mut cache).unwrap();
        let second = solve_word("abide", &options, &solver, &mut cache).unwrap();

        assert!(first.success());
        assert_eq!(first.report, second.report);
        assert!(cache.is_empty());
    }

    #[test]
    fn solve_with_random_ends_within_cap() {
        let solver = setup_solver(4);
        let options = SolveOptions {
            strategy: Strategy::Random,
            seed: Some(2),
            ..SolveOptions::default()
        };
        let result = solve_word("acorn", &options, &solver, &mut MemoStore::new()).unwrap();
        assert!(result.report.guesses() <= 4);
        if !result.success() {
            assert!(matches!(
                result.report.outcome,
                Outcome::Failed(crate::solver::SolverError::IterationCapExceeded { cap: 4 })
            ));
        }
    }
}
