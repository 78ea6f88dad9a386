//! Batch evaluation over many solutions
//!
//! Games are independent, so they run in parallel. Each rayon worker reads the
//! shared memo store and keeps what it computes in a private delta; the deltas
//! are merged into the store once the batch is over.

use crate::core::Word;
use crate::solver::{
    GameReport, KnownSolution, MemoStore, Openers, Outcome, Solver, Strategy, WorkerCache, play,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Conventional number of guesses a game may take before it counts as lost
pub const DEFAULT_LOSS_THRESHOLD: usize = 6;

/// Which targets to play and how to judge them
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Play at most this many targets
    pub limit: Option<usize>,
    /// Shuffle targets before applying the limit
    pub shuffle: bool,
    /// Seed for the shuffle and the random strategies; random when absent
    pub seed: Option<u64>,
    pub strategy: Strategy,
    /// Games needing more guesses than this are losses
    pub loss_threshold: usize,
    pub openers: Vec<Word>,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            limit: None,
            shuffle: false,
            seed: None,
            strategy: Strategy::Entropy,
            loss_threshold: DEFAULT_LOSS_THRESHOLD,
            openers: Vec::new(),
            show_progress: true,
        }
    }
}

/// Result from playing a single target
#[derive(Debug, Clone)]
pub struct WordResult {
    pub word: Word,
    pub report: GameReport,
}

/// Statistics over a batch
#[derive(Debug, Clone)]
pub struct BatchStatistics {
    pub total_words: usize,
    pub solved: usize,
    /// Games unsolved or solved in more guesses than the loss threshold
    pub losses: usize,
    pub loss_threshold: usize,
    /// Mean guesses over solved games
    pub average_guesses: f64,
    pub min_guesses: usize,
    pub max_guesses: usize,
    pub guess_distribution: BTreeMap<usize, usize>,
    pub hardest_words: Vec<(Word, usize)>,
    pub failures: Vec<(Word, String)>,
    pub total_time: Duration,
    /// Tables this batch added to the memo store
    pub new_tables: usize,
}

impl BatchStatistics {
    /// Share of games lost, in [0, 1]
    #[must_use]
    pub fn loss_rate(&self) -> f64 {
        if self.total_words == 0 {
            0.0
        } else {
            self.losses as f64 / self.total_words as f64
        }
    }

    /// Summarize finished games
    #[must_use]
    pub fn from_results(results: &[WordResult], loss_threshold: usize) -> Self {
        let solved: Vec<(&Word, usize)> = results
            .iter()
            .filter(|r| r.report.is_solved())
            .map(|r| (&r.word, r.report.guesses()))
            .collect();

        let mut guess_distribution = BTreeMap::new();
        for &(_, guesses) in &solved {
            *guess_distribution.entry(guesses).or_insert(0) += 1;
        }

        let average_guesses = if solved.is_empty() {
            0.0
        } else {
            solved.iter().map(|&(_, n)| n).sum::<usize>() as f64 / solved.len() as f64
        };

        let losses = results.len() - solved.iter().filter(|&&(_, n)| n <= loss_threshold).count();

        let mut hardest_words: Vec<(Word, usize)> = solved
            .iter()
            .filter(|&&(_, n)| n >= loss_threshold.saturating_sub(1))
            .map(|&(w, n)| (w.clone(), n))
            .collect();
        hardest_words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        hardest_words.truncate(10);

        let failures = results
            .iter()
            .filter_map(|r| match &r.report.outcome {
                Outcome::Solved => None,
                Outcome::Failed(err) => Some((r.word.clone(), err.to_string())),
                Outcome::Abandoned => Some((r.word.clone(), "abandoned".to_string())),
            })
            .collect();

        Self {
            total_words: results.len(),
            solved: solved.len(),
            losses,
            loss_threshold,
            average_guesses,
            min_guesses: solved.iter().map(|&(_, n)| n).min().unwrap_or(0),
            max_guesses: solved.iter().map(|&(_, n)| n).max().unwrap_or(0),
            guess_distribution,
            hardest_words,
            failures,
            total_time: Duration::ZERO,
            new_tables: 0,
        }
    }
}

/// Pick the targets a batch will play
#[must_use]
pub fn select_targets(targets: &[Word], config: &BatchConfig) -> Vec<Word> {
    let mut selected = targets.to_vec();
    if config.shuffle {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        selected.shuffle(&mut rng);
    }
    if let Some(limit) = config.limit {
        selected.truncate(limit);
    }
    selected
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

/// Play every selected target and merge new tables into `store`
pub fn run_batch(
    solver: &Solver,
    targets: &[Word],
    config: &BatchConfig,
    store: &mut MemoStore,
) -> (Vec<WordResult>, BatchStatistics) {
    let targets = select_targets(targets, config);
    let base_seed = config.seed.unwrap_or_else(rand::random);
    info!("playing {} games with the {} strategy", targets.len(), config.strategy);

    let start = Instant::now();
    let before = store.len();

    // Every game without openers starts from the same table; compute it once
    // here instead of once per worker.
    let shared_opening = config.openers.is_empty() && solver.candidates().len() > 1;
    if config.strategy.uses_entropy() && shared_opening {
        if let Err(err) = solver.new_game().suggest(store) {
            warn!("could not evaluate the opening position: {err}");
        }
    }

    let pb = progress_bar(targets.len(), config.show_progress);
    let shared: &MemoStore = store;

    let (results, delta) = targets
        .par_iter()
        .enumerate()
        .fold(
            || (Vec::new(), WorkerCache::new(shared)),
            |(mut results, mut cache), (index, target)| {
                let strategy = config
                    .strategy
                    .source(solver, base_seed.wrapping_add(index as u64));
                let report = play(
                    solver.new_game(),
                    &mut Openers::followed_by(config.openers.clone(), strategy),
                    &mut KnownSolution(target.clone()),
                    &mut cache,
                );
                results.push(WordResult {
                    word: target.clone(),
                    report,
                });
                pb.inc(1);
                (results, cache)
            },
        )
        .map(|(results, cache)| (results, cache.into_delta()))
        .reduce(
            || (Vec::new(), MemoStore::new()),
            |(mut results, mut delta), (more, other)| {
                results.extend(more);
                delta.merge(other);
                (results, delta)
            },
        );

    pb.finish_with_message("Complete!");
    store.merge(delta);

    let mut stats = BatchStatistics::from_results(&results, config.loss_threshold);
    stats.total_time = start.elapsed();
    stats.new_tables = store.len() - before;

    for (word, reason) in &stats.failures {
        warn!("{word}: {reason}");
    }

    (results, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{DEFAULT_MAX_ITERATIONS, FrequencyMap, SolverConfig};
    use crate::wordlists::loader::words_from_slice;

    fn setup_solver() -> Solver {
        let words = words_from_slice(&[
            "cigar", "rebut", "sissy", "humph", "awake", "blush", "focal", "evade", "naval",
            "serve", "heath", "dwarf", "model", "karma", "stink", "grade", "quiet", "bench",
            "abate", "feign",
        ]);
        let freq = FrequencyMap::uniform(&words);
        Solver::new(words.clone(), words, freq, SolverConfig::default()).unwrap()
    }

    fn quiet(config: BatchConfig) -> BatchConfig {
        BatchConfig {
            show_progress: false,
            ..config
        }
    }

    #[test]
    fn batch_solves_all_and_fills_store() {
        let solver = setup_solver();
        let mut store = MemoStore::new();
        let (results, stats) = run_batch(
            &solver,
            solver.candidates(),
            &quiet(BatchConfig::default()),
            &mut store,
        );

        assert_eq!(results.len(), 20);
        assert_eq!(stats.solved, 20);
        assert_eq!(stats.losses, 0);
        assert!(stats.failures.is_empty());
        assert!(stats.average_guesses >= 1.0 && stats.average_guesses <= 6.0);
        assert_eq!(stats.guess_distribution.values().sum::<usize>(), 20);
        assert_eq!(stats.new_tables, store.len());
        assert!(!store.is_empty());

        for (result, target) in results.iter().zip(solver.candidates()) {
            assert_eq!(&result.word, target);
        }
    }

    #[test]
    fn second_batch_reuses_the_store() {
        let solver = setup_solver();
        let mut store = MemoStore::new();
        let config = quiet(BatchConfig::default());

        let (first, _) = run_batch(&solver, solver.candidates(), &config, &mut store);
        let size = store.len();
        let (second, stats) = run_batch(&solver, solver.candidates(), &config, &mut store);

        assert_eq!(store.len(), size);
        assert_eq!(stats.new_tables, 0);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.report, b.report);
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible_and_limited() {
        let words = setup_solver().candidates().to_vec();
        let config = BatchConfig {
            shuffle: true,
            seed: Some(7),
            limit: Some(5),
            ..BatchConfig::default()
        };

        let a = select_targets(&words, &config);
        let b = select_targets(&words, &config);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.iter().all(|w| words.contains(w)));
    }

    #[test]
    fn tight_threshold_counts_losses() {
        let solver = setup_solver();
        let mut store = MemoStore::new();
        let config = quiet(BatchConfig {
            loss_threshold: 1,
            ..BatchConfig::default()
        });
        let (_, stats) = run_batch(&solver, solver.candidates(), &config, &mut store);

        let solved_first_try = stats.guess_distribution.get(&1).copied().unwrap_or(0);
        assert_eq!(stats.losses, stats.total_words - solved_first_try);
        assert!(stats.loss_rate() > 0.9);
    }

    #[test]
    fn baseline_strategies_report_statistics() {
        let solver = setup_solver();
        for strategy in [Strategy::Random, Strategy::FilteredRandom] {
            let config = quiet(BatchConfig {
                strategy,
                seed: Some(42),
                ..BatchConfig::default()
            });
            let mut store = MemoStore::new();
            let (results, stats) = run_batch(&solver, solver.candidates(), &config, &mut store);

            assert_eq!(results.len(), 20);
            assert_eq!(stats.solved + stats.failures.len(), 20);
            assert!(stats.losses >= stats.failures.len());
            assert_eq!(stats.guess_distribution.values().sum::<usize>(), stats.solved);
            assert!(
                results
                    .iter()
                    .all(|r| r.report.guesses() <= DEFAULT_MAX_ITERATIONS)
            );
            for (_, reason) in &stats.failures {
                assert!(reason.starts_with("Gave up"), "{strategy}: {reason}");
            }
            // random guesses never consult entropy tables
            assert!(store.is_empty());

            let (again, _) = run_batch(&solver, solver.candidates(), &config, &mut MemoStore::new());
            for (a, b) in results.iter().zip(&again) {
                assert_eq!(a.report, b.report);
            }
        }
    }

    #[test]
    fn empty_batch_has_zero_rates() {
        let stats = BatchStatistics::from_results(&[], DEFAULT_LOSS_THRESHOLD);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.loss_rate(), 0.0);
        assert_eq!(stats.average_guesses, 0.0);
    }
}
