//! Guess scoring policies
//!
//! The pure policy maximizes expected information. A cost policy instead
//! estimates the expected total number of guesses: with probability `p` the
//! guess is the solution and the game ends this turn; otherwise a fitted
//! quadratic `a·x² + b·x + c` of the residual entropy `x` predicts how many
//! more guesses are needed.

use super::evaluator::{EntropyTable, TableEntry};
use crate::core::Word;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Coefficients `(a, b, c)` of the expected-extra-guesses model
///
/// All zero means pure entropy maximization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringPolicy {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ScoringPolicy {
    pub const PURE_ENTROPY: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub fn is_pure_entropy(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }

    /// Predicted guesses still needed after leaving `residual` bits unresolved
    #[must_use]
    pub fn expected_extra_guesses(&self, residual: f64) -> f64 {
        self.a * residual * residual + self.b * residual + self.c
    }

    /// Higher is better: the negated expected total guesses for `entry`
    ///
    /// `turn` is the 1-based number of the guess being chosen and
    /// `current_entropy` the entropy of the candidate distribution now.
    #[must_use]
    pub fn score(&self, turn: usize, current_entropy: f64, entry: &TableEntry) -> f64 {
        let turn = turn as f64;
        let p = entry.prior;
        let residual = current_entropy - entry.expected_entropy;
        -(p * turn + (1.0 - p) * (turn + self.expected_extra_guesses(residual)))
    }
}

/// The guess picked for the next turn
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub word: Word,
    pub expected_entropy: f64,
    pub prior: f64,
    pub score: f64,
}

impl Choice {
    pub(crate) fn from_entry(entry: &TableEntry, score: f64) -> Self {
        Self {
            word: entry.word.clone(),
            expected_entropy: entry.expected_entropy,
            prior: entry.prior,
            score,
        }
    }
}

/// First entry with the highest expected entropy
fn top_by_entropy<'t>(entries: impl Iterator<Item = &'t TableEntry>) -> Option<&'t TableEntry> {
    entries.fold(None, |best: Option<&TableEntry>, entry| match best {
        Some(b) if b.expected_entropy >= entry.expected_entropy => Some(b),
        _ => Some(entry),
    })
}

/// Pick the best guess from `table` under `policy`
///
/// Pure entropy compares two views: the most informative guess overall and the
/// most informative remaining candidate. The overall pick only wins when it is
/// strictly more informative, since a candidate might also be the answer.
///
/// With a cost policy the highest [`ScoringPolicy::score`] wins, ties going
/// to the higher expected entropy, then to table order.
///
/// Returns `None` for an empty table.
#[must_use]
pub fn select_guess(
    table: &EntropyTable,
    candidates: &[Word],
    current_entropy: f64,
    turn: usize,
    policy: &ScoringPolicy,
) -> Option<Choice> {
    if policy.is_pure_entropy() {
        let in_candidates: FxHashSet<&Word> = candidates.iter().collect();
        let overall = top_by_entropy(table.entries().iter());
        let remaining = top_by_entropy(
            table
                .entries()
                .iter()
                .filter(|e| in_candidates.contains(&e.word)),
        );

        let pick = match (overall, remaining) {
            (Some(o), Some(r)) if o.expected_entropy > r.expected_entropy => o,
            (_, Some(r)) => r,
            (o, None) => o?,
        };
        return Some(Choice::from_entry(
            pick,
            policy.score(turn, current_entropy, pick),
        ));
    }

    table
        .entries()
        .iter()
        .map(|e| (e, policy.score(turn, current_entropy, e)))
        .fold(None, |best: Option<(&TableEntry, f64)>, (entry, score)| match best {
            Some((b, bs))
                if bs.total_cmp(&score).then(b.expected_entropy.total_cmp(&entry.expected_entropy))
                    != Ordering::Less =>
            {
                Some((b, bs))
            }
            _ => Some((entry, score)),
        })
        .map(|(entry, score)| Choice::from_entry(entry, score))
}
