//! Solver error taxonomy

use crate::core::WordError;
use std::fmt;

/// Errors raised by the distribution model, the guess evaluator and the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A guess or solution was not a valid 5-letter word
    InvalidInput(WordError),
    /// No candidate carries any frequency weight
    DegenerateDistribution,
    /// Reply probabilities did not sum to 1; the filter and reply universe disagree
    InconsistentDistribution { total: f64 },
    /// The reply history ruled out every candidate
    NoCandidates,
    /// A reply arrived while no guess was waiting for one
    NoPendingGuess,
    /// A guess was played while the game was not waiting for one
    UnexpectedGuess,
    /// The game ran past its iteration cap without being solved
    IterationCapExceeded { cap: usize },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "Invalid input: {err}"),
            Self::DegenerateDistribution => {
                write!(f, "No remaining candidate has a nonzero frequency")
            }
            Self::InconsistentDistribution { total } => write!(
                f,
                "Reply probabilities sum to {total:.8} instead of 1 (filter/universe mismatch)"
            ),
            Self::NoCandidates => write!(f, "No candidates remain; the replies contradict each other"),
            Self::NoPendingGuess => write!(f, "No guess is awaiting a reply"),
            Self::UnexpectedGuess => {
                write!(f, "The game is not waiting for a guess")
            }
            Self::IterationCapExceeded { cap } => {
                write!(f, "Gave up after {cap} guesses without solving")
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            _ => None,
        }
    }
}

impl From<WordError> for SolverError {
    fn from(err: WordError) -> Self {
        Self::InvalidInput(err)
    }
}
