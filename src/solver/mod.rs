//! Entropy-driven solving
//!
//! The distribution model turns word frequencies into priors, the evaluator
//! scores guesses by expected information, the policy picks one, and the game
//! loop plays it, memoizing entropy tables by history. Random baseline
//! strategies can stand in for the evaluator's pick.

pub mod distribution;
mod engine;
mod error;
pub mod evaluator;
pub mod game;
pub mod memo;
pub mod policy;
pub mod strategy;

pub use distribution::FrequencyMap;
pub use engine::{DEFAULT_MAX_ITERATIONS, Solver, SolverConfig, Suggestion};
pub use error::SolverError;
pub use evaluator::{EntropyTable, TableEntry};
pub use game::{
    Automatic, Game, GameReport, GameState, GuessSource, KnownSolution, Openers, Outcome,
    ReplySource, Step, play, solve,
};
pub use memo::{EntropyCache, MemoStore, PersistentStore, StoreConfig, WorkerCache};
pub use policy::{Choice, ScoringPolicy, select_guess};
pub use strategy::{Strategy, StrategySource};
