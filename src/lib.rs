//! Entropy Wordle
//!
//! A Wordle solver that weighs every possible reply by how likely it is and
//! picks the guess with the highest expected information.
//!
//! # Quick Start
//!
//! ```rust
//! use entropy_wordle::core::{Reply, Word};
//! use entropy_wordle::solver::{FrequencyMap, MemoStore, Solver, SolverConfig, solve};
//!
//! // Reply to the guess "cigar" when the solution is "grade"
//! let reply = Reply::evaluate_text("grade", "cigar").unwrap();
//! assert_eq!(reply.to_string(), "00111");
//!
//! // Play a whole game
//! let words: Vec<Word> = ["cigar", "grade", "bones", "sissy"]
//!     .iter()
//!     .map(|w| Word::new(w).unwrap())
//!     .collect();
//! let freq = FrequencyMap::uniform(&words);
//! let solver = Solver::new(words.clone(), words.clone(), freq, SolverConfig::default()).unwrap();
//!
//! let report = solve(&solver, &words[1], &mut MemoStore::new());
//! assert!(report.is_solved());
//! ```

// Words, replies and the candidate filter
pub mod core;

// Entropy evaluation, memoization and the game loop
pub mod solver;

// Word lists and frequency priors
pub mod wordlists;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
