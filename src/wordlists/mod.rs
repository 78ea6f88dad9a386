//! Word lists and frequency priors
//!
//! Solutions are the words that can be the secret; allowed words are extra
//! guesses the game accepts. Their union is the guessing vocabulary.

pub mod frequency;
pub mod loader;

pub use frequency::{SigmoidParams, load_frequencies, sigmoid_normalize};

use crate::core::Word;
use std::io;
use std::path::Path;

/// The two word lists of a game and their union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLists {
    pub solutions: Vec<Word>,
    pub allowed: Vec<Word>,
    /// Sorted, de-duplicated union of both lists
    pub all: Vec<Word>,
}

impl WordLists {
    #[must_use]
    pub fn new(solutions: Vec<Word>, allowed: Vec<Word>) -> Self {
        let all = loader::union(&solutions, &allowed);
        Self {
            solutions,
            allowed,
            all,
        }
    }

    /// Load the solutions list and, optionally, the allowed-words list
    ///
    /// # Errors
    /// Returns an I/O error if a file cannot be read.
    pub fn load(solutions: &Path, allowed: Option<&Path>) -> io::Result<Self> {
        let solutions = loader::load_from_file(solutions)?;
        let allowed = match allowed {
            Some(path) => loader::load_from_file(path)?,
            None => Vec::new(),
        };
        Ok(Self::new(solutions, allowed))
    }
}
