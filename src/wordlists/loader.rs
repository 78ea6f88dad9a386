//! Word list loading utilities
//!
//! Lists are plain text: one word per line, or comma-separated (optionally
//! quoted) on one or more lines. Entries that are not 5-letter words are skipped.

use crate::core::Word;
use log::debug;
use std::fs;
use std::io;
use std::path::Path;

/// Load words from a file
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or opened.
///
/// # Examples
/// ```no_run
/// use entropy_wordle::wordlists::loader::load_from_file;
///
/// let words = load_from_file("data/solutions.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let words = parse_words(&content);
    debug!("loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Parse a word list in either supported layout, keeping file order
#[must_use]
pub fn parse_words(content: &str) -> Vec<Word> {
    content
        .split(['\n', ','])
        .map(|entry| entry.trim().trim_matches('"'))
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| Word::new(entry).ok())
        .collect()
}

/// Convert a string slice to a Word vector, skipping invalid entries
///
/// # Examples
/// ```
/// use entropy_wordle::wordlists::loader::words_from_slice;
///
/// let words = words_from_slice(&["cigar", "toolong", "bones"]);
/// assert_eq!(words.len(), 2);
/// ```
#[must_use]
pub fn words_from_slice(slice: &[&str]) -> Vec<Word> {
    slice.iter().filter_map(|&s| Word::new(s).ok()).collect()
}

/// Sorted, de-duplicated union of two lists
#[must_use]
pub fn union(solutions: &[Word], allowed: &[Word]) -> Vec<Word> {
    let mut all: Vec<Word> = solutions.iter().chain(allowed).cloned().collect();
    all.sort();
    all.dedup();
    all
}
