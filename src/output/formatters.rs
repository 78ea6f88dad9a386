//! Formatting utilities for terminal output

use crate::core::{Feedback, Reply, Word};
use colored::Colorize;

/// Upper-case guess with each letter colored by its feedback
#[must_use]
pub fn colored_guess(guess: &Word, reply: Reply) -> String {
    guess
        .text()
        .to_uppercase()
        .chars()
        .zip(reply.symbols())
        .map(|(letter, symbol)| {
            let letter = letter.to_string();
            match symbol {
                Feedback::Hit => letter.black().on_green().to_string(),
                Feedback::Present => letter.black().on_yellow().to_string(),
                Feedback::Miss => letter.bright_black().to_string(),
            }
        })
        .collect()
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64).max(0.0) as usize
    } else {
        0
    };
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Entropy as a bar scaled to `max_bits`
#[must_use]
pub fn entropy_bar(entropy: f64, max_bits: f64, width: usize) -> String {
    create_progress_bar(entropy, max_bits, width)
}
