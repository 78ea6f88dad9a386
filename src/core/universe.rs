//! The set of replies a five-letter guess can receive
//!
//! Built once per process and shared read-only.

use super::reply::{Feedback, Reply};
use once_cell::sync::Lazy;

static VALID_REPLIES: Lazy<Vec<Reply>> = Lazy::new(|| {
    (0..243u8)
        .map(Reply::from_value)
        .filter(|r| !(r.count(Feedback::Hit) == 4 && r.count(Feedback::Present) == 1))
        .collect()
});

/// Every reply some (guess, solution) pair can produce, in base-3 order
///
/// This is all 3^5 symbol patterns except the five with four hits and one
/// present: when four letters are placed, the fifth has nowhere else to go.
/// Guess-specific impossibilities (repeated letters) are left to
/// [`Reply::is_producible_for`].
#[must_use]
pub fn all_valid_replies() -> &'static [Reply] {
    &VALID_REPLIES
}
