//! Core domain types for Wordle
//!
//! Words, replies, the reply universe and the candidate filter. Everything
//! here is pure and deterministic.

mod filter;
mod reply;
mod universe;
mod word;

pub use filter::{ReplyConstraints, filter};
pub use reply::{Feedback, Reply, ReplyError};
pub use universe::all_valid_replies;
pub use word::{WORD_LEN, Word, WordError};
