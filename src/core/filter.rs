//! Candidate filtering from a (guess, reply) pair
//!
//! The reply is compiled once into positional and per-letter count constraints,
//! then every candidate is checked against them. The result keeps exactly the
//! words that would have produced the reply, without running the reply engine
//! per candidate.

use super::reply::{Feedback, Reply};
use super::word::{WORD_LEN, Word};

/// Occurrence bound for one guess letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LetterBound {
    letter: u8,
    min: u8,
    exact: bool,
}

/// Constraints a candidate must satisfy to be consistent with one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyConstraints {
    fixed: [Option<u8>; WORD_LEN],
    excluded_at: [u32; WORD_LEN],
    bounds: Vec<LetterBound>,
    satisfiable: bool,
}

const fn letter_bit(letter: u8) -> u32 {
    1 << (letter - b'a')
}

impl ReplyConstraints {
    /// Compile the constraints implied by `reply` for `guess`
    ///
    /// Hits are applied before presents before misses: a miss only excludes a
    /// letter everywhere when no hit/present of the same letter raised its
    /// minimum count; otherwise it excludes the position and caps the count.
    #[must_use]
    pub fn new(guess: &Word, reply: Reply) -> Self {
        let mut fixed = [None; WORD_LEN];
        let mut excluded_at = [0u32; WORD_LEN];
        let mut bounds: Vec<LetterBound> = Vec::with_capacity(WORD_LEN);

        for (i, letter) in positions_with(guess, reply, Feedback::Hit) {
            fixed[i] = Some(letter);
            bump_min(&mut bounds, letter);
        }

        for (i, letter) in positions_with(guess, reply, Feedback::Present) {
            excluded_at[i] |= letter_bit(letter);
            bump_min(&mut bounds, letter);
        }

        for (i, letter) in positions_with(guess, reply, Feedback::Miss) {
            if let Some(bound) = bounds.iter_mut().find(|b| b.letter == letter) {
                if bound.min > 0 {
                    excluded_at[i] |= letter_bit(letter);
                }
                bound.exact = true;
            } else {
                bounds.push(LetterBound {
                    letter,
                    min: 0,
                    exact: true,
                });
            }
        }

        Self {
            fixed,
            excluded_at,
            bounds,
            satisfiable: reply.is_producible_for(guess),
        }
    }

    /// Whether `word` is consistent with the compiled reply
    #[must_use]
    pub fn allows(&self, word: &Word) -> bool {
        if !self.satisfiable {
            return false;
        }

        let positions_ok = word.chars().iter().enumerate().all(|(i, &ch)| {
            self.fixed[i].is_none_or(|f| f == ch) && self.excluded_at[i] & letter_bit(ch) == 0
        });

        positions_ok
            && self.bounds.iter().all(|b| {
                let count = word.count_of(b.letter);
                if b.exact { count == b.min } else { count >= b.min }
            })
    }
}

/// Positions (and guess letters) that received `want`
fn positions_with(
    guess: &Word,
    reply: Reply,
    want: Feedback,
) -> impl Iterator<Item = (usize, u8)> + '_ {
    guess
        .chars()
        .iter()
        .zip(*reply.symbols())
        .enumerate()
        .filter(move |&(_, (_, symbol))| symbol == want)
        .map(|(i, (&letter, _))| (i, letter))
}

fn bump_min(bounds: &mut Vec<LetterBound>, letter: u8) {
    if let Some(bound) = bounds.iter_mut().find(|b| b.letter == letter) {
        bound.min += 1;
    } else {
        bounds.push(LetterBound {
            letter,
            min: 1,
            exact: false,
        });
    }
}

/// Keep the candidates consistent with `reply` to `guess`
///
/// Pure: the input is untouched and the output preserves its order. Replies
/// that no solution could produce for `guess` yield an empty set.
///
/// # Examples
/// ```
/// use entropy_wordle::core::{Reply, Word, filter};
///
/// let words: Vec<Word> = ["bones", "frass", "sissy", "jazzy"]
///     .iter()
///     .map(|w| Word::new(w).unwrap())
///     .collect();
/// let guess = Word::new("sissy").unwrap();
/// let reply = Reply::parse("10000").unwrap();
///
/// let left = filter(&guess, reply, &words);
/// assert_eq!(left, vec![Word::new("bones").unwrap()]);
/// ```
#[must_use]
pub fn filter(guess: &Word, reply: Reply, candidates: &[Word]) -> Vec<Word> {
    let constraints = ReplyConstraints::new(guess, reply);
    candidates
        .iter()
        .filter(|w| constraints.allows(w))
        .cloned()
        .collect()
}
