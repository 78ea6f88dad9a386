//! Wordle feedback ("reply") calculation and representation
//!
//! A reply is five feedback symbols, one per guess position:
//! - 0 = Miss (grey, letter not in the remaining solution)
//! - 1 = Present (yellow, letter in the solution but elsewhere)
//! - 2 = Hit (green, letter in the correct position)
//!
//! The compact form used for hashing and cache keys is a base-3 number
//! where position `i` contributes `digit × 3^i` (0-242).

use super::word::{WORD_LEN, Word, WordError};
use std::fmt;

/// Feedback for a single guess position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feedback {
    Miss,
    Present,
    Hit,
}

impl Feedback {
    /// Digit in the 0/1/2 reply notation
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Miss => 0,
            Self::Present => 1,
            Self::Hit => 2,
        }
    }

    const fn from_digit(digit: u8) -> Self {
        match digit {
            2 => Self::Hit,
            1 => Self::Present,
            _ => Self::Miss,
        }
    }

    const fn emoji(self) -> char {
        match self {
            Self::Miss => '⬜',
            Self::Present => '🟨',
            Self::Hit => '🟩',
        }
    }
}

/// Error type for malformed reply strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    InvalidLength(usize),
    InvalidSymbol(char),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "Reply must have exactly 5 symbols, got {len}")
            }
            Self::InvalidSymbol(ch) => write!(
                f,
                "Invalid reply symbol '{ch}' (use 0/1/2, G/Y/-, or 🟩🟨⬜)"
            ),
        }
    }
}

impl std::error::Error for ReplyError {}

/// Feedback for a whole guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reply([Feedback; WORD_LEN]);

impl Reply {
    /// All greens (solved)
    pub const ALL_HIT: Self = Self([Feedback::Hit; WORD_LEN]);

    /// Build a reply from explicit symbols
    #[must_use]
    pub const fn new(symbols: [Feedback; WORD_LEN]) -> Self {
        Self(symbols)
    }

    /// Build a reply from its base-3 value
    ///
    /// Values of 243 and above wrap onto the low five digits.
    #[must_use]
    pub const fn from_value(mut value: u8) -> Self {
        let mut symbols = [Feedback::Miss; WORD_LEN];
        let mut i = 0;
        while i < WORD_LEN {
            symbols[i] = Feedback::from_digit(value % 3);
            value /= 3;
            i += 1;
        }
        Self(symbols)
    }

    /// Compute the reply the game gives for `guess` when the secret is `solution`
    ///
    /// Two passes: exact matches claim their letter first, then remaining guess
    /// letters are marked present left to right while unclaimed copies remain in
    /// the solution. A repeated guess letter is therefore never marked
    /// hit/present more often than the solution contains it.
    ///
    /// # Examples
    /// ```
    /// use entropy_wordle::core::{Reply, Word};
    ///
    /// let solution = Word::new("bones").unwrap();
    /// let guess = Word::new("sissy").unwrap();
    ///
    /// // Only one of the three s's is yellow: "bones" has a single s.
    /// assert_eq!(Reply::evaluate(&solution, &guess).to_string(), "10000");
    /// ```
    #[must_use]
    pub fn evaluate(solution: &Word, guess: &Word) -> Self {
        let mut symbols = [Feedback::Miss; WORD_LEN];
        let mut available = solution.letter_counts();

        for (i, (&g, &s)) in guess.chars().iter().zip(solution.chars()).enumerate() {
            if g == s {
                symbols[i] = Feedback::Hit;
                available[usize::from(g - b'a')] -= 1;
            }
        }

        for (i, &g) in guess.chars().iter().enumerate() {
            if symbols[i] == Feedback::Hit {
                continue;
            }
            let slot = &mut available[usize::from(g - b'a')];
            if *slot > 0 {
                symbols[i] = Feedback::Present;
                *slot -= 1;
            }
        }

        Self(symbols)
    }

    /// Text form of [`Reply::evaluate`]
    ///
    /// # Errors
    /// Returns `WordError` if either input is not a valid 5-letter word.
    pub fn evaluate_text(solution: &str, guess: &str) -> Result<Self, WordError> {
        Ok(Self::evaluate(&Word::new(solution)?, &Word::new(guess)?))
    }

    /// Feedback symbols in guess order
    #[inline]
    #[must_use]
    pub const fn symbols(&self) -> &[Feedback; WORD_LEN] {
        &self.0
    }

    /// Base-3 value (0-242)
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
            .iter()
            .rev()
            .fold(0u8, |acc, symbol| acc * 3 + symbol.digit())
    }

    /// Check if this is a perfect match (all greens)
    #[inline]
    #[must_use]
    pub fn is_solved(self) -> bool {
        self == Self::ALL_HIT
    }

    /// Number of positions with the given feedback
    #[must_use]
    pub fn count(self, feedback: Feedback) -> usize {
        self.0.iter().filter(|&&s| s == feedback).count()
    }

    /// Whether some solution could produce this reply for `guess`
    ///
    /// Two things make a reply impossible: a letter marked present after an
    /// earlier copy of the same letter was marked miss (presence is assigned
    /// left to right), and more present marks for a letter than there are
    /// non-hit positions the letter could occupy.
    #[must_use]
    pub fn is_producible_for(self, guess: &Word) -> bool {
        let open_positions = WORD_LEN - self.count(Feedback::Hit);
        let mut seen_miss = [false; 26];
        let mut present = [0usize; 26];
        let mut missed = [0usize; 26];

        for (&letter, &symbol) in guess.chars().iter().zip(&self.0) {
            let idx = usize::from(letter - b'a');
            match symbol {
                Feedback::Hit => {}
                Feedback::Present => {
                    if seen_miss[idx] {
                        return false;
                    }
                    present[idx] += 1;
                }
                Feedback::Miss => {
                    seen_miss[idx] = true;
                    missed[idx] += 1;
                }
            }
        }

        present
            .iter()
            .zip(&missed)
            .all(|(&p, &m)| p == 0 || 2 * p + m <= open_positions)
    }

    /// Parse a reply typed by a player
    ///
    /// Accepts:
    /// - `2`/`G`/`g`/🟩 for hit
    /// - `1`/`Y`/`y`/🟨 for present
    /// - `0`/`-`/`_`/`.`/⬜/⬛ for miss
    ///
    /// Spaces and commas between symbols are ignored, so `"0 2 1 0 0"`,
    /// `"02100"` and `"-GY--"` are all the same reply.
    ///
    /// # Errors
    /// Returns `ReplyError` for unknown symbols or a symbol count other than 5.
    pub fn parse(input: &str) -> Result<Self, ReplyError> {
        let mut digits = Vec::with_capacity(WORD_LEN);
        for ch in input.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            let feedback = match ch {
                '2' | 'G' | 'g' | '🟩' => Feedback::Hit,
                '1' | 'Y' | 'y' | '🟨' => Feedback::Present,
                '0' | '-' | '_' | '.' | '⬜' | '⬛' => Feedback::Miss,
                other => return Err(ReplyError::InvalidSymbol(other)),
            };
            digits.push(feedback);
        }

        let symbols: [Feedback; WORD_LEN] = digits
            .as_slice()
            .try_into()
            .map_err(|_| ReplyError::InvalidLength(digits.len()))?;
        Ok(Self(symbols))
    }

    /// Render as emoji squares, e.g. `🟩🟨⬜⬜🟩`
    #[must_use]
    pub fn to_emoji(self) -> String {
        self.0.iter().map(|s| s.emoji()).collect()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{}", symbol.digit())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Reply {
    type Err = ReplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
