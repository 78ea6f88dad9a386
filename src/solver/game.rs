//! The per-game state machine
//!
//! ```text
//! AwaitingGuess --guess--> AwaitingReply --reply--> Solved
//!       ^                                   |
//!       +-------------- not solved ---------+
//! ```
//!
//! A game owns its candidate set and history. Guesses come from a
//! [`GuessSource`] (or the evaluator's pick), replies from a [`ReplySource`].

use super::distribution::shannon_entropy;
use super::engine::{Solver, Suggestion};
use super::error::SolverError;
use super::evaluator::{TableEntry, expected_entropy_with};
use super::memo::{EntropyCache, History};
use super::policy::Choice;
use crate::core::{Reply, Word, filter};
use log::debug;

/// Where a game stands
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    AwaitingGuess,
    AwaitingReply { guess: Choice },
    Solved,
}

/// What happened on one turn
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub guess: Word,
    pub reply: Reply,
    /// Expected information of the guess before it was played
    pub expected_entropy: f64,
    /// Prior that the guess was the solution
    pub prior: f64,
    pub candidates_before: usize,
    pub candidates_after: usize,
    pub entropy_before: f64,
    pub entropy_after: f64,
}

impl Step {
    /// Bits actually gained from the reply
    #[must_use]
    pub fn information_gained(&self) -> f64 {
        self.entropy_before - self.entropy_after
    }
}

/// One game in progress
#[derive(Debug, Clone)]
pub struct Game<'s> {
    solver: &'s Solver,
    candidates: Vec<Word>,
    weights: Vec<f64>,
    entropy: f64,
    history: History,
    steps: Vec<Step>,
    state: GameState,
}

impl<'s> Game<'s> {
    pub(crate) fn new(solver: &'s Solver) -> Self {
        let candidates = solver.candidates().to_vec();
        let weights = solver.weights(&candidates);
        let entropy = shannon_entropy(weights.iter().copied());

        Self {
            solver,
            candidates,
            weights,
            entropy,
            history: History::new(solver.fingerprint()),
            steps: Vec::new(),
            state: GameState::AwaitingGuess,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    /// Entropy (bits) of the current candidate distribution
    #[must_use]
    pub const fn entropy(&self) -> f64 {
        self.entropy
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// 1-based number of the next guess
    #[must_use]
    pub fn turn(&self) -> usize {
        self.steps.len() + 1
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.state == GameState::Solved
    }

    /// The evaluator's pick for the next guess
    ///
    /// # Errors
    /// Propagates evaluator errors.
    pub fn suggest<C: EntropyCache + ?Sized>(&self, cache: &mut C) -> Result<Suggestion, SolverError> {
        self.solver
            .suggest(&self.history, &self.candidates, &self.weights, cache)
    }

    /// Score an arbitrary word as the next guess
    ///
    /// # Errors
    /// Propagates evaluator errors.
    pub fn choice_for(&self, word: Word) -> Result<Choice, SolverError> {
        let expected_entropy = expected_entropy_with(&word, &self.candidates, &self.weights)?;
        let prior = self
            .candidates
            .iter()
            .position(|c| c == &word)
            .map_or(0.0, |i| self.weights[i]);

        let entry = TableEntry {
            word,
            expected_entropy,
            prior,
        };
        let score = self
            .solver
            .config()
            .policy
            .score(self.turn(), self.entropy, &entry);
        Ok(Choice::from_entry(&entry, score))
    }

    /// Commit to a guess; the game then waits for its reply
    ///
    /// # Errors
    /// `SolverError::UnexpectedGuess` unless the game is awaiting a guess.
    pub fn guess(&mut self, choice: Choice) -> Result<(), SolverError> {
        if self.state != GameState::AwaitingGuess {
            return Err(SolverError::UnexpectedGuess);
        }
        self.state = GameState::AwaitingReply { guess: choice };
        Ok(())
    }

    /// Apply the reply to the pending guess
    ///
    /// # Errors
    /// - `SolverError::NoPendingGuess` unless a guess is awaiting its reply
    /// - `SolverError::NoCandidates` if no candidate is consistent with the history;
    ///   the game is left as it was
    /// - `SolverError::IterationCapExceeded` if the cap is reached unsolved
    pub fn reply(&mut self, reply: Reply) -> Result<&Step, SolverError> {
        let GameState::AwaitingReply { guess } = &self.state else {
            return Err(SolverError::NoPendingGuess);
        };
        let guess = guess.clone();

        let candidates_before = self.candidates.len();
        let entropy_before = self.entropy;

        // an all-hit reply keeps the guess only if it was still a candidate
        let remaining = filter(&guess.word, reply, &self.candidates);
        if remaining.is_empty() {
            return Err(SolverError::NoCandidates);
        }

        if reply.is_solved() {
            self.weights = vec![1.0];
            self.entropy = 0.0;
            self.state = GameState::Solved;
        } else {
            self.weights = self.solver.weights(&remaining);
            self.entropy = shannon_entropy(self.weights.iter().copied());
            self.state = GameState::AwaitingGuess;
        }
        self.candidates = remaining;

        debug!(
            "turn {}: {} -> {reply}, {candidates_before} -> {} candidates",
            self.turn(),
            guess.word,
            self.candidates.len()
        );

        self.history.push(guess.word.clone(), reply);
        self.steps.push(Step {
            guess: guess.word,
            reply,
            expected_entropy: guess.expected_entropy,
            prior: guess.prior,
            candidates_before,
            candidates_after: self.candidates.len(),
            entropy_before,
            entropy_after: self.entropy,
        });

        let cap = self.solver.config().max_iterations;
        if !self.is_solved() && self.steps.len() >= cap {
            return Err(SolverError::IterationCapExceeded { cap });
        }

        Ok(&self.steps[self.steps.len() - 1])
    }
}

/// Supplies guesses that override the evaluator's pick
pub trait GuessSource {
    /// Word to play on `turn`, or `None` to play the evaluator's pick
    fn guess_for(&mut self, turn: usize, candidates: &[Word]) -> Option<Word>;
}

/// Always plays the evaluator's pick
#[derive(Debug, Clone, Copy, Default)]
pub struct Automatic;

impl GuessSource for Automatic {
    fn guess_for(&mut self, _turn: usize, _candidates: &[Word]) -> Option<Word> {
        None
    }
}

/// Plays fixed opening words, then defers to another source
///
/// An opener is skipped once a single candidate remains.
#[derive(Debug, Clone, Default)]
pub struct Openers<G = Automatic> {
    words: Vec<Word>,
    then: G,
}

impl Openers {
    /// Openers followed by the evaluator's pick
    #[must_use]
    pub const fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            then: Automatic,
        }
    }
}

impl<G: GuessSource> Openers<G> {
    /// Openers followed by `then`
    #[must_use]
    pub const fn followed_by(words: Vec<Word>, then: G) -> Self {
        Self { words, then }
    }
}

impl<G: GuessSource> GuessSource for Openers<G> {
    fn guess_for(&mut self, turn: usize, candidates: &[Word]) -> Option<Word> {
        match self.words.get(turn - 1) {
            Some(word) if candidates.len() > 1 => Some(word.clone()),
            _ => self.then.guess_for(turn, candidates),
        }
    }
}

/// Supplies the reply to each guess
pub trait ReplySource {
    /// Reply to `guess`, or `None` to abandon the game
    fn reply_to(&mut self, guess: &Word) -> Option<Reply>;
}

/// Replies computed against a known solution
#[derive(Debug, Clone)]
pub struct KnownSolution(pub Word);

impl ReplySource for KnownSolution {
    fn reply_to(&mut self, guess: &Word) -> Option<Reply> {
        Some(Reply::evaluate(&self.0, guess))
    }
}

impl<F> ReplySource for F
where
    F: FnMut(&Word) -> Option<Reply>,
{
    fn reply_to(&mut self, guess: &Word) -> Option<Reply> {
        self(guess)
    }
}

/// How a game ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Solved,
    Failed(SolverError),
    /// The reply source stopped answering
    Abandoned,
}

/// Steps and outcome of a finished game
#[derive(Debug, Clone, PartialEq)]
pub struct GameReport {
    pub steps: Vec<Step>,
    pub outcome: Outcome,
}

impl GameReport {
    #[must_use]
    pub fn guesses(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }
}

/// Play `game` to the end
///
/// Errors become a failed outcome rather than propagating, so a batch can
/// carry on with its next game.
pub fn play<G, R, C>(mut game: Game<'_>, guesses: &mut G, replies: &mut R, cache: &mut C) -> GameReport
where
    G: GuessSource + ?Sized,
    R: ReplySource + ?Sized,
    C: EntropyCache + ?Sized,
{
    let outcome = loop {
        if game.is_solved() {
            break Outcome::Solved;
        }

        let choice = match guesses.guess_for(game.turn(), game.candidates()) {
            Some(word) => game.choice_for(word),
            None => game.suggest(cache).map(|s| s.choice),
        };
        let choice = match choice {
            Ok(choice) => choice,
            Err(err) => break Outcome::Failed(err),
        };

        let Some(reply) = replies.reply_to(&choice.word) else {
            break Outcome::Abandoned;
        };
        if let Err(err) = game.guess(choice).and_then(|()| game.reply(reply).map(|_| ())) {
            break Outcome::Failed(err);
        }
    };

    GameReport {
        steps: game.steps,
        outcome,
    }
}

/// Solve for a known `solution` with the evaluator's picks
pub fn solve<C: EntropyCache + ?Sized>(solver: &Solver, solution: &Word, cache: &mut C) -> GameReport {
    play(
        solver.new_game(),
        &mut Automatic,
        &mut KnownSolution(solution.clone()),
        cache,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::distribution::FrequencyMap;
    use crate::solver::engine::SolverConfig;
    use crate::solver::memo::{MemoStore, WorkerCache};
    use crate::solver::policy::ScoringPolicy;

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::new(w).unwrap()).collect()
    }

    fn vocabulary() -> Vec<Word> {
        words(&[
            "cigar", "grade", "grace", "trade", "brave", "crate", "irate", "grate", "bones",
            "frass", "sissy", "sassy", "abyss", "eerie", "geese", "llama", "speed", "erase",
            "robot", "floor", "crane", "slate", "shape", "shake", "snake",
        ])
    }

    fn solver_with(config: SolverConfig) -> Solver {
        let vocab = vocabulary();
        let freq = FrequencyMap::uniform(&vocab);
        Solver::new(vocab.clone(), vocab, freq, config).unwrap()
    }

    fn solver() -> Solver {
        solver_with(SolverConfig::default())
    }

    #[test]
    fn solves_every_vocabulary_word() {
        let solver = solver();
        let mut cache = MemoStore::new();

        for solution in solver.candidates() {
            let report = solve(&solver, solution, &mut cache);
            assert!(report.is_solved(), "{solution}: {:?}", report.outcome);
            assert!(report.guesses() <= 6, "{solution} took {}", report.guesses());

            let last = report.steps.last().unwrap();
            assert_eq!(&last.guess, solution);
            assert!(last.reply.is_solved());
        }
        assert!(!cache.is_empty());
    }

    #[test]
    fn steps_shrink_candidates_and_track_information() {
        let solver = solver();
        let mut cache = MemoStore::new();
        let report = solve(&solver, &Word::new("sassy").unwrap(), &mut cache);

        for pair in report.steps.windows(2) {
            assert_eq!(pair[0].candidates_after, pair[1].candidates_before);
            assert!((pair[0].entropy_after - pair[1].entropy_before).abs() < 1e-12);
        }
        for step in &report.steps {
            assert!(step.candidates_after <= step.candidates_before);
            assert!(step.information_gained() >= -1e-12);
        }
        assert_eq!(report.steps[0].candidates_before, vocabulary().len());
    }

    #[test]
    fn singleton_state_guesses_it_with_zero_entropy() {
        let solver = solver_with(SolverConfig {
            policy: ScoringPolicy::new(-0.0124, 0.3643, 1.189),
            ..SolverConfig::default()
        });
        let mut game = solver.new_game();
        let mut cache = MemoStore::new();

        // only floor has two o's, one of them fourth, and no r up front
        let robot = Word::new("robot").unwrap();
        let floor = Word::new("floor").unwrap();
        game.guess(game.choice_for(robot.clone()).unwrap()).unwrap();
        game.reply(Reply::evaluate(&floor, &robot)).unwrap();
        assert_eq!(game.candidates().len(), 1);
        assert_eq!(game.entropy(), 0.0);

        let suggestion = game.suggest(&mut cache).unwrap();
        assert_eq!(suggestion.choice.word, floor);
        assert_eq!(suggestion.choice.expected_entropy, 0.0);
    }

    #[test]
    fn openers_are_played_first() {
        let solver = solver();
        let mut cache = MemoStore::new();
        let mut openers = Openers::new(words(&["llama", "robot"]));
        let solution = Word::new("grace").unwrap();

        let report = play(
            solver.new_game(),
            &mut openers,
            &mut KnownSolution(solution.clone()),
            &mut cache,
        );
        assert!(report.is_solved());
        assert_eq!(report.steps[0].guess.text(), "llama");
        assert_eq!(report.steps[0].candidates_before, vocabulary().len());
        assert_eq!(report.steps.last().unwrap().guess, solution);
    }

    #[test]
    fn contradictory_replies_fail_the_game() {
        let solver = solver();
        let mut cache = MemoStore::new();
        let mut replies = |_: &Word| -> Option<Reply> { Some(Reply::parse("00000").unwrap()) };
        let mut openers = Openers::new(words(&["crate", "bones", "sissy", "llama", "robot"]));

        let report = play(solver.new_game(), &mut openers, &mut replies, &mut cache);
        assert_eq!(report.outcome, Outcome::Failed(SolverError::NoCandidates));
    }

    #[test]
    fn iteration_cap_is_a_failure() {
        let solver = solver_with(SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        });
        let mut cache = MemoStore::new();
        let mut openers = Openers::new(words(&["llama"]));

        let report = play(
            solver.new_game(),
            &mut openers,
            &mut KnownSolution(Word::new("grade").unwrap()),
            &mut cache,
        );
        assert_eq!(
            report.outcome,
            Outcome::Failed(SolverError::IterationCapExceeded { cap: 1 })
        );
        assert_eq!(report.guesses(), 1);
    }

    #[test]
    fn silent_reply_source_abandons() {
        let solver = solver();
        let mut cache = MemoStore::new();
        let mut replies = |_: &Word| -> Option<Reply> { None };
        let report = play(solver.new_game(), &mut Automatic, &mut replies, &mut cache);
        assert_eq!(report.outcome, Outcome::Abandoned);
        assert!(report.steps.is_empty());
    }

    #[test]
    fn reply_without_pending_guess_is_rejected() {
        let solver = solver();
        let mut game = solver.new_game();
        assert_eq!(game.reply(Reply::ALL_HIT), Err(SolverError::NoPendingGuess));
        assert_eq!(game.state(), &GameState::AwaitingGuess);
    }

    #[test]
    fn all_hit_on_a_ruled_out_word_is_rejected() {
        let solver = solver();
        let mut game = solver.new_game();
        let robot = Word::new("robot").unwrap();
        let floor = Word::new("floor").unwrap();
        game.guess(game.choice_for(robot.clone()).unwrap()).unwrap();
        game.reply(Reply::evaluate(&floor, &robot)).unwrap();

        let crane = Word::new("crane").unwrap();
        let choice = game.choice_for(crane).unwrap();
        game.guess(choice.clone()).unwrap();
        assert_eq!(game.reply(Reply::ALL_HIT), Err(SolverError::NoCandidates));

        // nothing changed; the reply can still be corrected
        assert_eq!(game.candidates(), std::slice::from_ref(&floor));
        assert_eq!(game.state(), &GameState::AwaitingReply { guess: choice });
        assert_eq!(game.steps().len(), 1);
    }

    #[test]
    fn second_guess_before_reply_is_rejected() {
        let solver = solver();
        let mut game = solver.new_game();
        let first = game.choice_for(Word::new("crane").unwrap()).unwrap();
        let second = game.choice_for(Word::new("slate").unwrap()).unwrap();

        game.guess(first.clone()).unwrap();
        assert_eq!(game.guess(second), Err(SolverError::UnexpectedGuess));
        assert_eq!(game.state(), &GameState::AwaitingReply { guess: first });
    }

    #[test]
    fn guess_after_solving_is_rejected() {
        let solver = solver();
        let mut game = solver.new_game();
        let crane = Word::new("crane").unwrap();
        game.guess(game.choice_for(crane.clone()).unwrap()).unwrap();
        game.reply(Reply::ALL_HIT).unwrap();
        assert!(game.is_solved());
        assert_eq!(game.candidates(), std::slice::from_ref(&crane));

        let again = game.choice_for(crane).unwrap();
        assert_eq!(game.guess(again), Err(SolverError::UnexpectedGuess));
    }

    #[test]
    fn openers_hand_over_to_the_next_source() {
        struct Fixed(Word);
        impl GuessSource for Fixed {
            fn guess_for(&mut self, _turn: usize, _candidates: &[Word]) -> Option<Word> {
                Some(self.0.clone())
            }
        }

        let vocab = vocabulary();
        let mut source = Openers::followed_by(words(&["llama"]), Fixed(Word::new("robot").unwrap()));
        assert_eq!(source.guess_for(1, &vocab).unwrap().text(), "llama");
        assert_eq!(source.guess_for(2, &vocab).unwrap().text(), "robot");
        // a lone candidate skips the opener
        assert_eq!(source.guess_for(1, &vocab[..1]).unwrap().text(), "robot");
    }

    #[test]
    fn worker_caches_agree_with_shared_store() {
        let solver = solver();
        let mut shared = MemoStore::new();
        let solution = Word::new("erase").unwrap();
        let direct = solve(&solver, &solution, &mut shared);

        let mut worker = WorkerCache::new(&shared);
        let again = solve(&solver, &solution, &mut worker);
        assert_eq!(direct, again);
        assert!(worker.into_delta().is_empty());
    }
}
