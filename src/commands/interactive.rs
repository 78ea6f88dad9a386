//! Interactive CLI mode
//!
//! Suggests guesses each turn; the user accepts one or types another word, then
//! enters the reply the game gave (or it is computed from a known solution).

use crate::core::{Reply, Word};
use crate::output::formatters::colored_guess;
use crate::solver::{
    EntropyCache, Game, GameReport, Outcome, Solver, SolverError, Suggestion,
};
use anyhow::{Context, Result};
use colored::Colorize;
use rustc_hash::FxHashSet;
use std::io::{BufRead, Write};

/// Guesses shown from the whole vocabulary
const TOP_OVERALL: usize = 5;
/// Guesses shown from the remaining candidates
const TOP_CANDIDATES: usize = 3;

enum Input {
    Line(String),
    Quit,
}

/// Line-oriented prompt over any reader/writer pair
struct Prompt<'io, R, W> {
    input: &'io mut R,
    out: &'io mut W,
}

impl<R: BufRead, W: Write> Prompt<'_, R, W> {
    fn ask(&mut self, prompt: &str) -> Result<Input> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        let line = line.trim().to_lowercase();

        if read == 0 || matches!(line.as_str(), "quit" | "q" | "exit") {
            return Ok(Input::Quit);
        }
        Ok(Input::Line(line))
    }
}

/// Run one interactive game
///
/// With `solution`, replies are computed; otherwise the user types them. Returns
/// the finished game, abandoned if the user quits.
///
/// # Errors
///
/// Returns an error on I/O failure or if the evaluator's self-check fails.
pub fn run_interactive<C, R, W>(
    solver: &Solver,
    solution: Option<&Word>,
    cache: &mut C,
    input: &mut R,
    out: &mut W,
) -> Result<GameReport>
where
    C: EntropyCache + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut prompt = Prompt { input, out };
    let mut game = solver.new_game();

    writeln!(prompt.out, "\nWordle Solver - Interactive Mode\n")?;
    writeln!(
        prompt.out,
        "Press enter to play the suggestion, or type another word."
    )?;
    if solution.is_none() {
        writeln!(
            prompt.out,
            "Replies: 0/-/⬜ miss, 1/Y/🟨 present, 2/G/🟩 hit, or 'win'."
        )?;
    }
    writeln!(prompt.out, "Type 'quit' to stop.\n")?;

    let outcome = loop {
        if game.is_solved() {
            writeln!(
                prompt.out,
                "\n{}",
                format!("Solved in {} guesses!", game.steps().len())
                    .green()
                    .bold()
            )?;
            break Outcome::Solved;
        }

        let suggestion = game.suggest(cache)?;
        show_suggestions(&mut prompt, &game, &suggestion)?;

        let Some(choice) = read_guess(&mut prompt, solver, &game, &suggestion)? else {
            break Outcome::Abandoned;
        };
        let word = choice.word.clone();
        game.guess(choice)?;

        match apply_reply(&mut prompt, &mut game, &word, solution)? {
            None => break Outcome::Abandoned,
            Some(Err(err)) => {
                writeln!(prompt.out, "{}", err.to_string().red())?;
                break Outcome::Failed(err);
            }
            Some(Ok(())) => {}
        }
    };

    Ok(GameReport {
        steps: game.steps().to_vec(),
        outcome,
    })
}

fn show_suggestions<R: BufRead, W: Write>(
    prompt: &mut Prompt<'_, R, W>,
    game: &Game<'_>,
    suggestion: &Suggestion,
) -> Result<()> {
    let out = &mut *prompt.out;
    writeln!(out, "{}", "─".repeat(60))?;
    writeln!(
        out,
        "Turn {}: {} candidates, {:.3} bits",
        game.turn(),
        game.candidates().len(),
        game.entropy()
    )?;
    writeln!(out, "{}", "─".repeat(60))?;

    if let Some(table) = &suggestion.table {
        let ranked = table.ranked();
        writeln!(out, "Most informative guesses:")?;
        for entry in ranked.iter().take(TOP_OVERALL) {
            writeln!(
                out,
                "  {}  {:.3} bits",
                entry.word.text().to_uppercase(),
                entry.expected_entropy
            )?;
        }

        let remaining: FxHashSet<&Word> = game.candidates().iter().collect();
        writeln!(out, "Best remaining candidates:")?;
        for entry in ranked
            .iter()
            .filter(|e| remaining.contains(&e.word))
            .take(TOP_CANDIDATES)
        {
            writeln!(
                out,
                "  {}  {:.3} bits, p = {:.3}",
                entry.word.text().to_uppercase(),
                entry.expected_entropy,
                entry.prior
            )?;
        }
    }

    writeln!(
        out,
        "\nSuggested guess: {} ({:.3} bits)",
        suggestion.choice.word.text().to_uppercase().bright_yellow().bold(),
        suggestion.choice.expected_entropy
    )?;
    Ok(())
}

fn read_guess<R: BufRead, W: Write>(
    prompt: &mut Prompt<'_, R, W>,
    solver: &Solver,
    game: &Game<'_>,
    suggestion: &Suggestion,
) -> Result<Option<crate::solver::Choice>> {
    loop {
        let Input::Line(line) = prompt.ask("Guess")? else {
            return Ok(None);
        };
        if line.is_empty() || line == "y" {
            return Ok(Some(suggestion.choice.clone()));
        }

        match Word::new(&line) {
            Ok(word) if solver.guesses().contains(&word) => {
                return Ok(Some(game.choice_for(word)?));
            }
            Ok(word) => writeln!(prompt.out, "'{word}' is not in the word list")?,
            Err(err) => writeln!(prompt.out, "{err}")?,
        }
    }
}

/// Read replies until one is accepted; `None` if the user quits
fn apply_reply<R: BufRead, W: Write>(
    prompt: &mut Prompt<'_, R, W>,
    game: &mut Game<'_>,
    guess: &Word,
    solution: Option<&Word>,
) -> Result<Option<Result<(), SolverError>>> {
    loop {
        let reply = if let Some(solution) = solution {
            Reply::evaluate(solution, guess)
        } else {
            let Input::Line(line) = prompt.ask("Reply")? else {
                return Ok(None);
            };
            let parsed = if matches!(line.as_str(), "win" | "solved") {
                Ok(Reply::ALL_HIT)
            } else {
                Reply::parse(&line)
            };
            match parsed {
                Ok(reply) if reply.is_producible_for(guess) => reply,
                Ok(_) => {
                    writeln!(prompt.out, "No word can give that reply to {guess}")?;
                    continue;
                }
                Err(err) => {
                    writeln!(prompt.out, "{err}")?;
                    continue;
                }
            }
        };

        match game.reply(reply) {
            Ok(step) => {
                writeln!(
                    prompt.out,
                    "{} {}  {} -> {} candidates, {:.3} bits gained",
                    colored_guess(&step.guess, step.reply),
                    step.reply.to_emoji(),
                    step.candidates_before,
                    step.candidates_after,
                    step.information_gained()
                )?;
                return Ok(Some(Ok(())));
            }
            Err(SolverError::NoCandidates) if solution.is_none() => {
                writeln!(
                    prompt.out,
                    "No candidate fits that reply; check it and enter it again"
                )?;
            }
            Err(err) => return Ok(Some(Err(err))),
        }
    }
}
