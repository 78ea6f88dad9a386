//! Display functions for command results

use super::formatters::{colored_guess, create_progress_bar, entropy_bar};
use crate::commands::{AnalysisResult, BatchStatistics, SolveResult};
use crate::solver::{GameReport, Outcome};
use colored::Colorize;

/// Print every step of a game
pub fn print_report(report: &GameReport, verbose: bool) {
    for (i, step) in report.steps.iter().enumerate() {
        println!(
            "\nTurn {}: {} {}",
            i + 1,
            colored_guess(&step.guess, step.reply),
            step.reply.to_emoji()
        );

        if verbose {
            println!(
                "  Candidates:  {} → {}",
                step.candidates_before, step.candidates_after
            );
            println!("  Expected:    {:.3} bits", step.expected_entropy);
            println!("  Gained:      {:.3} bits", step.information_gained());
            println!("  Prior:       {:.4}", step.prior);
        }
    }

    println!();
    match &report.outcome {
        Outcome::Solved => println!(
            "{}",
            format!("✅ Solved in {} guesses!", report.guesses())
                .green()
                .bold()
        ),
        Outcome::Failed(err) => println!(
            "{}",
            format!("❌ Failed after {} guesses: {err}", report.guesses())
                .red()
                .bold()
        ),
        Outcome::Abandoned => println!("Game abandoned after {} guesses", report.guesses()),
    }
}

/// Print the result of solving a word
pub fn print_solve_result(result: &SolveResult, verbose: bool) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Solving: {}",
        result.target.text().to_uppercase().bright_yellow().bold()
    );
    println!("{}", "─".repeat(60).cyan());

    print_report(&result.report, verbose);
}

/// Print the result of word analysis
pub fn print_analysis_result(result: &AnalysisResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "ENTROPY ANALYSIS:".bright_cyan().bold(),
        result.word.text().to_uppercase().bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());

    let bar = entropy_bar(result.entropy, result.candidate_entropy, 30);

    println!(
        "\n📊 Against {} possible answers ({:.3} bits):",
        result.total_candidates, result.candidate_entropy
    );
    println!(
        "   Entropy:     [{}] {}",
        bar.green(),
        format!("{:.3} bits", result.entropy).bright_yellow()
    );
    println!(
        "   Info gain:   {:.1}x reduction",
        result.expected_reduction()
    );
    println!(
        "   Expected:    {:.1} candidates remain",
        result.expected_remaining()
    );
    println!("   Prior:       {:.5}", result.prior);
}

/// Print batch statistics
pub fn print_batch_statistics(stats: &BatchStatistics) {
    println!("\n{}", "═".repeat(70));
    println!(" Batch Results ");
    println!("{}", "═".repeat(70));

    println!("\n📊 {}", "Overall Performance".bright_cyan().bold());
    println!("  Total words tested:  {}", stats.total_words);
    if stats.total_words == 0 {
        return;
    }
    println!(
        "  Successfully solved: {} {}",
        stats.solved,
        format!(
            "({:.1}%)",
            stats.solved as f64 / stats.total_words as f64 * 100.0
        )
        .green()
    );
    println!(
        "  Average guesses:     {}",
        format!("{:.3}", stats.average_guesses)
            .bright_yellow()
            .bold()
    );
    let losses = format!(
        "{} ({:.2}%)",
        stats.losses,
        stats.loss_rate() * 100.0
    );
    println!(
        "  Losses (> {}):        {}",
        stats.loss_threshold,
        if stats.losses == 0 {
            losses.green()
        } else {
            losses.red()
        }
    );
    println!(
        "  Best / worst:        {} / {}",
        stats.min_guesses, stats.max_guesses
    );
    println!(
        "  Total time:          {:.2}s",
        stats.total_time.as_secs_f64()
    );
    println!(
        "  Time per word:       {:.1}ms",
        stats.total_time.as_millis() as f64 / stats.total_words as f64
    );
    println!("  New memo tables:     {}", stats.new_tables);

    println!("\n📈 {}", "Guess Distribution".bright_cyan().bold());
    let max_count = stats.guess_distribution.values().copied().max().unwrap_or(1);
    for (guesses, &count) in &stats.guess_distribution {
        let percentage = count as f64 / stats.solved.max(1) as f64 * 100.0;
        let bar = create_progress_bar(count as f64, max_count as f64, 40);
        println!("  {guesses:2} guesses: {} {count:4} ({percentage:5.1}%)", bar.green());
    }

    if !stats.hardest_words.is_empty() {
        println!("\n😰 {}", "Hardest Words".yellow().bold());
        for (word, guesses) in stats.hardest_words.iter().take(5) {
            println!("  {} ({guesses} guesses)", word.text().to_uppercase().yellow());
        }
    }

    if !stats.failures.is_empty() {
        println!("\n❌ {}", "Unsolved".red().bold());
        for (word, reason) in stats.failures.iter().take(10) {
            println!("  {}: {reason}", word.text().to_uppercase());
        }
    }
}
