//! Entropy Wordle - CLI
//!
//! Information-theoretic Wordle solver: solve a known word, evaluate a whole
//! solution list, analyze a guess, or get live suggestions while playing.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use entropy_wordle::{
    commands::{
        BatchConfig, SolveOptions, analyze_word, batch::DEFAULT_LOSS_THRESHOLD, run_batch,
        run_interactive, solve_word,
    },
    core::Word,
    output::{print_analysis_result, print_batch_statistics, print_report, print_solve_result},
    solver::{
        DEFAULT_MAX_ITERATIONS, FrequencyMap, MemoStore, PersistentStore, ScoringPolicy, Solver,
        SolverConfig, StoreConfig, Strategy,
    },
    wordlists::{SigmoidParams, WordLists, load_frequencies},
};
use log::info;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "entropy_wordle",
    about = "Wordle solver that picks the guess with the most expected information",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Possible solutions, one per line or comma-separated
    #[arg(long, global = true, default_value = "data/solutions.txt")]
    solutions: PathBuf,

    /// Extra allowed guesses that are never solutions
    #[arg(long, global = true)]
    allowed: Option<PathBuf>,

    /// Corpus word counts (word,count CSV with header); uniform priors otherwise
    #[arg(long, global = true)]
    frequencies: Option<PathBuf>,

    /// Logistic steepness for corpus frequencies
    #[arg(long, global = true, default_value_t = 10.0, allow_negative_numbers = true)]
    sigmoid_multiplier: f64,

    /// Logistic shift for corpus frequencies
    #[arg(long, global = true, default_value_t = -0.5, allow_negative_numbers = true)]
    sigmoid_offset: f64,

    /// Use raw relative corpus frequencies
    #[arg(long, global = true)]
    no_sigmoid: bool,

    /// Expected-guesses model a·x² + b·x + c; pure entropy when omitted
    #[arg(long, global = true, num_args = 3, value_names = ["A", "B", "C"], allow_negative_numbers = true)]
    cost: Option<Vec<f64>>,

    /// Directory holding memoized entropy tables
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Number of chunk files in the store
    #[arg(long, global = true, default_value_t = 16)]
    chunks: usize,

    /// Give up on a game after this many guesses
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Initial candidate set
    #[arg(long, global = true, value_enum, default_value_t = CandidateSet::All)]
    candidates: CandidateSet,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CandidateSet {
    /// Solutions and allowed words
    All,
    /// Solutions only
    Solutions,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Highest expected information
    Entropy,
    /// Vocabulary words in random order
    Random,
    /// A random remaining candidate
    FilteredRandom,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Entropy => Self::Entropy,
            StrategyArg::Random => Self::Random,
            StrategyArg::FilteredRandom => Self::FilteredRandom,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive mode (default): suggestions while you play
    Interactive {
        /// Compute replies against this word instead of asking for them
        #[arg(long)]
        solution: Option<String>,
    },

    /// Solve a specific target word
    Solve {
        /// The target word to solve
        word: String,

        /// Show candidate counts and entropy per turn
        #[arg(short, long)]
        verbose: bool,

        /// Play these words first
        #[arg(short = 'o', long = "opener")]
        openers: Vec<String>,

        /// How guesses are picked
        #[arg(long, value_enum, default_value_t = StrategyArg::Entropy)]
        strategy: StrategyArg,

        /// Seed for the random strategies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Solve every solution and report statistics
    Batch {
        /// Limit number of words to test
        #[arg(short, long)]
        limit: Option<usize>,

        /// Shuffle the targets first
        #[arg(long)]
        shuffle: bool,

        /// Seed for the shuffle and the random strategies
        #[arg(long)]
        seed: Option<u64>,

        /// How guesses are picked
        #[arg(long, value_enum, default_value_t = StrategyArg::Entropy)]
        strategy: StrategyArg,

        /// Games needing more guesses than this count as losses
        #[arg(long, default_value_t = DEFAULT_LOSS_THRESHOLD)]
        loss_threshold: usize,

        /// Play these words first
        #[arg(short = 'o', long = "opener")]
        openers: Vec<String>,
    },

    /// Analyze the expected information of a word as first guess
    Analyze {
        /// Word to analyze
        word: String,

        /// Evaluate reply by reply through the candidate filter
        #[arg(long)]
        exhaustive: bool,
    },
}

/// Memo store for this run, persistent when `--store` was given
enum Store {
    Memory(MemoStore),
    Persistent(PersistentStore),
}

impl Store {
    fn open(cli: &Cli) -> Self {
        match &cli.store {
            Some(dir) => Self::Persistent(PersistentStore::load(StoreConfig::new(dir, cli.chunks))),
            None => Self::Memory(MemoStore::new()),
        }
    }

    fn memo(&mut self) -> &mut MemoStore {
        match self {
            Self::Memory(store) => store,
            Self::Persistent(store) => store.store_mut(),
        }
    }

    fn close(mut self) {
        if let Self::Persistent(store) = &mut self {
            store.save();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (solver, solutions) = build_solver(&cli)?;
    let mut store = Store::open(&cli);

    let command = cli.command.unwrap_or(Commands::Interactive { solution: None });
    let result = match command {
        Commands::Interactive { solution } => {
            run_interactive_command(&solver, solution.as_deref(), store.memo())
        }
        Commands::Solve {
            word,
            verbose,
            openers,
            strategy,
            seed,
        } => parse_words(&openers).and_then(|openers| {
            let options = SolveOptions {
                openers,
                strategy: strategy.into(),
                seed,
            };
            run_solve_command(&solver, &word, verbose, &options, store.memo())
        }),
        Commands::Batch {
            limit,
            shuffle,
            seed,
            strategy,
            loss_threshold,
            openers,
        } => {
            let config = BatchConfig {
                limit,
                shuffle,
                seed,
                strategy: strategy.into(),
                loss_threshold,
                openers: parse_words(&openers)?,
                ..BatchConfig::default()
            };
            run_batch_command(&solver, &solutions, &config, store.memo());
            Ok(())
        }
        Commands::Analyze { word, exhaustive } => {
            let result = analyze_word(&word, &solver, exhaustive)?;
            print_analysis_result(&result);
            Ok(())
        }
    };

    store.close();
    result
}

/// The solver and the sorted solution list
fn build_solver(cli: &Cli) -> Result<(Solver, Vec<Word>)> {
    let lists = WordLists::load(&cli.solutions, cli.allowed.as_deref())
        .with_context(|| format!("failed to load word lists from {}", cli.solutions.display()))?;
    if lists.solutions.is_empty() {
        bail!("no valid words in {}", cli.solutions.display());
    }

    let mut solutions = lists.solutions.clone();
    solutions.sort();
    solutions.dedup();

    let candidates = match cli.candidates {
        CandidateSet::All => lists.all.clone(),
        CandidateSet::Solutions => solutions.clone(),
    };

    let freq = match &cli.frequencies {
        Some(path) => {
            let sigmoid = (!cli.no_sigmoid).then_some(SigmoidParams {
                multiplier: cli.sigmoid_multiplier,
                offset: cli.sigmoid_offset,
            });
            load_frequencies(path, &lists.all, sigmoid)
                .with_context(|| format!("failed to load frequencies from {}", path.display()))?
        }
        None => FrequencyMap::uniform(&lists.all),
    };

    let policy = match cli.cost.as_deref() {
        Some(&[a, b, c]) => ScoringPolicy::new(a, b, c),
        Some(other) => bail!("--cost takes three coefficients, got {}", other.len()),
        None => ScoringPolicy::PURE_ENTROPY,
    };

    info!(
        "{} guesses, {} initial candidates",
        lists.all.len(),
        candidates.len()
    );

    let config = SolverConfig {
        policy,
        max_iterations: cli.max_iterations,
    };
    let solver = Solver::new(lists.all, candidates, freq, config)?;
    Ok((solver, solutions))
}

fn parse_words(words: &[String]) -> Result<Vec<Word>> {
    words
        .iter()
        .map(|w| Word::new(w).with_context(|| format!("invalid word '{w}'")))
        .collect()
}

fn run_interactive_command(
    solver: &Solver,
    solution: Option<&str>,
    store: &mut MemoStore,
) -> Result<()> {
    let solution = solution.map(Word::new).transpose()?;
    let stdin = io::stdin();
    let report = run_interactive(
        solver,
        solution.as_ref(),
        store,
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;

    if !report.steps.is_empty() {
        println!("\nGame summary:");
        print_report(&report, false);
    }
    Ok(())
}

fn run_solve_command(
    solver: &Solver,
    word: &str,
    verbose: bool,
    options: &SolveOptions,
    store: &mut MemoStore,
) -> Result<()> {
    let result = solve_word(word, options, solver, store)?;
    print_solve_result(&result, verbose);
    Ok(())
}

fn run_batch_command(
    solver: &Solver,
    targets: &[Word],
    config: &BatchConfig,
    store: &mut MemoStore,
) {
    println!("\n{}", "═".repeat(70));
    println!(" Batch evaluation ");
    println!("{}", "═".repeat(70));
    println!("\nTesting against {} possible answers", targets.len());
    println!("Strategy: {}", config.strategy);
    if !config.openers.is_empty() {
        let openers: Vec<&str> = config.openers.iter().map(Word::text).collect();
        println!("Forced openers: {}", openers.join(", "));
    }
    println!();

    let (_, stats) = run_batch(solver, targets, config, store);
    print_batch_statistics(&stats);
}
