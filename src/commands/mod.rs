//! Command implementations

pub mod analyze;
pub mod batch;
pub mod interactive;
pub mod solve;

pub use analyze::{AnalysisResult, analyze_word};
pub use batch::{BatchConfig, BatchStatistics, WordResult, run_batch};
pub use interactive::run_interactive;
pub use solve::{SolveOptions, SolveResult, solve_word};
