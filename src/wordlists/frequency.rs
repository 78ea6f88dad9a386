//! Word frequency priors from a corpus
//!
//! The corpus is a `word,count` CSV with a header row. Counts are made relative
//! to the whole corpus; vocabulary words the corpus lacks get the smallest
//! relative frequency it contains. The logistic transform then compresses the
//! heavy skew of raw corpus counts.

use crate::core::Word;
use crate::solver::FrequencyMap;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Shape of the logistic transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidParams {
    /// Steepness applied after centering
    pub multiplier: f64,
    /// Shift applied after centering, in standard deviations
    pub offset: f64,
}

impl Default for SigmoidParams {
    fn default() -> Self {
        Self {
            multiplier: 10.0,
            offset: -0.5,
        }
    }
}

/// Relative frequency of every row in a corpus CSV
///
/// # Errors
/// Returns `InvalidData` for a row without a numeric count, or a corpus whose
/// counts sum to zero.
pub fn parse_corpus(content: &str) -> io::Result<FxHashMap<String, f64>> {
    let mut counts: Vec<(String, f64)> = Vec::new();

    for (line_no, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bad_row = || {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected word,count but found {line:?}", line_no + 1),
            )
        };
        let (word, count) = line.split_once(',').ok_or_else(bad_row)?;
        let count: f64 = count.trim().parse().map_err(|_| bad_row())?;
        if !count.is_finite() || count < 0.0 {
            return Err(bad_row());
        }
        counts.push((word.trim().to_ascii_lowercase(), count));
    }

    let total: f64 = counts.iter().map(|(_, c)| c).sum();
    if total <= 0.0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "corpus has no positive counts",
        ));
    }

    Ok(counts
        .into_iter()
        .map(|(word, count)| (word, count / total))
        .collect())
}

/// Relative corpus frequency for each vocabulary word
///
/// Words missing from the corpus, or with a zero count, get the smallest
/// positive frequency it contains.
#[must_use]
pub fn vocabulary_frequencies(corpus: &FxHashMap<String, f64>, vocabulary: &[Word]) -> FrequencyMap {
    let floor = corpus
        .values()
        .copied()
        .filter(|&f| f > 0.0)
        .fold(f64::INFINITY, f64::min);

    let mut missing = 0usize;
    let freq = vocabulary
        .iter()
        .map(|word| {
            let f = corpus.get(word.text()).copied().filter(|&f| f > 0.0);
            if f.is_none() {
                missing += 1;
            }
            (word.clone(), f.unwrap_or(floor))
        })
        .collect();

    debug!(
        "{missing} of {} vocabulary words missing from corpus",
        vocabulary.len()
    );
    freq
}

/// Logistic compression of relative frequencies
///
/// Each weight goes through `ln`, is divided by the population standard
/// deviation, centered on the mean, shifted by `offset` and scaled by
/// `multiplier` before the logistic function maps it into (0, 1).
#[must_use]
pub fn sigmoid_normalize(freq: &FrequencyMap, params: SigmoidParams) -> FrequencyMap {
    let (words, logs): (Vec<&Word>, Vec<f64>) = freq
        .iter()
        .filter(|&(_, f)| f > 0.0)
        .map(|(w, f)| (w, f.ln()))
        .unzip();

    if words.len() < freq.len() {
        warn!(
            "{} words with zero frequency stay at zero after normalization",
            freq.len() - words.len()
        );
    }
    if logs.is_empty() {
        return FrequencyMap::new();
    }

    let n = logs.len() as f64;
    let mean = logs.iter().sum::<f64>() / n;
    let std = (logs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    let scaled: Vec<f64> = if std > 0.0 {
        logs.iter().map(|x| x / std).collect()
    } else {
        vec![0.0; logs.len()]
    };
    let scaled_mean = scaled.iter().sum::<f64>() / n;

    let mut out: FrequencyMap = words
        .into_iter()
        .zip(scaled)
        .map(|(w, x)| {
            let x = (x - scaled_mean + params.offset) * params.multiplier;
            (w.clone(), logistic(x))
        })
        .collect();

    for (word, f) in freq.iter() {
        if f <= 0.0 {
            out.insert(word.clone(), 0.0);
        }
    }
    out
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Load a corpus CSV and build priors for `vocabulary`
///
/// With `sigmoid` set, the relative frequencies are compressed with
/// [`sigmoid_normalize`].
///
/// # Errors
/// Returns an I/O error if the file cannot be read or is malformed.
pub fn load_frequencies<P: AsRef<Path>>(
    path: P,
    vocabulary: &[Word],
    sigmoid: Option<SigmoidParams>,
) -> io::Result<FrequencyMap> {
    let path = path.as_ref();
    let corpus = parse_corpus(&fs::read_to_string(path)?)?;
    debug!("loaded {} corpus rows from {}", corpus.len(), path.display());

    let freq = vocabulary_frequencies(&corpus, vocabulary);
    Ok(match sigmoid {
        Some(params) => sigmoid_normalize(&freq, params),
        None => freq,
    })
}
