use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::config::{GradingConfig, DEFAULT_SAMPLE_LIMIT, DEFAULT_TIMEOUT_SECS};
use crate::error::GraderError;
use crate::resilient::ResilienceConfig;

/// Top-level array holding the records to grade.
pub const RESULTS_FIELD: &str = "results";
/// Field added to each graded record.
pub const EVALUATION_FIELD: &str = "reasoning_evaluation";
/// Field added to the document with the mean score.
pub const AVERAGE_FIELD: &str = "reasoning_average_score";

/// How a batch is graded.
#[derive(Debug, Clone)]
pub struct GradingOptions {
    /// Grade only the first `n` results. `None` grades all of them.
    pub sample_limit: Option<usize>,
    /// Upper bound on one record's grader call, retries included.
    pub timeout: Option<Duration>,
    /// Grader calls allowed in flight at once.
    pub concurrency: usize,
}

impl Default for GradingOptions {
    fn default() -> Self {
        Self {
            sample_limit: Some(DEFAULT_SAMPLE_LIMIT),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            concurrency: 1,
        }
    }
}

impl From<&GradingConfig> for GradingOptions {
    /// `timeout_secs` bounds a single attempt, so the record budget covers every
    /// attempt plus the backoff between them.
    fn from(cfg: &GradingConfig) -> Self {
        let attempts = cfg.max_attempts.max(1) as u64;
        let backoff = ResilienceConfig::defaults()
            .max_delay_ms
            .saturating_mul(attempts);
        let attempts_budget = Duration::from_secs(cfg.timeout_secs.saturating_mul(attempts));
        Self {
            sample_limit: cfg.sample_limit,
            timeout: Some(attempts_budget.saturating_add(Duration::from_millis(backoff))),
            concurrency: cfg.concurrency.max(1),
        }
    }
}

/// Emitted once per graded record.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Position of the record in `results`.
    pub index: usize,
    /// Records graded so far, this one included.
    pub completed: usize,
    /// Records that will be graded in this run.
    pub total: usize,
    pub label: String,
    pub score: u8,
}

/// Outcome of a graded batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Scores in the order of the graded records.
    pub scores: Vec<u8>,
    pub average: f64,
    pub label_counts: BTreeMap<String, usize>,
    /// Size of the whole `results` array, graded or not.
    pub total_records: usize,
}

impl BatchSummary {
    pub fn graded(&self) -> usize {
        self.scores.len()
    }
}

/// Arithmetic mean of `scores`. An empty slice is an error, not zero.
pub fn mean_score(scores: &[u8]) -> Result<f64, GraderError> {
    if scores.is_empty() {
        return Err(GraderError::EmptyBatch);
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    Ok(sum as f64 / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_every_score_level() {
        assert_eq!(mean_score(&[4, 3, 2, 1, 0]).unwrap(), 2.0);
        assert_eq!(mean_score(&[4]).unwrap(), 4.0);
        assert_eq!(mean_score(&[3, 4]).unwrap(), 3.5);
    }

    #[test]
    fn mean_of_nothing_fails() {
        assert!(matches!(mean_score(&[]), Err(GraderError::EmptyBatch)));
    }

    #[test]
    fn options_from_config_cover_all_attempts() {
        let cfg = GradingConfig {
            sample_limit: None,
            timeout_secs: 10,
            concurrency: 0,
            max_attempts: 3,
        };
        let options = GradingOptions::from(&cfg);

        assert_eq!(options.sample_limit, None);
        assert_eq!(options.concurrency, 1);
        assert!(options.timeout.unwrap() >= Duration::from_secs(30));
    }

    #[test]
    fn huge_timeouts_saturate_instead_of_overflowing() {
        let cfg = GradingConfig {
            sample_limit: Some(10),
            timeout_secs: u64::MAX / 2,
            concurrency: 1,
            max_attempts: 3,
        };
        let options = GradingOptions::from(&cfg);
        assert_eq!(options.timeout, Some(Duration::MAX));

        let cfg = GradingConfig {
            max_attempts: usize::MAX,
            timeout_secs: u64::MAX,
            ..cfg
        };
        assert_eq!(GradingOptions::from(&cfg).timeout, Some(Duration::MAX));
    }
}
