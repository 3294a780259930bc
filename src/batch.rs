#[path = "batch/types.rs"]
mod types;

#[path = "batch/grader.rs"]
mod grader;

pub use grader::BatchGrader;
pub use types::{
    mean_score, BatchSummary, GradingOptions, Progress, AVERAGE_FIELD, EVALUATION_FIELD,
    RESULTS_FIELD,
};
