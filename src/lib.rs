//! Grades the reasoning in question-answering transcripts with a secondary "grader" model.
//!
//! A results document holds a `results` array of records with `question`,
//! `reference_answer` and `model_answer`. For each of the leading records the grader is
//! asked for one of `excellent`, `good`, `weak` or `incorrect` plus an explanation; the
//! label is mapped to a score from 4 down to 1, with 0 for anything the grader got wrong
//! about the reply format. Scores are averaged over the graded records.
//!
//! ```no_run
//! use reasoning_grader::{
//!     backends::OpenAICompatible, batch::{BatchGrader, GradingOptions}, config::AppConfig,
//!     document::{load_document, save_document},
//! };
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), reasoning_grader::error::GraderError> {
//! let config = AppConfig::load(Path::new("model_servers.yaml"))?;
//! let grader = OpenAICompatible::from_server(config.model("gpt41")?, Some(120))?;
//! let mut document = load_document(Path::new("results.json"))?;
//!
//! let summary = BatchGrader::new(grader, GradingOptions::default())
//!     .grade_document(&mut document, |p| println!("{}/{}", p.completed, p.total))
//!     .await?;
//! save_document(Path::new("results_with_reasoning_eval.json"), &document)?;
//! println!("average {:.4}", summary.average);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod interpret;
pub mod prompt;
pub mod provider;
pub mod record;
pub mod resilient;
pub mod verdict;

pub use batch::{BatchGrader, BatchSummary, GradingOptions};
pub use error::GraderError;
pub use interpret::interpret_response;
pub use prompt::build_grading_prompt;
pub use provider::GradingProvider;
pub use record::QaRecord;
pub use verdict::{score_for_label, ReasoningQuality, ScoredVerdict};
