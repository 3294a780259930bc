//! Reasoning-quality vocabulary and the label to score table.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used for grader responses that could not be decoded.
pub const INVALID_LABEL: &str = "invalid";

/// Score of every label outside the canonical vocabulary.
pub const FALLBACK_SCORE: u8 = 0;

/// The only label to score mapping. Ordered from best to worst.
pub const REASONING_SCORE_TABLE: [(&str, u8); 5] = [
    ("excellent", 4),
    ("good", 3),
    ("weak", 2),
    ("incorrect", 1),
    (INVALID_LABEL, 0),
];

/// Trims and lowercases a grader label.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Returns the score of `label`, matching case-insensitively.
///
/// Labels that are not in [`REASONING_SCORE_TABLE`] score [`FALLBACK_SCORE`].
pub fn score_for_label(label: &str) -> u8 {
    let normalized = normalize_label(label);
    REASONING_SCORE_TABLE
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, score)| *score)
        .unwrap_or(FALLBACK_SCORE)
}

/// One of the four judgments the grader is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasoningQuality {
    /// Sound, correct and complete reasoning
    Excellent,
    /// Mostly sound reasoning with minor issues
    Good,
    /// Partially sound reasoning with notable gaps
    Weak,
    /// Wrong or fabricated reasoning
    Incorrect,
}

impl ReasoningQuality {
    pub const ALL: [ReasoningQuality; 4] = [
        ReasoningQuality::Excellent,
        ReasoningQuality::Good,
        ReasoningQuality::Weak,
        ReasoningQuality::Incorrect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningQuality::Excellent => "excellent",
            ReasoningQuality::Good => "good",
            ReasoningQuality::Weak => "weak",
            ReasoningQuality::Incorrect => "incorrect",
        }
    }

    pub fn score(&self) -> u8 {
        score_for_label(self.as_str())
    }

    /// Parses a label case-insensitively. The synthetic `invalid` label is not a quality.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_label(raw);
        Self::ALL.into_iter().find(|q| q.as_str() == normalized)
    }

    /// The vocabulary as shown to the grader, e.g. `excellent/good/weak/incorrect`.
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(ReasoningQuality::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for ReasoningQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The per-record grade: the grader's label and explanation plus the derived score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVerdict {
    pub reasoning_quality: String,
    pub explanation: String,
    /// Additional fields the grader returned alongside the two requested ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub score: u8,
}

impl ScoredVerdict {
    /// Builds a verdict whose score is always taken from the table.
    pub fn new(label: impl Into<String>, explanation: impl Into<String>) -> Self {
        let reasoning_quality = label.into();
        let score = score_for_label(&reasoning_quality);
        Self {
            reasoning_quality,
            explanation: explanation.into(),
            extra: Map::new(),
            score,
        }
    }

    /// Synthetic verdict for a response that could not be decoded.
    pub fn invalid(raw_response: &str) -> Self {
        Self::new(
            INVALID_LABEL,
            format!("Model returned non-JSON output: {raw_response}"),
        )
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// The canonical quality, if the label is one of the four known ones.
    pub fn quality(&self) -> Option<ReasoningQuality> {
        ReasoningQuality::parse(&self.reasoning_quality)
    }

    pub fn is_invalid(&self) -> bool {
        self.reasoning_quality == INVALID_LABEL
    }
}
