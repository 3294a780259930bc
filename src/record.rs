use std::borrow::Cow;

use serde_json::Value;

use crate::error::GraderError;

pub const QUESTION_FIELD: &str = "question";
pub const REFERENCE_ANSWER_FIELD: &str = "reference_answer";
pub const MODEL_ANSWER_FIELD: &str = "model_answer";

/// The three fields of a result entry the grader needs.
///
/// Borrows from the loaded document; other fields of the entry are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaRecord<'a> {
    pub question: Cow<'a, str>,
    pub reference_answer: Cow<'a, str>,
    pub model_answer: Cow<'a, str>,
}

impl<'a> QaRecord<'a> {
    pub fn new(question: &'a str, reference_answer: &'a str, model_answer: &'a str) -> Self {
        Self {
            question: Cow::Borrowed(question),
            reference_answer: Cow::Borrowed(reference_answer),
            model_answer: Cow::Borrowed(model_answer),
        }
    }

    /// Reads a record out of entry `index` of the `results` array.
    pub fn from_entry(index: usize, entry: &'a Value) -> Result<Self, GraderError> {
        Ok(Self {
            question: field(index, entry, QUESTION_FIELD)?,
            reference_answer: field(index, entry, REFERENCE_ANSWER_FIELD)?,
            model_answer: field(index, entry, MODEL_ANSWER_FIELD)?,
        })
    }
}

fn field<'a>(
    index: usize,
    entry: &'a Value,
    name: &'static str,
) -> Result<Cow<'a, str>, GraderError> {
    match entry.get(name) {
        Some(Value::String(text)) => Ok(Cow::Borrowed(text.as_str())),
        // Numeric answers are common in MCQA result files.
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(Cow::Owned(value.to_string())),
        _ => Err(GraderError::MissingField { index, field: name }),
    }
}
