//! Turns the grader's free-text reply into a [`ScoredVerdict`].
//!
//! Decoding happens in two stages: the reply must parse as a JSON object carrying a
//! string `reasoning_quality`, then the label is normalized and scored. Any failure in
//! the first stage yields the synthetic `invalid` verdict; an unrecognized label in the
//! second stage keeps the grader's explanation and scores 0.

use serde_json::{Map, Value};

use crate::verdict::{normalize_label, ScoredVerdict};

const LABEL_FIELD: &str = "reasoning_quality";
const EXPLANATION_FIELD: &str = "explanation";
const SCORE_FIELD: &str = "score";

/// Interprets a raw grader reply. Never fails.
pub fn interpret_response(raw: &str) -> ScoredVerdict {
    match decode_object(raw) {
        Some(object) => score_object(object).unwrap_or_else(|| invalid(raw)),
        None => invalid(raw),
    }
}

fn decode_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            log::debug!("grader reply is JSON but not an object: {other}");
            None
        }
        Err(err) => {
            log::debug!("grader reply is not JSON: {err}");
            None
        }
    }
}

fn score_object(mut object: Map<String, Value>) -> Option<ScoredVerdict> {
    let label = match object.shift_remove(LABEL_FIELD) {
        Some(Value::String(label)) => normalize_label(&label),
        _ => return None,
    };
    let explanation = match object.shift_remove(EXPLANATION_FIELD) {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    // The score is always derived from the label.
    object.shift_remove(SCORE_FIELD);

    let verdict = ScoredVerdict::new(label, explanation).with_extra(object);
    if verdict.quality().is_none() {
        log::warn!(
            "grader returned unknown label '{}', scoring {}",
            verdict.reasoning_quality,
            verdict.score
        );
    }
    Some(verdict)
}

fn invalid(raw: &str) -> ScoredVerdict {
    log::warn!("grader reply could not be decoded, marking as invalid");
    ScoredVerdict::invalid(raw)
}

#[cfg(test)]
mod tests;
