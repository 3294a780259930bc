//! Builds the grading request sent to the grader model.

use crate::record::QaRecord;
use crate::verdict::ReasoningQuality;

/// Criteria the grader is asked to judge reasoning on.
pub const REASONING_CRITERIA: [&str; 5] = [
    "logical soundness",
    "factual correctness",
    "alignment with the question",
    "avoidance of hallucinations",
    "completeness and relevance",
];

/// Renders the evaluation request for one record.
///
/// Question and answers are embedded verbatim. The grader is told to judge reasoning only,
/// not final-answer correctness, and to reply with a two-field JSON object.
pub fn build_grading_prompt(record: &QaRecord<'_>) -> String {
    let criteria = REASONING_CRITERIA
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
You will evaluate the quality of the reasoning in the model's answer to a question.

--- Question ---
{question}

--- Correct Answer ---
{reference}

--- Model's Answer (including reasoning) ---
{answer}

Task:
Evaluate ONLY the reasoning quality (not the final answer correctness).
Focus on:
{criteria}

Output STRICTLY in JSON:
{{
  "reasoning_quality": "{vocabulary}",
  "explanation": "One short paragraph explaining your judgment."
}}
"#,
        question = record.question,
        reference = record.reference_answer,
        answer = record.model_answer,
        vocabulary = ReasoningQuality::vocabulary(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QaRecord<'static> {
        QaRecord::new(
            "Which gas do plants absorb?",
            "Carbon dioxide",
            "Plants take in CO2 during photosynthesis, so the answer is carbon dioxide.",
        )
    }

    #[test]
    fn embeds_record_fields_verbatim() {
        let prompt = build_grading_prompt(&sample());
        assert!(prompt.contains("--- Question ---\nWhich gas do plants absorb?\n"));
        assert!(prompt.contains("--- Correct Answer ---\nCarbon dioxide\n"));
        assert!(prompt.contains(
            "--- Model's Answer (including reasoning) ---\nPlants take in CO2 during photosynthesis"
        ));
    }

    #[test]
    fn asks_for_reasoning_only_on_all_criteria() {
        let prompt = build_grading_prompt(&sample());
        assert!(prompt.contains("not the final answer correctness"));
        for criterion in REASONING_CRITERIA {
            assert!(prompt.contains(&format!("- {criterion}\n")), "{criterion}");
        }
    }

    #[test]
    fn mandates_two_field_json_with_closed_vocabulary() {
        let prompt = build_grading_prompt(&sample());
        assert!(prompt.contains(r#""reasoning_quality": "excellent/good/weak/incorrect""#));
        assert!(prompt.contains(r#""explanation": "#));
    }

    #[test]
    fn braces_in_answers_are_not_interpreted() {
        let record = QaRecord::new("{q}", "{{r}}", "}");
        let prompt = build_grading_prompt(&record);
        assert!(prompt.contains("--- Question ---\n{q}\n"));
        assert!(prompt.contains("--- Correct Answer ---\n{{r}}\n"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(build_grading_prompt(&sample()), build_grading_prompt(&sample()));
    }
}
