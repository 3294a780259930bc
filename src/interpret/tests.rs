use super::*;
use rstest::rstest;

#[test]
fn well_formed_reply_is_scored() {
    let verdict = interpret_response(
        r#"{"reasoning_quality": "good", "explanation": "Sound but skips a step."}"#,
    );

    assert_eq!(verdict.reasoning_quality, "good");
    assert_eq!(verdict.explanation, "Sound but skips a step.");
    assert_eq!(verdict.score, 3);
    assert!(verdict.extra.is_empty());
}

#[rstest]
#[case(r#"{"reasoning_quality": "Excellent", "explanation": "x"}"#)]
#[case(r#"{"reasoning_quality": "  EXCELLENT ", "explanation": "x"}"#)]
#[case("\n  {\"reasoning_quality\": \"excellent\", \"explanation\": \"x\"}  \n")]
fn labels_are_normalized(#[case] raw: &str) {
    let verdict = interpret_response(raw);
    assert_eq!(verdict.reasoning_quality, "excellent");
    assert_eq!(verdict.score, 4);
}

#[rstest]
#[case("The reasoning is excellent.")]
#[case("")]
#[case("```json\n{\"reasoning_quality\": \"good\"}\n```")]
#[case(r#"{"reasoning_quality": "good", "explanation": "#)]
#[case(r#"["good", "fine"]"#)]
#[case(r#""good""#)]
#[case(r#"{"explanation": "no label given"}"#)]
#[case(r#"{"reasoning_quality": 4, "explanation": "numeric label"}"#)]
fn undecodable_replies_become_invalid(#[case] raw: &str) {
    let verdict = interpret_response(raw);

    assert_eq!(verdict.reasoning_quality, "invalid");
    assert_eq!(verdict.score, 0);
    assert_eq!(
        verdict.explanation,
        format!("Model returned non-JSON output: {raw}")
    );
}

#[test]
fn unknown_label_keeps_grader_explanation() {
    let verdict = interpret_response(
        r#"{"reasoning_quality": "Mediocre", "explanation": "Half right."}"#,
    );

    assert_eq!(verdict.reasoning_quality, "mediocre");
    assert_eq!(verdict.explanation, "Half right.");
    assert_eq!(verdict.score, 0);
}

#[test]
fn missing_explanation_defaults_to_empty() {
    let verdict = interpret_response(r#"{"reasoning_quality": "weak"}"#);
    assert_eq!(verdict.explanation, "");
    assert_eq!(verdict.score, 2);
}

#[test]
fn non_string_explanation_is_kept_as_json_text() {
    let verdict =
        interpret_response(r#"{"reasoning_quality": "incorrect", "explanation": ["a", "b"]}"#);
    assert_eq!(verdict.explanation, r#"["a","b"]"#);
    assert_eq!(verdict.score, 1);
}

#[test]
fn additional_fields_are_preserved_in_order() {
    let verdict = interpret_response(
        r#"{"confidence": 0.9, "reasoning_quality": "good", "explanation": "ok", "flags": []}"#,
    );

    let keys: Vec<&str> = verdict.extra.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["confidence", "flags"]);
    assert_eq!(verdict.score, 3);
}

#[test]
fn grader_cannot_override_score() {
    let verdict = interpret_response(
        r#"{"reasoning_quality": "weak", "explanation": "meh", "score": 4}"#,
    );
    assert_eq!(verdict.score, 2);
    assert!(!verdict.extra.contains_key("score"));
}
