//! Recommendation generation from message summaries.
//!
//! A summary goes in, a one-sentence recommendation comes out. Double quotes
//! in the summary are replaced with single quotes so the result stays safe to
//! embed in quoted or structured downstream contexts.

use serde_json::{json, Value};
use thiserror::Error;

/// Input field expected on a recommendation record.
pub const SUMMARY_FIELD: &str = "summary";

/// Output field carried by a recommendation record.
pub const RECOMMENDATION_FIELD: &str = "recommendation";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("input record is missing the `summary` field")]
    MissingSummary,

    #[error("the `summary` field must be a string")]
    SummaryNotText,
}

/// Replace every double quote in the summary with a single quote.
pub fn sanitize_summary(summary: &str) -> String {
    summary.replace('"', "'")
}

/// Render the recommendation sentence for a summary.
///
/// The output is a deterministic function of the input; the same summary
/// always yields the same recommendation.
pub fn recommendation_for(summary: &str) -> String {
    format!(
        "Based on the summary '{}', I recommend reviewing the key points and taking appropriate action.",
        sanitize_summary(summary)
    )
}

/// Transform an input record `{summary}` into an output record
/// `{recommendation}`.
pub fn recommend_record(input: &Value) -> Result<Value, RecommendError> {
    let summary = input
        .get(SUMMARY_FIELD)
        .ok_or(RecommendError::MissingSummary)?;

    let summary = summary.as_str().ok_or(RecommendError::SummaryNotText)?;

    Ok(json!({ RECOMMENDATION_FIELD: recommendation_for(summary) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_summary_is_interpolated_verbatim() {
        let record = recommend_record(&json!({ "summary": "Sales grew 10%" }))
            .expect("plain summary should transform");

        assert_eq!(
            record,
            json!({
                "recommendation": "Based on the summary 'Sales grew 10%', I recommend reviewing the key points and taking appropriate action."
            })
        );
    }

    #[test]
    fn double_quotes_become_single_quotes() {
        let record = recommend_record(&json!({ "summary": "He said \"great job\"" }))
            .expect("quoted summary should transform");

        let recommendation = record["recommendation"]
            .as_str()
            .expect("recommendation is a string");

        assert_eq!(
            recommendation,
            "Based on the summary 'He said 'great job'', I recommend reviewing the key points and taking appropriate action."
        );
    }

    #[test]
    fn interpolated_segment_contains_no_double_quotes() {
        let summary = "\"a\" \"b\" \"c\"";
        let recommendation = recommendation_for(summary);
        assert!(!recommendation.contains('"'));
    }

    #[test]
    fn transformation_is_deterministic() {
        let summary = "Quarterly churn dropped below 2%";
        assert_eq!(recommendation_for(summary), recommendation_for(summary));
    }

    #[test]
    fn output_record_has_exactly_one_field() {
        let record = recommend_record(&json!({ "summary": "ok", "extra": 1 }))
            .expect("extra input fields are ignored");

        let fields = record.as_object().expect("output is an object");
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key(RECOMMENDATION_FIELD));
    }

    #[test]
    fn missing_summary_is_reported() {
        let err = recommend_record(&json!({ "text": "no summary here" }))
            .expect_err("missing field should error");
        assert_eq!(err, RecommendError::MissingSummary);
    }

    #[test]
    fn non_string_summary_is_reported() {
        let err = recommend_record(&json!({ "summary": 42 }))
            .expect_err("numeric summary should error");
        assert_eq!(err, RecommendError::SummaryNotText);
    }

    #[test]
    fn empty_summary_still_renders() {
        assert_eq!(
            recommendation_for(""),
            "Based on the summary '', I recommend reviewing the key points and taking appropriate action."
        );
    }
}
