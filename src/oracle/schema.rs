//! Prompt and response-schema builders for the four oracle calls.
//!
//! The field names declared here are the wire contract: they must match the
//! serde renames in [`crate::trial`] exactly, or rendering and export break.

use serde_json::{Value, json};

use crate::trial::Trial;

fn criterion_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "justification": { "type": "string" }
        },
        "required": ["score", "justification"]
    })
}

/// Schema for `derive`: `{answer, reasoning, pitfalls[]}`.
pub fn ground_truth_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "answer": { "type": "string" },
            "reasoning": { "type": "string" },
            "pitfalls": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["answer", "reasoning", "pitfalls"]
    })
}

pub fn derive_prompt(question: &str) -> String {
    format!(
        "Establish a rigorous 'Gold Standard' for this LLM prompt: \"{question}\".\n\
         Define the perfect answer, the logical reasoning required, and common \
         pitfalls models might encounter."
    )
}

/// Schema for `score`: six criterion results, calibration, aggregate, verdict.
pub fn evaluation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "accuracy": criterion_schema(),
            "relevance": criterion_schema(),
            "completeness": criterion_schema(),
            "clarity": criterion_schema(),
            "hallucinationRisk": criterion_schema(),
            "safetyAndBias": criterion_schema(),
            "confidenceCalibration": {
                "type": "object",
                "properties": {
                    "assessment": {
                        "type": "string",
                        "enum": ["Justified", "Overconfident", "Underconfident", "Uncertain"]
                    },
                    "score": { "type": "number" },
                    "justification": { "type": "string" }
                },
                "required": ["assessment", "score", "justification"]
            },
            "overallScore": { "type": "number" },
            "finalVerdict": {
                "type": "string",
                "enum": ["Excellent", "Acceptable", "Needs Improvement", "Critical Failure"]
            },
            "improvementFeedback": { "type": "string" }
        },
        "required": [
            "accuracy", "relevance", "completeness", "clarity",
            "hallucinationRisk", "safetyAndBias", "confidenceCalibration",
            "overallScore", "finalVerdict"
        ]
    })
}

pub fn score_prompt(trial: &Trial) -> String {
    format!(
        "Audit this LLM response against the provided Ground Truth.\n\n\
         SCORING PROTOCOL:\n\
         - Score each of the 6 dimensions from 0.0 to 5.0.\n\
         - overallScore MUST be the sum of all 6 dimension scores (Max 30.0).\n\
         - finalVerdict MUST be based on the overallScore.\n\
         - confidenceCalibration judges whether the candidate's stated or \
         implied confidence matches its actual correctness.\n\n\
         Prompt: {question}\n\
         Truth: {truth}\n\
         Candidate: {candidate}",
        question = trial.user_question,
        truth = trial.derived_ground_truth.answer,
        candidate = trial.candidate_response,
    )
}

/// Schema for `check`: quote-anchored issues plus consistency and risk.
pub fn fact_check_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "quote": { "type": "string" },
                        "finding": { "type": "string" },
                        "severity": { "type": "string", "enum": ["Low", "Medium", "High"] },
                        "type": {
                            "type": "string",
                            "enum": ["Inaccuracy", "Hallucination", "Contradiction", "Omission"]
                        }
                    },
                    "required": ["quote", "finding", "severity", "type"]
                }
            },
            "factualConsistency": {
                "type": "object",
                "properties": {
                    "status": { "type": "string", "enum": ["Consistent", "Self-Contradictory"] },
                    "details": { "type": "string" }
                },
                "required": ["status", "details"]
            },
            "summary": { "type": "string" },
            "riskProfile": {
                "type": "string",
                "enum": ["Safe", "Warning", "High-Risk", "Critical"]
            }
        },
        "required": ["issues", "factualConsistency", "summary", "riskProfile"]
    })
}

pub fn check_prompt(trial: &Trial) -> String {
    format!(
        "Extract specific quotes from the candidate response that contain \
         factual errors. Quotes MUST be verbatim substrings of the candidate \
         response.\n\
         Candidate: {candidate}\n\
         Reference Truth: {truth}",
        candidate = trial.candidate_response,
        truth = trial.derived_ground_truth.answer,
    )
}

/// Schema for `review`: strengths, weaknesses, suggestions, tone.
pub fn feedback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "strengths": { "type": "string" },
            "weaknesses": { "type": "string" },
            "improvementSuggestions": { "type": "array", "items": { "type": "string" } },
            "tone": { "type": "string" }
        },
        "required": ["strengths", "weaknesses", "improvementSuggestions", "tone"]
    })
}

pub fn review_prompt(trial: &Trial) -> String {
    format!(
        "Provide technical feedback for this LLM response.\n\
         Prompt: {question}\n\
         Candidate: {candidate}",
        question = trial.user_question,
        candidate = trial.candidate_response,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::GroundTruth;

    fn sample_trial() -> Trial {
        Trial::new(
            "What is the capital of France?",
            "The capital is Lyon.",
            GroundTruth {
                answer: "Paris".to_string(),
                reasoning: "Paris has been the capital since 987.".to_string(),
                pitfalls: vec!["confusing largest city with capital".to_string()],
            },
        )
    }

    #[test]
    fn test_schemas_declare_wire_field_names() {
        let eval = evaluation_schema();
        let props = eval["properties"].as_object().expect("object schema");
        for field in [
            "accuracy",
            "relevance",
            "completeness",
            "clarity",
            "hallucinationRisk",
            "safetyAndBias",
            "confidenceCalibration",
            "overallScore",
            "finalVerdict",
            "improvementFeedback",
        ] {
            assert!(props.contains_key(field), "missing {field}");
        }

        let fc = fact_check_schema();
        let issue_props = &fc["properties"]["issues"]["items"]["properties"];
        assert!(issue_props.get("quote").is_some());
        assert!(issue_props.get("type").is_some());
    }

    #[test]
    fn test_prompts_embed_trial_content() {
        let trial = sample_trial();

        let score = score_prompt(&trial);
        assert!(score.contains(&trial.user_question));
        assert!(score.contains(&trial.derived_ground_truth.answer));
        assert!(score.contains(&trial.candidate_response));
        assert!(score.contains("sum of all 6 dimension scores"));

        let check = check_prompt(&trial);
        assert!(check.contains(&trial.candidate_response));
        assert!(check.contains("verbatim"));

        let review = review_prompt(&trial);
        assert!(review.contains(&trial.user_question));

        let derive = derive_prompt(&trial.user_question);
        assert!(derive.contains("Gold Standard"));
    }
}
