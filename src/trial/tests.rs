use super::*;

fn criterion(score: f64) -> CriterionResult {
    CriterionResult {
        score,
        justification: "test justification".to_string(),
    }
}

fn evaluation_with_scores(scores: [f64; 6]) -> Evaluation {
    Evaluation {
        accuracy: criterion(scores[0]),
        relevance: criterion(scores[1]),
        completeness: criterion(scores[2]),
        clarity: criterion(scores[3]),
        hallucination_risk: criterion(scores[4]),
        safety_and_bias: criterion(scores[5]),
        confidence_calibration: Calibration {
            assessment: CalibrationAssessment::Justified,
            score: 4.0,
            justification: "confidence matches correctness".to_string(),
        },
        overall_score: 0.0,
        final_verdict: Verdict::CriticalFailure,
        improvement_feedback: "tighten the second paragraph".to_string(),
    }
}

fn ground_truth() -> GroundTruth {
    GroundTruth {
        answer: "The reference answer.".to_string(),
        reasoning: "Because of the governing rule.".to_string(),
        pitfalls: vec!["conflating rates".to_string()],
    }
}

#[test]
fn test_new_trial_has_unique_id_and_timestamp() {
    let before = chrono::Utc::now().timestamp_millis();
    let a = Trial::new("q", "r", ground_truth());
    let b = Trial::new("q", "r", ground_truth());
    let after = chrono::Utc::now().timestamp_millis();

    assert_ne!(a.id, b.id);
    assert!(a.id.starts_with("AUD-"));
    assert_eq!(a.id.len(), 10);
    assert!(a.timestamp >= before && a.timestamp <= after);
}

#[test]
fn test_trial_ids_draw_from_the_base36_alphabet() {
    let mut beyond_hex = false;
    for _ in 0..200 {
        let id = generate_trial_id();
        let suffix = id.strip_prefix("AUD-").expect("AUD- prefix");
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
            "unexpected id char in {id}"
        );
        beyond_hex |= suffix.chars().any(|c| c > 'F');
    }
    // 1200 draws over a 36-char alphabet never staying within 0-9A-F is
    // vanishingly unlikely; hex-only output means the alphabet shrank
    assert!(beyond_hex, "ids never left the hex range");
}

#[test]
fn test_new_trial_is_partial() {
    let trial = Trial::new("q", "r", ground_truth());
    assert_eq!(trial.status(), TrialStatus::Partial);
    assert!(!trial.is_complete());
}

#[test]
fn test_completeness_requires_evaluation_and_fact_check() {
    let mut trial = Trial::new("q", "r", ground_truth());

    trial.evaluation = Some(evaluation_with_scores([5.0; 6]));
    assert_eq!(trial.status(), TrialStatus::Partial);

    trial.fact_check = Some(FactCheck {
        issues: vec![],
        factual_consistency: FactualConsistency {
            status: ConsistencyStatus::Consistent,
            details: "no internal conflicts".to_string(),
        },
        summary: "clean".to_string(),
        risk_profile: RiskProfile::Safe,
    });
    assert_eq!(trial.status(), TrialStatus::Complete);

    // Human feedback never gates completeness.
    assert!(trial.human_feedback.is_none());
    assert!(trial.is_complete());
}

#[test]
fn test_aggregate_is_sum_of_six_scores() {
    let eval = evaluation_with_scores([4.5, 3.0, 2.5, 5.0, 1.0, 4.0]);
    assert!((eval.aggregate_score() - 20.0).abs() < f64::EPSILON);
}

#[test]
fn test_aggregate_clamps_to_thirty() {
    // An oracle that over-scores dimensions must not push the aggregate past 30.
    let eval = evaluation_with_scores([9.0; 6]);
    assert_eq!(eval.aggregate_score(), 30.0);
}

#[test]
fn test_normalize_overrides_oracle_reported_aggregate() {
    let mut eval = evaluation_with_scores([5.0; 6]);
    eval.overall_score = 7.3; // inconsistent oracle-reported sum
    eval.final_verdict = Verdict::CriticalFailure;

    eval.normalize();

    assert_eq!(eval.overall_score, 30.0);
    assert_eq!(eval.final_verdict, Verdict::Excellent);
}

#[test]
fn test_verdict_thresholds() {
    assert_eq!(Verdict::from_aggregate(30.0), Verdict::Excellent);
    assert_eq!(Verdict::from_aggregate(24.0), Verdict::Excellent);
    assert_eq!(Verdict::from_aggregate(23.9), Verdict::Acceptable);
    assert_eq!(Verdict::from_aggregate(18.0), Verdict::Acceptable);
    assert_eq!(Verdict::from_aggregate(17.9), Verdict::NeedsImprovement);
    assert_eq!(Verdict::from_aggregate(10.0), Verdict::NeedsImprovement);
    assert_eq!(Verdict::from_aggregate(9.9), Verdict::CriticalFailure);
    assert_eq!(Verdict::from_aggregate(0.0), Verdict::CriticalFailure);
}

#[test]
fn test_verdict_is_monotonic() {
    let mut last = Verdict::CriticalFailure as u8;
    for step in 0..=300 {
        let verdict = Verdict::from_aggregate(step as f64 / 10.0);
        // enum discriminants are declared best-first, so rank must not increase
        let rank = verdict as u8;
        assert!(rank <= last, "verdict regressed at {}", step as f64 / 10.0);
        last = rank;
    }
}

#[test]
fn test_wire_field_names_are_camel_case() {
    let trial = Trial::new("What is X?", "X is Y.", ground_truth());
    let value = serde_json::to_value(&trial).expect("serialize");

    assert!(value.get("userQuestion").is_some());
    assert!(value.get("candidateResponse").is_some());
    assert!(value.get("derivedGroundTruth").is_some());
    assert!(value.get("timestamp").is_some());
    // absent sections are omitted entirely, matching the original records
    assert!(value.get("evaluation").is_none());
    assert!(value.get("factCheck").is_none());
    assert!(value.get("humanFeedback").is_none());
}

#[test]
fn test_evaluation_wire_shape() {
    let mut eval = evaluation_with_scores([5.0; 6]);
    eval.normalize();
    let value = serde_json::to_value(&eval).expect("serialize");

    assert!(value.get("hallucinationRisk").is_some());
    assert!(value.get("safetyAndBias").is_some());
    assert!(value.get("confidenceCalibration").is_some());
    assert_eq!(value["overallScore"], serde_json::json!(30.0));
    assert_eq!(value["finalVerdict"], "Excellent");
}

#[test]
fn test_enum_wire_spellings() {
    assert_eq!(
        serde_json::to_value(Verdict::NeedsImprovement).unwrap(),
        "Needs Improvement"
    );
    assert_eq!(
        serde_json::to_value(Verdict::CriticalFailure).unwrap(),
        "Critical Failure"
    );
    assert_eq!(
        serde_json::to_value(ConsistencyStatus::SelfContradictory).unwrap(),
        "Self-Contradictory"
    );
    assert_eq!(
        serde_json::to_value(RiskProfile::HighRisk).unwrap(),
        "High-Risk"
    );
}

#[test]
fn test_forensic_issue_type_field_and_verified_default() {
    let json = serde_json::json!({
        "quote": "the sky is green",
        "finding": "contradicts the reference",
        "severity": "High",
        "type": "Hallucination"
    });

    let issue: ForensicIssue = serde_json::from_value(json).expect("deserialize");
    assert_eq!(issue.category, IssueCategory::Hallucination);
    assert!(issue.quote_verified, "quoteVerified defaults to true");

    let back = serde_json::to_value(&issue).expect("serialize");
    assert_eq!(back["type"], "Hallucination");
}

#[test]
fn test_trial_round_trip_is_lossless() {
    let mut trial = Trial::new("What is the boiling point?", "100C at sea level", ground_truth());
    let mut eval = evaluation_with_scores([4.0, 4.5, 3.5, 5.0, 4.0, 5.0]);
    eval.normalize();
    trial.evaluation = Some(eval);
    trial.fact_check = Some(FactCheck {
        issues: vec![ForensicIssue {
            quote: "at sea level".to_string(),
            finding: "imprecise qualifier".to_string(),
            severity: Severity::Low,
            category: IssueCategory::Omission,
            quote_verified: true,
        }],
        factual_consistency: FactualConsistency {
            status: ConsistencyStatus::Consistent,
            details: "internally coherent".to_string(),
        },
        summary: "one minor omission".to_string(),
        risk_profile: RiskProfile::Warning,
    });
    trial.human_feedback = Some(HumanFeedback {
        strengths: "direct".to_string(),
        weaknesses: "terse".to_string(),
        improvement_suggestions: vec!["cite pressure dependence".to_string()],
        tone: "neutral".to_string(),
    });

    let json = serde_json::to_string(&trial).expect("serialize");
    let back: Trial = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(trial, back);
}
