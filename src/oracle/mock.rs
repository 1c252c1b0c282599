use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::trial::{
    Calibration, CalibrationAssessment, ConsistencyStatus, CriterionResult, Evaluation, FactCheck,
    FactualConsistency, GroundTruth, HumanFeedback, Trial, Verdict,
};

use super::Oracle;
use super::error::{OracleCall, OracleError};

/// Deterministic in-memory oracle for tests.
///
/// Returns canned results, supports per-call failure and latency injection,
/// and counts invocations per operation.
pub struct MockOracle {
    state: Mutex<MockState>,
}

struct MockState {
    ground_truth: GroundTruth,
    evaluation: Evaluation,
    fact_check: FactCheck,
    feedback: HumanFeedback,
    failures: Vec<OracleCall>,
    latency: Option<Duration>,
    calls: CallCounts,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub derive: usize,
    pub score: usize,
    pub check: usize,
    pub review: usize,
}

fn canned_criterion(score: f64) -> CriterionResult {
    CriterionResult {
        score,
        justification: "mock justification".to_string(),
    }
}

/// Builds a schema-valid evaluation from six dimension scores. The reported
/// `overallScore`/`finalVerdict` are deliberately left inconsistent (zeroed)
/// so tests can assert that consumers recompute them locally.
pub fn evaluation_from_scores(scores: [f64; 6]) -> Evaluation {
    Evaluation {
        accuracy: canned_criterion(scores[0]),
        relevance: canned_criterion(scores[1]),
        completeness: canned_criterion(scores[2]),
        clarity: canned_criterion(scores[3]),
        hallucination_risk: canned_criterion(scores[4]),
        safety_and_bias: canned_criterion(scores[5]),
        confidence_calibration: Calibration {
            assessment: CalibrationAssessment::Justified,
            score: 4.0,
            justification: "mock calibration".to_string(),
        },
        overall_score: 0.0,
        final_verdict: Verdict::CriticalFailure,
        improvement_feedback: "mock improvement feedback".to_string(),
    }
}

/// A fact check reporting no issues.
pub fn clean_fact_check() -> FactCheck {
    FactCheck {
        issues: vec![],
        factual_consistency: FactualConsistency {
            status: ConsistencyStatus::Consistent,
            details: "no internal contradictions".to_string(),
        },
        summary: "no factual issues found".to_string(),
        risk_profile: crate::trial::RiskProfile::Safe,
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockState {
                ground_truth: GroundTruth {
                    answer: "The mock reference answer.".to_string(),
                    reasoning: "The mock reasoning path.".to_string(),
                    pitfalls: vec!["mock pitfall".to_string()],
                },
                evaluation: evaluation_from_scores([5.0; 6]),
                fact_check: clean_fact_check(),
                feedback: HumanFeedback {
                    strengths: "clear structure".to_string(),
                    weaknesses: "lacks citations".to_string(),
                    improvement_suggestions: vec![
                        "cite the governing rule".to_string(),
                        "qualify edge cases".to_string(),
                        "state assumptions".to_string(),
                    ],
                    tone: "neutral".to_string(),
                },
                failures: vec![],
                latency: None,
                calls: CallCounts::default(),
            }),
        }
    }
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ground_truth(self, truth: GroundTruth) -> Self {
        self.state.lock().ground_truth = truth;
        self
    }

    pub fn with_evaluation(self, evaluation: Evaluation) -> Self {
        self.state.lock().evaluation = evaluation;
        self
    }

    pub fn with_scores(self, scores: [f64; 6]) -> Self {
        self.state.lock().evaluation = evaluation_from_scores(scores);
        self
    }

    pub fn with_fact_check(self, fact_check: FactCheck) -> Self {
        self.state.lock().fact_check = fact_check;
        self
    }

    pub fn with_feedback(self, feedback: HumanFeedback) -> Self {
        self.state.lock().feedback = feedback;
        self
    }

    /// Makes the given operation fail with a transport error.
    pub fn failing(self, call: OracleCall) -> Self {
        self.state.lock().failures.push(call);
        self
    }

    /// Adds a fixed delay before every response.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().latency = Some(latency);
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    async fn respond<T>(&self, call: OracleCall, pick: impl FnOnce(&MockState) -> T) -> Result<T, OracleError> {
        let (latency, failed, value) = {
            let mut state = self.state.lock();
            match call {
                OracleCall::Derive => state.calls.derive += 1,
                OracleCall::Score => state.calls.score += 1,
                OracleCall::Check => state.calls.check += 1,
                OracleCall::Review => state.calls.review += 1,
            }
            let failed = state.failures.contains(&call);
            (state.latency, failed, pick(&state))
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if failed {
            return Err(OracleError::Transport {
                call,
                message: "mock transport failure".to_string(),
            });
        }

        Ok(value)
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn derive(&self, _question: &str) -> Result<GroundTruth, OracleError> {
        self.respond(OracleCall::Derive, |s| s.ground_truth.clone())
            .await
    }

    async fn score(&self, _trial: &Trial) -> Result<Evaluation, OracleError> {
        self.respond(OracleCall::Score, |s| s.evaluation.clone())
            .await
    }

    async fn check(&self, _trial: &Trial) -> Result<FactCheck, OracleError> {
        self.respond(OracleCall::Check, |s| s.fact_check.clone())
            .await
    }

    async fn review(&self, _trial: &Trial) -> Result<HumanFeedback, OracleError> {
        self.respond(OracleCall::Review, |s| s.feedback.clone())
            .await
    }
}
