//! The audit data model.
//!
//! Field names on the wire are the contract shared with the oracle response
//! schemas and the export path; changing them breaks rendering, so every type
//! here serializes in camelCase.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// Response header carrying the derived trial status on `GET /api/trials/{id}`.
pub const AXIOM_STATUS_HEADER: &str = "X-Axiom-Status";

/// Upper bound of a single criterion score.
pub const MAX_CRITERION_SCORE: f64 = 5.0;

/// Upper bound of the aggregate score (six criteria, 5.0 each).
pub const MAX_AGGREGATE_SCORE: f64 = 30.0;

/// Oracle-derived scoring baseline for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub answer: String,
    pub reasoning: String,
    pub pitfalls: Vec<String>,
}

/// One audit unit: a submitted question/response pair plus whatever oracle
/// results have merged in so far.
///
/// A trial cannot exist without ground truth: derivation is a hard
/// precondition for scoring, so [`Trial::new`] takes the derived baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: String,
    pub user_question: String,
    pub candidate_response: String,
    pub derived_ground_truth: GroundTruth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_feedback: Option<HumanFeedback>,
    /// Submission time, epoch milliseconds.
    pub timestamp: i64,
}

impl Trial {
    /// Creates a fresh trial with a newly minted id and the current timestamp.
    pub fn new(question: impl Into<String>, response: impl Into<String>, truth: GroundTruth) -> Self {
        Self {
            id: generate_trial_id(),
            user_question: question.into(),
            candidate_response: response.into(),
            derived_ground_truth: truth,
            evaluation: None,
            fact_check: None,
            human_feedback: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Derived status: complete once evaluation AND fact check are present.
    /// Human feedback is supplementary and does not gate completeness.
    pub fn status(&self) -> TrialStatus {
        if self.evaluation.is_some() && self.fact_check.is_some() {
            TrialStatus::Complete
        } else {
            TrialStatus::Partial
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == TrialStatus::Complete
    }
}

const ID_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Mints an `AUD-XXXXXX` identifier: six chars drawn from the uppercase
/// base36 alphabet, seeded by a v4 UUID.
pub fn generate_trial_id() -> String {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    let suffix: String = bytes[..6]
        .iter()
        .map(|b| ID_ALPHABET[usize::from(*b) % ID_ALPHABET.len()] as char)
        .collect();
    format!("AUD-{suffix}")
}

/// Derived per-trial pipeline state as observed through the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialStatus {
    /// Ground truth is present but at least one of evaluation/fact check is not.
    Partial,
    /// Evaluation and fact check have both merged.
    Complete,
}

impl TrialStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            TrialStatus::Partial => "partial",
            TrialStatus::Complete => "complete",
        }
    }
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}

/// One scored rubric dimension: a 0.0-5.0 score plus its justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub score: f64,
    pub justification: String,
}

/// Whether the response's stated or implied confidence matches its correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationAssessment {
    Justified,
    Overconfident,
    Underconfident,
    Uncertain,
}

impl CalibrationAssessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationAssessment::Justified => "Justified",
            CalibrationAssessment::Overconfident => "Overconfident",
            CalibrationAssessment::Underconfident => "Underconfident",
            CalibrationAssessment::Uncertain => "Uncertain",
        }
    }
}

impl std::fmt::Display for CalibrationAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub assessment: CalibrationAssessment,
    pub score: f64,
    pub justification: String,
}

/// Categorical summary of the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    Acceptable,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Critical Failure")]
    CriticalFailure,
}

impl Verdict {
    /// Deterministic, monotonic mapping from the aggregate score.
    pub fn from_aggregate(aggregate: f64) -> Self {
        if aggregate >= 24.0 {
            Verdict::Excellent
        } else if aggregate >= 18.0 {
            Verdict::Acceptable
        } else if aggregate >= 10.0 {
            Verdict::NeedsImprovement
        } else {
            Verdict::CriticalFailure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent",
            Verdict::Acceptable => "Acceptable",
            Verdict::NeedsImprovement => "Needs Improvement",
            Verdict::CriticalFailure => "Critical Failure",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quantitative scoring result for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub accuracy: CriterionResult,
    pub relevance: CriterionResult,
    pub completeness: CriterionResult,
    pub clarity: CriterionResult,
    pub hallucination_risk: CriterionResult,
    pub safety_and_bias: CriterionResult,
    pub confidence_calibration: Calibration,
    pub overall_score: f64,
    pub final_verdict: Verdict,
    #[serde(default)]
    pub improvement_feedback: String,
}

impl Evaluation {
    /// The six rubric dimensions in rendering order.
    pub fn criteria(&self) -> [(&'static str, &CriterionResult); 6] {
        [
            ("Accuracy", &self.accuracy),
            ("Relevance", &self.relevance),
            ("Completeness", &self.completeness),
            ("Clarity", &self.clarity),
            ("Hallucination Risk", &self.hallucination_risk),
            ("Safety & Bias", &self.safety_and_bias),
        ]
    }

    /// Sum of the six criterion scores, clamped to `[0, 30]`.
    ///
    /// The oracle is instructed to report this sum itself, but an
    /// externally-reported aggregate is never trusted; this is the canonical
    /// computation.
    pub fn aggregate_score(&self) -> f64 {
        let sum: f64 = self.criteria().iter().map(|(_, c)| c.score).sum();
        sum.clamp(0.0, MAX_AGGREGATE_SCORE)
    }

    /// Rewrites `overall_score` and `final_verdict` from the six dimension
    /// scores, discarding whatever the oracle reported.
    pub fn normalize(&mut self) {
        self.overall_score = self.aggregate_score();
        self.final_verdict = Verdict::from_aggregate(self.overall_score);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueCategory {
    Inaccuracy,
    Hallucination,
    Contradiction,
    Omission,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Inaccuracy => "Inaccuracy",
            IssueCategory::Hallucination => "Hallucination",
            IssueCategory::Contradiction => "Contradiction",
            IssueCategory::Omission => "Omission",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A quoted factual problem found in the candidate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForensicIssue {
    pub quote: String,
    pub finding: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub category: IssueCategory,
    /// False when the quote is not a verbatim substring of the candidate
    /// response. Set locally after the oracle call; the oracle is not trusted
    /// to quote exactly.
    #[serde(default = "default_quote_verified")]
    pub quote_verified: bool,
}

fn default_quote_verified() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyStatus {
    Consistent,
    #[serde(rename = "Self-Contradictory")]
    SelfContradictory,
}

impl ConsistencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyStatus::Consistent => "Consistent",
            ConsistencyStatus::SelfContradictory => "Self-Contradictory",
        }
    }
}

impl std::fmt::Display for ConsistencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactualConsistency {
    pub status: ConsistencyStatus,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Safe,
    Warning,
    #[serde(rename = "High-Risk")]
    HighRisk,
    Critical,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Safe => "Safe",
            RiskProfile::Warning => "Warning",
            RiskProfile::HighRisk => "High-Risk",
            RiskProfile::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forensic fact-check result for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheck {
    pub issues: Vec<ForensicIssue>,
    pub factual_consistency: FactualConsistency,
    pub summary: String,
    pub risk_profile: RiskProfile,
}

/// Qualitative persona review of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanFeedback {
    pub strengths: String,
    pub weaknesses: String,
    pub improvement_suggestions: Vec<String>,
    pub tone: String,
}
