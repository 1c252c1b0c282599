//! Audit report rendering.
//!
//! Produces the exportable plain-text audit document for a trial: ground
//! truth, the scoring matrix, forensic findings, persona review, and the raw
//! submitted pair, paginated with `PAGE i OF n` footers. Sections whose
//! oracle call has not finished (or failed) render as pending placeholders,
//! so a partial trial still exports a well-formed document.

pub mod layout;

#[cfg(test)]
mod tests;

pub use layout::PageComposer;

use chrono::{TimeZone, Utc};

use crate::trial::{Evaluation, FactCheck, HumanFeedback, Trial};

const PENDING: &str = "[ Section pending: the corresponding analysis has not completed. ]";

/// Export file name: `AXIOM_AUDIT_<id>_<YYYYMMDD>.txt`.
pub fn file_name(trial: &Trial) -> String {
    let date = Utc
        .timestamp_millis_opt(trial.timestamp)
        .single()
        .unwrap_or_else(Utc::now)
        .format("%Y%m%d");
    format!("AXIOM_AUDIT_{}_{}.txt", trial.id, date)
}

/// Renders the full audit document for a trial.
pub fn render(trial: &Trial) -> String {
    let mut page = PageComposer::default();

    render_header(&mut page, trial);
    render_ground_truth(&mut page, trial);

    page.heading("2. Evaluation Matrix");
    match &trial.evaluation {
        Some(evaluation) => render_evaluation(&mut page, evaluation),
        None => page.text(PENDING),
    }

    page.heading("3. Forensic Fact Check");
    match &trial.fact_check {
        Some(fact_check) => render_fact_check(&mut page, fact_check),
        None => page.text(PENDING),
    }

    page.heading("4. Persona Review");
    match &trial.human_feedback {
        Some(feedback) => render_feedback(&mut page, feedback),
        None => page.text(PENDING),
    }

    render_raw_data(&mut page, trial);

    page.finish(&trial.id)
}

fn render_header(page: &mut PageComposer, trial: &Trial) {
    let date = Utc
        .timestamp_millis_opt(trial.timestamp)
        .single()
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M:%S UTC");

    page.rule();
    page.text("AXIOM AUDIT / FORENSIC EVALUATION REPORT");
    page.rule();
    page.field("Trial", &trial.id);
    page.field("Date", &date.to_string());
    page.field("Status", trial.status().as_header_value());

    // executive summary, once scoring has landed
    if let Some(evaluation) = &trial.evaluation {
        page.blank();
        page.field(
            "Verdict",
            &format!(
                "{} ({:.1} / 30.0)",
                evaluation.final_verdict, evaluation.overall_score
            ),
        );
    }
    if let Some(fact_check) = &trial.fact_check {
        page.field("Risk Profile", fact_check.risk_profile.as_str());
    }
}

fn render_ground_truth(page: &mut PageComposer, trial: &Trial) {
    let truth = &trial.derived_ground_truth;

    page.heading("1. Derived Ground Truth");
    page.field("Reference Answer", &truth.answer);
    page.blank();
    page.field("Reasoning", &truth.reasoning);
    if !truth.pitfalls.is_empty() {
        page.blank();
        page.text("Common pitfalls:");
        for pitfall in &truth.pitfalls {
            page.text(&format!("  * {pitfall}"));
        }
    }
}

fn render_evaluation(page: &mut PageComposer, evaluation: &Evaluation) {
    for (name, criterion) in evaluation.criteria() {
        page.reserve(3);
        page.field(name, &format!("{:.1} / 5.0", criterion.score));
        page.field("  Justification", &criterion.justification);
        page.blank();
    }

    let calibration = &evaluation.confidence_calibration;
    page.reserve(3);
    page.field(
        "Confidence Calibration",
        &format!("{} ({:.1} / 5.0)", calibration.assessment, calibration.score),
    );
    page.field("  Justification", &calibration.justification);
    page.blank();

    page.field(
        "Aggregate Score",
        &format!("{:.1} / 30.0", evaluation.overall_score),
    );
    page.field("Final Verdict", &evaluation.final_verdict.to_string());
    if !evaluation.improvement_feedback.is_empty() {
        page.blank();
        page.field("Improvement Feedback", &evaluation.improvement_feedback);
    }
}

fn render_fact_check(page: &mut PageComposer, fact_check: &FactCheck) {
    if fact_check.issues.is_empty() {
        page.text("No factual issues were identified in the candidate response.");
    } else {
        for (index, issue) in fact_check.issues.iter().enumerate() {
            page.reserve(5);
            page.field(
                &format!("Issue {}", index + 1),
                &format!("{} / {}", issue.category, issue.severity),
            );
            let anchored = if issue.quote_verified {
                format!("\"{}\"", issue.quote)
            } else {
                format!("\"{}\" [quote not found verbatim in response]", issue.quote)
            };
            page.field("  Quote", &anchored);
            page.field("  Finding", &issue.finding);
            page.blank();
        }
    }

    page.blank();
    page.field(
        "Internal Consistency",
        &format!(
            "{} - {}",
            fact_check.factual_consistency.status, fact_check.factual_consistency.details
        ),
    );
    page.field("Risk Profile", &fact_check.risk_profile.to_string());
    page.field("Summary", &fact_check.summary);
}

fn render_feedback(page: &mut PageComposer, feedback: &HumanFeedback) {
    page.field("Strengths", &feedback.strengths);
    page.blank();
    page.field("Weaknesses", &feedback.weaknesses);
    page.blank();
    page.field("Tone", &feedback.tone);
    if !feedback.improvement_suggestions.is_empty() {
        page.blank();
        page.text("Suggestions:");
        for suggestion in &feedback.improvement_suggestions {
            page.text(&format!("  * {suggestion}"));
        }
    }
}

fn render_raw_data(page: &mut PageComposer, trial: &Trial) {
    page.heading("Appendix: Raw Submission");
    page.field("User Question", &trial.user_question);
    page.blank();
    page.field("Candidate Response", &trial.candidate_response);
}
