use super::layout::{PAGE_BODY_LINES, PAGE_WIDTH, wrap};
use super::*;

use crate::oracle::mock::{clean_fact_check, evaluation_from_scores};
use crate::trial::{
    ForensicIssue, GroundTruth, HumanFeedback, IssueCategory, Severity, Trial,
};

fn base_trial() -> Trial {
    let mut trial = Trial::new(
        "Why is the sky blue?",
        "Rayleigh scattering favours short wavelengths.",
        GroundTruth {
            answer: "Rayleigh scattering of sunlight.".to_string(),
            reasoning: "Shorter wavelengths scatter more strongly.".to_string(),
            pitfalls: vec!["attributing the colour to ozone".to_string()],
        },
    );
    trial.timestamp = 1_735_689_600_000; // 2025-01-01 00:00:00 UTC
    trial
}

fn complete_trial() -> Trial {
    let mut trial = base_trial();
    let mut eval = evaluation_from_scores([4.0, 4.5, 3.5, 5.0, 4.0, 5.0]);
    eval.normalize();
    trial.evaluation = Some(eval);
    trial.fact_check = Some(clean_fact_check());
    trial.human_feedback = Some(HumanFeedback {
        strengths: "physically accurate".to_string(),
        weaknesses: "no mention of sunsets".to_string(),
        improvement_suggestions: vec!["contrast with sunset reddening".to_string()],
        tone: "confident".to_string(),
    });
    trial
}

#[test]
fn test_file_name_embeds_id_and_date() {
    let trial = base_trial();
    assert_eq!(
        file_name(&trial),
        format!("AXIOM_AUDIT_{}_20250101.txt", trial.id)
    );
}

#[test]
fn test_render_contains_all_sections() {
    let report = render(&complete_trial());

    assert!(report.contains("AXIOM AUDIT / FORENSIC EVALUATION REPORT"));
    assert!(report.contains("1. DERIVED GROUND TRUTH"));
    assert!(report.contains("2. EVALUATION MATRIX"));
    assert!(report.contains("3. FORENSIC FACT CHECK"));
    assert!(report.contains("4. PERSONA REVIEW"));
    assert!(report.contains("APPENDIX: RAW SUBMISSION"));
    assert!(report.contains("Rayleigh scattering of sunlight."));
    assert!(report.contains("Aggregate Score: 26.0 / 30.0"));
    assert!(report.contains("Final Verdict: Excellent"));
}

#[test]
fn test_partial_trial_renders_pending_placeholders() {
    let report = render(&base_trial());
    assert_eq!(report.matches("Section pending").count(), 3);
    assert!(report.contains("Status: partial"));
}

#[test]
fn test_clean_fact_check_states_no_issues() {
    let report = render(&complete_trial());
    assert!(report.contains("No factual issues were identified"));
}

#[test]
fn test_unverified_quote_is_captioned() {
    let mut trial = complete_trial();
    let fact_check = trial.fact_check.as_mut().unwrap();
    fact_check.issues.push(ForensicIssue {
        quote: "scattering favours short wavelengths".to_string(),
        finding: "correct but incomplete".to_string(),
        severity: Severity::Low,
        category: IssueCategory::Omission,
        quote_verified: true,
    });
    fact_check.issues.push(ForensicIssue {
        quote: "the moon is blue".to_string(),
        finding: "fabricated claim".to_string(),
        severity: Severity::High,
        category: IssueCategory::Hallucination,
        quote_verified: false,
    });

    let report = render(&trial);
    assert!(report.contains("\"scattering favours short wavelengths\""));
    assert!(report.contains("[quote not found verbatim in response]"));
    assert!(report.contains("Hallucination / High"));
}

#[test]
fn test_every_page_carries_a_footer() {
    let mut trial = complete_trial();
    // force multiple pages
    trial.candidate_response = "wavelength ".repeat(2000);

    let report = render(&trial);
    let pages: Vec<&str> = report.split('\u{c}').collect();
    assert!(pages.len() > 1, "long content should paginate");

    for (index, page) in pages.iter().enumerate() {
        assert!(
            page.contains(&format!("PAGE {} OF {}", index + 1, pages.len())),
            "missing footer on page {}",
            index + 1
        );
        assert!(page.contains(&trial.id));
    }
}

#[test]
fn test_rendered_lines_fit_page_width() {
    let report = render(&complete_trial());
    for line in report.lines() {
        assert!(
            line.chars().count() <= PAGE_WIDTH,
            "line overflows page: {line:?}"
        );
    }
}

#[test]
fn test_wrap_splits_on_word_boundaries() {
    let lines = wrap("alpha beta gamma delta", 11);
    assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
}

#[test]
fn test_wrap_hard_splits_oversized_tokens() {
    let lines = wrap("abcdefghij", 4);
    assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn test_composer_reserve_breaks_page() {
    let mut page = PageComposer::new(40, 10);
    for _ in 0..8 {
        page.text("line");
    }
    page.reserve(5);
    page.text("next section");

    let out = page.finish("AUD-TEST01");
    assert!(out.contains("PAGE 1 OF 2"));
    assert!(out.contains("PAGE 2 OF 2"));
}

#[test]
fn test_default_composer_single_page() {
    let mut page = PageComposer::default();
    page.text("hello");
    let out = page.finish("AUD-TEST01");
    assert!(out.contains("PAGE 1 OF 1"));
    assert_eq!(out.lines().count(), PAGE_BODY_LINES + 2);
}
