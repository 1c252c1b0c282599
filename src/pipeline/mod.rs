//! Audit pipeline orchestration.
//!
//! A submission runs in two phases. `derive` is sequential and blocking: its
//! ground truth is embedded in the trial before anything else happens, and a
//! derivation failure aborts the whole submission. The three assessment calls
//! (scoring, fact-check, persona review) then run concurrently; each arm
//! merges its own result into the store the moment it returns, and an arm
//! failure is logged without disturbing its siblings.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::PipelineError;

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::oracle::Oracle;
use crate::store::TrialStore;
use crate::trial::{FactCheck, Trial};

/// Drives the four oracle calls for a submission and merges their results.
pub struct Orchestrator<O: Oracle> {
    oracle: Arc<O>,
    store: Arc<TrialStore>,
}

impl<O: Oracle> Clone for Orchestrator<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
            store: Arc::clone(&self.store),
        }
    }
}

/// Which assessment arms landed in the store. An arm is `false` when its
/// oracle call failed or the trial was deleted before the result arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentOutcome {
    pub evaluation: bool,
    pub fact_check: bool,
    pub feedback: bool,
}

impl<O: Oracle> Orchestrator<O> {
    pub fn new(oracle: Arc<O>, store: Arc<TrialStore>) -> Self {
        Self { oracle, store }
    }

    pub fn store(&self) -> &Arc<TrialStore> {
        &self.store
    }

    /// Phase one: derives ground truth and records the partial trial.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        question: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<Trial, PipelineError> {
        let question = question.into();
        let response = response.into();

        let truth = self
            .oracle
            .derive(&question)
            .await
            .map_err(PipelineError::Derivation)?;

        let trial = Trial::new(question, response, truth);
        self.store.insert(trial.clone())?;
        info!(trial_id = %trial.id, "trial recorded");

        Ok(trial)
    }

    /// Phase two: runs the three assessment arms concurrently against a
    /// recorded trial, merging each result as soon as it arrives.
    #[instrument(skip_all, fields(trial_id = %trial.id))]
    pub async fn assess(&self, trial: &Trial) -> AssessmentOutcome {
        let (evaluation, fact_check, feedback) = tokio::join!(
            self.run_score(trial),
            self.run_check(trial),
            self.run_review(trial),
        );

        AssessmentOutcome {
            evaluation,
            fact_check,
            feedback,
        }
    }

    /// Submits a pair and detaches the assessment arms onto the runtime,
    /// returning the partial trial immediately. Callers observe progress via
    /// the store's completion status.
    pub async fn submit_and_assess(
        &self,
        question: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<Trial, PipelineError>
    where
        O: 'static,
    {
        let trial = self.submit(question, response).await?;

        let this = self.clone();
        let snapshot = trial.clone();
        tokio::spawn(async move {
            this.assess(&snapshot).await;
        });

        Ok(trial)
    }

    async fn run_score(&self, trial: &Trial) -> bool {
        match self.oracle.score(trial).await {
            Ok(mut evaluation) => {
                // The oracle-reported aggregate is advisory; the recorded
                // score and verdict are always recomputed from the dimensions.
                evaluation.normalize();
                self.merge(trial, "evaluation", |store, id| {
                    store.merge_evaluation(id, evaluation)
                })
            }
            Err(e) => {
                warn!(trial_id = %trial.id, error = %e, "scoring arm failed");
                false
            }
        }
    }

    async fn run_check(&self, trial: &Trial) -> bool {
        match self.oracle.check(trial).await {
            Ok(mut fact_check) => {
                verify_quotes(&mut fact_check, &trial.candidate_response);
                self.merge(trial, "fact_check", |store, id| {
                    store.merge_fact_check(id, fact_check)
                })
            }
            Err(e) => {
                warn!(trial_id = %trial.id, error = %e, "fact-check arm failed");
                false
            }
        }
    }

    async fn run_review(&self, trial: &Trial) -> bool {
        match self.oracle.review(trial).await {
            Ok(feedback) => self.merge(trial, "human_feedback", |store, id| {
                store.merge_feedback(id, feedback)
            }),
            Err(e) => {
                warn!(trial_id = %trial.id, error = %e, "review arm failed");
                false
            }
        }
    }

    fn merge(
        &self,
        trial: &Trial,
        section: &'static str,
        apply: impl FnOnce(&TrialStore, &str) -> Result<bool, crate::store::StoreError>,
    ) -> bool {
        match apply(&self.store, &trial.id) {
            Ok(merged) => merged,
            Err(e) => {
                warn!(trial_id = %trial.id, section, error = %e, "merge failed");
                false
            }
        }
    }
}

/// Marks each forensic issue with whether its quote is a verbatim substring
/// of the candidate response. Unverifiable quotes are kept but flagged, so
/// reports can caption them as unanchored.
pub(crate) fn verify_quotes(fact_check: &mut FactCheck, candidate: &str) {
    for issue in &mut fact_check.issues {
        issue.quote_verified = candidate.contains(issue.quote.as_str());
        if !issue.quote_verified {
            warn!(quote = %issue.quote, "forensic quote not found in candidate response");
        }
    }
}
