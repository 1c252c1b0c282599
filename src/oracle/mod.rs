//! Oracle access layer.
//!
//! The [`Oracle`] trait is the capability seam for all generative calls:
//! ground-truth derivation, rubric scoring, forensic fact-checking, and
//! persona review. [`GenaiOracle`] is the production implementation; tests
//! inject [`MockOracle`] instead.

pub mod client;
pub mod error;
pub mod schema;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::GenaiOracle;
pub use error::{OracleCall, OracleError};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracle;

use async_trait::async_trait;

use crate::trial::{Evaluation, FactCheck, GroundTruth, HumanFeedback, Trial};

/// Model identifier used when no override is configured.
pub const DEFAULT_ORACLE_MODEL: &str = "gemini-flash-latest";

/// The four generative operations of the audit pipeline.
///
/// `derive` runs first and its output is embedded in the trial before the
/// three assessment calls run concurrently. Implementations must be cheap to
/// share behind an `Arc` across tasks.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Derives the reference ground truth for a question.
    async fn derive(&self, question: &str) -> Result<GroundTruth, OracleError>;

    /// Scores the candidate response across the six rubric dimensions.
    async fn score(&self, trial: &Trial) -> Result<Evaluation, OracleError>;

    /// Fact-checks the candidate response with quote-anchored findings.
    async fn check(&self, trial: &Trial) -> Result<FactCheck, OracleError>;

    /// Produces reviewer-style qualitative feedback.
    async fn review(&self, trial: &Trial) -> Result<HumanFeedback, OracleError>;
}
