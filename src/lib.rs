//! Axiom library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Trial`], [`GroundTruth`], [`Evaluation`], [`FactCheck`], [`HumanFeedback`] -
//!   The audit record and its oracle-derived sections
//! - [`Verdict`], [`TrialStatus`] - Derived categorical state
//!
//! ## Pipeline
//! - [`Oracle`] - The injectable capability seam for all four oracle calls
//! - [`GenaiOracle`] - Production oracle client over the `genai` provider
//! - [`Orchestrator`] - Sequencing: derive first, then concurrent assessments
//! - [`TrialStore`] - Partial-result merge store with tombstoned deletion
//!
//! ## Rendering & Auxiliary
//! - [`report::render`] / [`report::file_name`] - Paginated audit document export
//! - [`UserDirectory`], [`SessionStore`] - Local auth directory and session
//! - [`InquiryLedger`], [`RelayClient`] - Contact ledger and mail-relay uplink
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod auth;
pub mod config;
pub mod contact;
pub mod gateway;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod trial;

pub use auth::{AuthError, PublicUser, SessionStore, UserDirectory};
pub use config::{Config, ConfigError};
pub use contact::{ContactInquiry, InquiryLedger, RelayClient, RelayError, ValidationError};
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracle;
pub use oracle::{DEFAULT_ORACLE_MODEL, GenaiOracle, Oracle, OracleError};
pub use pipeline::Orchestrator;
pub use report::PageComposer;
pub use store::{StoreError, TRIAL_HISTORY_FILENAME, TrialStore};
pub use trial::{
    AXIOM_STATUS_HEADER, Calibration, CalibrationAssessment, ConsistencyStatus, CriterionResult,
    Evaluation, FactCheck, FactualConsistency, ForensicIssue, GroundTruth, HumanFeedback,
    IssueCategory, MAX_AGGREGATE_SCORE, MAX_CRITERION_SCORE, RiskProfile, Severity, Trial,
    TrialStatus, Verdict,
};
