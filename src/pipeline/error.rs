//! Pipeline error types.

use thiserror::Error;

use crate::oracle::OracleError;
use crate::store::StoreError;

/// Errors that abort a submission. Assessment-arm failures are not here: they
/// only leave their section absent on the trial.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ground-truth derivation failed, so no trial could be created.
    #[error("ground truth derivation failed: {0}")]
    Derivation(#[source] OracleError),

    /// The trial store rejected a mutation.
    #[error(transparent)]
    Store(#[from] StoreError),
}
