//! Oracle error types.

use thiserror::Error;

/// Which of the four oracle operations failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleCall {
    Derive,
    Score,
    Check,
    Review,
}

impl OracleCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleCall::Derive => "derive",
            OracleCall::Score => "score",
            OracleCall::Check => "check",
            OracleCall::Review => "review",
        }
    }
}

impl std::fmt::Display for OracleCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors surfaced by an oracle call. Never retried automatically; a failing
/// call leaves its result field absent and does not abort sibling calls.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The provider was unreachable or rejected the request.
    #[error("oracle {call} call failed: {message}")]
    Transport { call: OracleCall, message: String },

    /// The per-call deadline elapsed before the provider answered.
    #[error("oracle {call} call timed out after {seconds}s")]
    Timeout { call: OracleCall, seconds: u64 },

    /// The provider answered with no usable text content.
    #[error("oracle {call} call returned an empty response")]
    EmptyResponse { call: OracleCall },

    /// The response text did not parse against the declared schema.
    #[error("oracle {call} response did not match the declared schema: {source}")]
    SchemaMismatch {
        call: OracleCall,
        #[source]
        source: serde_json::Error,
    },
}

impl OracleError {
    /// The operation this error came from.
    pub fn call(&self) -> OracleCall {
        match self {
            OracleError::Transport { call, .. }
            | OracleError::Timeout { call, .. }
            | OracleError::EmptyResponse { call }
            | OracleError::SchemaMismatch { call, .. } => *call,
        }
    }
}
