//! Request/response bodies for the HTTP API.
//!
//! Bodies use the same camelCase wire names as the stored trial records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTrialRequest {
    pub user_question: String,
    pub candidate_response: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub company: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String,
    /// False when no relay is configured; the inquiry is ledgered either way.
    pub relayed: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
