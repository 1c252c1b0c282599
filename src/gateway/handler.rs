use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header, header::HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    ContactRequest, ContactResponse, LoginRequest, RegisterRequest, SubmitTrialRequest,
};
use crate::gateway::state::HandlerState;
use crate::oracle::Oracle;
use crate::report;
use crate::trial::{AXIOM_STATUS_HEADER, Trial};

fn status_headers(trial: &Trial) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AXIOM_STATUS_HEADER,
        HeaderValue::from_static(trial.status().as_header_value()),
    );
    headers
}

/// `POST /api/trials`: derives ground truth, records the trial, and detaches
/// the three assessment arms. Responds with the partial trial; clients poll
/// `GET /api/trials/{id}` and watch the status header.
#[instrument(skip(state, request))]
pub async fn submit_trial_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Json(request): Json<SubmitTrialRequest>,
) -> Result<Response, GatewayError> {
    let question = request.user_question.trim();
    let response = request.candidate_response.trim();

    if question.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "userQuestion must not be empty".to_string(),
        ));
    }
    if response.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "candidateResponse must not be empty".to_string(),
        ));
    }

    let trial = state.orchestrator.submit_and_assess(question, response).await?;
    info!(trial_id = %trial.id, "trial submitted");

    Ok((StatusCode::ACCEPTED, status_headers(&trial), Json(trial)).into_response())
}

/// `GET /api/trials`: the full history, newest first.
#[instrument(skip(state))]
pub async fn list_trials_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
) -> Json<Vec<Trial>> {
    Json(state.store.list())
}

/// `GET /api/trials/{id}`: one trial, with its completion status as a header.
#[instrument(skip(state))]
pub async fn get_trial_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let trial = state
        .store
        .get(&id)
        .ok_or_else(|| GatewayError::TrialNotFound(id))?;

    Ok((StatusCode::OK, status_headers(&trial), Json(trial)).into_response())
}

/// `DELETE /api/trials/{id}`: removes the trial and tombstones its id so
/// in-flight oracle results are dropped.
#[instrument(skip(state))]
pub async fn delete_trial_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Path(id): Path<String>,
) -> Result<StatusCode, GatewayError> {
    let deleted = state
        .store
        .delete(&id)
        .map_err(|e| GatewayError::StoreFailed(e.to_string()))?;

    if !deleted {
        return Err(GatewayError::TrialNotFound(id));
    }

    info!(trial_id = %id, "trial deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/trials/{id}/report`: the exportable audit document. Partial
/// trials export with pending placeholders rather than failing.
#[instrument(skip(state))]
pub async fn report_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let trial = state
        .store
        .get(&id)
        .ok_or_else(|| GatewayError::TrialNotFound(id))?;

    let document = report::render(&trial);
    let file_name = report::file_name(&trial);

    let mut headers = status_headers(&trial);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
            .map_err(|e| GatewayError::InternalError(e.to_string()))?,
    );

    Ok((StatusCode::OK, headers, document).into_response())
}

/// `POST /api/contact`: validates, ledgers, and forwards an inquiry. The
/// ledger entry is written before the relay call, so a relay failure never
/// loses the inquiry.
#[instrument(skip(state, request))]
pub async fn contact_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Json(request): Json<ContactRequest>,
) -> Result<Response, GatewayError> {
    let inquiry =
        crate::contact::ContactInquiry::new(&request.company, &request.email, &request.message)?;

    state
        .ledger
        .append(inquiry.clone())
        .map_err(|e| GatewayError::StoreFailed(e.to_string()))?;

    let relayed = match &state.relay {
        Some(relay) => {
            relay.forward(&inquiry).await?;
            true
        }
        None => {
            warn!(inquiry_id = %inquiry.id, "no relay configured, inquiry kept locally");
            false
        }
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(ContactResponse {
            id: inquiry.id,
            relayed,
        }),
    )
        .into_response())
}

/// `POST /api/auth/register`: creates an account and signs it in.
#[instrument(skip(state, request))]
pub async fn register_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, GatewayError> {
    let user = state.users.register(
        &request.name,
        &request.email,
        &request.password,
        &request.company,
    )?;
    state.session.sign_in(user.clone())?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// `POST /api/auth/login`: verifies credentials and signs in.
#[instrument(skip(state, request))]
pub async fn login_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, GatewayError> {
    let user = state.users.login(&request.email, &request.password)?;
    state.session.sign_in(user.clone())?;

    Ok((StatusCode::OK, Json(user)).into_response())
}

/// `POST /api/auth/logout`: clears the active session.
#[instrument(skip(state))]
pub async fn logout_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
) -> Result<StatusCode, GatewayError> {
    state.session.sign_out()?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: the signed-in account, or 401.
#[instrument(skip(state))]
pub async fn current_user_handler<O: Oracle + 'static>(
    State(state): State<HandlerState<O>>,
) -> Result<Response, GatewayError> {
    let user = state.session.current_user().ok_or(GatewayError::Unauthorized)?;
    Ok((StatusCode::OK, Json(user)).into_response())
}
