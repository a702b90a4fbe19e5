//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Handlers only translate HTTP into session events and render the state the
//! core returns.

use crate::error::ApiError;
use crate::web::protocol::{
    FeedbackView, QuestionView, RatingView, SessionView, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
use crate::web::state::{AppState, SessionHandle};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use bytes::Bytes;
use interview_coach_core::{Briefing, InterviewSession, SessionError};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        start_session_handler,
        submit_answer_handler,
        get_session_handler,
        delete_session_handler,
    ),
    components(
        schemas(SessionView, QuestionView, FeedbackView, RatingView, SubmitAnswerRequest, SubmitAnswerResponse)
    ),
    tags(
        (name = "Interview Coach API", description = "API endpoints for guided mock interviews.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Multipart Intake
//=========================================================================================

/// The raw parts of a create-session form, before text extraction.
#[derive(Default)]
struct IntakeForm {
    role: String,
    job_description: String,
    job_description_file: Option<Bytes>,
    resume: Option<Bytes>,
}

async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, ApiError> {
    let mut form = IntakeForm::default();
    let bad_request = |e: axum::extract::multipart::MultipartError| {
        ApiError::BadRequest(format!("Failed to read multipart data: {}", e))
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "role" => form.role = field.text().await.map_err(bad_request)?,
            "job_description" => form.job_description = field.text().await.map_err(bad_request)?,
            "job_description_file" => {
                form.job_description_file = Some(field.bytes().await.map_err(bad_request)?)
            }
            "resume" => form.resume = Some(field.bytes().await.map_err(bad_request)?),
            other => {
                return Err(ApiError::BadRequest(format!(
                    "Unexpected form field '{}'",
                    other
                )))
            }
        }
    }
    Ok(form)
}

/// Extracts document text off the async runtime, since PDF parsing blocks.
async fn extract(app_state: &Arc<AppState>, document: Option<Bytes>) -> Result<String, ApiError> {
    let Some(document) = document else {
        return Ok(String::new());
    };
    let extractor = app_state.extractor.clone();
    tokio::task::spawn_blocking(move || extractor.extract_text(&document))
        .await
        .map_err(|e| ApiError::Internal(format!("Text extraction task failed: {}", e)))
}

async fn find_session(app_state: &AppState, session_id: Uuid) -> Result<SessionHandle, ApiError> {
    app_state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::SessionNotFound(session_id))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create and start a new interview session.
///
/// Accepts a multipart/form-data request with a `role` text part, a job
/// description as either a `job_description` text part or a
/// `job_description_file` document, and a `resume` document (PDF or text).
/// If no questions can be generated the session is kept, still not started,
/// and returned with status 503 so it can be retried.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body(content_type = "multipart/form-data", description = "Role, job description and resume."),
    responses(
        (status = 201, description = "Session created and started", body = SessionView),
        (status = 400, description = "Malformed multipart body"),
        (status = 422, description = "Missing role, job description or resume text"),
        (status = 503, description = "Session created but no questions could be generated", body = SessionView)
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let form = read_intake_form(multipart).await?;

    let job_description = if form.job_description.trim().is_empty() {
        extract(&app_state, form.job_description_file).await?
    } else {
        form.job_description
    };
    let resume_text = extract(&app_state, form.resume).await?;
    let briefing = Briefing::new(form.role, job_description, resume_text)?;

    let session = InterviewSession::new(briefing, app_state.session_settings.clone());
    info!("Created interview session {}", session.id());
    let handle = app_state.sessions.insert(session).await;

    let mut session = handle.lock().await;
    let started = session.start(&app_state.gateway).await.map(|_| ());
    match started {
        Ok(()) => Ok((StatusCode::CREATED, Json(SessionView::from(&*session)))),
        Err(SessionError::NoQuestionsGenerated) => {
            warn!("Session {} is waiting for a retry of /start.", session.id());
            Ok((StatusCode::SERVICE_UNAVAILABLE, Json(SessionView::from(&*session))))
        }
        Err(e) => Err(e.into()),
    }
}

/// Retry starting a session whose question generation failed.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/start",
    params(("session_id" = Uuid, Path, description = "The interview session.")),
    responses(
        (status = 200, description = "Session started", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session already started or completed"),
        (status = 503, description = "Still no questions; try again later")
    )
)]
pub async fn start_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    session.start(&app_state.gateway).await?;
    Ok(Json(SessionView::from(&*session)))
}

/// Submit the answer to one question and receive its feedback.
///
/// The submission that answers the last open question also returns the
/// overall rating. Questions may be answered in any order, each only once.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/answers",
    params(("session_id" = Uuid, Path, description = "The interview session.")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded and feedback generated", body = SubmitAnswerResponse),
        (status = 404, description = "Unknown session or question"),
        (status = 409, description = "Question already answered, or session not in progress"),
        (status = 422, description = "Empty answer")
    )
)]
pub async fn submit_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let outcome = session
        .submit_answer(&app_state.gateway, request.question_index, &request.answer)
        .await?;
    Ok(Json(SubmitAnswerResponse::from_outcome(&outcome)))
}

/// Fetch the current state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The interview session.")),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = find_session(&app_state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// Discard a session. A new interview always starts a new session.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The interview session.")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .sessions
        .remove(session_id)
        .await
        .ok_or(ApiError::SessionNotFound(session_id))?;
    info!("Discarded interview session {}", session_id);
    Ok(StatusCode::NO_CONTENT)
}
