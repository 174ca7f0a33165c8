//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the flashcard endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{failure, ApiFailure, ErrorBody};
use crate::web::auth::{self, MessageResponse};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        generate_handler,
        save_handler,
        list_flashcards_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            MessageResponse,
            GenerateRequest,
            GenerateResponse,
            SaveRequest,
            FlashcardSetResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Flashcard API", description = "API endpoints for generating and saving flashcards.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
}

/// The raw model output for a topic, returned as one opaque text blob.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub flashcards: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub flashcards: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FlashcardSetResponse {
    pub topic: String,
    pub flashcards: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - Serve the single-page UI.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// POST /generate - Generate flashcard text for a topic.
///
/// Stateless: nothing is persisted, so the endpoint stays open to anonymous
/// callers. The topic is validated here before the upstream call is attempted.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = GenerateResponse),
        (status = 400, description = "Missing topic", body = ErrorBody),
        (status = 500, description = "Upstream completion failure", body = ErrorBody)
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiFailure> {
    // 1. Validate before any upstream call is attempted
    if req.topic.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Topic is required"));
    }

    // 2. One outbound call, no retries; the upstream detail rides the 500 body
    let content = state
        .flashcard_adapter
        .generate_flashcards(&req.topic)
        .await
        .map_err(|e| {
            error!("Flashcard generation failed: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok((
        StatusCode::OK,
        Json(GenerateResponse {
            flashcards: content.trim().to_string(),
        }),
    ))
}

/// POST /save - Persist a generated flashcard set for the logged-in user.
#[utoipa::path(
    post,
    path = "/save",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Flashcards saved", body = MessageResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn save_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<SaveRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiFailure> {
    // 1. Validate the request
    if req.topic.is_empty() || req.flashcards.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Topic and flashcards are required",
        ));
    }

    // 2. Single insert, owned by the authenticated user
    state
        .db
        .save_flashcard_set(user_id, &req.topic, &req.flashcards)
        .await
        .map_err(|e| {
            error!("Failed to save flashcards: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save flashcards")
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Flashcards saved successfully!".to_string(),
        }),
    ))
}

/// GET /flashcards - List the logged-in user's saved sets, paginated.
#[utoipa::path(
    get,
    path = "/flashcards",
    params(ListParams),
    responses(
        (status = 200, description = "The user's flashcard sets", body = [FlashcardSetResponse]),
        (status = 400, description = "Invalid page or limit", body = ErrorBody),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_flashcards_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<(StatusCode, Json<Vec<FlashcardSetResponse>>), ApiFailure> {
    // 1. Validate pagination; page is 1-based
    if params.page < 1 || params.limit < 1 {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "page must be >= 1 and limit must be >= 1",
        ));
    }

    // 2. Fetch only this user's sets; out-of-range pages come back empty
    let sets = state
        .db
        .list_flashcard_sets(user_id, params.page, params.limit)
        .await
        .map_err(|e| {
            error!("Failed to list flashcards: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list flashcards")
        })?;

    let body = sets
        .into_iter()
        .map(|set| FlashcardSetResponse {
            topic: set.topic,
            flashcards: set.content,
        })
        .collect();

    Ok((StatusCode::OK, Json(body)))
}
