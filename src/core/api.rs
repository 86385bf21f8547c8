//! HTTP API for Brea Arena
//!
//! Identity comes from the `x-user-id` header set by the auth layer in front.
//!
//! Endpoints:
//! - GET  /health                    - Health check
//! - GET  /profile                   - Profile + recent matches
//! - POST /profile/extraction        - Merge extracted profile data
//! - POST /profile/chips             - Merge live intelligence chips
//! - POST /profile/hypotheses/confirm - Confirm or reject a hypothesis
//! - POST /arena/run                 - Run a compatibility simulation
//! - GET  /matches                   - List own matches
//! - GET  /matches/:id               - Get one match
//! - POST /matches/:id/consent       - Approve or reject a match

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::core::arena::{Arena, ArenaRun};
use crate::core::consent::{ConsentAction, ConsentOutcome};
use crate::core::profile::chips_to_extraction;
use crate::core::store::ProfileStore;
use crate::types::{
    ArenaError, Dossier, IntelligenceChip, MatchResult, MatchSummary, Profile, ProfileExtraction,
};

/// Header carrying the verified caller id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Arena shared across handlers
pub type SharedArena = Arc<Arena<dyn ProfileStore>>;

/// Verified caller identity
#[derive(Debug, Clone)]
pub struct Caller(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Caller(v.to_string()))
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Error body: `{ "error": ..., "code": ..., "retryable": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    /// Unreadable request body
    BadRequest { status: StatusCode, message: String },
    Arena(ArenaError),
}

impl From<ArenaError> for ApiError {
    fn from(err: ArenaError) -> Self {
        ApiError::Arena(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: format!("missing {} header", USER_ID_HEADER),
                    code: "UNAUTHENTICATED".to_string(),
                    retryable: false,
                },
            ),
            ApiError::BadRequest { status, message } => (
                status,
                ErrorBody {
                    error: message,
                    code: "BAD_REQUEST".to_string(),
                    retryable: false,
                },
            ),
            ApiError::Arena(err) => (
                status_for(&err),
                ErrorBody {
                    error: err.to_string(),
                    code: err.code().to_string(),
                    retryable: err.is_retryable(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn status_for(err: &ArenaError) -> StatusCode {
    match err {
        ArenaError::NotFound(_) => StatusCode::NOT_FOUND,
        ArenaError::NoEligibleCandidates
        | ArenaError::DuplicateMatch { .. }
        | ArenaError::AlreadyDecided { .. } => StatusCode::CONFLICT,
        ArenaError::SafetyBlocked(_) => StatusCode::FORBIDDEN,
        ArenaError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ArenaError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        ArenaError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Run simulation request
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    pub target_persona_id: Option<String>,
}

/// Hypothesis confirmation request
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub claim: String,
    pub confirmed: bool,
}

/// Consent request
#[derive(Debug, Deserialize)]
pub struct ConsentRequest {
    pub action: ConsentAction,
}

/// Create the API router
pub fn create_router(arena: SharedArena) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/profile", get(get_profile))
        .route("/profile/extraction", post(post_extraction))
        .route("/profile/chips", post(post_chips))
        .route("/profile/hypotheses/confirm", post(confirm_hypothesis))
        .route("/arena/run", post(run_arena))
        .route("/matches", get(list_matches))
        .route("/matches/:id", get(get_match))
        .route("/matches/:id/consent", post(post_consent))
        .with_state(arena)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Profile plus recent matches
async fn get_profile(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
) -> Result<Json<Dossier>, ApiError> {
    Ok(Json(arena.dossier(&user_id).await?))
}

async fn post_extraction(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    Json(extraction): Json<ProfileExtraction>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(arena.apply_extraction(&user_id, &extraction).await?))
}

async fn post_chips(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    Json(chips): Json<Vec<IntelligenceChip>>,
) -> Result<Json<Profile>, ApiError> {
    let extraction = chips_to_extraction(&chips);
    Ok(Json(arena.apply_extraction(&user_id, &extraction).await?))
}

async fn confirm_hypothesis(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(arena.confirm_hypothesis(&user_id, &req.claim, req.confirmed).await?))
}

/// Run a compatibility simulation
async fn run_arena(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ArenaRun>, ApiError> {
    let req = parse_run_request(&headers, &body)?;
    let run = arena.run(&user_id, req.target_persona_id.as_deref(), None).await?;
    Ok(Json(run))
}

/// An empty body means "pick for me"; anything else must be a valid JSON request
fn parse_run_request(headers: &HeaderMap, body: &Bytes) -> Result<RunRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunRequest::default());
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ApiError::BadRequest {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "expected request with `Content-Type: application/json`".to_string(),
        });
    }

    let Json(req) = Json::<RunRequest>::from_bytes(body).map_err(|rejection| ApiError::BadRequest {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    Ok(req)
}

async fn list_matches(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
) -> Result<Json<Vec<MatchSummary>>, ApiError> {
    Ok(Json(arena.list_matches(&user_id).await?))
}

async fn get_match(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    Path(id): Path<String>,
) -> Result<Json<MatchResult>, ApiError> {
    Ok(Json(arena.get_match(&user_id, &id).await?))
}

/// Approve or reject a match
async fn post_consent(
    State(arena): State<SharedArena>,
    Caller(user_id): Caller,
    Path(id): Path<String>,
    Json(req): Json<ConsentRequest>,
) -> Result<Json<ConsentOutcome>, ApiError> {
    Ok(Json(arena.decide(&user_id, &id, req.action).await?))
}

/// Run the API server
pub async fn run_server(addr: &str, arena: SharedArena) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(arena);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Brea Arena API listening");
    axum::serve(listener, router).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
