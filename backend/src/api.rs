use crate::game::{self, Dispatch};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::post,
    Json, Router,
};
use chess_session::game::{GameError, SharedRegistry};
use shared::protocol::{ProtocolError, Request, Response};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Notify;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    /// Signalled when a client asks the server to stop
    pub shutdown: Arc<Notify>,
    pub allow_shutdown: bool,
}

impl AppState {
    pub fn new(registry: SharedRegistry, allow_shutdown: bool) -> Self {
        Self {
            registry,
            shutdown: Arc::new(Notify::new()),
            allow_shutdown,
        }
    }
}

/// Anything that stops a request from producing a game reply
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Shutdown over the wire is disabled")]
    ShutdownDisabled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Protocol(_) => StatusCode::BAD_REQUEST,
            ApiError::Game(GameError::InvalidIdentifier { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Game(GameError::GameNotFound { .. })
            | ApiError::Game(GameError::PlayerNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Game(GameError::GameFull { .. }) => StatusCode::CONFLICT,
            ApiError::Game(GameError::RegistryFull { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ShutdownDisabled => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            warn!("[BACKEND] {}", self);
        } else {
            debug!("[BACKEND] Request refused ({}): {}", status, self);
        }
        (status, Json(Response::error(self.to_string()))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", post(handle_message))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// One JSON message in, one JSON message out
async fn handle_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = Request::decode(&body)?;
    debug!("[BACKEND] Message type {}", request.message_type());

    match game::dispatch(&state.registry, request, Instant::now())? {
        Dispatch::Reply(response) => Ok(Json(response).into_response()),
        Dispatch::Shutdown if state.allow_shutdown => {
            info!("[BACKEND] Shutdown requested by client");
            state.shutdown.notify_one();
            Ok(StatusCode::ACCEPTED.into_response())
        }
        Dispatch::Shutdown => Err(ApiError::ShutdownDisabled),
    }
}
