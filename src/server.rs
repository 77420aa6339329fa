use crate::{config::ServiceConfig, core::TripPlanner, error::PlanningError, types::TripRequest};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

pub const SERVICE_NAME: &str = "planning-service";

/// Client-facing message used when provider errors are not exposed
pub const PROVIDER_FAILURE_MESSAGE: &str = "Failed to generate trip";

/// Application state shared with all routes
#[derive(Clone, Debug)]
pub struct AppState {
    planner: Arc<TripPlanner>,
    expose_provider_errors: bool,
}

impl AppState {
    pub fn new(planner: TripPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
            expose_provider_errors: true,
        }
    }

    pub fn with_expose_provider_errors(mut self, expose: bool) -> Self {
        self.expose_provider_errors = expose;
        self
    }
}

/// Error type for HTTP handlers
#[derive(Debug)]
pub struct ApiError {
    error: PlanningError,
    expose_provider_errors: bool,
}

impl ApiError {
    fn new(error: PlanningError, state: &AppState) -> Self {
        Self {
            error,
            expose_provider_errors: state.expose_provider_errors,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error {
            PlanningError::Validation(_) => StatusCode::BAD_REQUEST,
            PlanningError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error.error_code();

        if self.error.is_client_error() {
            warn!(target: "planning::handler", code, error = %self.error, "request rejected");
        } else {
            error!(target: "planning::handler", code, error = %self.error, "request failed");
        }

        let body = match &self.error {
            PlanningError::Provider(_) if !self.expose_provider_errors => {
                json!({ "error": PROVIDER_FAILURE_MESSAGE })
            }
            other => other.to_error_payload(),
        };

        (status, Json(body)).into_response()
    }
}

/// Build the router with all routes; CORS is layered on by [`run_server`]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/planning/generate", post(generate_trip))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origins. Credentials are allowed, so
/// methods and headers mirror the preflight request instead of using `*`,
/// and an `*` origin entry echoes the caller's origin back.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, PlanningError> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|err| {
                    PlanningError::Config(format!("Invalid allowed origin `{origin}`: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Start the HTTP server and run until ctrl-c
pub async fn run_server(config: &ServiceConfig, planner: TripPlanner) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let cors = cors_layer(&config.allowed_origins)?;

    let state = AppState::new(planner).with_expose_provider_errors(config.expose_provider_errors);
    let app = router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        model = %config.model,
        origins = ?config.allowed_origins,
        "{} listening",
        SERVICE_NAME
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// The body is decoded as JSON whatever its `Content-Type`, so plain
/// `curl -d` clients are served too.
async fn generate_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request = decode_trip_request(&body).map_err(|err| ApiError::new(err, &state))?;

    state
        .planner
        .generate(&request)
        .await
        .map(Json)
        .map_err(|err| ApiError::new(err, &state))
}

fn decode_trip_request(body: &[u8]) -> Result<TripRequest, PlanningError> {
    serde_json::from_slice(body).map_err(|err| PlanningError::InvalidBody(err.to_string()))
}
