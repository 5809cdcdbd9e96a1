//! HTTP server setup and configuration.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers;
use crate::agents::Roster;
use crate::config::{Config, ConfigError};
use crate::router::{Bindings, Selector};

/// Response header: correlation ID (UUID v4).
pub const REQUEST_ID_HEADER: &str = "x-modelpick-request-id";

/// Per-request correlation ID, available to handlers as an extension.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub selector: Selector,
    pub bindings: Arc<Bindings>,
    pub roster: Arc<Roster>,
}

impl AppState {
    /// Build the model table, provider bindings and roster from config.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let selector = config.selector()?;
        let roster = config.roster()?;
        let bindings = Bindings::from_config(&config.providers);

        Ok(Self {
            selector,
            bindings: Arc::new(bindings),
            roster: Arc::new(roster),
        })
    }
}

/// Tag each request with a fresh ID and echo it in the response headers.
async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/models/cheapest", get(handlers::cheapest_model))
        .route("/v1/models/default", get(handlers::default_model))
        .route("/v1/models/compare", post(handlers::compare_models))
        .route("/v1/select", post(handlers::select_model))
        .route("/v1/agents", get(handlers::list_agents))
        .route("/v1/agents/:name", get(handlers::get_agent))
        .route("/v1/pipelines", get(handlers::list_pipelines))
        .route("/v1/pipelines/:name", get(handlers::get_pipeline))
        // State and middleware
        .with_state(state)
        .layer(middleware::from_fn(assign_request_id))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;

    tracing::info!(
        models = state.selector.catalog().len(),
        default_model = %state.selector.default_model().name,
        agents = state.roster.agents().len(),
        pipelines = state.roster.pipelines().len(),
        "Loaded model table and roster"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    tracing::info!(address = %config.server.listen, "Starting modelpick server");

    axum::serve(listener, app).await?;

    Ok(())
}
