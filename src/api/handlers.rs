//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    response::IntoResponse,
    Json,
};

use super::server::{AppState, RequestId};
use super::types::{
    AgentResponse, CompareRequest, CompareResponse, ComparisonEntry, SelectionResponse,
};
use crate::agents::{AgentProfile, Plan};
use crate::catalog::TaskRequest;
use crate::error::{Error, Result};

/// Turn a JSON extraction failure into our error format.
fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

/// Resolve an agent profile to a response, keeping resolution errors inline.
fn resolve_agent_response(state: &AppState, profile: &AgentProfile) -> AgentResponse {
    match profile.resolve(&state.selector) {
        Ok(model) => AgentResponse {
            profile: profile.clone(),
            model: Some(state.bindings.bind(model).into()),
            error: None,
        },
        Err(e) => AgentResponse {
            profile: profile.clone(),
            model: None,
            error: Some(e.to_string()),
        },
    }
}

/// Handle POST /v1/select
pub async fn select_model(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: std::result::Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<SelectionResponse>> {
    let request = json_body(body)?;

    tracing::info!(
        request_id = %request_id.0,
        task_type = %request.task_type,
        priority = %request.priority,
        max_cost_per_1k = ?request.max_cost_per_1k,
        "Received selection request"
    );

    let model = state.selector.select_model(&request).map_err(|e| {
        tracing::warn!(request_id = %request_id.0, error = %e, "Selection failed");
        e
    })?;

    tracing::info!(
        request_id = %request_id.0,
        model = %model.name,
        provider = %model.provider,
        cost_per_1k_tokens = model.cost_per_1k_tokens,
        "Selected model"
    );

    Ok(Json(state.bindings.bind(model).into()))
}

/// Handle GET /v1/models - list the model table
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    let models: Vec<serde_json::Value> = state
        .selector
        .catalog()
        .models()
        .iter()
        .map(|m| {
            serde_json::json!({
                "id": m.name,
                "object": "model",
                "owned_by": m.provider,
                "cost_per_1k_tokens": m.cost_per_1k_tokens,
                "capability_tags": m.capability_tags,
                "tier": m.tier,
                "temperature": m.temperature,
                "max_tokens": m.max_tokens,
            })
        })
        .collect();

    Json(serde_json::json!({
        "object": "list",
        "data": models
    }))
}

/// Handle GET /v1/models/cheapest
pub async fn cheapest_model(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.selector.cheapest_model().clone())
}

/// Handle GET /v1/models/default
pub async fn default_model(State(state): State<AppState>) -> Json<SelectionResponse> {
    let model = state.selector.default_model();
    Json(state.bindings.bind(model).into())
}

/// Handle POST /v1/models/compare
pub async fn compare_models(
    State(state): State<AppState>,
    body: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>> {
    let request = json_body(body)?;
    let sorted = state.selector.compare_models(&request.models)?;

    let models = sorted
        .into_iter()
        .enumerate()
        .map(|(i, model)| ComparisonEntry::ranked(i + 1, model))
        .collect();

    Ok(Json(CompareResponse { models }))
}

/// Handle GET /v1/agents
pub async fn list_agents(State(state): State<AppState>) -> impl IntoResponse {
    let agents: Vec<AgentResponse> = state
        .roster
        .agents()
        .iter()
        .map(|profile| resolve_agent_response(&state, profile))
        .collect();

    Json(serde_json::json!({ "agents": agents }))
}

/// Handle GET /v1/agents/:name
pub async fn get_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SelectionResponse>> {
    let model = state.roster.resolve_agent(&state.selector, &name)?;
    tracing::debug!(agent = %name, model = %model.name, "Resolved agent model");
    Ok(Json(state.bindings.bind(model).into()))
}

/// Handle GET /v1/pipelines
pub async fn list_pipelines(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "pipelines": state.roster.pipelines() }))
}

/// Handle GET /v1/pipelines/:name
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Plan>> {
    Ok(Json(state.roster.plan(&state.selector, &name)?))
}

/// Handle GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "modelpick",
        "models": state.selector.catalog().len(),
    }))
}
