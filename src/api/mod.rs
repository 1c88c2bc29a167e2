mod cli;
mod inputs;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;

pub use cli::{Cli, Command, ServeArgs, run_cli};
pub use inputs::{
    ApiRiskProfile, CliRiskProfile, FireArgs, FirePayload, MAX_AMOUNT, MAX_PROJECTION_YEARS,
    MAX_RATE_PCT, ProjectionArgs, ProjectionPayload, SolveArgs, SolvePayload, build_fire_inputs,
    build_projection_input, build_solve_request, fire_inputs_from_payload,
    projection_input_from_payload, solve_request_from_payload,
};

use crate::core::{run_fire, run_projection, solve_required_investment};
use crate::error::{GraphError, ValidationError};
use crate::plan::{
    GraphParts, MemoryPlanStore, PlanGraph, PlanStore, PlanSummary, TemplateId, TemplateInfo,
    TimelineGroup, aggregate, catalogue, template_graph,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PlanStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryPlanStore::new()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub graph: PlanGraph,
    pub summary: PlanSummary,
    pub timeline: Vec<TimelineGroup>,
}

impl PlanResponse {
    pub fn from_graph(graph: PlanGraph) -> Self {
        Self {
            summary: aggregate(graph.nodes()),
            timeline: graph.timeline(),
            graph,
        }
    }
}

#[derive(Debug, Serialize)]
struct TemplatesResponse {
    templates: Vec<TemplateInfo>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route("/api/fire/solve", post(solve_handler))
        .route("/api/templates", get(templates_handler))
        .route("/api/templates/:template_id", get(template_handler))
        .route("/api/plan/summary", post(summary_handler))
        .route(
            "/api/plans/:user_id",
            get(load_plan_handler).put(save_plan_handler),
        )
        .route(
            "/api/plans/:user_id/template/:template_id",
            post(load_plan_template_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let app = build_router(AppState::default());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "life-plan HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(
    payload: Result<Query<ProjectionPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => projection_handler_impl(payload),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn projection_post_handler(
    payload: Result<Json<ProjectionPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => projection_handler_impl(payload),
        Err(rejection) => rejection_response(rejection),
    }
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    match projection_input_from_payload(payload) {
        Ok(input) => json_response(StatusCode::OK, run_projection(&input)),
        Err(err) => validation_error_response(&err),
    }
}

async fn fire_get_handler(payload: Result<Query<FirePayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => fire_handler_impl(payload),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn fire_post_handler(payload: Result<Json<FirePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => fire_handler_impl(payload),
        Err(rejection) => rejection_response(rejection),
    }
}

fn fire_handler_impl(payload: FirePayload) -> Response {
    match fire_inputs_from_payload(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_fire(&inputs)),
        Err(err) => validation_error_response(&err),
    }
}

async fn solve_handler(payload: Result<Json<SolvePayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let (inputs, config) = match solve_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return validation_error_response(&err),
    };
    match solve_required_investment(&inputs, config) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(msg) => validation_error_response(&ValidationError::new("solver", msg)),
    }
}

async fn templates_handler() -> Response {
    json_response(
        StatusCode::OK,
        TemplatesResponse {
            templates: catalogue(),
        },
    )
}

async fn template_handler(Path(template_id): Path<String>) -> Response {
    match template_id.parse::<TemplateId>() {
        Ok(template) => json_response(
            StatusCode::OK,
            PlanResponse::from_graph(template_graph(template)),
        ),
        Err(err) => graph_error_response(&err),
    }
}

async fn summary_handler(parts: Result<Json<GraphParts>, JsonRejection>) -> Response {
    let parts = match parts {
        Ok(Json(parts)) => parts,
        Err(rejection) => return rejection_response(rejection),
    };
    match PlanGraph::try_from(parts) {
        Ok(graph) => json_response(StatusCode::OK, PlanResponse::from_graph(graph)),
        Err(err) => graph_error_response(&err),
    }
}

async fn load_plan_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let graph = state.store.load(&user_id).await.unwrap_or_default();
    json_response(StatusCode::OK, PlanResponse::from_graph(graph))
}

async fn save_plan_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    parts: Result<Json<GraphParts>, JsonRejection>,
) -> Response {
    let parts = match parts {
        Ok(Json(parts)) => parts,
        Err(rejection) => return rejection_response(rejection),
    };
    let graph = match PlanGraph::try_from(parts) {
        Ok(graph) => graph,
        Err(err) => return graph_error_response(&err),
    };
    state.store.save(&user_id, graph.clone()).await;
    json_response(StatusCode::OK, PlanResponse::from_graph(graph))
}

async fn load_plan_template_handler(
    State(state): State<AppState>,
    Path((user_id, template_id)): Path<(String, String)>,
) -> Response {
    let template = match template_id.parse::<TemplateId>() {
        Ok(template) => template,
        Err(err) => return graph_error_response(&err),
    };
    tracing::info!(user_id = %user_id, %template, "replacing plan with template");
    let graph = template_graph(template);
    state.store.save(&user_id, graph.clone()).await;
    json_response(StatusCode::OK, PlanResponse::from_graph(graph))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn rejection_response(rejection: impl std::fmt::Display) -> Response {
    tracing::debug!(%rejection, "malformed request");
    error_response(StatusCode::BAD_REQUEST, &rejection.to_string())
}

fn validation_error_response(err: &ValidationError) -> Response {
    tracing::debug!(%err, "rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn graph_error_response(err: &GraphError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_REQUEST
    };
    error_response(status, &err.to_string())
}
