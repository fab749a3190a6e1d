// server/src/routes.rs

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response as AxumResponse},
    routing::{get, post},
    Form, Json, Router,
};
use expert_core::{ExpertError, QueryRequest};
use orchestrator::submission::{self, Outcome};
use orchestrator::ResponseService;
use serde::Serialize;
use thiserror::Error;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::page;

type SharedService = Arc<ResponseService>;

#[derive(Serialize)]
struct PersonaList {
    personas: Vec<&'static str>,
    default: &'static str,
}

#[derive(Serialize)]
struct AskResponse {
    persona: String,
    text: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("{}", submission::MISSING_QUESTION_WARNING)]
    MissingQuestion,
    #[error(transparent)]
    Expert(#[from] ExpertError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let (status, kind, message) = match &self {
            ApiError::MissingQuestion => (StatusCode::BAD_REQUEST, "MissingQuestion", self.to_string()),
            ApiError::Expert(e) => {
                let status = match e {
                    ExpertError::UnknownPersona { .. } => StatusCode::NOT_FOUND,
                    ExpertError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
                    ExpertError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind_name(), e.detail())
            }
        };
        tracing::warn!("[Server] Request failed with {}: {:#?}", status, self);

        let body = Json(serde_json::json!({ "error": { "kind": kind, "message": message } }));
        (status, body).into_response()
    }
}

pub fn app(service: SharedService) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/v1/personas", get(personas_handler))
        .route("/api/v1/ask", post(ask_handler))
        .with_state(service)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

// A blank persona means "whatever the selector would default to".
fn resolve_persona(service: &ResponseService, mut request: QueryRequest) -> QueryRequest {
    if request.persona.trim().is_empty() {
        request.persona = service.registry().default_persona().to_string();
    }
    request
}

async fn index_handler(State(service): State<SharedService>) -> Html<String> {
    let registry = service.registry();
    Html(page::render(registry, registry.default_persona(), "", None))
}

async fn submit_handler(State(service): State<SharedService>, Form(form): Form<QueryRequest>) -> Html<String> {
    let request = resolve_persona(&service, form);
    let outcome: Outcome = submission::handle(&service, &request).await;

    let registry = service.registry();
    let selected = if registry.contains(&request.persona) {
        request.persona.as_str()
    } else {
        registry.default_persona()
    };
    Html(page::render(registry, selected, &request.question, Some(&outcome)))
}

async fn personas_handler(State(service): State<SharedService>) -> Json<PersonaList> {
    let registry = service.registry();
    Json(PersonaList {
        personas: registry.list_personas(),
        default: registry.default_persona(),
    })
}

async fn ask_handler(
    State(service): State<SharedService>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let request = resolve_persona(&service, payload);
    if !request.has_question() {
        return Err(ApiError::MissingQuestion);
    }

    let text = service.get_response(&request.question, &request.persona).await?;
    Ok(Json(AskResponse { persona: request.persona, text }))
}
