// handlers/public/crm.rs - CRM pass-through routes
//
// Each handler requires an Authorization header, names the upstream path and
// the message used when the backend answers non-2xx, then lets BackendProxy
// relay the result. Only POST/PUT routes that carry a payload forward a body.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::proxy::{bearer, path_segment, ProxyCall, ProxyError};

type ProxyResult = Result<Response, ProxyError>;

const API_KEY_REQUIRED: &str = "API key é necessária";

#[derive(Debug, Default, Deserialize)]
pub struct GoalsQuery {
    pub goal_type: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivitiesQuery {
    pub skip: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListModelsQuery {
    pub api_key: Option<String>,
}

/// Empty values fall back to the default as well
fn or_default(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

/// POST /api/auth/login - no bearer; credentials go straight to the backend
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    state.proxy.login(body).await
}

/// GET /api/projects
pub async fn projects_get(State(state): State<AppState>, headers: HeaderMap) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get("/api/projects/", "Erro ao buscar projetos");
    state.proxy.forward(call, token).await
}

/// POST /api/projects
pub async fn projects_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post("/api/projects/", "Erro ao criar projeto").body(body).created();
    state.proxy.forward(call, token).await
}

/// GET /api/goals
pub async fn goals_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GoalsQuery>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get("/api/goals/", "Erro ao buscar metas")
        .query_opt("goal_type", query.goal_type)
        .query_opt("status", query.status)
        .query_opt("assignee_id", query.assignee_id);
    state.proxy.forward(call, token).await
}

/// POST /api/goals
pub async fn goals_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post("/api/goals/", "Erro ao criar meta").body(body).created();
    state.proxy.forward(call, token).await
}

/// GET /api/activities - skip/limit default to 0/100
pub async fn activities_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ActivitiesQuery>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get("/api/activities/", "Erro ao buscar atividades")
        .query("skip", or_default(query.skip, "0"))
        .query("limit", or_default(query.limit, "100"))
        .query_opt("status", query.status);
    state.proxy.forward(call, token).await
}

/// POST /api/activities
pub async fn activities_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post("/api/activities/", "Erro ao criar atividade").body(body).created();
    state.proxy.forward(call, token).await
}

/// GET /api/lead-analysis/:contact_id
pub async fn lead_analysis_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(contact_id): Path<String>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get(
        format!("/api/lead-analysis/{}", path_segment(&contact_id)),
        "Erro ao carregar análise",
    );
    state.proxy.forward(call, token).await
}

/// POST /api/lead-analysis/:contact_id - starts an analysis run upstream
pub async fn lead_analysis_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(contact_id): Path<String>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post(
        format!("/api/lead-analysis/analyze/{}", path_segment(&contact_id)),
        "Erro ao iniciar análise",
    );
    state.proxy.forward(call, token).await
}

/// GET /api/dashboard/vendedor
pub async fn dashboard_vendedor(State(state): State<AppState>, headers: HeaderMap) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get("/api/dashboard/vendedor", "Erro ao buscar dashboard vendedor");
    state.proxy.forward(call, token).await
}

/// PUT /api/quote-requests/:id/complete
pub async fn quote_complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::put(
        format!("/api/quote-requests/{}/complete", path_segment(&id)),
        "Erro ao completar orçamento",
    )
    .body(body);
    state.proxy.forward(call, token).await
}

/// POST /api/quote-requests/:id/generate-with-ai
pub async fn quote_generate_with_ai(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post(
        format!("/api/quote-requests/{}/generate-with-ai", path_segment(&id)),
        "Erro ao gerar orçamento com IA",
    );
    state.proxy.forward(call, token).await
}

/// GET /api/ai/chat/history - skip/limit default to 0/50
pub async fn chat_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::get("/api/ai/chat/history", "Erro ao carregar histórico")
        .query("skip", or_default(query.skip, "0"))
        .query("limit", or_default(query.limit, "50"));
    state.proxy.forward(call, token).await
}

/// POST /api/ai/actions/create-opportunity
pub async fn create_opportunity(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ProxyResult {
    let token = bearer(&headers)?;
    let call = ProxyCall::post("/api/ai/actions/create-opportunity", "Erro ao criar oportunidade").body(body);
    state.proxy.forward(call, token).await
}

/// GET /api/ai-config/google/list-models?api_key=...
pub async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListModelsQuery>,
) -> ProxyResult {
    let token = bearer(&headers)?;
    let api_key = query
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or(ProxyError::BadRequest(API_KEY_REQUIRED))?;

    let call = ProxyCall::get("/api/ai-config/google/list-models", "Erro ao listar modelos").query("api_key", api_key);
    state.proxy.forward(call, token).await
}
