use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{AdminWebhook, CreateWebhookRequest, UpdateWebhookRequest};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::WebhookService;

fn webhooks(state: &AppState) -> WebhookService {
    WebhookService::new(state.pool.clone())
}

/// GET /admin/webhooks - Newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AdminWebhook>> {
    Ok(ApiResponse::success(webhooks(&state).find_all().await?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<AdminWebhook> {
    Ok(ApiResponse::success(webhooks(&state).find_one(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateWebhookRequest>, JsonRejection>,
) -> ApiResult<AdminWebhook> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(webhooks(&state).create(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateWebhookRequest>, JsonRejection>,
) -> ApiResult<AdminWebhook> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(webhooks(&state).update(id, &req).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<AdminWebhook> {
    Ok(ApiResponse::success(webhooks(&state).remove(id).await?))
}
