use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{
    AddMessageRequest, CreateTicketRequest, Ticket, TicketDetail, TicketListItem, TicketMessage, UpdateTicketRequest,
};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::SupportService;

fn support(state: &AppState) -> SupportService {
    SupportService::new(state.pool.clone())
}

/// GET /support - Newest first with assignee and `_count.messages`
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TicketListItem>> {
    Ok(ApiResponse::success(support(&state).find_all().await?))
}

/// GET /support/:id - Ticket with its conversation
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<TicketDetail> {
    Ok(ApiResponse::success(support(&state).find_one(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> ApiResult<Ticket> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(support(&state).create(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateTicketRequest>, JsonRejection>,
) -> ApiResult<Ticket> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(support(&state).update(id, &req).await?))
}

/// POST /support/:id/messages - Authored by the token subject
pub async fn add_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AddMessageRequest>, JsonRejection>,
) -> ApiResult<TicketMessage> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(support(&state).add_message(id, user.id, &req).await?))
}
