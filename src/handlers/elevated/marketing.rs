use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{
    Campaign, CampaignDetail, CampaignListItem, CreateCampaignRequest, CreateLeadRequest, Lead, UpdateCampaignRequest,
    UpdateLeadStatusRequest,
};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::MarketingService;

fn marketing(state: &AppState) -> MarketingService {
    MarketingService::new(state.pool.clone())
}

pub async fn campaigns(State(state): State<AppState>) -> ApiResult<Vec<CampaignListItem>> {
    Ok(ApiResponse::success(marketing(&state).find_all_campaigns().await?))
}

pub async fn campaign(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<CampaignDetail> {
    Ok(ApiResponse::success(marketing(&state).find_one_campaign(id).await?))
}

/// POST /marketing/campaigns - The caller becomes the campaign's creator
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> ApiResult<Campaign> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(marketing(&state).create_campaign(&req, user.id).await?))
}

pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateCampaignRequest>, JsonRejection>,
) -> ApiResult<Campaign> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(marketing(&state).update_campaign(id, &req).await?))
}

pub async fn leads(State(state): State<AppState>) -> ApiResult<Vec<Lead>> {
    Ok(ApiResponse::success(marketing(&state).find_all_leads().await?))
}

pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<CreateLeadRequest>, JsonRejection>,
) -> ApiResult<Lead> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(marketing(&state).create_lead(&req).await?))
}

/// PATCH /marketing/leads/:id/status
pub async fn update_lead_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateLeadStatusRequest>, JsonRejection>,
) -> ApiResult<Lead> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(marketing(&state).update_lead_status(id, &req.status).await?))
}
