use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{Affiliate, CreateAffiliateRequest, UpdateAffiliateRequest};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AffiliateService;

fn affiliates(state: &AppState) -> AffiliateService {
    AffiliateService::new(state.pool.clone(), state.config.security.affiliate_default_password.clone())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Affiliate>> {
    Ok(ApiResponse::success(affiliates(&state).find_all().await?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Affiliate> {
    Ok(ApiResponse::success(affiliates(&state).find_one(id).await?))
}

/// POST /affiliates - Starts with the configured default password
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAffiliateRequest>, JsonRejection>,
) -> ApiResult<Affiliate> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(affiliates(&state).create(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateAffiliateRequest>, JsonRejection>,
) -> ApiResult<Affiliate> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(affiliates(&state).update(id, &req).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Affiliate> {
    Ok(ApiResponse::success(affiliates(&state).remove(id).await?))
}
