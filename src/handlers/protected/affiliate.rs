// handlers/protected/affiliate.rs - Affiliate portal (/affiliate/*)
//
// Every handler acts on the token subject; an affiliate can never address
// another affiliate's links, commissions or payouts.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{
    AffiliateProfile, AffiliateStats, CommissionQuery, CommissionWithLink, CreateLinkRequest, LinkWithProduct,
    RequestWithdrawalRequest, UpdateProfileRequest, Withdrawal,
};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PortalService;

fn portal(state: &AppState) -> PortalService {
    PortalService::new(state.pool.clone())
}

/// GET /affiliate/stats
pub async fn stats(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<AffiliateStats> {
    Ok(ApiResponse::success(portal(&state).stats(user.id).await?))
}

/// GET /affiliate/links
pub async fn links(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<LinkWithProduct>> {
    Ok(ApiResponse::success(portal(&state).links(user.id).await?))
}

/// POST /affiliate/links
pub async fn create_link(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> ApiResult<LinkWithProduct> {
    let req = validated(payload)?;
    let link = portal(&state).create_link(user.id, &req).await?;
    Ok(ApiResponse::created(link))
}

/// DELETE /affiliate/links/:id
pub async fn delete_link(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let message = portal(&state).delete_link(user.id, id).await?;
    Ok(ApiResponse::success(json!({ "message": message })))
}

/// GET /affiliate/commissions?status=
pub async fn commissions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CommissionQuery>,
) -> ApiResult<Vec<CommissionWithLink>> {
    let commissions = portal(&state).commissions(user.id, query.status.as_deref()).await?;
    Ok(ApiResponse::success(commissions))
}

/// GET /affiliate/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<AffiliateProfile> {
    Ok(ApiResponse::success(portal(&state).profile(user.id).await?))
}

/// PUT /affiliate/profile - name, phone and payout details only
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<AffiliateProfile> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(portal(&state).update_profile(user.id, &req).await?))
}

/// GET /affiliate/withdrawals
pub async fn withdrawals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Withdrawal>> {
    Ok(ApiResponse::success(portal(&state).withdrawals(user.id).await?))
}

/// POST /affiliate/withdrawals
pub async fn request_withdrawal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<RequestWithdrawalRequest>, JsonRejection>,
) -> ApiResult<Withdrawal> {
    let Json(req) = payload?;
    let withdrawal = portal(&state).request_withdrawal(user.id, req.amount).await?;
    Ok(ApiResponse::created(withdrawal))
}
