use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TeamService;

fn team(state: &AppState) -> TeamService {
    TeamService::new(state.pool.clone())
}

/// GET /team
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    Ok(ApiResponse::success(team(&state).find_all().await?))
}

/// GET /team/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<TeamMember> {
    Ok(ApiResponse::success(team(&state).find_one(id).await?))
}

/// POST /team
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTeamMemberRequest>, JsonRejection>,
) -> ApiResult<TeamMember> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(team(&state).create(&req).await?))
}

/// PATCH /team/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateTeamMemberRequest>, JsonRejection>,
) -> ApiResult<TeamMember> {
    let req = validated(payload)?;
    Ok(ApiResponse::success(team(&state).update(id, &req).await?))
}

/// DELETE /team/:id - Returns the removed member
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<TeamMember> {
    Ok(ApiResponse::success(team(&state).remove(id).await?))
}
