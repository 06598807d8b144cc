// handlers/public/auth.rs - HQ token acquisition
//
// POST /auth/login        affiliate credentials → {accessToken, affiliate}
// POST /auth/login/team   team credentials      → {accessToken, user}
// POST /auth/register     affiliate sign-up, account starts as pending
//
// All three answer 201 like every other POST in the HQ API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::database::models::{LoginRequest, RegisterRequest};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{AffiliateLoginResponse, RegisterResponse, TeamLoginResponse};
use crate::services::AuthService;

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), &state.config.security)
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AffiliateLoginResponse> {
    let req = validated(payload)?;
    let response = service(&state).login(&req).await?;
    Ok(ApiResponse::created(response))
}

pub async fn login_team(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TeamLoginResponse> {
    let req = validated(payload)?;
    let response = service(&state).login_team(&req).await?;
    Ok(ApiResponse::created(response))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let req = validated(payload)?;
    let response = service(&state).register(&req).await?;
    Ok(ApiResponse::created(response))
}
