use axum::extract::{Extension, State};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::auth_service::Profile;
use crate::services::AuthService;

/// GET /auth/me - Profile of the token subject, affiliate or team member
pub async fn me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Profile> {
    let profile = AuthService::new(state.pool.clone(), &state.config.security)
        .me(user.id, user.role)
        .await?;
    Ok(ApiResponse::success(profile))
}
