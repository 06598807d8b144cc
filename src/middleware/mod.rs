pub mod auth;
pub mod response;

pub use auth::{jwt_auth_middleware, require_affiliate, require_team, AuthUser};
pub use response::{ApiResponse, ApiResult};
