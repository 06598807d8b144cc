// handlers/protected/mod.rs - JWT-protected handlers
//
// `jwt_auth_middleware` has already placed an `AuthUser` in the request
// extensions. `/affiliate/*` additionally sits behind `require_affiliate`.
pub mod affiliate;
pub mod auth;
pub mod products;
