// handlers/elevated/mod.rs - Team-only handlers
//
// Routes here run behind `jwt_auth_middleware` and `require_team`; an
// affiliate token is answered with 403 before any handler runs.
pub mod affiliates;
pub mod billing;
pub mod marketing;
pub mod support;
pub mod team;
pub mod webhooks;
