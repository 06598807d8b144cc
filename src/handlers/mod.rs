// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) → Protected (any valid JWT) → Elevated (team JWT)
//
// Route tables live in app.rs; each tier only defines handler functions.
pub mod elevated; // Tier 3: team roles only (/team, /billing, /support, ...)
pub mod protected; // Tier 2: JWT required (/auth/me, /products, /affiliate/*)
pub mod public; // Tier 1: no JWT (/, /api/health, /api/i18n, CRM proxy, /auth/login)

use axum::{extract::rejection::JsonRejection, Json};
use validator::Validate;

use crate::error::ApiError;

/// Unwrap a JSON body and run its `validator` rules
pub(crate) fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    value.validate()?;
    Ok(value)
}
