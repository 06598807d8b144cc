//! Database-backed services behind the HQ, portal and workshop routes.
//!
//! Each service owns a pool handle and maps one HTTP verb to one or two SQL
//! statements. Errors are reported as `ServiceError` and turned into HTTP
//! responses by `ApiError`.

use thiserror::Error;

use crate::auth::{JwtError, PasswordError};

pub mod affiliate_service;
pub mod auth_service;
pub mod billing_service;
pub mod codes;
pub mod marketing_service;
pub mod portal_service;
pub mod product_service;
pub mod support_service;
pub mod team_service;
pub mod webhook_service;

pub use affiliate_service::AffiliateService;
pub use auth_service::AuthService;
pub use billing_service::BillingService;
pub use marketing_service::MarketingService;
pub use portal_service::PortalService;
pub use product_service::ProductService;
pub use support_service::SupportService;
pub use team_service::TeamService;
pub use webhook_service::WebhookService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ServiceError::Unauthorized(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }
}

/// True when `err` is a Postgres unique-constraint violation (SQLSTATE 23505)
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
