//! HTTP client for the Innexar API and the persisted login state behind it.
//!
//! `ApiClient` attaches the stored bearer token to every request and wipes
//! the stored session when the server answers 401. `AuthStore` keeps
//! `{user, token}` in an `auth-storage` file and implements login, logout
//! and session checks against anything that speaks `AuthApi`.

pub mod api;
pub mod auth_store;

pub use api::{error_message, ApiClient, ClientError, DEFAULT_API_URL};
pub use auth_store::{default_config_dir, AuthApi, AuthState, AuthStore, Session, STORAGE_KEY};
