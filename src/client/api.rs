use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::auth_store::{AuthApi, AuthStore, Session};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const GENERIC_FAILURE: &str = "Erro na requisição";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Sessão expirada ou inválida")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("HOME environment variable not set")]
    NoConfigDir,
}

/// Human-readable message from an error body: `message`, then `detail`,
/// then `error`, falling back to a generic text
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_FAILURE.to_string();
    };

    ["message", "detail", "error"]
        .iter()
        .find_map(|field| match value.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) if !items.is_empty() => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Bearer-authenticated JSON client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    store_path: Option<PathBuf>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            store_path: None,
        })
    }

    /// `NEXT_PUBLIC_API_URL`, else the local development server
    pub fn base_url_from_env() -> String {
        std::env::var("NEXT_PUBLIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
    }

    /// Use the store's token, and clear that store on 401
    pub fn with_store(mut self, store: &AuthStore) -> Self {
        self.token = store.token().map(String::from);
        self.store_path = Some(store.path().to_path_buf());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.forget_session()?;
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    fn forget_session(&self) -> Result<(), ClientError> {
        if let Some(path) = &self.store_path {
            warn!("Server rejected the stored token; clearing {}", path.display());
            let mut store = AuthStore::load(path)?;
            store.logout()?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamLogin {
    access_token: String,
    user: Value,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let login: TeamLogin = self.post("/auth/login/team", &body).await?;
        Ok(Session {
            token: login.access_token,
            user: login.user,
        })
    }

    async fn me(&self, token: &str) -> Result<Value, ClientError> {
        self.clone().with_token(token).get("/auth/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_then_detail_then_error() {
        assert_eq!(error_message(r#"{"message":"Ticket não encontrado","error":"x"}"#), "Ticket não encontrado");
        assert_eq!(error_message(r#"{"detail":"Credenciais inválidas"}"#), "Credenciais inválidas");
        assert_eq!(error_message(r#"{"error":"Token não fornecido"}"#), "Token não fornecido");
    }

    #[test]
    fn error_message_joins_validation_arrays() {
        assert_eq!(
            error_message(r#"{"message":["email inválido","senha curta"]}"#),
            "email inválido, senha curta"
        );
    }

    #[test]
    fn error_message_falls_back_on_unknown_bodies() {
        assert_eq!(error_message("<html>bad gateway</html>"), "Erro na requisição");
        assert_eq!(error_message(r#"{"message":""}"#), "Erro na requisição");
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
