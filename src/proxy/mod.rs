//! Pass-through to the internal CRM backend.
//!
//! Every proxied call copies the caller's `Authorization` header, sends
//! JSON, and relays the upstream status and body. Failures are terminal:
//! there are no retries and no partial results.

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ProxyConfig;

pub const TOKEN_MISSING: &str = "Token não fornecido";
pub const CONNECT_FAILED: &str = "Erro ao conectar com o backend";
pub const INTERNAL_ERROR: &str = "Erro interno do servidor";

const LOGIN_FIELDS_REQUIRED: &str = "Email e senha são obrigatórios";
const LOGIN_TIMEOUT: &str = "Timeout ao conectar com o servidor. Verifique se o backend está rodando.";
const LOGIN_UNREACHABLE: &str = "Erro ao conectar com o servidor. Verifique se o backend está rodando.";
const LOGIN_FAILED: &str = "Erro ao fazer login";

/// Failure of a proxied call, rendered as `{"error": ..., "details"?: ...}`
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{}", TOKEN_MISSING)]
    MissingToken,

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{}", CONNECT_FAILED)]
    Connect(#[source] reqwest::Error),

    #[error("{}", INTERNAL_ERROR)]
    Internal(String),

    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: &'static str,
        details: String,
    },
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingToken => StatusCode::UNAUTHORIZED,
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Connect(_) | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ProxyError::Upstream { message, details, .. } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// The caller's `Authorization` header, required on every protected proxy route
pub fn bearer(headers: &HeaderMap) -> Result<HeaderValue, ProxyError> {
    headers
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(ProxyError::MissingToken)
}

/// One upstream request: where it goes and how its outcome is reported
#[derive(Debug, Clone)]
pub struct ProxyCall {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Bytes>,
    success: StatusCode,
    error_message: &'static str,
}

impl ProxyCall {
    pub fn new(method: Method, path: impl Into<String>, error_message: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            success: StatusCode::OK,
            error_message,
        }
    }

    pub fn get(path: impl Into<String>, error_message: &'static str) -> Self {
        Self::new(Method::GET, path, error_message)
    }

    pub fn post(path: impl Into<String>, error_message: &'static str) -> Self {
        Self::new(Method::POST, path, error_message)
    }

    pub fn put(path: impl Into<String>, error_message: &'static str) -> Self {
        Self::new(Method::PUT, path, error_message)
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    /// Forward `name` only when the caller supplied it
    pub fn query_opt(self, name: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Body must be JSON; it is re-serialized before forwarding
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn created(mut self) -> Self {
        self.success = StatusCode::CREATED;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// HTTP client bound to `BACKEND_URL`
#[derive(Debug, Clone)]
pub struct BackendProxy {
    client: Client,
    base_url: String,
    login_timeout: Duration,
    health_timeout: Duration,
}

impl BackendProxy {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            login_timeout: config.login_timeout(),
            health_timeout: config.health_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `call` upstream with the caller's token and relay the outcome
    pub async fn forward(&self, call: ProxyCall, authorization: HeaderValue) -> Result<Response, ProxyError> {
        let payload = match &call.body {
            Some(bytes) => Some(serde_json::from_slice::<Value>(bytes).map_err(|e| {
                warn!("Rejecting non-JSON body for {}: {}", call.path, e);
                ProxyError::Internal(e.to_string())
            })?),
            None => None,
        };

        let url = self.endpoint(&call.path);
        debug!("Proxying {} {}", call.method, url);

        let mut request = self
            .client
            .request(call.method.clone(), &url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, "application/json");
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(payload) = &payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            error!("Backend unreachable at {}: {}", url, e);
            ProxyError::Connect(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_else(|_| "Erro desconhecido".to_string());
            warn!("Backend returned {} for {} {}", status, call.method, call.path);
            return Err(ProxyError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                message: call.error_message,
                details,
            });
        }

        let data = response.json::<Value>().await.map_err(|e| {
            error!("Backend sent a non-JSON body for {}: {}", call.path, e);
            ProxyError::Internal(e.to_string())
        })?;

        Ok((call.success, Json(data)).into_response())
    }

    /// `POST /api/auth/login` without a bearer token.
    ///
    /// Errors use `detail` rather than `error` because the CRM login form
    /// reads that field.
    pub async fn login(&self, body: Bytes) -> Response {
        let payload = match serde_json::from_slice::<Value>(&body) {
            Ok(payload) => payload,
            Err(e) => {
                return detail_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": INTERNAL_ERROR, "error": e.to_string() }),
                )
            }
        };

        if !is_present(&payload, "email") || !is_present(&payload, "password") {
            return detail_response(StatusCode::BAD_REQUEST, json!({ "detail": LOGIN_FIELDS_REQUIRED }));
        }

        let backend_url = self.endpoint("/api/auth/login");
        let result = self
            .client
            .post(&backend_url)
            .timeout(self.login_timeout)
            .json(&payload)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!("Login timed out after {:?} at {}", self.login_timeout, backend_url);
                return detail_response(
                    StatusCode::GATEWAY_TIMEOUT,
                    json!({ "detail": LOGIN_TIMEOUT, "backendUrl": backend_url }),
                );
            }
            Err(e) => {
                error!("Login backend unreachable at {}: {}", backend_url, e);
                return detail_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "detail": LOGIN_UNREACHABLE, "error": e.to_string(), "backendUrl": backend_url }),
                );
            }
        };

        let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        if !status.is_success() {
            let detail = match response.text().await {
                Ok(text) => login_error_detail(&text),
                Err(_) => format!("Erro {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("")),
            };
            return detail_response(status, json!({ "detail": detail }));
        }

        match response.json::<Value>().await {
            Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Err(e) => detail_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": INTERNAL_ERROR, "error": e.to_string() }),
            ),
        }
    }

    /// True when `BACKEND_URL/health` answers 2xx within the health timeout
    pub async fn backend_healthy(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/health"))
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Backend health probe failed: {}", e);
                false
            }
        }
    }
}

fn detail_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Missing, null, false, zero and empty strings count as absent
fn is_present(payload: &Value, field: &str) -> bool {
    match payload.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Percent-encode a caller-supplied value for use as one upstream path segment
pub fn path_segment(raw: &str) -> String {
    // Dot segments would be normalized away by URL parsing
    if raw == "." || raw == ".." {
        return raw.replace('.', "%2E");
    }

    let Ok(mut url) = Url::parse("http://backend/") else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path().trim_start_matches('/').to_string()
}

/// Upstream `detail` when the body is JSON carrying one, else the raw text
fn login_error_detail(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => json
            .get("detail")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or(LOGIN_FAILED)
            .to_string(),
        Err(_) if !text.is_empty() => text.to_string(),
        Err(_) => LOGIN_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_authorization_is_rejected() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer(&headers), Err(ProxyError::MissingToken)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(""));
        assert!(matches!(bearer(&headers), Err(ProxyError::MissingToken)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer(&headers).unwrap(), "Bearer abc");
    }

    #[test]
    fn upstream_error_keeps_status_and_details() {
        let err = ProxyError::Upstream {
            status: StatusCode::NOT_FOUND,
            message: "Erro ao buscar projetos",
            details: "{\"detail\":\"Not Found\"}".into(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Erro ao buscar projetos");
    }

    #[test]
    fn login_detail_prefers_json_detail_then_raw_text() {
        assert_eq!(login_error_detail("{\"detail\":\"Senha incorreta\"}"), "Senha incorreta");
        assert_eq!(login_error_detail("{\"other\":1}"), LOGIN_FAILED);
        assert_eq!(login_error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(login_error_detail(""), LOGIN_FAILED);
    }

    #[test]
    fn login_fields_use_truthiness() {
        let body = json!({ "email": "ana@innexar.app", "password": 123456, "zero": 0, "off": false, "none": null, "blank": "" });
        assert!(is_present(&body, "email"));
        assert!(is_present(&body, "password"));
        for field in ["zero", "off", "none", "blank", "missing"] {
            assert!(!is_present(&body, field), "{}", field);
        }
    }

    #[test]
    fn path_segments_cannot_escape_their_position() {
        assert_eq!(path_segment("42"), "42");
        assert_eq!(path_segment("../../admin"), "..%2F..%2Fadmin");
        assert_eq!(path_segment(".."), "%2E%2E");
        assert_eq!(path_segment("a b?c#d"), "a%20b%3Fc%23d");
        assert_eq!(path_segment("100%"), "100%25");
    }

    #[test]
    fn call_builder_collects_optional_query() {
        let call = ProxyCall::get("/api/goals/", "Erro ao buscar metas")
            .query_opt("goal_type", Some("monthly".into()))
            .query_opt("status", None);
        assert_eq!(call.query, vec![("goal_type".to_string(), "monthly".to_string())]);
        assert_eq!(call.success, StatusCode::OK);
        assert_eq!(ProxyCall::post("/x", "e").created().success, StatusCode::CREATED);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let proxy = BackendProxy::new(&ProxyConfig {
            backend_url: "http://backend:8000/".into(),
            timeout_secs: 1,
            login_timeout_secs: 1,
            health_timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(proxy.endpoint("/api/projects/"), "http://backend:8000/api/projects/");
    }
}
