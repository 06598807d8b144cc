mod common;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use innexar_api::client::{ApiClient, AuthApi, AuthStore, ClientError, Session, STORAGE_KEY};

const GOOD_TOKEN: &str = "good-token";

/// Minimal Innexar API: one valid token, one team login
fn fake_api() -> Router {
    Router::new()
        .route("/auth/login/team", post(team_login))
        .route("/auth/me", get(me))
        .route(
            "/products/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": true, "message": "Produto não encontrado" }))) }),
        )
}

async fn team_login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret1" {
        (
            StatusCode::CREATED,
            Json(json!({ "accessToken": GOOD_TOKEN, "user": { "email": body["email"], "role": "ADMIN" } })),
        )
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Credenciais inválidas" }))).into_response()
    }
}

async fn me(headers: HeaderMap) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN));

    if authorized {
        Json(json!({ "email": "ana@innexar.app", "role": "ADMIN" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token inválido" }))).into_response()
    }
}

#[tokio::test]
async fn login_persists_session_and_check_auth_refreshes_user() -> Result<()> {
    let base_url = common::serve(fake_api()).await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(STORAGE_KEY);
    let api = ApiClient::new(&base_url)?;

    let mut store = AuthStore::load(&path)?;
    store.login(&api, "ana@innexar.app", "secret1").await?;
    assert_eq!(store.token(), Some(GOOD_TOKEN));

    let reloaded = AuthStore::load(&path)?;
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.user().and_then(|u| u["role"].as_str()), Some("ADMIN"));

    let mut store = reloaded;
    assert!(store.check_auth(&api).await?);
    assert_eq!(store.user().and_then(|u| u["email"].as_str()), Some("ana@innexar.app"));
    Ok(())
}

#[tokio::test]
async fn rejected_login_leaves_store_untouched() -> Result<()> {
    let base_url = common::serve(fake_api()).await?;
    let dir = tempfile::tempdir()?;
    let api = ApiClient::new(&base_url)?;

    let mut store = AuthStore::load(dir.path().join(STORAGE_KEY))?;
    let err = store.login(&api, "ana@innexar.app", "wrong").await.unwrap_err();

    // 401 on login is reported as an expired session
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!store.is_authenticated());
    assert!(!store.path().exists());
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_clears_the_persisted_session() -> Result<()> {
    let base_url = common::serve(fake_api()).await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(STORAGE_KEY);

    let mut store = AuthStore::load(&path)?;
    store.login(&ApiClient::new(&base_url)?, "ana@innexar.app", "secret1").await?;

    // Simulate a token the server has since revoked
    let client = ApiClient::new(&base_url)?.with_store(&store).with_token("revoked");
    let err = client.get::<Value>("/auth/me").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    let reloaded = AuthStore::load(&path)?;
    assert!(!reloaded.is_authenticated());
    assert!(reloaded.user().is_none());
    Ok(())
}

#[tokio::test]
async fn api_errors_carry_status_and_message() -> Result<()> {
    let base_url = common::serve(fake_api()).await?;
    let client = ApiClient::new(&base_url)?.with_token(GOOD_TOKEN);

    match client.get::<Value>("/products/missing").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Produto não encontrado");
        }
        other => panic!("expected api error, got {:?}", other),
    }
    Ok(())
}

struct RejectingApi;

#[async_trait]
impl AuthApi for RejectingApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<Session, ClientError> {
        Ok(Session {
            token: "short-lived".into(),
            user: json!({ "name": "Ana" }),
        })
    }

    async fn me(&self, _token: &str) -> Result<Value, ClientError> {
        Err(ClientError::Unauthorized)
    }
}

#[tokio::test]
async fn check_auth_without_token_or_with_rejected_token() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(STORAGE_KEY);

    let mut store = AuthStore::load(&path)?;
    assert!(!store.check_auth(&RejectingApi).await?);

    store.login(&RejectingApi, "ana@innexar.app", "secret1").await?;
    assert!(store.is_authenticated());

    assert!(!store.check_auth(&RejectingApi).await?);
    assert!(!store.is_authenticated());
    assert!(!AuthStore::load(&path)?.is_authenticated());
    Ok(())
}
