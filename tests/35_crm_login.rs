mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let base_url = common::spawn_app(&backend).await?;

    let res = Client::new()
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "ana@innexar.app" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "detail": "Email e senha são obrigatórios" }));
    Ok(())
}

#[tokio::test]
async fn login_relays_backend_token_without_bearer() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let base_url = common::spawn_app(&backend).await?;

    let res = Client::new()
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "ana@innexar.app", "password": "secret1" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["access_token"], "crm-token");
    Ok(())
}

#[tokio::test]
async fn login_rejection_keeps_status_and_detail() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let base_url = common::spawn_app(&backend).await?;
    let client = Client::new();

    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "wrong@innexar.app", "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["detail"], "Incorrect email or password");

    // Non-JSON failures pass their text through as the detail
    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "broken@innexar.app", "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await?;
    assert_eq!(body["detail"], "upstream exploded");
    Ok(())
}

#[tokio::test]
async fn login_reports_unreachable_backend() -> Result<()> {
    let backend_url = common::unreachable_url()?;
    let base_url = common::spawn_app(&backend_url).await?;

    let res = Client::new()
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "ana@innexar.app", "password": "secret1" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await?;
    assert_eq!(
        body["detail"],
        "Erro ao conectar com o servidor. Verifique se o backend está rodando."
    );
    assert_eq!(body["backendUrl"], format!("{}/api/auth/login", backend_url));
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_accepts_any_truthy_credentials() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let base_url = common::spawn_app(&backend).await?;
    let client = Client::new();

    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": "ana@innexar.app", "password": 123456 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    for body in [
        json!({ "email": "", "password": "secret1" }),
        json!({ "email": "ana@innexar.app", "password": false }),
        json!({ "email": null, "password": "secret1" }),
    ] {
        let res = client.post(format!("{}/api/auth/login", base_url)).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
    Ok(())
}
