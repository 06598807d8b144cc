mod common;

use anyhow::Result;
use innexar_api::auth::Role;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn app() -> Result<String> {
    common::spawn_app(&common::unreachable_url()?).await
}

#[tokio::test]
async fn hq_routes_require_a_token() -> Result<()> {
    let base_url = app().await?;

    let res = Client::new().get(format!("{}/team", base_url)).send().await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn forged_tokens_are_rejected() -> Result<()> {
    let base_url = app().await?;

    let res = Client::new()
        .get(format!("{}/products", base_url))
        .header("authorization", "Bearer not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn affiliates_cannot_reach_hq_or_workshop() -> Result<()> {
    let base_url = app().await?;
    let client = Client::new();
    let token = common::bearer(Role::Affiliate);

    for path in ["/team", "/billing/plans", "/support", "/marketing/leads", "/affiliates", "/admin/webhooks"] {
        let res = client
            .get(format!("{}{}", base_url, path))
            .header("authorization", &token)
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);
        let body: Value = res.json().await?;
        assert_eq!(body["message"], "Acesso negado", "{}", path);
        assert_eq!(body["code"], "FORBIDDEN", "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn team_members_cannot_use_the_affiliate_portal() -> Result<()> {
    let base_url = app().await?;

    let res = Client::new()
        .get(format!("{}/affiliate/stats", base_url))
        .header("authorization", common::bearer(Role::Admin))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn team_member_passes_guard_and_hits_database() -> Result<()> {
    let base_url = app().await?;

    // Guard passes; the pool points at a dead port
    let res = Client::new()
        .get(format!("{}/team", base_url))
        .header("authorization", common::bearer(Role::Support))
        .send()
        .await?;

    assert!(res.status().is_server_error(), "got {}", res.status());
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn register_validates_before_touching_the_database() -> Result<()> {
    let base_url = app().await?;

    let res = Client::new()
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "name": "Al", "email": "not-an-email", "password": "123" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_reported() -> Result<()> {
    let base_url = app().await?;

    let res = Client::new()
        .post(format!("{}/auth/login/team", base_url))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
