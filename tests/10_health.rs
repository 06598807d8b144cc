mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let body: Value = reqwest::get(format!("{}/", base_url)).await?.json().await?;
    assert_eq!(body["name"], "Innexar API");
    assert!(body["endpoints"]["crm"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_reports_running_backend_and_missing_database() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let base_url = common::spawn_app(&backend).await?;

    let res = reqwest::get(format!("{}/api/health", base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["proxy"], "running");
    assert_eq!(body["backend"], "running");
    assert_eq!(body["database"], "unavailable");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_is_ok_even_without_backend() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let res = reqwest::get(format!("{}/api/health", base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["backend"], "unavailable");
    Ok(())
}
