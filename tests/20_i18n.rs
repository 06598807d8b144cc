mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn serves_locale_dictionaries() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let en: Value = reqwest::get(format!("{}/api/i18n/en", base_url)).await?.json().await?;
    assert_eq!(en["dashboard"]["title"], "Dashboard");

    // Unknown locale codes get the Portuguese dictionary
    let fallback: Value = reqwest::get(format!("{}/api/i18n/fr", base_url)).await?.json().await?;
    assert_eq!(fallback["dashboard"]["title"], "Painel");
    Ok(())
}

#[tokio::test]
async fn translates_with_placeholders() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/i18n/es/translate", base_url))
        .query(&[("key", "dashboard.welcome"), ("name", "Ana")])
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["locale"], "es");
    assert_eq!(body["key"], "dashboard.welcome");
    assert_eq!(body["value"], "¡Bienvenido, Ana!");
    Ok(())
}

#[tokio::test]
async fn unresolved_key_returns_last_segment() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/i18n/en/translate", base_url))
        .query(&[("key", "reports.quarterly.summaryTitle")])
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["value"], "summaryTitle");
    Ok(())
}

#[tokio::test]
async fn translate_requires_a_key() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let res = reqwest::get(format!("{}/api/i18n/pt/translate", base_url)).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
