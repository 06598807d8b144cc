mod common;

use anyhow::Result;
use innexar_api::auth::Role;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// These rules are checked before any query, so a pool on a dead port is enough

#[tokio::test]
async fn withdrawal_below_minimum_is_rejected() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let res = Client::new()
        .post(format!("{}/affiliate/withdrawals", base_url))
        .header("authorization", common::bearer(Role::Affiliate))
        .json(&json!({ "amount": 49.99 }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Valor mínimo para saque é R$ 50,00");
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn team_member_cannot_be_created_as_affiliate() -> Result<()> {
    let base_url = common::spawn_app(&common::unreachable_url()?).await?;

    let res = Client::new()
        .post(format!("{}/team", base_url))
        .header("authorization", common::bearer(Role::Admin))
        .json(&json!({
            "name": "Bia",
            "email": "bia@innexar.app",
            "password": "secret1",
            "role": "affiliate"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Papel inválido para membro da equipe");
    Ok(())
}

#[tokio::test]
async fn affiliate_creation_needs_a_default_password() -> Result<()> {
    let mut config = common::test_config(&common::unreachable_url()?)?;
    config.security.affiliate_default_password = String::new();
    let base_url = common::spawn_app_with(config).await?;

    let res = Client::new()
        .post(format!("{}/affiliates", base_url))
        .header("authorization", common::bearer(Role::Admin))
        .json(&json!({
            "name": "Carla Dias",
            "email": "carla@innexar.app",
            "document": "123.456.789-00",
            "phone": "+55 11 99999-0000"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(
        body["message"],
        "Senha padrão de afiliados não configurada (AFFILIATE_DEFAULT_PASSWORD)"
    );
    Ok(())
}
