use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{AdminWebhook, CreateWebhookRequest, UpdateWebhookRequest};

use super::ServiceError;

const WEBHOOK_NOT_FOUND: &str = "Webhook não encontrado";

/// Workshop admin webhooks
pub struct WebhookService {
    pool: PgPool,
}

impl WebhookService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<AdminWebhook>, ServiceError> {
        let webhooks = sqlx::query_as::<_, AdminWebhook>("SELECT * FROM admin_webhooks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(webhooks)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<AdminWebhook, ServiceError> {
        sqlx::query_as::<_, AdminWebhook>("SELECT * FROM admin_webhooks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(WEBHOOK_NOT_FOUND))
    }

    pub async fn create(&self, req: &CreateWebhookRequest) -> Result<AdminWebhook, ServiceError> {
        let webhook = sqlx::query_as::<_, AdminWebhook>(
            r#"
            INSERT INTO admin_webhooks (id, name, url, events, secret, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.url)
        .bind(&req.events)
        .bind(&req.secret)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(webhook)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateWebhookRequest) -> Result<AdminWebhook, ServiceError> {
        self.find_one(id).await?;

        let webhook = sqlx::query_as::<_, AdminWebhook>(
            r#"
            UPDATE admin_webhooks SET
                name = COALESCE($2, name),
                url = COALESCE($3, url),
                events = COALESCE($4, events),
                secret = COALESCE($5, secret),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.url)
        .bind(&req.events)
        .bind(&req.secret)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(webhook)
    }

    pub async fn remove(&self, id: Uuid) -> Result<AdminWebhook, ServiceError> {
        let webhook = self.find_one(id).await?;
        sqlx::query("DELETE FROM admin_webhooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(webhook)
    }
}
