use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Campaign, CampaignDetail, CampaignListItem, CampaignListRow, CampaignStatus, CampaignType, CreateCampaignRequest,
    CreateLeadRequest, Lead, UpdateCampaignRequest,
};

use super::ServiceError;

const CAMPAIGN_NOT_FOUND: &str = "Campanha não encontrada";
const LEAD_NOT_FOUND: &str = "Lead não encontrado";

pub struct MarketingService {
    pool: PgPool,
}

impl MarketingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all_campaigns(&self) -> Result<Vec<CampaignListItem>, ServiceError> {
        let rows = sqlx::query_as::<_, CampaignListRow>(
            r#"
            SELECT c.*, (SELECT COUNT(*) FROM leads l WHERE l.campaign_id = c.id) AS lead_count
            FROM campaigns c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CampaignListItem::from).collect())
    }

    pub async fn find_one_campaign(&self, id: Uuid) -> Result<CampaignDetail, ServiceError> {
        let campaign = self.campaign(id).await?;
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE campaign_id = $1 ORDER BY created_at DESC")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(CampaignDetail { campaign, leads })
    }

    pub async fn create_campaign(&self, req: &CreateCampaignRequest, created_by: Uuid) -> Result<Campaign, ServiceError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns
                (id, name, campaign_type, status, target_audience, start_date, end_date, created_by_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(req.campaign_type.unwrap_or(CampaignType::Email).as_str())
        .bind(req.status.unwrap_or(CampaignStatus::Draft).as_str())
        .bind(&req.target_audience)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(campaign)
    }

    pub async fn update_campaign(&self, id: Uuid, req: &UpdateCampaignRequest) -> Result<Campaign, ServiceError> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                name = COALESCE($2, name),
                campaign_type = COALESCE($3, campaign_type),
                status = COALESCE($4, status),
                target_audience = COALESCE($5, target_audience),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(req.campaign_type.map(|t| t.as_str()))
        .bind(req.status.map(|s| s.as_str()))
        .bind(&req.target_audience)
        .bind(req.start_date)
        .bind(req.end_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(CAMPAIGN_NOT_FOUND))
    }

    // Leads

    pub async fn find_all_leads(&self) -> Result<Vec<Lead>, ServiceError> {
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    pub async fn create_lead(&self, req: &CreateLeadRequest) -> Result<Lead, ServiceError> {
        if let Some(campaign_id) = req.campaign_id {
            self.campaign(campaign_id).await?;
        }

        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (id, campaign_id, name, email, phone, source, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.campaign_id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.source)
        .bind(req.status.as_deref().unwrap_or("new"))
        .fetch_one(&self.pool)
        .await?;

        Ok(lead)
    }

    pub async fn update_lead_status(&self, id: Uuid, status: &str) -> Result<Lead, ServiceError> {
        sqlx::query_as::<_, Lead>("UPDATE leads SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(LEAD_NOT_FOUND))
    }

    async fn campaign(&self, id: Uuid) -> Result<Campaign, ServiceError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(CAMPAIGN_NOT_FOUND))
    }
}
