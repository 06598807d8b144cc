use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Email,
    Sms,
    Push,
    Banner,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::Email => "email",
            CampaignType::Sms => "sms",
            CampaignType::Push => "push",
            CampaignType::Banner => "banner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub status: String,
    pub target_audience: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CampaignListRow {
    #[sqlx(flatten)]
    pub campaign: Campaign,
    pub lead_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadCount {
    pub leads: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignListItem {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(rename = "_count")]
    pub count: LeadCount,
}

impl From<CampaignListRow> for CampaignListItem {
    fn from(row: CampaignListRow) -> Self {
        Self {
            campaign: row.campaign,
            count: LeadCount { leads: row.lead_count },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,
    #[serde(rename = "type", alias = "campaignType")]
    pub campaign_type: Option<CampaignType>,
    pub status: Option<CampaignStatus>,
    pub target_audience: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,
    #[serde(rename = "type", alias = "campaignType")]
    pub campaign_type: Option<CampaignType>,
    pub status: Option<CampaignStatus>,
    pub target_audience: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub campaign_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLeadStatusRequest {
    #[validate(length(min = 1, message = "Status é obrigatório"))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn campaign_type_travels_as_type() {
        let req: CreateCampaignRequest = serde_json::from_value(json!({ "name": "Black Friday", "type": "sms" })).unwrap();
        assert_eq!(req.campaign_type, Some(CampaignType::Sms));

        let legacy: CreateCampaignRequest =
            serde_json::from_value(json!({ "name": "Natal", "campaignType": "push" })).unwrap();
        assert_eq!(legacy.campaign_type, Some(CampaignType::Push));
    }

    #[test]
    fn unknown_campaign_status_is_rejected() {
        assert!(serde_json::from_value::<UpdateCampaignRequest>(json!({ "status": "archived" })).is_err());
    }
}
