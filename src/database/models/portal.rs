use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::product::ProductSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateLink {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub custom_slug: Option<String>,
    pub target_url: String,
    pub clicks: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LinkRow {
    #[sqlx(flatten)]
    pub link: AffiliateLink,
    pub product_code: String,
    pub product_name: String,
    pub product_logo_url: Option<String>,
    pub product_commission_rate: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkWithProduct {
    #[serde(flatten)]
    pub link: AffiliateLink,
    pub product: ProductSummary,
}

impl From<LinkRow> for LinkWithProduct {
    fn from(row: LinkRow) -> Self {
        let product = ProductSummary {
            id: row.link.product_id,
            code: row.product_code,
            name: row.product_name,
            logo_url: row.product_logo_url,
            commission_rate: row.product_commission_rate,
        };
        Self {
            link: row.link,
            product,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub link_id: Option<Uuid>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommissionRow {
    #[sqlx(flatten)]
    pub commission: Commission,
    pub link_code: Option<String>,
    pub product_name: Option<String>,
    pub product_logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionLink {
    pub id: Uuid,
    pub code: String,
    pub product: Option<ProductBrief>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommissionWithLink {
    #[serde(flatten)]
    pub commission: Commission,
    pub link: Option<CommissionLink>,
}

impl From<CommissionRow> for CommissionWithLink {
    fn from(row: CommissionRow) -> Self {
        let product = row.product_name.map(|name| ProductBrief {
            name,
            logo_url: row.product_logo_url,
        });
        let link = match (row.commission.link_id, row.link_code) {
            (Some(id), Some(code)) => Some(CommissionLink { id, code, product }),
            _ => None,
        };
        Self {
            commission: row.commission,
            link,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub pix_key: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Dashboard figures; money is reported as plain numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateStats {
    pub total_visits: i64,
    pub total_conversions: i64,
    pub conversion_rate: String,
    pub total_commissions: f64,
    pub pending_commissions: f64,
    pub approved_commissions: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Slug inválido"))]
    pub custom_slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestWithdrawalRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionQuery {
    pub status: Option<String>,
}
