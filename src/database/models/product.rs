use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub base_url: String,
    pub checkout_url: Option<String>,
    pub logo_url: Option<String>,
    pub color: Option<String>,
    pub commission_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Landing URL for an affiliate link: checkout page when set, else the product site
    pub fn referral_url(&self, code: &str) -> String {
        let base = self.checkout_url.as_deref().filter(|u| !u.is_empty()).unwrap_or(&self.base_url);
        format!("{}?ref={}", base, code)
    }
}

/// Product fields embedded in affiliate links
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub commission_rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(checkout_url: Option<&str>) -> Product {
        Product {
            id: Uuid::new_v4(),
            code: "CRM".into(),
            name: "Innexar CRM".into(),
            slug: "crm".into(),
            description: String::new(),
            base_url: "https://crm.innexar.app".into(),
            checkout_url: checkout_url.map(String::from),
            logo_url: None,
            color: None,
            commission_rate: Decimal::new(2000, 2),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn referral_url_prefers_checkout() {
        assert_eq!(
            product(Some("https://pay.innexar.app/crm")).referral_url("AB12CD34"),
            "https://pay.innexar.app/crm?ref=AB12CD34"
        );
        assert_eq!(product(None).referral_url("AB12CD34"), "https://crm.innexar.app?ref=AB12CD34");
        assert_eq!(product(Some("")).referral_url("X"), "https://crm.innexar.app?ref=X");
    }
}
