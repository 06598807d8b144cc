use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub interval: String,
    pub features: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionWithPlan {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub plan: Option<Plan>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub amount: Decimal,
    pub status: String,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithSubscription {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub subscription: Option<Subscription>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub interval: Option<String>,
    pub features: Option<Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub plan_id: Uuid,

    #[validate(length(min = 1, message = "Nome do cliente é obrigatório"))]
    pub customer_name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub customer_email: String,

    pub status: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subscription_embeds_plan_next_to_own_fields() {
        let now = Utc::now();
        let plan_id = Uuid::new_v4();
        let item = SubscriptionWithPlan {
            subscription: Subscription {
                id: Uuid::new_v4(),
                plan_id,
                customer_name: "Oficina Central".into(),
                customer_email: "contato@oficina.com".into(),
                status: "active".into(),
                started_at: now,
                ends_at: None,
                created_at: now,
            },
            plan: Some(Plan {
                id: plan_id,
                name: "Pro".into(),
                description: None,
                price: Decimal::new(19990, 2),
                interval: "monthly".into(),
                features: json!(["crm", "ai"]),
                is_active: true,
                created_at: now,
            }),
        };
        let value = serde_json::to_value(item).unwrap();
        assert_eq!(value["customerName"], "Oficina Central");
        assert_eq!(value["plan"]["name"], "Pro");
        assert_eq!(value["plan"]["features"][1], "ai");
    }

    #[test]
    fn plan_price_accepts_numbers_and_strings() {
        let a: CreatePlanRequest = serde_json::from_value(json!({ "name": "Basic", "price": "49.90" })).unwrap();
        assert_eq!(a.price, Decimal::new(4990, 2));
        assert!(a.interval.is_none());
    }
}
