use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{
    CreatePlanRequest, CreateSubscriptionRequest, Invoice, InvoiceWithSubscription, Plan, Subscription,
    SubscriptionWithPlan,
};

use super::ServiceError;

const PLAN_NOT_FOUND: &str = "Plano não encontrado";
const INVALID_PRICE: &str = "Preço inválido";

pub struct BillingService {
    pool: PgPool,
}

impl BillingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Plans

    pub async fn find_all_plans(&self) -> Result<Vec<Plan>, ServiceError> {
        let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE is_active ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(plans)
    }

    pub async fn create_plan(&self, req: &CreatePlanRequest) -> Result<Plan, ServiceError> {
        if req.price < Decimal::ZERO {
            return Err(ServiceError::bad_request(INVALID_PRICE));
        }

        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (id, name, description, price, interval, features, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.interval.as_deref().unwrap_or("monthly"))
        .bind(req.features.clone().unwrap_or_else(|| json!([])))
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(plan)
    }

    // Subscriptions

    pub async fn find_all_subscriptions(&self) -> Result<Vec<SubscriptionWithPlan>, ServiceError> {
        let subscriptions = sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        let plan_ids: Vec<Uuid> = subscriptions.iter().map(|s| s.plan_id).collect();
        let plans: HashMap<Uuid, Plan> = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = ANY($1)")
            .bind(&plan_ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|plan| (plan.id, plan))
            .collect();

        Ok(subscriptions
            .into_iter()
            .map(|subscription| SubscriptionWithPlan {
                plan: plans.get(&subscription.plan_id).cloned(),
                subscription,
            })
            .collect())
    }

    pub async fn create_subscription(&self, req: &CreateSubscriptionRequest) -> Result<Subscription, ServiceError> {
        let plan_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM plans WHERE id = $1)")
            .bind(req.plan_id)
            .fetch_one(&self.pool)
            .await?;
        if !plan_exists {
            return Err(ServiceError::not_found(PLAN_NOT_FOUND));
        }

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (id, plan_id, customer_name, customer_email, status, started_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.plan_id)
        .bind(&req.customer_name)
        .bind(&req.customer_email)
        .bind(req.status.as_deref().unwrap_or("active"))
        .bind(req.started_at)
        .bind(req.ends_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }

    // Invoices

    pub async fn find_all_invoices(&self) -> Result<Vec<InvoiceWithSubscription>, ServiceError> {
        let invoices = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        let subscription_ids: Vec<Uuid> = invoices.iter().map(|i| i.subscription_id).collect();
        let subscriptions: HashMap<Uuid, Subscription> =
            sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = ANY($1)")
                .bind(&subscription_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect();

        Ok(invoices
            .into_iter()
            .map(|invoice| InvoiceWithSubscription {
                subscription: subscriptions.get(&invoice.subscription_id).cloned(),
                invoice,
            })
            .collect())
    }
}
