use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{
    CreatePlanRequest, CreateSubscriptionRequest, InvoiceWithSubscription, Plan, Subscription, SubscriptionWithPlan,
};
use crate::handlers::validated;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BillingService;

fn billing(state: &AppState) -> BillingService {
    BillingService::new(state.pool.clone())
}

pub async fn plans(State(state): State<AppState>) -> ApiResult<Vec<Plan>> {
    Ok(ApiResponse::success(billing(&state).find_all_plans().await?))
}

pub async fn create_plan(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlanRequest>, JsonRejection>,
) -> ApiResult<Plan> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(billing(&state).create_plan(&req).await?))
}

pub async fn subscriptions(State(state): State<AppState>) -> ApiResult<Vec<SubscriptionWithPlan>> {
    Ok(ApiResponse::success(billing(&state).find_all_subscriptions().await?))
}

pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> ApiResult<Subscription> {
    let req = validated(payload)?;
    Ok(ApiResponse::created(billing(&state).create_subscription(&req).await?))
}

pub async fn invoices(State(state): State<AppState>) -> ApiResult<Vec<InvoiceWithSubscription>> {
    Ok(ApiResponse::success(billing(&state).find_all_invoices().await?))
}
