use axum::extract::{Path, State};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::Product;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProductService;

/// GET /products - Active catalogue, alphabetical
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = ProductService::new(state.pool.clone()).find_active().await?;
    Ok(ApiResponse::success(products))
}

/// GET /products/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Product> {
    let product = ProductService::new(state.pool.clone()).find_by_id(id).await?;
    Ok(ApiResponse::success(product))
}
