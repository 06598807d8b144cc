use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Product;

use super::ServiceError;

pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";

pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active products, alphabetical
    pub async fn find_active(&self) -> Result<Vec<Product>, ServiceError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM saas_products WHERE is_active ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Product, ServiceError> {
        sqlx::query_as::<_, Product>("SELECT * FROM saas_products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(PRODUCT_NOT_FOUND))
    }
}
