use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{
    AffiliateLink, AffiliateProfile, AffiliateStats, CommissionRow, CommissionWithLink, CreateLinkRequest, LinkRow,
    LinkWithProduct, UpdateProfileRequest, Withdrawal,
};

use super::product_service::ProductService;
use super::{codes, ServiceError};

const LINK_EXISTS: &str = "Você já tem um link para este produto";
const LINK_NOT_FOUND: &str = "Link não encontrado";
const LINK_REMOVED: &str = "Link removido com sucesso";
const MINIMUM_WITHDRAWAL: &str = "Valor mínimo para saque é R$ 50,00";
const INSUFFICIENT_BALANCE: &str = "Saldo insuficiente para saque";
const PIX_KEY_REQUIRED: &str = "Configure sua chave PIX antes de solicitar um saque";
const AFFILIATE_NOT_FOUND: &str = "Afiliado não encontrado";

pub const LINK_CODE_ATTEMPTS: usize = 10;

const LINK_SELECT: &str = r#"
    SELECT l.*,
           p.code AS product_code,
           p.name AS product_name,
           p.logo_url AS product_logo_url,
           p.commission_rate AS product_commission_rate
    FROM affiliate_links l
    JOIN saas_products p ON p.id = l.product_id
"#;

const PROFILE_COLUMNS: &str = "id, name, email, phone, document, pix_key, pix_key_type, bank_name, \
                               bank_agency, bank_account, referral_code, status, created_at";

/// Smallest payout an affiliate may request
pub fn minimum_withdrawal() -> Decimal {
    Decimal::new(50, 0)
}

/// Conversions per hundred visits with two decimals; "0.00" before any visit
pub fn conversion_rate(conversions: i64, visits: i64) -> String {
    if visits <= 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", conversions as f64 / visits as f64 * 100.0)
}

/// Affiliate self-service: dashboard, links, commissions, profile and payouts
pub struct PortalService {
    pool: PgPool,
}

impl PortalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self, affiliate_id: Uuid) -> Result<AffiliateStats, ServiceError> {
        let visits = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate_visits WHERE affiliate_id = $1")
            .bind(affiliate_id)
            .fetch_one(&self.pool);
        let converted = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM affiliate_commissions \
             WHERE affiliate_id = $1 AND status IN ('approved', 'paid')",
        )
        .bind(affiliate_id)
        .fetch_one(&self.pool);
        let pending = self.commission_sum(affiliate_id, "pending");
        let approved = self.commission_sum(affiliate_id, "approved");

        let (visits, (conversions, total), pending, approved) =
            futures::try_join!(visits, converted, pending, approved)?;

        Ok(AffiliateStats {
            total_visits: visits,
            total_conversions: conversions,
            conversion_rate: conversion_rate(conversions, visits),
            total_commissions: total.to_f64().unwrap_or_default(),
            pending_commissions: pending.to_f64().unwrap_or_default(),
            approved_commissions: approved.to_f64().unwrap_or_default(),
        })
    }

    async fn commission_sum(&self, affiliate_id: Uuid, status: &str) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM affiliate_commissions WHERE affiliate_id = $1 AND status = $2",
        )
        .bind(affiliate_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    // Links

    pub async fn links(&self, affiliate_id: Uuid) -> Result<Vec<LinkWithProduct>, ServiceError> {
        let sql = format!("{} WHERE l.affiliate_id = $1 ORDER BY l.created_at DESC", LINK_SELECT);
        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(affiliate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LinkWithProduct::from).collect())
    }

    pub async fn create_link(&self, affiliate_id: Uuid, req: &CreateLinkRequest) -> Result<LinkWithProduct, ServiceError> {
        let product = ProductService::new(self.pool.clone())
            .find_by_id(req.product_id)
            .await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM affiliate_links WHERE affiliate_id = $1 AND product_id = $2)",
        )
        .bind(affiliate_id)
        .bind(product.id)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            return Err(ServiceError::bad_request(LINK_EXISTS));
        }

        let code = self.unique_link_code().await?;
        let link = sqlx::query_as::<_, AffiliateLink>(
            r#"
            INSERT INTO affiliate_links (id, affiliate_id, product_id, code, custom_slug, target_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(affiliate_id)
        .bind(product.id)
        .bind(&code)
        .bind(&req.custom_slug)
        .bind(product.referral_url(&code))
        .fetch_one(&self.pool)
        .await?;

        info!("Affiliate {} created link {} for {}", affiliate_id, link.code, product.code);

        let sql = format!("{} WHERE l.id = $1", LINK_SELECT);
        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(link.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    pub async fn delete_link(&self, affiliate_id: Uuid, link_id: Uuid) -> Result<&'static str, ServiceError> {
        let deleted = sqlx::query("DELETE FROM affiliate_links WHERE id = $1 AND affiliate_id = $2")
            .bind(link_id)
            .bind(affiliate_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(ServiceError::not_found(LINK_NOT_FOUND));
        }
        Ok(LINK_REMOVED)
    }

    async fn unique_link_code(&self) -> Result<String, ServiceError> {
        let mut code = codes::link_code(&mut rand::thread_rng());
        for _ in 1..LINK_CODE_ATTEMPTS {
            let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM affiliate_links WHERE code = $1)")
                .bind(&code)
                .fetch_one(&self.pool)
                .await?;
            if !taken {
                break;
            }
            code = codes::link_code(&mut rand::thread_rng());
        }
        Ok(code)
    }

    // Commissions

    pub async fn commissions(
        &self,
        affiliate_id: Uuid,
        status: Option<&str>,
    ) -> Result<Vec<CommissionWithLink>, ServiceError> {
        let rows = sqlx::query_as::<_, CommissionRow>(
            r#"
            SELECT c.*,
                   l.code AS link_code,
                   p.name AS product_name,
                   p.logo_url AS product_logo_url
            FROM affiliate_commissions c
            LEFT JOIN affiliate_links l ON l.id = c.link_id
            LEFT JOIN saas_products p ON p.id = l.product_id
            WHERE c.affiliate_id = $1 AND ($2::text IS NULL OR c.status = $2)
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(affiliate_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommissionWithLink::from).collect())
    }

    // Profile

    pub async fn profile(&self, affiliate_id: Uuid) -> Result<AffiliateProfile, ServiceError> {
        let sql = format!("SELECT {} FROM affiliates WHERE id = $1", PROFILE_COLUMNS);
        sqlx::query_as::<_, AffiliateProfile>(&sql)
            .bind(affiliate_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(AFFILIATE_NOT_FOUND))
    }

    pub async fn update_profile(
        &self,
        affiliate_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<AffiliateProfile, ServiceError> {
        let sql = format!(
            r#"
            UPDATE affiliates SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                pix_key = COALESCE($4, pix_key),
                pix_key_type = COALESCE($5, pix_key_type),
                bank_name = COALESCE($6, bank_name),
                bank_agency = COALESCE($7, bank_agency),
                bank_account = COALESCE($8, bank_account),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, AffiliateProfile>(&sql)
            .bind(affiliate_id)
            .bind(&req.name)
            .bind(&req.phone)
            .bind(&req.pix_key)
            .bind(&req.pix_key_type)
            .bind(&req.bank_name)
            .bind(&req.bank_agency)
            .bind(&req.bank_account)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(AFFILIATE_NOT_FOUND))
    }

    // Withdrawals

    pub async fn withdrawals(&self, affiliate_id: Uuid) -> Result<Vec<Withdrawal>, ServiceError> {
        let withdrawals = sqlx::query_as::<_, Withdrawal>(
            "SELECT * FROM affiliate_withdrawals WHERE affiliate_id = $1 ORDER BY created_at DESC",
        )
        .bind(affiliate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(withdrawals)
    }

    /// Queue a PIX payout against the approved commission balance
    pub async fn request_withdrawal(&self, affiliate_id: Uuid, amount: Decimal) -> Result<Withdrawal, ServiceError> {
        if amount < minimum_withdrawal() {
            return Err(ServiceError::bad_request(MINIMUM_WITHDRAWAL));
        }

        let approved = self.commission_sum(affiliate_id, "approved").await?;
        if amount > approved {
            return Err(ServiceError::bad_request(INSUFFICIENT_BALANCE));
        }

        let pix_key: Option<String> = sqlx::query_scalar::<_, Option<String>>("SELECT pix_key FROM affiliates WHERE id = $1")
            .bind(affiliate_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::bad_request(AFFILIATE_NOT_FOUND))?;
        let pix_key = pix_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ServiceError::bad_request(PIX_KEY_REQUIRED))?;

        let withdrawal = sqlx::query_as::<_, Withdrawal>(
            r#"
            INSERT INTO affiliate_withdrawals (id, affiliate_id, amount, method, pix_key, status)
            VALUES ($1, $2, $3, 'pix', $4, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(affiliate_id)
        .bind(amount)
        .bind(pix_key)
        .fetch_one(&self.pool)
        .await?;

        info!("Affiliate {} requested withdrawal {} of {}", affiliate_id, withdrawal.id, amount);
        Ok(withdrawal)
    }
}
