use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::models::{Affiliate, AffiliateStatus, CreateAffiliateRequest, UpdateAffiliateRequest};

use super::auth_service::unique_referral_code;
use super::{is_unique_violation, ServiceError};

const AFFILIATE_NOT_FOUND: &str = "Afiliado não encontrado";
const EMAIL_TAKEN: &str = "Este e-mail já está cadastrado";

/// HQ-side management of affiliate accounts
pub struct AffiliateService {
    pool: PgPool,
    default_password: String,
}

impl AffiliateService {
    pub fn new(pool: PgPool, default_password: impl Into<String>) -> Self {
        Self {
            pool,
            default_password: default_password.into(),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Affiliate>, ServiceError> {
        let affiliates = sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliates ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(affiliates)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Affiliate, ServiceError> {
        sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(AFFILIATE_NOT_FOUND))
    }

    /// Admin-created affiliate with the configured initial password
    pub async fn create(&self, req: &CreateAffiliateRequest) -> Result<Affiliate, ServiceError> {
        if self.default_password.is_empty() {
            return Err(ServiceError::bad_request(
                "Senha padrão de afiliados não configurada (AFFILIATE_DEFAULT_PASSWORD)",
            ));
        }

        let referral_code = unique_referral_code(&self.pool, &req.name).await?;
        let password = hash_password(&self.default_password)?;

        let affiliate = sqlx::query_as::<_, Affiliate>(
            r#"
            INSERT INTO affiliates (id, name, email, password, document, phone, referral_code, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(req.email.trim().to_lowercase())
        .bind(password)
        .bind(&req.document)
        .bind(&req.phone)
        .bind(&referral_code)
        .bind(req.status.unwrap_or(AffiliateStatus::Pending).as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(email_conflict)?;

        info!("HQ created affiliate {} ({})", affiliate.id, affiliate.status);
        Ok(affiliate)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateAffiliateRequest) -> Result<Affiliate, ServiceError> {
        sqlx::query_as::<_, Affiliate>(
            r#"
            UPDATE affiliates SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                document = COALESCE($4, document),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                pix_key = COALESCE($7, pix_key),
                pix_key_type = COALESCE($8, pix_key_type),
                bank_name = COALESCE($9, bank_name),
                bank_agency = COALESCE($10, bank_agency),
                bank_account = COALESCE($11, bank_account),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(req.email.as_ref().map(|e| e.trim().to_lowercase()))
        .bind(&req.document)
        .bind(&req.phone)
        .bind(req.status.map(|s| s.as_str()))
        .bind(&req.pix_key)
        .bind(&req.pix_key_type)
        .bind(&req.bank_name)
        .bind(&req.bank_agency)
        .bind(&req.bank_account)
        .fetch_optional(&self.pool)
        .await
        .map_err(email_conflict)?
        .ok_or_else(|| ServiceError::not_found(AFFILIATE_NOT_FOUND))
    }

    pub async fn remove(&self, id: Uuid) -> Result<Affiliate, ServiceError> {
        let affiliate = sqlx::query_as::<_, Affiliate>("DELETE FROM affiliates WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(AFFILIATE_NOT_FOUND))?;

        info!("HQ removed affiliate {}", affiliate.id);
        Ok(affiliate)
    }
}

fn email_conflict(err: sqlx::Error) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::conflict(EMAIL_TAKEN)
    } else {
        err.into()
    }
}
