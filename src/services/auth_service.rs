use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims, Role};
use crate::config::SecurityConfig;
use crate::database::models::{
    Affiliate, AffiliateProfile, AffiliateStatus, AffiliateSummary, LoginRequest, RegisterRequest, TeamMember,
    UserCredentials,
};

use super::{codes, is_unique_violation, ServiceError};

const INVALID_CREDENTIALS: &str = "Credenciais inválidas";
const ACCOUNT_BLOCKED: &str = "Sua conta foi bloqueada. Entre em contato com o suporte.";
const ACCOUNT_PENDING: &str =
    "Sua conta está aguardando aprovação. Você receberá um e-mail quando for aprovada.";
const USER_INACTIVE: &str = "Usuário inativo";
const EMAIL_TAKEN: &str = "Este e-mail já está cadastrado";
const INVALID_TOKEN: &str = "Token inválido";
const REGISTERED: &str = "Cadastro realizado com sucesso! Sua conta está aguardando aprovação. Você receberá um e-mail quando for aprovada.";

/// Attempts at finding an unused referral code after the first one
pub const REFERRAL_CODE_RETRIES: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateLoginResponse {
    pub access_token: String,
    pub affiliate: AffiliateSummary,
}

#[derive(Debug, Serialize)]
pub struct TeamUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLoginResponse {
    pub access_token: String,
    pub user: TeamUser,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub affiliate: AffiliateSummary,
}

/// Profile behind a token: affiliates and team members have different shapes
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Profile {
    Affiliate(AffiliateProfile),
    Team(TeamMember),
}

pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    jwt_expiry_hours: u64,
}

impl AuthService {
    pub fn new(pool: PgPool, security: &SecurityConfig) -> Self {
        Self {
            pool,
            jwt_secret: security.jwt_secret.clone(),
            jwt_expiry_hours: security.jwt_expiry_hours,
        }
    }

    /// Affiliate login
    pub async fn login(&self, req: &LoginRequest) -> Result<AffiliateLoginResponse, ServiceError> {
        let email = req.email.trim().to_lowercase();

        let affiliate = sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliates WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&req.password, &affiliate.password)? {
            warn!("Rejected affiliate login for {}", email);
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        if affiliate.status == AffiliateStatus::Blocked.as_str() {
            return Err(ServiceError::unauthorized(ACCOUNT_BLOCKED));
        }
        if affiliate.status == AffiliateStatus::Pending.as_str() {
            return Err(ServiceError::unauthorized(ACCOUNT_PENDING));
        }

        sqlx::query("UPDATE affiliates SET last_login_at = NOW() WHERE id = $1")
            .bind(affiliate.id)
            .execute(&self.pool)
            .await?;

        let claims = Claims::new(affiliate.id, affiliate.email.clone(), Role::Affiliate, self.jwt_expiry_hours);
        let access_token = generate_jwt(&claims, &self.jwt_secret)?;

        info!("Affiliate {} logged in", affiliate.id);
        Ok(AffiliateLoginResponse {
            access_token,
            affiliate: AffiliateSummary::with_status(&affiliate),
        })
    }

    /// HQ team login
    pub async fn login_team(&self, req: &LoginRequest) -> Result<TeamLoginResponse, ServiceError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password, role, is_active FROM users WHERE email = $1",
        )
        .bind(req.email.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&req.password, &user.password)? {
            warn!("Rejected team login for {}", user.email);
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            return Err(ServiceError::unauthorized(USER_INACTIVE));
        }

        let role: Role = user.role.parse().map_err(|_| {
            warn!("User {} has unknown role {}", user.id, user.role);
            ServiceError::unauthorized(INVALID_CREDENTIALS)
        })?;

        let claims = Claims::new(user.id, user.email.clone(), role, self.jwt_expiry_hours);
        let access_token = generate_jwt(&claims, &self.jwt_secret)?;

        info!("Team member {} logged in", user.id);
        Ok(TeamLoginResponse {
            access_token,
            user: TeamUser {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
        })
    }

    /// Affiliate self-registration; the account starts `pending`
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ServiceError> {
        let email = req.email.trim().to_lowercase();

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM affiliates WHERE email = $1)")
            .bind(&email)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            return Err(ServiceError::conflict(EMAIL_TAKEN));
        }

        let referral_code = unique_referral_code(&self.pool, &req.name).await?;
        let password = hash_password(&req.password)?;

        let affiliate = sqlx::query_as::<_, Affiliate>(
            r#"
            INSERT INTO affiliates
                (id, name, email, password, phone, document, pix_key, pix_key_type,
                 referral_code, status, accepted_terms_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name.trim())
        .bind(&email)
        .bind(password)
        .bind(&req.phone)
        .bind(&req.document)
        .bind(&req.pix_key)
        .bind(&req.pix_key_type)
        .bind(&referral_code)
        .bind(AffiliateStatus::Pending.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::conflict(EMAIL_TAKEN)
            } else {
                e.into()
            }
        })?;

        info!("Affiliate {} registered with code {}", affiliate.id, affiliate.referral_code);
        Ok(RegisterResponse {
            message: REGISTERED,
            affiliate: AffiliateSummary::without_status(&affiliate),
        })
    }

    /// Profile for the token subject
    pub async fn me(&self, id: Uuid, role: Role) -> Result<Profile, ServiceError> {
        if role.is_team() {
            let user = sqlx::query_as::<_, TeamMember>(
                "SELECT id, name, email, role, avatar_url, is_active, created_at FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ServiceError::unauthorized(INVALID_TOKEN))?;
            return Ok(Profile::Team(user));
        }

        let affiliate = sqlx::query_as::<_, AffiliateProfile>(
            r#"
            SELECT id, name, email, phone, document, pix_key, pix_key_type, bank_name,
                   bank_agency, bank_account, referral_code, status, created_at
            FROM affiliates WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .filter(|a| a.status != AffiliateStatus::Blocked.as_str())
        .ok_or_else(|| ServiceError::unauthorized(INVALID_TOKEN))?;

        Ok(Profile::Affiliate(affiliate))
    }
}

/// Referral code derived from `name`, re-rolled while it collides
pub(crate) async fn unique_referral_code(pool: &PgPool, name: &str) -> Result<String, ServiceError> {
    let base = codes::referral_base(name);
    let mut code = codes::referral_code(&base, &mut rand::thread_rng());

    for _ in 0..REFERRAL_CODE_RETRIES {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM affiliates WHERE referral_code = $1)")
            .bind(&code)
            .fetch_one(pool)
            .await?;
        if !taken {
            return Ok(code);
        }
        code = codes::referral_code(&base, &mut rand::thread_rng());
    }

    warn!("Referral code space for {} looks exhausted, using {}", base, code);
    Ok(code)
}
