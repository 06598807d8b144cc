use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    Pending,
    Active,
    Inactive,
    Blocked,
}

impl AffiliateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliateStatus::Pending => "pending",
            AffiliateStatus::Active => "active",
            AffiliateStatus::Inactive => "inactive",
            AffiliateStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Affiliate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
    pub referral_code: String,
    pub status: String,
    pub accepted_terms_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity returned after login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub referral_code: String,
}

impl AffiliateSummary {
    pub fn with_status(affiliate: &Affiliate) -> Self {
        Self {
            id: affiliate.id,
            name: affiliate.name.clone(),
            email: affiliate.email.clone(),
            status: Some(affiliate.status.clone()),
            referral_code: affiliate.referral_code.clone(),
        }
    }

    pub fn without_status(affiliate: &Affiliate) -> Self {
        Self {
            status: None,
            ..Self::with_status(affiliate)
        }
    }
}

/// Self-service view of the affiliate's own record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
    pub referral_code: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Nome deve ter no mínimo 3 caracteres"))]
    pub name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,

    pub phone: Option<String>,
    #[serde(alias = "cpfCnpj")]
    pub document: Option<String>,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliateRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = 1, message = "Documento é obrigatório"))]
    pub document: String,

    #[validate(length(min = 1, message = "Telefone é obrigatório"))]
    pub phone: String,

    pub status: Option<AffiliateStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAffiliateRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,

    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,

    pub document: Option<String>,
    pub phone: Option<String>,
    pub status: Option<AffiliateStatus>,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
}

/// Fields an affiliate may change on their own profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_accepts_cpf_cnpj_alias() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "João Silva",
            "email": "joao@email.com",
            "password": "senha123",
            "cpfCnpj": "123.456.789-00",
            "pixKey": "joao@email.com"
        }))
        .unwrap();
        assert_eq!(req.document.as_deref(), Some("123.456.789-00"));
        assert_eq!(req.pix_key.as_deref(), Some("joao@email.com"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_rejects_short_name() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "Jo",
            "email": "joao@email.com",
            "password": "senha123"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn status_only_accepts_known_values() {
        assert!(serde_json::from_value::<AffiliateStatus>(json!("blocked")).is_ok());
        assert!(serde_json::from_value::<AffiliateStatus>(json!("deleted")).is_err());
    }

    fn affiliate(status: &str) -> Affiliate {
        Affiliate {
            id: Uuid::nil(),
            name: "Ana Souza".into(),
            email: "ana@innexar.app".into(),
            password: "$argon2id$hash".into(),
            phone: None,
            document: None,
            pix_key: None,
            pix_key_type: None,
            bank_name: None,
            bank_agency: None,
            bank_account: None,
            referral_code: "ANA7K2Q".into(),
            status: status.into(),
            accepted_terms_at: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summaries_built_from_affiliate_row() {
        let row = affiliate("pending");

        let with = serde_json::to_value(AffiliateSummary::with_status(&row)).unwrap();
        assert_eq!(with["status"], "pending");
        assert_eq!(with["referralCode"], "ANA7K2Q");
        assert_eq!(with["email"], "ana@innexar.app");

        let without = serde_json::to_value(AffiliateSummary::without_status(&row)).unwrap();
        assert!(without.get("status").is_none());
        assert_eq!(without["name"], "Ana Souza");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(affiliate("active")).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["referralCode"], "ANA7K2Q");
    }

    #[test]
    fn summary_without_status_omits_field() {
        let summary = AffiliateSummary {
            id: Uuid::nil(),
            name: "Ana".into(),
            email: "ana@x.com".into(),
            status: None,
            referral_code: "ANA1Z2X".into(),
        };
        let value = serde_json::to_value(summary).unwrap();
        assert!(value.get("status").is_none());
        assert_eq!(value["referralCode"], "ANA1Z2X");
    }
}
