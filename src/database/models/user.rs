use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;

/// Team member as exposed by the API; the password hash is never selected
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row used only to check a login attempt
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub is_active: bool,
}

/// Author or assignee reference embedded in support payloads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,

    pub role: Option<Role>,
    pub avatar_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,

    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: Option<String>,

    pub role: Option<Role>,
    pub avatar_url: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_reads_camel_case_and_role() {
        let req: CreateTeamMemberRequest = serde_json::from_value(json!({
            "name": "Bia",
            "email": "bia@innexar.app",
            "password": "segredo1",
            "role": "FINANCE",
            "isActive": false
        }))
        .unwrap();
        assert_eq!(req.role, Some(Role::Finance));
        assert_eq!(req.is_active, Some(false));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        assert!(UpdateTeamMemberRequest::default().validate().is_ok());
        let req = UpdateTeamMemberRequest {
            password: Some("123".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
