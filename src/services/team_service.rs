use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, Role};
use crate::database::models::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest};

use super::{is_unique_violation, ServiceError};

const USER_NOT_FOUND: &str = "Usuário não encontrado";
const EMAIL_TAKEN: &str = "Email já cadastrado";
const INVALID_ROLE: &str = "Papel inválido para membro da equipe";

const MEMBER_COLUMNS: &str = "id, name, email, role, avatar_url, is_active, created_at";

pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<TeamMember>, ServiceError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", MEMBER_COLUMNS);
        Ok(sqlx::query_as::<_, TeamMember>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<TeamMember, ServiceError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", MEMBER_COLUMNS);
        sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub async fn create(&self, req: &CreateTeamMemberRequest) -> Result<TeamMember, ServiceError> {
        let role = team_role(req.role)?.unwrap_or(Role::Support);

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&req.email)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            return Err(ServiceError::conflict(EMAIL_TAKEN));
        }

        let password = hash_password(&req.password)?;
        let sql = format!(
            "INSERT INTO users (id, name, email, password, role, avatar_url, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            MEMBER_COLUMNS
        );

        let member = sqlx::query_as::<_, TeamMember>(&sql)
            .bind(Uuid::new_v4())
            .bind(&req.name)
            .bind(&req.email)
            .bind(password)
            .bind(role.as_str())
            .bind(&req.avatar_url)
            .bind(req.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await
            .map_err(email_conflict)?;

        info!("Created team member {} ({})", member.id, member.role);
        Ok(member)
    }

    /// Partial update; a new password is re-hashed before it is stored
    pub async fn update(&self, id: Uuid, req: &UpdateTeamMemberRequest) -> Result<TeamMember, ServiceError> {
        let role = team_role(req.role)?;
        let password = match &req.password {
            Some(plain) => Some(hash_password(plain)?),
            None => None,
        };

        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                role = COALESCE($5, role),
                avatar_url = COALESCE($6, avatar_url),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        );

        sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .bind(&req.name)
            .bind(&req.email)
            .bind(password)
            .bind(role.map(|r| r.as_str()))
            .bind(&req.avatar_url)
            .bind(req.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(email_conflict)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub async fn remove(&self, id: Uuid) -> Result<TeamMember, ServiceError> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {}", MEMBER_COLUMNS);
        let member = sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

        info!("Removed team member {}", member.id);
        Ok(member)
    }
}

/// Affiliates authenticate through their own table and cannot be team members
fn team_role(role: Option<Role>) -> Result<Option<Role>, ServiceError> {
    match role {
        Some(role) if !role.is_team() => Err(ServiceError::bad_request(INVALID_ROLE)),
        other => Ok(other),
    }
}

fn email_conflict(err: sqlx::Error) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::conflict(EMAIL_TAKEN)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affiliate_role_is_not_a_team_role() {
        assert!(matches!(team_role(Some(Role::Affiliate)), Err(ServiceError::BadRequest(_))));
        assert_eq!(team_role(Some(Role::Admin)).unwrap(), Some(Role::Admin));
        assert_eq!(team_role(None).unwrap(), None);
    }
}
