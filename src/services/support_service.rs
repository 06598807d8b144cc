use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{
    AddMessageRequest, CreateTicketRequest, Ticket, TicketDetail, TicketListItem, TicketListRow, TicketMessage,
    TicketMessageRow, TicketMessageWithAuthor, TicketPriority, TicketStatus, UpdateTicketRequest, UserSummary,
};

use super::ServiceError;

const TICKET_NOT_FOUND: &str = "Ticket não encontrado";

pub struct SupportService {
    pool: PgPool,
}

impl SupportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, each with its assignee and message count
    pub async fn find_all(&self) -> Result<Vec<TicketListItem>, ServiceError> {
        let rows = sqlx::query_as::<_, TicketListRow>(
            r#"
            SELECT t.*,
                   u.name AS assignee_name,
                   u.avatar_url AS assignee_avatar_url,
                   (SELECT COUNT(*) FROM ticket_messages m WHERE m.ticket_id = t.id) AS message_count
            FROM tickets t
            LEFT JOIN users u ON u.id = t.assigned_to_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TicketListItem::from).collect())
    }

    /// Ticket with its conversation, oldest message first
    pub async fn find_one(&self, id: Uuid) -> Result<TicketDetail, ServiceError> {
        let ticket = self.ticket(id).await?;

        let assigned_to = match ticket.assigned_to_id {
            Some(user_id) => sqlx::query_as::<_, UserSummary>("SELECT id, name, avatar_url FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
            None => None,
        };

        let messages = sqlx::query_as::<_, TicketMessageRow>(
            r#"
            SELECT m.*, u.name AS author_name, u.avatar_url AS author_avatar_url
            FROM ticket_messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.ticket_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TicketMessageWithAuthor::from)
        .collect();

        Ok(TicketDetail {
            ticket,
            assigned_to,
            messages,
        })
    }

    pub async fn create(&self, req: &CreateTicketRequest) -> Result<Ticket, ServiceError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (id, title, description, status, priority, product_id, assigned_to_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.title)
        .bind(req.description.as_deref().unwrap_or_default())
        .bind(req.status.unwrap_or(TicketStatus::Open).as_str())
        .bind(req.priority.unwrap_or(TicketPriority::Medium).as_str())
        .bind(req.product_id)
        .bind(req.assigned_to_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Opened ticket {}", ticket.id);
        Ok(ticket)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateTicketRequest) -> Result<Ticket, ServiceError> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                product_id = COALESCE($6, product_id),
                assigned_to_id = COALESCE($7, assigned_to_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status.map(|s| s.as_str()))
        .bind(req.priority.map(|p| p.as_str()))
        .bind(req.product_id)
        .bind(req.assigned_to_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(TICKET_NOT_FOUND))
    }

    /// Append a message authored by `user_id`
    pub async fn add_message(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        req: &AddMessageRequest,
    ) -> Result<TicketMessage, ServiceError> {
        self.ticket(ticket_id).await?;

        let message = sqlx::query_as::<_, TicketMessage>(
            r#"
            INSERT INTO ticket_messages (id, ticket_id, user_id, content, is_internal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket_id)
        .bind(user_id)
        .bind(&req.content)
        .bind(req.is_internal)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn ticket(&self, id: Uuid) -> Result<Ticket, ServiceError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(TICKET_NOT_FOUND))
    }
}
