use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub product_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket joined with its assignee and message count
#[derive(Debug, Clone, FromRow)]
pub struct TicketListRow {
    #[sqlx(flatten)]
    pub ticket: Ticket,
    pub assignee_name: Option<String>,
    pub assignee_avatar_url: Option<String>,
    pub message_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCount {
    pub messages: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListItem {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub assigned_to: Option<UserSummary>,
    #[serde(rename = "_count")]
    pub count: MessageCount,
}

impl From<TicketListRow> for TicketListItem {
    fn from(row: TicketListRow) -> Self {
        let assigned_to = assignee(row.ticket.assigned_to_id, row.assignee_name, row.assignee_avatar_url);
        Self {
            ticket: row.ticket,
            assigned_to,
            count: MessageCount {
                messages: row.message_count,
            },
        }
    }
}

/// Assignee summary, present only when the join found a user
pub fn assignee(id: Option<Uuid>, name: Option<String>, avatar_url: Option<String>) -> Option<UserSummary> {
    match (id, name) {
        (Some(id), Some(name)) => Some(UserSummary { id, name, avatar_url }),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketMessageRow {
    #[sqlx(flatten)]
    pub message: TicketMessage,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessageWithAuthor {
    #[serde(flatten)]
    pub message: TicketMessage,
    pub user: UserSummary,
}

impl From<TicketMessageRow> for TicketMessageWithAuthor {
    fn from(row: TicketMessageRow) -> Self {
        let user = UserSummary {
            id: row.message.user_id,
            name: row.author_name,
            avatar_url: row.author_avatar_url,
        };
        Self {
            message: row.message,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub assigned_to: Option<UserSummary>,
    pub messages: Vec<TicketMessageWithAuthor>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub product_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub product_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    #[validate(length(min = 1, message = "Mensagem é obrigatória"))]
    pub content: String,
    #[serde(default)]
    pub is_internal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_snake_case_wire_names() {
        let req: UpdateTicketRequest = serde_json::from_value(json!({ "status": "in_progress" })).unwrap();
        assert_eq!(req.status, Some(TicketStatus::InProgress));
        assert_eq!(TicketStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn list_item_exposes_prisma_style_count() {
        let now = Utc::now();
        let assignee_id = Uuid::new_v4();
        let row = TicketListRow {
            ticket: Ticket {
                id: Uuid::new_v4(),
                title: "Erro no login".into(),
                description: String::new(),
                status: "open".into(),
                priority: "high".into(),
                product_id: None,
                assigned_to_id: Some(assignee_id),
                created_at: now,
                updated_at: now,
            },
            assignee_name: Some("Carla".into()),
            assignee_avatar_url: None,
            message_count: 3,
        };
        let value = serde_json::to_value(TicketListItem::from(row)).unwrap();
        assert_eq!(value["_count"]["messages"], 3);
        assert_eq!(value["assignedTo"]["name"], "Carla");
        assert_eq!(value["title"], "Erro no login");
    }

    #[test]
    fn message_internal_flag_defaults_to_false() {
        let req: AddMessageRequest = serde_json::from_value(json!({ "content": "Olá" })).unwrap();
        assert!(!req.is_internal);
    }
}
