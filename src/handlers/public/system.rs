use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;

/// GET / - Service information
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Innexar API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Innexar back-office API: CRM proxy, HQ admin, affiliate portal and workshop webhooks",
        "endpoints": {
            "health": "/api/health (public)",
            "i18n": "/api/i18n/:locale[/translate] (public)",
            "crm": "/api/projects, /api/goals, /api/activities, /api/lead-analysis/:id, /api/dashboard/vendedor, /api/quote-requests/:id/*, /api/ai/*, /api/ai-config/* (bearer forwarded)",
            "auth": "/auth/login, /auth/login/team, /auth/register (public), /auth/me (protected)",
            "products": "/products[/:id] (protected)",
            "affiliate": "/affiliate/* (affiliate token)",
            "hq": "/team, /billing, /support, /marketing, /affiliates (team token)",
            "workshop": "/admin/webhooks (team token)",
        }
    }))
}

/// GET /api/health - Proxy, CRM backend and database status; always 200
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let (backend_up, database) = tokio::join!(
        state.proxy.backend_healthy(),
        DatabaseManager::health_check(&state.pool)
    );

    if let Err(e) = &database {
        tracing::warn!("Database health check failed: {}", e);
    }

    Json(json!({
        "status": "ok",
        "proxy": "running",
        "backend": if backend_up { "running" } else { "unavailable" },
        "database": if database.is_ok() { "ok" } else { "unavailable" },
        "timestamp": chrono::Utc::now(),
    }))
}
