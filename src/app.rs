use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::i18n::Translator;
use crate::middleware::{jwt_auth_middleware, require_affiliate, require_team};
use crate::proxy::BackendProxy;

/// Shared by every handler: database pool, configuration, CRM client, dictionaries
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub proxy: BackendProxy,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, reqwest::Error> {
        let proxy = BackendProxy::new(&config.proxy)?;
        let translator = Translator::bundled(config.i18n.default_locale);

        Ok(Self {
            pool,
            config: Arc::new(config),
            proxy,
            translator: Arc::new(translator),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/api/health", get(public::system::health))
        .merge(i18n_routes())
        .merge(crm_routes())
        .merge(auth_public_routes())
        // JWT
        .merge(protected_routes(&state))
        .merge(affiliate_routes(&state))
        // Team JWT
        .merge(hq_routes(&state))
        .merge(workshop_routes(&state));

    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security.cors_origins));
    }

    router.with_state(state)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn i18n_routes() -> Router<AppState> {
    Router::new()
        .route("/api/i18n/:locale", get(public::i18n::dictionary))
        .route("/api/i18n/:locale/translate", get(public::i18n::translate))
}

/// CRM pass-through; handlers check for the bearer themselves
fn crm_routes() -> Router<AppState> {
    use public::crm;

    Router::new()
        .route("/api/auth/login", post(crm::login))
        .route("/api/projects", get(crm::projects_get).post(crm::projects_post))
        .route("/api/goals", get(crm::goals_get).post(crm::goals_post))
        .route("/api/activities", get(crm::activities_get).post(crm::activities_post))
        .route(
            "/api/lead-analysis/:contact_id",
            get(crm::lead_analysis_get).post(crm::lead_analysis_post),
        )
        .route("/api/dashboard/vendedor", get(crm::dashboard_vendedor))
        .route("/api/quote-requests/:id/complete", put(crm::quote_complete))
        .route(
            "/api/quote-requests/:id/generate-with-ai",
            post(crm::quote_generate_with_ai),
        )
        .route("/api/ai/chat/history", get(crm::chat_history))
        .route("/api/ai/actions/create-opportunity", post(crm::create_opportunity))
        .route("/api/ai-config/google/list-models", get(crm::list_models))
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/login/team", post(auth::login_team))
        .route("/auth/register", post(auth::register))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(protected::auth::me))
        .route("/products", get(protected::products::list))
        .route("/products/:id", get(protected::products::show))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn affiliate_routes(state: &AppState) -> Router<AppState> {
    use protected::affiliate;

    Router::new()
        .route("/affiliate/stats", get(affiliate::stats))
        .route("/affiliate/links", get(affiliate::links).post(affiliate::create_link))
        .route("/affiliate/links/:id", delete(affiliate::delete_link))
        .route("/affiliate/commissions", get(affiliate::commissions))
        .route("/affiliate/profile", get(affiliate::profile).put(affiliate::update_profile))
        .route(
            "/affiliate/withdrawals",
            get(affiliate::withdrawals).post(affiliate::request_withdrawal),
        )
        // Role check runs after the token is decoded (outermost layer runs first)
        .route_layer(middleware::from_fn(require_affiliate))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn hq_routes(state: &AppState) -> Router<AppState> {
    use elevated::{affiliates, billing, marketing, support, team};

    Router::new()
        .route("/team", get(team::list).post(team::create))
        .route("/team/:id", get(team::show).patch(team::update).delete(team::remove))
        .route("/billing/plans", get(billing::plans).post(billing::create_plan))
        .route(
            "/billing/subscriptions",
            get(billing::subscriptions).post(billing::create_subscription),
        )
        .route("/billing/invoices", get(billing::invoices))
        .route("/support", get(support::list).post(support::create))
        .route("/support/:id", get(support::show).patch(support::update))
        .route("/support/:id/messages", post(support::add_message))
        .route(
            "/marketing/campaigns",
            get(marketing::campaigns).post(marketing::create_campaign),
        )
        .route(
            "/marketing/campaigns/:id",
            get(marketing::campaign).patch(marketing::update_campaign),
        )
        .route("/marketing/leads", get(marketing::leads).post(marketing::create_lead))
        .route("/marketing/leads/:id/status", patch(marketing::update_lead_status))
        .route("/affiliates", get(affiliates::list).post(affiliates::create))
        .route(
            "/affiliates/:id",
            get(affiliates::show).patch(affiliates::update).delete(affiliates::remove),
        )
        .route_layer(middleware::from_fn(require_team))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn workshop_routes(state: &AppState) -> Router<AppState> {
    use elevated::webhooks;

    Router::new()
        .route("/admin/webhooks", get(webhooks::list).post(webhooks::create))
        .route(
            "/admin/webhooks/:id",
            get(webhooks::show).patch(webhooks::update).delete(webhooks::remove),
        )
        .route_layer(middleware::from_fn(require_team))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseManager;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = AppConfig::development();
        config.server.enable_request_logging = false;
        let pool = DatabaseManager::connect_lazy(&config.database).unwrap();
        app(AppState::new(pool, config).unwrap())
    }

    #[tokio::test]
    async fn root_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin_only() {
        let preflight = |origin: &'static str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/products")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = test_app().oneshot(preflight("http://localhost:3000")).await.unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );

        let denied = test_app().oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
