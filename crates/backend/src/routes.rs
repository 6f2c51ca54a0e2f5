use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 LEADS / PIPELINE
        // ========================================
        .route(
            "/api/leads",
            get(handlers::a001_lead::list).post(handlers::a001_lead::create),
        )
        .route("/api/leads/board", get(handlers::a001_lead::board))
        .route(
            "/api/leads/:id",
            put(handlers::a001_lead::update).delete(handlers::a001_lead::delete),
        )
        .route("/api/leads/:id/move", post(handlers::a001_lead::move_stage))
        .route("/api/pipeline/reload", post(handlers::a001_lead::reload))
        // ========================================
        // A002 CONTACTS / SEARCH
        // ========================================
        .route("/api/contacts", get(handlers::a002_contact::list_all))
        .route("/api/contacts/:id", get(handlers::a002_contact::get_by_id))
        .route("/api/search", get(handlers::search::search))
        // ========================================
        // A003 NOTIFICATIONS
        // ========================================
        .route(
            "/api/users/:user_id/notifications",
            get(handlers::a003_notification::list_for_user),
        )
        .route(
            "/api/users/:user_id/notifications/read",
            post(handlers::a003_notification::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::a003_notification::mark_read),
        )
        // ========================================
        // A004 AI ASSISTANT
        // ========================================
        .route(
            "/api/assistant/messages",
            post(handlers::a004_ai_assistant::send_message),
        )
        .route(
            "/api/assistant/conversations/:id",
            get(handlers::a004_ai_assistant::history),
        )
        // ========================================
        // DASHBOARDS
        // ========================================
        .route(
            "/api/d400/lead_analytics",
            get(handlers::d400_lead_analytics::get_lead_analytics),
        )
        .route(
            "/api/d401/pipeline_overview",
            get(handlers::d401_pipeline_overview::get_pipeline_overview),
        )
}
