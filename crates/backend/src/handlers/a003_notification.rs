use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a003_notification::aggregate::{Notification, NotificationList};
use serde_json::json;

use super::gateway_status;
use crate::domain::a003_notification;
use crate::shared::data::context;

/// GET /api/users/:user_id/notifications
pub async fn list_for_user(
    Path(user_id): Path<String>,
) -> Result<Json<NotificationList>, StatusCode> {
    let ctx = context::get();
    match a003_notification::service::list_for_user(&ctx.notifications, &user_id).await {
        Ok(list) => Ok(Json(list)),
        Err(e) => {
            tracing::error!("Failed to load notifications of {}: {}", user_id, e);
            Err(gateway_status(&e))
        }
    }
}

/// POST /api/notifications/:id/read
pub async fn mark_read(Path(id): Path<String>) -> Result<Json<Notification>, StatusCode> {
    let ctx = context::get();
    a003_notification::service::mark_read(&ctx.notifications, &id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to mark notification {} read: {}", id, e);
            gateway_status(&e)
        })
}

/// POST /api/users/:user_id/notifications/read
pub async fn mark_all_read(
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let ctx = context::get();
    match a003_notification::service::mark_all_read(&ctx.notifications, &user_id).await {
        Ok(marked) => Ok(Json(json!({ "marked": marked }))),
        Err(e) => {
            tracing::error!("Failed to mark notifications of {} read: {}", user_id, e);
            Err(gateway_status(&e))
        }
    }
}
