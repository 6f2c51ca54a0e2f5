use contracts::domain::a003_notification::aggregate::{Notification, NotificationList};
use serde_json::{json, Map, Value};

use crate::shared::gateway::{Entities, GatewayError, SortSpec};

/// Size of the notification panel
pub const PANEL_LIMIT: usize = 20;

/// Latest notifications of a user, newest first
pub async fn list_for_user(
    notifications: &Entities<Notification>,
    user_id: &str,
) -> Result<NotificationList, GatewayError> {
    let mut matcher = Map::new();
    matcher.insert("user_id".into(), Value::String(user_id.to_string()));

    let items = notifications
        .filter(&matcher, Some(&SortSpec::newest_first()), Some(PANEL_LIMIT))
        .await?;
    let unread = unread_count(&items);
    Ok(NotificationList { items, unread })
}

pub async fn mark_read(
    notifications: &Entities<Notification>,
    id: &str,
) -> Result<Notification, GatewayError> {
    notifications.update_fields(id, json!({ "is_read": true })).await
}

/// Marks every unread notification of the user; returns how many were updated
pub async fn mark_all_read(
    notifications: &Entities<Notification>,
    user_id: &str,
) -> Result<usize, GatewayError> {
    let list = list_for_user(notifications, user_id).await?;
    let unread_ids: Vec<String> = list
        .items
        .iter()
        .filter(|n| !n.is_read)
        .filter_map(|n| n.id.as_ref().map(|id| id.0.clone()))
        .collect();

    for id in &unread_ids {
        mark_read(notifications, id).await?;
    }
    Ok(unread_ids.len())
}

pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| !n.is_read).count()
}
