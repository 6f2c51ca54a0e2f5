use crate::domain::common::lenient::{self, null_as_default};
use crate::domain::common::EntityRecord;
use crate::record_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id!(NotificationId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

/// Per-user notification shown in the notification panel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NotificationId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub notification_type: NotificationType,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,

    #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

impl EntityRecord for Notification {
    fn entity_name() -> &'static str {
        "Notification"
    }

    fn element_name() -> &'static str {
        "Notification"
    }

    fn list_name() -> &'static str {
        "Notifications"
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.0.as_str())
    }
}

/// Notification panel payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread: usize,
}
