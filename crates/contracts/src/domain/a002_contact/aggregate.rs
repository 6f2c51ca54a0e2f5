use crate::domain::common::lenient::{self, empty_as_none, null_as_default};
use crate::domain::common::EntityRecord;
use crate::record_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id!(ContactId);

/// Contact record. Its lifecycle is independent of leads; the pipeline only
/// reads it for display and for industry/source breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub position: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub industry: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub lead_source: Option<String>,

    /// Prospect / Client / Active / Inactive
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<String>,

    #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

impl Contact {
    /// "First Last", trimmed when one part is missing
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.0.as_str())
    }
}

impl EntityRecord for Contact {
    fn entity_name() -> &'static str {
        "Contact"
    }

    fn element_name() -> &'static str {
        "Contact"
    }

    fn list_name() -> &'static str {
        "Contacts"
    }

    fn record_id(&self) -> Option<&str> {
        self.id_str()
    }
}
