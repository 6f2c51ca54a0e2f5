use serde::{de::DeserializeOwned, Serialize};

/// A record type persisted through the entity gateway.
///
/// Every record type uses the same CRUD surface; the only thing the gateway
/// needs to know is the collection it lives in.
pub trait EntityRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name on the backend (e.g. "Lead")
    fn entity_name() -> &'static str;

    /// Singular name for messages and logs
    fn element_name() -> &'static str;

    /// Plural name for messages and logs
    fn list_name() -> &'static str;

    /// Gateway-assigned id; `None` before the record is created
    fn record_id(&self) -> Option<&str>;
}

/// String id newtype helpers shared by every record id
pub trait RecordId: Clone + PartialEq + Eq + std::hash::Hash + std::fmt::Debug {
    fn as_str(&self) -> &str;

    fn from_string(s: impl Into<String>) -> Self;
}

/// Declares a transparent string id type for a record
#[macro_export]
macro_rules! record_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $crate::domain::common::RecordId for $name {
            fn as_str(&self) -> &str {
                &self.0
            }

            fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}
