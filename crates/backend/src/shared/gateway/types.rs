use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors of the remote entity store
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{entity} request failed with status {status}: {body}")]
    Status {
        entity: String,
        status: u16,
        body: String,
    },

    #[error("invalid {entity} payload: {message}")]
    InvalidPayload { entity: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
            || matches!(self, GatewayError::Status { status: 404, .. })
    }
}

/// Sort order in the backend's `-field` notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Newest records first
    pub fn newest_first() -> Self {
        Self::desc("created_date")
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, field) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if field.is_empty() {
            return Err(format!("Invalid sort spec: '{}'", s));
        }
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Generic CRUD over every record type of the backend.
///
/// Records travel as JSON objects; typed access goes through
/// [`super::entities::Entities`].
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn list(
        &self,
        entity: &str,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError>;

    /// Records whose fields equal every entry of `matcher`
    async fn filter(
        &self,
        entity: &str,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError>;

    async fn create(&self, entity: &str, fields: Value) -> Result<Value, GatewayError>;

    async fn update(&self, entity: &str, id: &str, fields: Value) -> Result<Value, GatewayError>;

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError>;

    /// Name for logs
    fn gateway_name(&self) -> &str;
}
