use contracts::domain::common::EntityRecord;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

use super::types::{EntityGateway, GatewayError, SortSpec};

/// Typed access to one record collection
pub struct Entities<T> {
    gateway: Arc<dyn EntityGateway>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Entities<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: EntityRecord> Entities<T> {
    pub fn new(gateway: Arc<dyn EntityGateway>) -> Self {
        Self {
            gateway,
            _record: PhantomData,
        }
    }

    pub async fn list(
        &self,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, GatewayError> {
        let raw = self.gateway.list(T::entity_name(), sort, limit).await?;
        Ok(decode_all(raw))
    }

    pub async fn filter(
        &self,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, GatewayError> {
        let raw = self
            .gateway
            .filter(T::entity_name(), matcher, sort, limit)
            .await?;
        Ok(decode_all(raw))
    }

    pub async fn create(&self, record: &T) -> Result<T, GatewayError> {
        let created = self
            .gateway
            .create(T::entity_name(), encode(record)?)
            .await?;
        decode(created)
    }

    /// Sends the whole record; the backend merges it over the stored one
    pub async fn update(&self, id: &str, record: &T) -> Result<T, GatewayError> {
        let updated = self
            .gateway
            .update(T::entity_name(), id, encode(record)?)
            .await?;
        decode(updated)
    }

    pub async fn update_fields(&self, id: &str, fields: Value) -> Result<T, GatewayError> {
        let updated = self.gateway.update(T::entity_name(), id, fields).await?;
        decode(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete(T::entity_name(), id).await
    }
}

fn encode<T: EntityRecord>(record: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(record).map_err(|e| GatewayError::InvalidPayload {
        entity: T::entity_name().to_string(),
        message: e.to_string(),
    })
}

fn decode<T: EntityRecord>(raw: Value) -> Result<T, GatewayError> {
    serde_json::from_value(raw).map_err(|e| GatewayError::InvalidPayload {
        entity: T::entity_name().to_string(),
        message: e.to_string(),
    })
}

/// Records that do not decode are skipped rather than failing the whole list
fn decode_all<T: EntityRecord>(raw: Vec<Value>) -> Vec<T> {
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .filter_map(|value| match decode::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping undecodable {} record: {}", T::element_name(), e);
                None
            }
        })
        .collect();
    if records.len() < total {
        tracing::warn!(
            "{}: decoded {} of {} records",
            T::list_name(),
            records.len(),
            total
        );
    }
    records
}
