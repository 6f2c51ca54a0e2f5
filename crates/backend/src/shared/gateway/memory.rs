use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{EntityGateway, GatewayError, SortSpec};

/// Fields the backend owns; client values for them are ignored
const SERVER_FIELDS: [&str; 3] = ["id", "created_date", "updated_date"];

/// In-process entity store with the same contract as the remote backend.
///
/// Records keep insertion order; ids are random, `created_date` and
/// `updated_date` are stamped on write.
#[derive(Default)]
pub struct InMemoryGateway {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records as-is, filling in `id` and `created_date` when missing
    pub async fn seed(&self, entity: &str, records: Vec<Value>) {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(entity.to_string()).or_default();
        for mut record in records {
            if let Some(object) = record.as_object_mut() {
                object
                    .entry("id")
                    .or_insert_with(|| Value::String(new_id()));
                let now = Value::String(timestamp());
                object
                    .entry("created_date")
                    .or_insert_with(|| now.clone());
                object.entry("updated_date").or_insert(now);
            }
            collection.push(record);
        }
    }

    pub async fn count(&self, entity: &str) -> usize {
        self.collections
            .read()
            .await
            .get(entity)
            .map(Vec::len)
            .unwrap_or_default()
    }

    fn not_found(entity: &str, id: &str) -> GatewayError {
        GatewayError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl EntityGateway for InMemoryGateway {
    async fn list(
        &self,
        entity: &str,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        let records = self
            .collections
            .read()
            .await
            .get(entity)
            .cloned()
            .unwrap_or_default();
        Ok(sort_and_limit(records, sort, limit))
    }

    async fn filter(
        &self,
        entity: &str,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        let records: Vec<Value> = self
            .collections
            .read()
            .await
            .get(entity)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| {
                        matcher
                            .iter()
                            .all(|(key, expected)| record.get(key) == Some(expected))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(sort_and_limit(records, sort, limit))
    }

    async fn create(&self, entity: &str, fields: Value) -> Result<Value, GatewayError> {
        let Value::Object(mut object) = fields else {
            return Err(GatewayError::InvalidPayload {
                entity: entity.to_string(),
                message: "record must be a JSON object".into(),
            });
        };
        for field in SERVER_FIELDS {
            object.remove(field);
        }
        let now = timestamp();
        object.insert("id".into(), Value::String(new_id()));
        object.insert("created_date".into(), Value::String(now.clone()));
        object.insert("updated_date".into(), Value::String(now));

        let record = Value::Object(object);
        self.collections
            .write()
            .await
            .entry(entity.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, entity: &str, id: &str, fields: Value) -> Result<Value, GatewayError> {
        let Value::Object(changes) = fields else {
            return Err(GatewayError::InvalidPayload {
                entity: entity.to_string(),
                message: "update must be a JSON object".into(),
            });
        };

        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(entity)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| Self::not_found(entity, id))?;

        if let Some(object) = record.as_object_mut() {
            for (key, value) in changes {
                if !SERVER_FIELDS.contains(&key.as_str()) {
                    object.insert(key, value);
                }
            }
            object.insert("updated_date".into(), Value::String(timestamp()));
        }
        Ok(record.clone())
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError> {
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(entity)
            .ok_or_else(|| Self::not_found(entity, id))?;
        let before = records.len();
        records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id));
        if records.len() == before {
            return Err(Self::not_found(entity, id));
        }
        Ok(())
    }

    fn gateway_name(&self) -> &str {
        "memory"
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Same naive UTC format the remote backend emits
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn sort_and_limit(mut records: Vec<Value>, sort: Option<&SortSpec>, limit: Option<usize>) -> Vec<Value> {
    if let Some(spec) = sort {
        records.sort_by(|a, b| {
            let ordering = compare_values(a.get(&spec.field), b.get(&spec.field));
            if spec.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

/// Missing/null sorts before everything; numbers numerically, strings
/// lexicographically (ISO timestamps order correctly that way)
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
