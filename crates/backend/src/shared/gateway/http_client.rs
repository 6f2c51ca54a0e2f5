use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

use super::types::{EntityGateway, GatewayError, SortSpec};
use crate::shared::config::GatewaySettings;

const BODY_PREVIEW_CHARS: usize = 500;

/// REST client of the hosted entity backend
///
/// Collections live under `{base_url}/api/apps/{app_id}/entities/{Entity}`.
pub struct HttpEntityGateway {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl HttpEntityGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        if settings.base_url.trim().is_empty() || settings.app_id.trim().is_empty() {
            return Err(GatewayError::Unavailable(
                "gateway.base_url and gateway.app_id are required in http mode".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            app_id: settings.app_id.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn collection_url(&self, entity: &str) -> String {
        format!("{}/api/apps/{}/entities/{}", self.base_url, self.app_id, entity)
    }

    fn record_url(&self, entity: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(entity), id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Accept", "application/json");
        if self.api_key.is_empty() {
            request
        } else {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn send(
        &self,
        entity: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, GatewayError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read {} response body ({}): {}", entity, status, e);
            GatewayError::Transport(e)
        })?;

        if !status.is_success() {
            tracing::error!(
                "{} request failed with status {}: {}",
                entity,
                status,
                preview(&body)
            );
            return Err(GatewayError::Status {
                entity: entity.to_string(),
                status: status.as_u16(),
                body: preview(&body),
            });
        }
        Ok(body)
    }

    async fn send_json(
        &self,
        entity: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let body = self.send(entity, request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", entity, e);
            GatewayError::InvalidPayload {
                entity: entity.to_string(),
                message: format!("{}. Response: {}", e, preview(&body)),
            }
        })
    }

    async fn send_list(
        &self,
        entity: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<Value>, GatewayError> {
        match self.send_json(entity, request).await? {
            Value::Array(records) => Ok(records),
            other => Err(GatewayError::InvalidPayload {
                entity: entity.to_string(),
                message: format!("expected a JSON array, got {}", type_name(&other)),
            }),
        }
    }
}

#[async_trait]
impl EntityGateway for HttpEntityGateway {
    async fn list(
        &self,
        entity: &str,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        let query = query_params(None, sort, limit);
        tracing::debug!("GET {} {:?}", self.collection_url(entity), query);
        let request = self.client.get(self.collection_url(entity)).query(&query);
        self.send_list(entity, request).await
    }

    async fn filter(
        &self,
        entity: &str,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        let query = query_params(Some(matcher), sort, limit);
        tracing::debug!("GET {} {:?}", self.collection_url(entity), query);
        let request = self.client.get(self.collection_url(entity)).query(&query);
        self.send_list(entity, request).await
    }

    async fn create(&self, entity: &str, fields: Value) -> Result<Value, GatewayError> {
        let request = self.client.post(self.collection_url(entity)).json(&fields);
        self.send_json(entity, request).await
    }

    async fn update(&self, entity: &str, id: &str, fields: Value) -> Result<Value, GatewayError> {
        let request = self.client.put(self.record_url(entity, id)).json(&fields);
        match self.send_json(entity, request).await {
            Err(GatewayError::Status { status: 404, .. }) => Err(GatewayError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
            other => other,
        }
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError> {
        let request = self.client.delete(self.record_url(entity, id));
        match self.send(entity, request).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Status { status: 404, .. }) => Err(GatewayError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    fn gateway_name(&self) -> &str {
        "http"
    }
}

fn query_params(
    matcher: Option<&Map<String, Value>>,
    sort: Option<&SortSpec>,
    limit: Option<usize>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(matcher) = matcher {
        params.push(("q", Value::Object(matcher.clone()).to_string()));
    }
    if let Some(sort) = sort {
        params.push(("sort", sort.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

fn preview(body: &str) -> String {
    let head: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if head.len() < body.len() {
        format!("{}...", head)
    } else {
        head
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
