use contracts::domain::a003_notification::aggregate::Notification;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::domain::a001_lead::{PipelineStore, TransitionPolicy};
use crate::domain::a004_ai_assistant::service::AssistantService;
use crate::shared::config::{Config, GatewayMode, GatewaySettings};
use crate::shared::gateway::{Entities, EntityGateway, HttpEntityGateway, InMemoryGateway};
use crate::shared::llm::provider_from_settings;

static APP_CONTEXT: OnceCell<AppContext> = OnceCell::new();

/// Everything the handlers share for the lifetime of the process
pub struct AppContext {
    pub store: Arc<PipelineStore>,
    pub notifications: Entities<Notification>,
    pub assistant: Arc<AssistantService>,
    pub policy: TransitionPolicy,
    pub trend_window: u32,
}

impl AppContext {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gateway = build_gateway(&config.gateway)?;
        Ok(Self::with_gateway(config, gateway))
    }

    pub fn with_gateway(config: &Config, gateway: Arc<dyn EntityGateway>) -> Self {
        Self {
            store: Arc::new(PipelineStore::new(
                gateway.clone(),
                config.pipeline.list_limit,
            )),
            notifications: Entities::new(gateway.clone()),
            assistant: Arc::new(AssistantService::new(
                provider_from_settings(&config.assistant),
                config.assistant.history_limit,
                config.assistant.max_conversations,
            )),
            policy: config.pipeline.transition_policy.into(),
            trend_window: config.pipeline.trend_window_months,
        }
    }
}

pub fn build_gateway(settings: &GatewaySettings) -> anyhow::Result<Arc<dyn EntityGateway>> {
    let gateway: Arc<dyn EntityGateway> = match settings.mode {
        GatewayMode::Memory => Arc::new(InMemoryGateway::new()),
        GatewayMode::Http => Arc::new(HttpEntityGateway::new(settings)?),
    };
    tracing::info!("Entity gateway: {}", gateway.gateway_name());
    Ok(gateway)
}

pub fn initialize(config: &Config) -> anyhow::Result<()> {
    let context = AppContext::from_config(config)?;
    APP_CONTEXT
        .set(context)
        .map_err(|_| anyhow::anyhow!("Application context already initialized"))
}

pub fn get() -> &'static AppContext {
    APP_CONTEXT
        .get()
        .expect("Application context has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::parse_config;

    #[tokio::test]
    async fn test_context_from_default_config() {
        let config = parse_config("").unwrap();
        let context = AppContext::from_config(&config).unwrap();
        assert!(context.store.snapshot().await.leads.is_empty());
        assert_eq!(context.policy, TransitionPolicy::Permissive);
        assert_eq!(context.trend_window, 6);
    }

    #[test]
    fn test_http_mode_requires_base_url() {
        let config = parse_config("[gateway]\nmode = \"http\"").unwrap();
        assert!(AppContext::from_config(&config).is_err());
    }
}
