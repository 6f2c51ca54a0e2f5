pub mod openai_provider;
pub mod types;

pub use openai_provider::OpenAiProvider;
pub use types::*;

use crate::shared::config::AssistantSettings;
use std::sync::Arc;

/// OpenAI provider when a key is configured, otherwise the disabled one
pub fn provider_from_settings(settings: &AssistantSettings) -> Arc<dyn LlmProvider> {
    if settings.api_key.trim().is_empty() {
        tracing::warn!("assistant.api_key is empty; assistant replies will degrade");
        Arc::new(DisabledProvider)
    } else {
        tracing::info!(
            "Assistant uses model {} at {}",
            settings.model,
            settings.api_endpoint
        );
        Arc::new(OpenAiProvider::from_settings(settings))
    }
}
