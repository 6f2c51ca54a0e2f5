use contracts::domain::a004_ai_assistant::aggregate::{
    AssistantMessage, AssistantReply, AssistantRole, ConversationId, SendMessageRequest,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::shared::llm::types::{ChatMessage, LlmProvider};

/// Reply used whenever the model call fails
pub const FALLBACK_REPLY: &str = "I apologize, but I'm experiencing connectivity issues with my core systems. Please try your request again in a moment.";

const PERSONA_PROMPT: &str = "\
You are BSI Bot, the assistant of the Brand Street Hub CRM used by Brand Street Integrated Consultancy.

You know the CRM's records: contacts, leads and the sales pipeline \
(Prospecting, Qualified, Proposal, Negotiation, Closed Won, Closed Lost), \
marketing campaigns, employees, vendors and purchase orders, budgets, design projects and assets.
The business units are Business East, Business West, Business North, Business South, \
Lead Generation, Designing and Finance.

Answer concisely and professionally. Prefer concrete figures and actionable recommendations. \
Amounts are in Indian rupees.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("message must not be empty")]
    EmptyMessage,
}

#[derive(Default)]
struct Conversation {
    last_active: u64,
    turns: Vec<AssistantMessage>,
}

#[derive(Default)]
struct Conversations {
    tick: u64,
    by_id: HashMap<ConversationId, Conversation>,
}

impl Conversations {
    /// Append turns, keep the last `history_limit` of them and evict the
    /// least recently active conversations beyond `max_conversations`
    fn record(
        &mut self,
        id: ConversationId,
        turns: [AssistantMessage; 2],
        history_limit: usize,
        max_conversations: usize,
    ) {
        self.tick += 1;
        let conversation = self.by_id.entry(id).or_default();
        conversation.last_active = self.tick;
        conversation.turns.extend(turns);
        let excess = conversation.turns.len().saturating_sub(history_limit);
        conversation.turns.drain(..excess);

        while self.by_id.len() > max_conversations.max(1) {
            let Some(oldest) = self
                .by_id
                .iter()
                .min_by_key(|(_, c)| c.last_active)
                .map(|(id, _)| *id)
            else {
                break;
            };
            self.by_id.remove(&oldest);
            tracing::debug!("Assistant conversation {} evicted", oldest.value());
        }
    }
}

/// Chat with the CRM assistant; conversations live in memory
pub struct AssistantService {
    provider: Arc<dyn LlmProvider>,
    history_limit: usize,
    max_conversations: usize,
    conversations: RwLock<Conversations>,
}

impl AssistantService {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        history_limit: usize,
        max_conversations: usize,
    ) -> Self {
        Self {
            provider,
            history_limit,
            max_conversations,
            conversations: RwLock::new(Conversations::default()),
        }
    }

    /// Send a user message and get the assistant's reply.
    ///
    /// Model failures never surface as errors: the reply degrades to
    /// [`FALLBACK_REPLY`] and the conversation can continue.
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<AssistantReply, AssistantError> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        let conversation_id = request.conversation_id.unwrap_or_else(ConversationId::new_v4);

        let history = self.history(conversation_id).await;
        let messages = self.build_prompt(&history, content);

        let (reply, degraded) = match self.provider.chat_completion(messages).await {
            Ok(response) => {
                tracing::debug!(
                    "Assistant reply from {} ({:?} tokens)",
                    response.model,
                    response.tokens_used
                );
                (response.content, false)
            }
            Err(e) => {
                tracing::error!(
                    "Assistant call to {} failed: {}",
                    self.provider.provider_name(),
                    e
                );
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        let reply = AssistantMessage::assistant(reply);
        self.conversations.write().await.record(
            conversation_id,
            [AssistantMessage::user(content), reply.clone()],
            self.history_limit,
            self.max_conversations,
        );

        Ok(AssistantReply {
            conversation_id,
            message: reply,
            degraded,
        })
    }

    pub async fn history(&self, conversation_id: ConversationId) -> Vec<AssistantMessage> {
        self.conversations
            .read()
            .await
            .by_id
            .get(&conversation_id)
            .map(|c| c.turns.clone())
            .unwrap_or_default()
    }

    /// Persona, the last `history_limit` turns, then the new message
    fn build_prompt(&self, history: &[AssistantMessage], content: &str) -> Vec<ChatMessage> {
        let skip = history.len().saturating_sub(self.history_limit);
        let mut messages = Vec::with_capacity(history.len() - skip + 2);
        messages.push(ChatMessage::system(PERSONA_PROMPT));
        messages.extend(history.iter().skip(skip).map(|msg| match msg.role {
            AssistantRole::User => ChatMessage::user(msg.content.clone()),
            AssistantRole::Assistant => ChatMessage::assistant(msg.content.clone()),
        }));
        messages.push(ChatMessage::user(content));
        messages
    }
}
