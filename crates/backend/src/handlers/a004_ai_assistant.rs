use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a004_ai_assistant::aggregate::{
    AssistantMessage, AssistantReply, ConversationId, SendMessageRequest,
};

use crate::shared::data::context;

/// POST /api/assistant/messages
pub async fn send_message(
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<AssistantReply>, StatusCode> {
    match context::get().assistant.send_message(request).await {
        Ok(reply) => {
            if reply.degraded {
                tracing::warn!("Assistant reply degraded for {}", reply.conversation_id.value());
            }
            Ok(Json(reply))
        }
        Err(e) => {
            tracing::warn!("Assistant request rejected: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// GET /api/assistant/conversations/:id
pub async fn history(Path(id): Path<uuid::Uuid>) -> Json<Vec<AssistantMessage>> {
    Json(context::get().assistant.history(ConversationId(id)).await)
}
