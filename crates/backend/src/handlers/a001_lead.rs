use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_lead::aggregate::{
    Lead, LeadCard, LeadDto, LeadFilter, MoveLeadRequest, PipelineColumn,
};

use super::pipeline_status;
use crate::domain::a001_lead::{self, LoadOutcome, TransitionOutcome};
use crate::shared::data::context;

/// GET /api/leads
pub async fn list(Query(filter): Query<LeadFilter>) -> Json<Vec<LeadCard>> {
    let ctx = context::get();
    Json(a001_lead::service::list_filtered(&ctx.store, &filter).await)
}

/// POST /api/leads
pub async fn create(Json(dto): Json<LeadDto>) -> Result<Json<Lead>, StatusCode> {
    let ctx = context::get();
    match a001_lead::service::create(&ctx.store, dto).await {
        Ok(lead) => Ok(Json(lead)),
        Err(e) => {
            tracing::error!("Failed to create lead: {}", e);
            Err(pipeline_status(&e))
        }
    }
}

/// PUT /api/leads/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<LeadDto>,
) -> Result<Json<Lead>, StatusCode> {
    let ctx = context::get();
    match a001_lead::service::update(&ctx.store, &id, dto).await {
        Ok(lead) => Ok(Json(lead)),
        Err(e) => {
            tracing::error!("Failed to update lead {}: {}", id, e);
            Err(pipeline_status(&e))
        }
    }
}

/// DELETE /api/leads/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), StatusCode> {
    let ctx = context::get();
    a001_lead::service::delete(&ctx.store, &id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete lead {}: {}", id, e);
            pipeline_status(&e)
        })
}

/// POST /api/leads/:id/move
pub async fn move_stage(
    Path(id): Path<String>,
    Json(request): Json<MoveLeadRequest>,
) -> Result<Json<TransitionOutcome>, StatusCode> {
    let ctx = context::get();
    match a001_lead::move_lead(&ctx.store, &id, request.stage, ctx.policy).await {
        Ok(TransitionOutcome::LeadNotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            tracing::error!("Failed to move lead {} to {}: {}", id, request.stage, e);
            Err(pipeline_status(&e))
        }
    }
}

/// GET /api/leads/board
pub async fn board() -> Json<Vec<PipelineColumn>> {
    let ctx = context::get();
    Json(a001_lead::service::board(&ctx.store).await)
}

/// POST /api/pipeline/reload
pub async fn reload() -> Result<Json<LoadOutcome>, StatusCode> {
    let ctx = context::get();
    match ctx.store.load().await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            tracing::error!("Pipeline reload failed: {}", e);
            Err(pipeline_status(&e))
        }
    }
}
