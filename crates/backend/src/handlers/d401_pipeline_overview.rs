use axum::Json;
use contracts::dashboards::d401_pipeline_overview::PipelineOverviewResponse;

use crate::dashboards::d401_pipeline_overview::service;
use crate::shared::data::context;

/// GET /api/d401/pipeline_overview
pub async fn get_pipeline_overview() -> Json<PipelineOverviewResponse> {
    Json(service::get_pipeline_overview(&context::get().store).await)
}
