use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d400_lead_analytics::{LeadAnalyticsRequest, LeadAnalyticsResponse};

use super::pipeline_status;
use crate::dashboards::d400_lead_analytics::service;
use crate::shared::data::context;

/// GET /api/d400/lead_analytics?window_months=6
pub async fn get_lead_analytics(
    Query(request): Query<LeadAnalyticsRequest>,
) -> Result<Json<LeadAnalyticsResponse>, StatusCode> {
    let ctx = context::get();
    tracing::info!("Lead analytics request: window {:?}", request.window_months);

    match service::get_lead_analytics(&ctx.store, request, ctx.trend_window).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Lead analytics failed: {}", e);
            Err(pipeline_status(&e))
        }
    }
}
