pub mod a001_lead;
pub mod a002_contact;
pub mod a003_notification;
pub mod a004_ai_assistant;
pub mod d400_lead_analytics;
pub mod d401_pipeline_overview;
pub mod search;

use axum::http::StatusCode;

use crate::domain::a001_lead::PipelineError;
use crate::shared::gateway::GatewayError;

/// HTTP status for a pipeline failure
pub fn pipeline_status(error: &PipelineError) -> StatusCode {
    match error {
        _ if error.is_not_found() => StatusCode::NOT_FOUND,
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::TransitionNotAllowed { .. } => StatusCode::CONFLICT,
        PipelineError::Load(_) | PipelineError::Mutation(_) => StatusCode::BAD_GATEWAY,
        PipelineError::LeadNotFound(_) => StatusCode::NOT_FOUND,
    }
}

pub fn gateway_status(error: &GatewayError) -> StatusCode {
    if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::LeadStage;

    #[test]
    fn test_pipeline_status_mapping() {
        assert_eq!(
            pipeline_status(&PipelineError::Validation("title".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            pipeline_status(&PipelineError::LeadNotFound("l1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            pipeline_status(&PipelineError::TransitionNotAllowed {
                from: "Closed Won".into(),
                to: LeadStage::Prospecting,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            pipeline_status(&PipelineError::Mutation(GatewayError::Unavailable("down".into()))),
            StatusCode::BAD_GATEWAY
        );
    }
}
