use crate::shared::gateway::GatewayError;
use contracts::enums::LeadStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// List/filter rejected; the previous snapshot stays in place
    #[error("failed to load pipeline: {0}")]
    Load(#[source] GatewayError),

    /// Create/update/delete rejected; no reload follows
    #[error("failed to save lead: {0}")]
    Mutation(#[source] GatewayError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("lead {0} not found")]
    LeadNotFound(String),

    #[error("moving a lead from {from} to {to} is not allowed")]
    TransitionNotAllowed { from: String, to: LeadStage },
}

impl PipelineError {
    pub fn is_not_found(&self) -> bool {
        match self {
            PipelineError::Load(e) | PipelineError::Mutation(e) => e.is_not_found(),
            PipelineError::LeadNotFound(_) => true,
            _ => false,
        }
    }
}
