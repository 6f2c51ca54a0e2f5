use contracts::enums::{LeadStage, LeadStageValue};
use serde::Serialize;

use super::error::PipelineError;
use super::pipeline_store::PipelineStore;
use crate::shared::config::TransitionPolicySetting;

/// Which stage moves the board accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any stage to any stage
    #[default]
    Permissive,
    /// Only moves listed by [`TransitionPolicy::allows`]
    Strict,
}

impl From<TransitionPolicySetting> for TransitionPolicy {
    fn from(setting: TransitionPolicySetting) -> Self {
        match setting {
            TransitionPolicySetting::Permissive => TransitionPolicy::Permissive,
            TransitionPolicySetting::Strict => TransitionPolicy::Strict,
        }
    }
}

impl TransitionPolicy {
    /// Strict table:
    /// - an open stage moves one step forward or back, or drops to Closed Lost
    /// - Negotiation may close as won
    /// - Closed Lost may be reopened into Prospecting
    /// - Closed Won is final
    ///
    /// A lead whose stored stage is not a known one may move anywhere.
    pub fn allows(&self, from: &LeadStageValue, to: LeadStage) -> bool {
        let from = match (self, from.known()) {
            (TransitionPolicy::Permissive, _) | (_, None) => return true,
            (TransitionPolicy::Strict, Some(from)) => from,
        };

        use LeadStage::*;
        match from {
            ClosedWon => false,
            ClosedLost => to == Prospecting,
            Negotiation if to == ClosedWon => true,
            _ if to == ClosedLost => true,
            _ if to.is_terminal() => false,
            _ => from.position().abs_diff(to.position()) == 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Moved { from: String, to: LeadStage },
    /// Dropped on its own column; nothing was sent
    Unchanged { stage: LeadStage },
    /// Id not in the current snapshot; nothing was sent
    LeadNotFound { lead_id: String },
}

/// Persist a lead's new stage and reload the pipeline.
///
/// The lead is looked up in the current snapshot; the record is sent back
/// unchanged apart from `stage`. The new stage becomes visible only after the
/// reload.
pub async fn move_lead(
    store: &PipelineStore,
    lead_id: &str,
    target: LeadStage,
    policy: TransitionPolicy,
) -> Result<TransitionOutcome, PipelineError> {
    let Some(mut lead) = store.find_lead(lead_id).await else {
        tracing::warn!("Move to {} ignored: lead {} not found", target, lead_id);
        return Ok(TransitionOutcome::LeadNotFound {
            lead_id: lead_id.to_string(),
        });
    };

    if lead.stage.is(target) {
        return Ok(TransitionOutcome::Unchanged { stage: target });
    }

    if !policy.allows(&lead.stage, target) {
        return Err(PipelineError::TransitionNotAllowed {
            from: lead.stage.as_str().to_string(),
            to: target,
        });
    }

    let from = lead.stage.as_str().to_string();
    lead.stage = target.into();
    store
        .leads()
        .update(lead_id, &lead)
        .await
        .map_err(PipelineError::Mutation)?;

    tracing::info!("Lead {} moved: {} -> {}", lead_id, from, target);
    store.refresh().await;

    Ok(TransitionOutcome::Moved { from, to: target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::gateway::testing::FlakyGateway;
    use serde_json::json;
    use std::sync::Arc;
    use LeadStage::*;

    async fn store_with_lead(stage: &str) -> (Arc<FlakyGateway>, PipelineStore) {
        let gateway = Arc::new(FlakyGateway::new());
        gateway
            .inner
            .seed(
                "Lead",
                vec![json!({
                    "id": "l1",
                    "title": "Mall facade",
                    "value": 120000,
                    "stage": stage,
                    "tags": ["retail"]
                })],
            )
            .await;
        let store = PipelineStore::new(gateway.clone(), 500);
        store.load().await.unwrap();
        (gateway, store)
    }

    #[tokio::test]
    async fn test_move_persists_and_reloads() {
        let (gateway, store) = store_with_lead("Qualified").await;

        let outcome = move_lead(&store, "l1", Proposal, TransitionPolicy::Permissive)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TransitionOutcome::Moved { from: "Qualified".into(), to: Proposal }
        );

        let lead = store.find_lead("l1").await.unwrap();
        assert!(lead.stage.is(Proposal));
        assert_eq!(lead.value, 120000.0);
        assert_eq!(lead.tags, vec!["retail".to_string()]);
        assert_eq!(gateway.writes(), 1);
    }

    #[tokio::test]
    async fn test_move_twice_is_same_as_once() {
        let (gateway, store) = store_with_lead("Prospecting").await;

        move_lead(&store, "l1", ClosedWon, TransitionPolicy::Permissive)
            .await
            .unwrap();
        let second = move_lead(&store, "l1", ClosedWon, TransitionPolicy::Permissive)
            .await
            .unwrap();

        assert_eq!(second, TransitionOutcome::Unchanged { stage: ClosedWon });
        assert_eq!(gateway.writes(), 1);
        assert!(store.find_lead("l1").await.unwrap().is_won());
    }

    #[tokio::test]
    async fn test_unknown_lead_makes_no_gateway_call() {
        let (gateway, store) = store_with_lead("Qualified").await;
        let reads_before = gateway.reads();

        let outcome = move_lead(&store, "nope", Proposal, TransitionPolicy::Permissive)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TransitionOutcome::LeadNotFound { lead_id: "nope".into() }
        );
        assert_eq!(gateway.writes(), 0);
        assert_eq!(gateway.reads(), reads_before);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_reload() {
        let (gateway, store) = store_with_lead("Qualified").await;
        let token_before = store.snapshot().await.token;
        gateway.set_failing(true);

        let result = move_lead(&store, "l1", Proposal, TransitionPolicy::Permissive).await;
        assert!(matches!(result, Err(PipelineError::Mutation(_))));
        assert_eq!(store.snapshot().await.token, token_before);
        assert!(store.find_lead("l1").await.unwrap().stage.is(Qualified));
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_skipping_stages() {
        let (gateway, store) = store_with_lead("Prospecting").await;

        let result = move_lead(&store, "l1", Negotiation, TransitionPolicy::Strict).await;
        assert!(matches!(
            result,
            Err(PipelineError::TransitionNotAllowed { to: Negotiation, .. })
        ));
        assert_eq!(gateway.writes(), 0);
    }

    #[test]
    fn test_strict_table() {
        let strict = TransitionPolicy::Strict;
        let at = |stage: LeadStage| LeadStageValue::from(stage);

        assert!(strict.allows(&at(Prospecting), Qualified));
        assert!(strict.allows(&at(Proposal), Qualified));
        assert!(!strict.allows(&at(Prospecting), Proposal));
        assert!(strict.allows(&at(Qualified), ClosedLost));
        assert!(!strict.allows(&at(Qualified), ClosedWon));
        assert!(strict.allows(&at(Negotiation), ClosedWon));
        assert!(strict.allows(&at(ClosedLost), Prospecting));
        assert!(!strict.allows(&at(ClosedLost), Qualified));
        for stage in LeadStage::ALL {
            assert!(!strict.allows(&at(ClosedWon), stage));
            assert!(TransitionPolicy::Permissive.allows(&at(ClosedWon), stage));
        }
        assert!(strict.allows(&LeadStageValue::Unrecognized("Lead".into()), Proposal));
    }

    #[tokio::test]
    async fn test_loosely_typed_leads_stay_in_pipeline() {
        use crate::dashboards::d400_lead_analytics::aggregation::conversion_rate;

        let gateway = Arc::new(FlakyGateway::new());
        gateway
            .inner
            .seed(
                "Lead",
                vec![
                    json!({"id": "a", "title": "Won", "stage": "Closed Won", "value": 90000}),
                    json!({"id": "b", "title": "Fractional", "stage": "Prospecting",
                           "probability": 12.5}),
                    json!({"id": "c", "title": "Blank priority", "stage": "Proposal",
                           "priority": ""}),
                ],
            )
            .await;
        let store = PipelineStore::new(gateway.clone(), 500);
        store.load().await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.leads.len(), 3);
        let rate = conversion_rate(&snapshot.leads);
        assert!((rate - 100.0 / 3.0).abs() < 1e-9);

        let outcome = move_lead(&store, "b", Qualified, TransitionPolicy::Permissive)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TransitionOutcome::Moved { from: "Prospecting".into(), to: Qualified }
        );
        assert_eq!(store.find_lead("b").await.unwrap().probability, Some(13));
    }
}
