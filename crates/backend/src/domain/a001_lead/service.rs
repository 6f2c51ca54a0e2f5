use contracts::domain::a001_lead::aggregate::{
    Lead, LeadCard, LeadDto, LeadFilter, PipelineColumn, SearchResults,
};
use contracts::domain::a002_contact::aggregate::Contact;
use contracts::enums::LeadStage;
use std::collections::HashMap;

use super::error::PipelineError;
use super::pipeline_store::{PipelineSnapshot, PipelineStore};

pub async fn create(store: &PipelineStore, dto: LeadDto) -> Result<Lead, PipelineError> {
    let lead = Lead::new_for_insert(&dto);
    lead.validate().map_err(PipelineError::Validation)?;

    let created = store
        .leads()
        .create(&lead)
        .await
        .map_err(PipelineError::Mutation)?;

    tracing::info!(
        "Lead created: {} ({})",
        created.title,
        created.id_str().unwrap_or("-")
    );
    store.refresh().await;
    Ok(created)
}

pub async fn update(store: &PipelineStore, id: &str, dto: LeadDto) -> Result<Lead, PipelineError> {
    let mut lead = store
        .find_lead(id)
        .await
        .ok_or_else(|| PipelineError::LeadNotFound(id.to_string()))?;

    lead.update(&dto);
    lead.validate().map_err(PipelineError::Validation)?;

    let updated = store
        .leads()
        .update(id, &lead)
        .await
        .map_err(PipelineError::Mutation)?;

    store.refresh().await;
    Ok(updated)
}

pub async fn delete(store: &PipelineStore, id: &str) -> Result<(), PipelineError> {
    store
        .leads()
        .delete(id)
        .await
        .map_err(PipelineError::Mutation)?;

    tracing::info!("Lead deleted: {}", id);
    store.refresh().await;
    Ok(())
}

/// Lead list page: search over title and contact name, optional stage and
/// priority filters
pub async fn list_filtered(store: &PipelineStore, filter: &LeadFilter) -> Vec<LeadCard> {
    let snapshot = store.snapshot().await;
    let contacts = snapshot.contact_index();
    let term = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    snapshot
        .leads
        .iter()
        .filter(|lead| filter.stage.map_or(true, |stage| lead.stage.is(stage)))
        .filter(|lead| {
            filter
                .priority
                .map_or(true, |p| lead.priority.as_ref().is_some_and(|v| v.is(p)))
        })
        .map(|lead| to_card(lead, &contacts))
        .filter(|card| match &term {
            None => true,
            Some(term) => {
                card.lead.title.to_lowercase().contains(term)
                    || card
                        .contact_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(term))
            }
        })
        .collect()
}

/// Kanban columns, one per canonical stage; leads with an unknown stage
/// appear in no column
pub async fn board(store: &PipelineStore) -> Vec<PipelineColumn> {
    build_board(store.snapshot().await.as_ref())
}

pub fn build_board(snapshot: &PipelineSnapshot) -> Vec<PipelineColumn> {
    let contacts = snapshot.contact_index();
    LeadStage::ALL
        .into_iter()
        .map(|stage| {
            let cards: Vec<LeadCard> = snapshot
                .leads
                .iter()
                .filter(|lead| lead.stage.is(stage))
                .map(|lead| to_card(lead, &contacts))
                .collect();
            PipelineColumn {
                stage,
                count: cards.len(),
                value: cards.iter().map(|card| card.lead.value).sum(),
                cards,
            }
        })
        .collect()
}

/// Search page: leads by title or description, contacts by name, email or
/// company. A blank query matches nothing.
pub async fn search(store: &PipelineStore, query: &str) -> SearchResults {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return SearchResults::default();
    }
    let snapshot = store.snapshot().await;
    let matches = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&term));

    let leads = snapshot
        .leads
        .iter()
        .filter(|lead| matches(Some(lead.title.as_str())) || matches(lead.description.as_deref()))
        .cloned()
        .collect();

    let contacts = snapshot
        .contacts
        .iter()
        .filter(|c| {
            matches(Some(c.first_name.as_str()))
                || matches(Some(c.last_name.as_str()))
                || matches(c.email.as_deref())
                || matches(c.company.as_deref())
        })
        .cloned()
        .collect();

    SearchResults {
        query: query.trim().to_string(),
        leads,
        contacts,
    }
}

fn to_card(lead: &Lead, contacts: &HashMap<&str, &Contact>) -> LeadCard {
    let contact = lead
        .contact_id
        .as_ref()
        .and_then(|id| contacts.get(id.0.as_str()));
    LeadCard {
        lead: lead.clone(),
        contact_name: contact.map(|c| c.full_name()).filter(|n| !n.is_empty()),
        company: contact.and_then(|c| c.company.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::gateway::testing::FlakyGateway;
    use contracts::enums::LeadPriority;
    use serde_json::json;
    use std::sync::Arc;

    async fn seeded_store() -> (Arc<FlakyGateway>, PipelineStore) {
        let gateway = Arc::new(FlakyGateway::new());
        gateway
            .inner
            .seed(
                "Lead",
                vec![
                    json!({"id": "l1", "title": "Showroom branding", "value": 300000,
                           "stage": "Proposal", "priority": "High", "contact_id": "c1"}),
                    json!({"id": "l2", "title": "Menu cards", "value": 20000,
                           "stage": "Prospecting", "priority": "Low",
                           "description": "Cafe rebrand"}),
                    json!({"id": "l3", "title": "Legacy import", "value": 5000,
                           "stage": "Lead"}),
                ],
            )
            .await;
        gateway
            .inner
            .seed(
                "Contact",
                vec![json!({"id": "c1", "first_name": "Meera", "last_name": "Shah",
                            "company": "Shah Motors", "email": "meera@shahmotors.in"})],
            )
            .await;
        let store = PipelineStore::new(gateway.clone(), 500);
        store.load().await.unwrap();
        (gateway, store)
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_reloads() {
        let (_, store) = seeded_store().await;

        let created = create(
            &store,
            LeadDto {
                title: "Hoarding campaign".into(),
                value: Some(80000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(created.stage.is(LeadStage::Prospecting));
        let id = created.id_str().unwrap();
        let stored = store.find_lead(id).await.unwrap();
        assert_eq!(stored.priority, Some(LeadPriority::Medium.into()));
        assert_eq!(store.snapshot().await.leads.len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_lead_is_rejected_before_gateway() {
        let (gateway, store) = seeded_store().await;
        let result = create(
            &store,
            LeadDto {
                title: "  ".into(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert_eq!(gateway.writes(), 0);
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_reload() {
        let (gateway, store) = seeded_store().await;
        let reads_before = gateway.reads();
        gateway.set_failing(true);

        let result = create(
            &store,
            LeadDto {
                title: "Offline".into(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(PipelineError::Mutation(_))));
        assert_eq!(gateway.reads(), reads_before);

        let result = delete(&store, "l1").await;
        assert!(matches!(result, Err(PipelineError::Mutation(_))));
        assert_eq!(store.snapshot().await.leads.len(), 3);
    }

    #[tokio::test]
    async fn test_update_then_list_shows_new_stage() {
        let (_, store) = seeded_store().await;

        update(
            &store,
            "l2",
            LeadDto {
                title: "Menu cards".into(),
                value: Some(20000.0),
                stage: Some(LeadStage::Negotiation),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let lead = store.find_lead("l2").await.unwrap();
        assert!(lead.stage.is(LeadStage::Negotiation));

        let missing = update(&store, "zzz", LeadDto::default()).await;
        assert!(matches!(missing, Err(PipelineError::LeadNotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_value_and_contact() {
        let (_, store) = seeded_store().await;

        update(
            &store,
            "l1",
            LeadDto {
                title: "Showroom branding phase 2".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let lead = store.find_lead("l1").await.unwrap();
        assert_eq!(lead.title, "Showroom branding phase 2");
        assert_eq!(lead.value, 300000.0);
        assert!(lead.stage.is(LeadStage::Proposal));
        assert_eq!(lead.contact_id.as_ref().map(|c| c.0.as_str()), Some("c1"));
    }

    #[tokio::test]
    async fn test_delete_removes_after_reload() {
        let (_, store) = seeded_store().await;
        delete(&store, "l3").await.unwrap();
        assert!(store.find_lead("l3").await.is_none());
    }

    #[tokio::test]
    async fn test_list_filtered_matches_contact_name() {
        let (_, store) = seeded_store().await;

        let by_contact = list_filtered(
            &store,
            &LeadFilter {
                search: Some("meera".into()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(by_contact.len(), 1);
        assert_eq!(by_contact[0].company.as_deref(), Some("Shah Motors"));

        let by_stage = list_filtered(
            &store,
            &LeadFilter {
                stage: Some(LeadStage::Prospecting),
                priority: Some(LeadPriority::Low),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(by_stage.len(), 1);
        assert_eq!(by_stage[0].lead.title, "Menu cards");

        assert_eq!(list_filtered(&store, &LeadFilter::default()).await.len(), 3);
    }

    #[tokio::test]
    async fn test_board_has_six_columns_and_skips_unknown_stage() {
        let (_, store) = seeded_store().await;
        let columns = board(&store).await;

        assert_eq!(columns.len(), 6);
        assert_eq!(columns[2].stage, LeadStage::Proposal);
        assert_eq!(columns[2].count, 1);
        assert_eq!(columns[2].value, 300000.0);
        assert_eq!(columns[2].cards[0].contact_name.as_deref(), Some("Meera Shah"));
        let placed: usize = columns.iter().map(|c| c.count).sum();
        assert_eq!(placed, 2);
    }

    #[tokio::test]
    async fn test_search_across_leads_and_contacts() {
        let (_, store) = seeded_store().await;

        let results = search(&store, " cafe ").await;
        assert_eq!(results.leads.len(), 1);
        assert!(results.contacts.is_empty());

        let results = search(&store, "shahmotors").await;
        assert_eq!(results.contacts.len(), 1);

        let results = search(&store, "   ").await;
        assert!(results.leads.is_empty() && results.contacts.is_empty());
    }
}
