use chrono::{DateTime, Utc};
use contracts::domain::a001_lead::aggregate::Lead;
use contracts::domain::a002_contact::aggregate::Contact;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::PipelineError;
use crate::shared::gateway::{Entities, EntityGateway, SortSpec};

/// Leads and contacts as of one completed load
#[derive(Debug, Clone, Default)]
pub struct PipelineSnapshot {
    /// Newest first by creation
    pub leads: Vec<Lead>,
    pub contacts: Vec<Contact>,
    /// `None` until the first successful load
    pub loaded_at: Option<DateTime<Utc>>,
    /// Token of the load that produced this snapshot
    pub token: u64,
}

impl PipelineSnapshot {
    pub fn find_lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id_str() == Some(id))
    }

    /// Dangling or empty `contact_id` gives `None`
    pub fn contact_for(&self, lead: &Lead) -> Option<&Contact> {
        let contact_id = lead.contact_id.as_ref()?;
        self.contacts
            .iter()
            .find(|contact| contact.id.as_ref() == Some(contact_id))
    }

    /// Contact lookup by id for joins over many leads
    pub fn contact_index(&self) -> HashMap<&str, &Contact> {
        self.contacts
            .iter()
            .filter_map(|contact| contact.id_str().map(|id| (id, contact)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Applied { token: u64, leads: usize, contacts: usize },
    /// A newer load was issued while this one was in flight; its result was dropped
    Superseded { token: u64, latest: u64 },
}

/// Process-wide copy of the lead pipeline, refreshed wholesale from the gateway
pub struct PipelineStore {
    leads: Entities<Lead>,
    contacts: Entities<Contact>,
    list_limit: usize,
    latest_token: AtomicU64,
    snapshot: RwLock<Arc<PipelineSnapshot>>,
}

impl PipelineStore {
    pub fn new(gateway: Arc<dyn EntityGateway>, list_limit: usize) -> Self {
        Self {
            leads: Entities::new(gateway.clone()),
            contacts: Entities::new(gateway),
            list_limit,
            latest_token: AtomicU64::new(0),
            snapshot: RwLock::new(Arc::new(PipelineSnapshot::default())),
        }
    }

    pub fn leads(&self) -> &Entities<Lead> {
        &self.leads
    }

    pub fn contacts(&self) -> &Entities<Contact> {
        &self.contacts
    }

    pub async fn snapshot(&self) -> Arc<PipelineSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Fetch leads and contacts concurrently and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept. A result is applied only if
    /// no newer load was issued in the meantime.
    pub async fn load(&self) -> Result<LoadOutcome, PipelineError> {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        let sort = SortSpec::newest_first();

        let (leads, contacts) = tokio::try_join!(
            self.leads.list(Some(&sort), Some(self.list_limit)),
            self.contacts.list(Some(&sort), Some(self.list_limit)),
        )
        .map_err(PipelineError::Load)?;

        let mut current = self.snapshot.write().await;
        let latest = self.latest_token.load(Ordering::SeqCst);
        if token != latest {
            tracing::debug!("Dropping pipeline load #{} (latest is #{})", token, latest);
            return Ok(LoadOutcome::Superseded { token, latest });
        }

        let outcome = LoadOutcome::Applied {
            token,
            leads: leads.len(),
            contacts: contacts.len(),
        };
        *current = Arc::new(PipelineSnapshot {
            leads,
            contacts,
            loaded_at: Some(Utc::now()),
            token,
        });
        Ok(outcome)
    }

    /// `load()` with the failure logged instead of returned
    pub async fn refresh(&self) -> Option<LoadOutcome> {
        match self.load().await {
            Ok(outcome) => {
                if let LoadOutcome::Applied { leads, contacts, .. } = outcome {
                    tracing::info!("Pipeline loaded: {} leads, {} contacts", leads, contacts);
                }
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!("Pipeline refresh failed, keeping previous data: {}", e);
                None
            }
        }
    }

    pub async fn find_lead(&self, id: &str) -> Option<Lead> {
        self.snapshot().await.find_lead(id).cloned()
    }

    pub async fn contact_for(&self, lead: &Lead) -> Option<Contact> {
        self.snapshot().await.contact_for(lead).cloned()
    }
}
