use contracts::domain::a002_contact::aggregate::Contact;

use crate::domain::a001_lead::pipeline_store::PipelineStore;

/// Contacts of the current snapshot, sorted by display name
pub async fn list_all(store: &PipelineStore) -> Vec<Contact> {
    let snapshot = store.snapshot().await;
    let mut contacts = snapshot.contacts.clone();
    contacts.sort_by_key(|c| c.full_name().to_lowercase());
    contacts
}

pub async fn get_by_id(store: &PipelineStore, id: &str) -> Option<Contact> {
    store
        .snapshot()
        .await
        .contacts
        .iter()
        .find(|c| c.id_str() == Some(id))
        .cloned()
}
