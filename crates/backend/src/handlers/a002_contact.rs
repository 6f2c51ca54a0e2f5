use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a002_contact::aggregate::Contact;

use crate::domain::a002_contact;
use crate::shared::data::context;

/// GET /api/contacts
pub async fn list_all() -> Json<Vec<Contact>> {
    Json(a002_contact::service::list_all(&context::get().store).await)
}

/// GET /api/contacts/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Contact>, StatusCode> {
    match a002_contact::service::get_by_id(&context::get().store, &id).await {
        Some(contact) => Ok(Json(contact)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
