use axum::{extract::Query, Json};
use contracts::domain::a001_lead::aggregate::SearchResults;
use serde::Deserialize;

use crate::domain::a001_lead;
use crate::shared::data::context;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search?q=
pub async fn search(Query(query): Query<SearchQuery>) -> Json<SearchResults> {
    Json(a001_lead::service::search(&context::get().store, &query.q).await)
}
