use std::collections::BTreeMap;

use collabup_service::error::ServiceError;
use collabup_service::recommend::{
    CollectionInfo, DebugReport, RecommendationResponse, collections_info, debug_query, recommend,
};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use super::parse_body;
use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;

/// ## Summary
/// Recommendation search payload
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    pub top_n: Option<usize>,
}

/// ## Summary
/// POST /recommend - Best matching projects and mentors for a free-text query.
#[handler]
async fn recommend_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<RecommendationResponse>> {
    let body: RecommendRequest = parse_body(req).await?;
    let store = get_store_from_depot(depot)?;

    Ok(Json(recommend(store.as_ref(), &body.query, body.top_n).await?))
}

/// ## Summary
/// GET /debug-query?query= - How a query is tokenised and how the first candidate
/// of each source scores.
///
/// ## Errors
/// Returns HTTP 400 if `query` is missing
#[handler]
async fn debug_query_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<DebugReport>> {
    let query = req
        .query::<String>("query")
        .ok_or_else(|| ServiceError::validation("query is required"))?;
    let store = get_store_from_depot(depot)?;

    Ok(Json(debug_query(store.as_ref(), &query).await?))
}

/// ## Summary
/// GET /collections-info - Document counts of the searchable collections.
#[handler]
async fn collections_info_handler(
    depot: &mut Depot,
) -> AppResult<Json<BTreeMap<&'static str, CollectionInfo>>> {
    let store = get_store_from_depot(depot)?;

    Ok(Json(collections_info(store.as_ref()).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(Router::with_path("recommend").post(recommend_handler))
        .push(Router::with_path("debug-query").get(debug_query_handler))
        .push(Router::with_path("collections-info").get(collections_info_handler))
}
