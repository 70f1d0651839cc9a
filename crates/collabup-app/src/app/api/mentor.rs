use collabup_service::auth::get_caller_from_depot;
use collabup_service::error::ServiceError;
use collabup_service::platform::mentor::{MentorStatsUpdate, get_mentor_stats, update_mentor_stats};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde_json::Value;

use super::{MENTOR_ROUTE_COMPONENT, parse_body};
use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;

/// ## Summary
/// POST /api/mentor/stats - Merge the caller's mentoring counters.
///
/// ## Errors
/// Returns HTTP 400 if no counter is given or one is out of range
/// Returns HTTP 403 unless the caller is a mentor or admin
#[handler]
async fn update_stats(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let update: MentorStatsUpdate = parse_body(req).await?;

    let caller = get_caller_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    Ok(Json(update_mentor_stats(store.as_ref(), caller, &update).await?))
}

/// ## Summary
/// GET /api/mentor/stats/{uid} - Public mentoring counters of one mentor.
///
/// ## Errors
/// Returns HTTP 404 if the mentor has no stats
#[handler]
async fn stats(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let uid = req
        .param::<String>("uid")
        .ok_or_else(|| ServiceError::NotFound("mentor uid".to_string()))?;
    let store = get_store_from_depot(depot)?;

    Ok(Json(get_mentor_stats(store.as_ref(), &uid).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(MENTOR_ROUTE_COMPONENT)
        .push(
            Router::with_path("stats")
                .hoop(AuthMiddleware)
                .post(update_stats),
        )
        .push(Router::with_path("stats/{uid}").get(stats))
}
