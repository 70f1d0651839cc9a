use collabup_service::platform::leaderboard::faculty_leaderboard;
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde_json::Value;

use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;

/// ## Summary
/// GET /api/faculty/leaderboard?limit=n - Faculty ordered by points, highest first.
#[handler]
async fn leaderboard(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Value>>> {
    let limit = req.query::<usize>("limit");
    let store = get_store_from_depot(depot)?;

    Ok(Json(faculty_leaderboard(store.as_ref(), limit).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("faculty/leaderboard").get(leaderboard)
}
