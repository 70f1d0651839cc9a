use collabup_service::auth::get_caller_from_depot;
use collabup_service::platform::talent::{TalentMatch, find_talent, parse_skills};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;

/// ## Summary
/// GET /api/talent/matches?skills=a,b&limit=n - Students ranked by skill overlap.
///
/// ## Errors
/// Returns HTTP 403 unless the caller is a startup, faculty member or admin
#[handler]
async fn matches(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<TalentMatch>>> {
    let skills = parse_skills(req.query::<String>("skills").as_deref());
    let limit = req.query::<usize>("limit");

    let caller = get_caller_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    Ok(Json(find_talent(store.as_ref(), caller, &skills, limit).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("talent/matches")
        .hoop(AuthMiddleware)
        .get(matches)
}
