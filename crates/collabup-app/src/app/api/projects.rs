use collabup_service::auth::get_caller_from_depot;
use collabup_service::error::ServiceError;
use collabup_service::platform::projects::{ProjectKind, create_project};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde_json::{Value, json};

use super::{PROJECTS_ROUTE_COMPONENT, parse_body};
use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;

/// ## Summary
/// POST /api/projects/{kind} - Create a research, startup or student project
/// owned by the caller.
///
/// ## Errors
/// Returns HTTP 400 if `title` or `description` is missing
/// Returns HTTP 403 if the caller's role may not create this kind of project
/// Returns HTTP 404 for an unknown project kind
#[handler]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<Json<Value>> {
    let kind: ProjectKind = req
        .param::<String>("kind")
        .ok_or_else(|| ServiceError::NotFound("project kind".to_string()))?
        .parse()?;
    let body: Value = parse_body(req).await?;

    let caller = get_caller_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let id = create_project(store.as_ref(), caller, kind, body).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(json!({ "id": id })))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PROJECTS_ROUTE_COMPONENT).push(
        Router::with_path("{kind}")
            .hoop(AuthMiddleware)
            .post(create),
    )
}
