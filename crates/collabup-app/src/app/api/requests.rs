use collabup_service::auth::get_caller_from_depot;
use collabup_service::platform::requests::{
    RequestStatus, StatusUpdate, StatusUpdateOutcome, update_request_status,
};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use super::parse_body;
use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;
use crate::providers::get_mailer_from_depot;

/// ## Summary
/// Request status update payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub status: String,
    pub message: Option<String>,
}

/// ## Summary
/// POST /api/requests/update-status - The project owner accepts or rejects a request.
///
/// ## Side Effects
/// Notifies the applicant by mail when the request carries an `applicantEmail`.
///
/// ## Errors
/// Returns HTTP 400 for an unknown status or missing request id
/// Returns HTTP 403 unless the caller owns the project or is an admin
/// Returns HTTP 404 if the request does not exist
#[handler]
async fn update_status(req: &mut Request, depot: &mut Depot) -> AppResult<Json<StatusUpdateOutcome>> {
    let body: UpdateStatusRequest = parse_body(req).await?;
    let status: RequestStatus = body.status.trim().parse()?;

    let caller = get_caller_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;
    let mailer = get_mailer_from_depot(depot)?;

    let update = StatusUpdate {
        request_id: body.request_id,
        status,
        message: body.message,
    };

    Ok(Json(
        update_request_status(store.as_ref(), mailer.as_ref(), caller, update).await?,
    ))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("requests/update-status")
        .hoop(AuthMiddleware)
        .post(update_status)
}
