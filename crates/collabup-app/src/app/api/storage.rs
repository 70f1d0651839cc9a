use collabup_core::types::StorageAction;
use collabup_service::auth::get_caller_from_depot;
use collabup_service::storage::{SignRequest, SignedUrl, default_ttl, issue_signed_url};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use super::{SIGNED_URL_READ_ROUTE, SIGNED_URL_ROUTE, parse_body};
use crate::config::get_config_from_depot;
use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;
use crate::providers::{get_policy_from_depot, get_signer_from_depot};

/// ## Summary
/// Signed URL request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    #[serde(default, alias = "filePath")]
    pub path: String,
    pub content_type: Option<String>,
}

async fn sign(req: &mut Request, depot: &Depot, action: StorageAction) -> AppResult<SignedUrl> {
    let body: SignedUrlRequest = parse_body(req).await?;

    let caller = get_caller_from_depot(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;
    let signer = get_signer_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;

    let request = SignRequest {
        object_path: body.path.trim(),
        action,
        content_type: body.content_type.as_deref(),
        ttl: default_ttl(&settings.storage),
    };

    Ok(issue_signed_url(&policy, store.as_ref(), signer.as_ref(), caller, &request).await?)
}

/// ## Summary
/// POST /signed-url - Issue a PUT URL for uploading one object.
///
/// ## Errors
/// Returns HTTP 400 if the path is missing
/// Returns HTTP 403 if the caller may not write to the path
#[handler]
async fn signed_upload_url(req: &mut Request, depot: &mut Depot) -> AppResult<Json<SignedUrl>> {
    sign(req, depot, StorageAction::Write).await.map(Json)
}

/// ## Summary
/// POST /signed-url-read - Issue a GET URL for reading one object.
///
/// ## Errors
/// Returns HTTP 400 if the path is missing
/// Returns HTTP 403 if the caller may not read the path
#[handler]
async fn signed_read_url(req: &mut Request, depot: &mut Depot) -> AppResult<Json<SignedUrl>> {
    sign(req, depot, StorageAction::Read).await.map(Json)
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(
            Router::with_path(SIGNED_URL_ROUTE)
                .hoop(AuthMiddleware)
                .post(signed_upload_url),
        )
        .push(
            Router::with_path(SIGNED_URL_READ_ROUTE)
                .hoop(AuthMiddleware)
                .post(signed_read_url),
        )
}
