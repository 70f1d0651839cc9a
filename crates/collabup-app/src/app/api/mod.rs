mod health;
mod leaderboard;
mod mail;
mod mentor;
mod projects;
mod recommend;
mod requests;
mod storage;
mod talent;

use salvo::{Request, Router};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

// Re-export route constants from core
pub use collabup_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, MENTOR_ROUTE_COMPONENT, MENTOR_ROUTE_PREFIX,
    PROJECTS_ROUTE_COMPONENT, PROJECTS_ROUTE_PREFIX, SIGNED_URL_READ_ROUTE, SIGNED_URL_ROUTE,
};

/// ## Summary
/// Constructs the full route tree. Routes needing a signed-in caller carry
/// `AuthMiddleware` themselves; the rest are public.
#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(health::routes())
        .push(storage::routes())
        .push(mail::feedback_routes())
        .push(recommend::routes())
        .push(
            Router::with_path(API_ROUTE_COMPONENT)
                .push(mail::routes())
                .push(projects::routes())
                .push(talent::routes())
                .push(leaderboard::routes())
                .push(requests::routes())
                .push(mentor::routes()),
        )
}

/// ## Summary
/// Parses a JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is missing, not JSON, or does not match `T`.
pub(crate) async fn parse_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })
}
