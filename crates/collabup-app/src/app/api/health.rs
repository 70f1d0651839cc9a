use collabup_db::db::collections;
use collabup_service::platform::timestamp;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Response, Router, handler};
use serde_json::{Value, json};

use crate::db_handler::get_store_from_depot;
use crate::error::AppResult;

/// ## Summary
/// Reports whether the document store answers. Responds 503 when it does not.
#[handler]
async fn health(depot: &mut Depot, res: &mut Response) -> AppResult<Json<Value>> {
    let store = get_store_from_depot(depot)?;

    let (status, store_status) = match store.count(collections::USERS).await {
        Ok(_) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Document store health check failed");
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            ("unhealthy", "error")
        }
    };

    Ok(Json(json!({
        "status": status,
        "store": store_status,
        "timestamp": timestamp(),
    })))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("health").get(health)
}
