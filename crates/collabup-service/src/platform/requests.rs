//! Owner decisions on collaboration requests.

use collabup_core::types::CallerIdentity;
use collabup_db::db::{DocumentStore, collections};
use serde::Serialize;
use serde_json::{Map, Value};

use super::timestamp;
use crate::auth::role::resolve_role;
use crate::error::{ServiceError, ServiceResult};
use crate::mail::{Mailer, looks_like_email, templates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ServiceError::validation(
                "status must be one of pending, accepted, rejected",
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub request_id: String,
    pub status: RequestStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateOutcome {
    pub request_id: String,
    pub status: RequestStatus,
    pub notified: bool,
}

/// ## Summary
/// Records the project owner's decision on a request and notifies the applicant by mail.
///
/// ## Errors
/// - `ValidationError` if `request_id` is empty.
/// - `NotFound` if the request does not exist.
/// - `AuthorizationError` unless the caller owns the project or is an admin.
/// - Mailer errors if the notification cannot be handed to the transport. The status
///   change is already stored at that point.
#[tracing::instrument(
    skip(store, mailer, caller, update),
    fields(uid = %caller.uid, request_id = %update.request_id, status = update.status.as_str())
)]
pub async fn update_request_status(
    store: &dyn DocumentStore,
    mailer: &dyn Mailer,
    caller: &CallerIdentity,
    update: StatusUpdate,
) -> ServiceResult<StatusUpdateOutcome> {
    let request_id = update.request_id.trim();
    if request_id.is_empty() {
        return Err(ServiceError::validation("requestId is required"));
    }

    let request = store
        .get(collections::REQUESTS, request_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("request {request_id}")))?;

    if request.str_field("projectOwnerId") != Some(caller.uid.as_str()) {
        let resolved = resolve_role(store, &caller.uid).await?;
        if !resolved.is_admin() {
            return Err(ServiceError::forbidden("caller does not own this project"));
        }
        tracing::info!("Admin updating a request on behalf of the owner");
    }

    let message = update
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let mut patch = Map::new();
    patch.insert("status".to_string(), Value::from(update.status.as_str()));
    patch.insert("updatedAt".to_string(), Value::String(timestamp()));
    patch.insert("updatedBy".to_string(), Value::String(caller.uid.clone()));
    if let Some(message) = message {
        patch.insert("responseMessage".to_string(), Value::from(message));
    }
    store
        .update(collections::REQUESTS, request_id, Value::Object(patch))
        .await?;

    let notified = match request.str_field("applicantEmail") {
        Some(email) if looks_like_email(email) => {
            let mail = templates::status_notification(
                email,
                request.str_field("projectTitle"),
                update.status.as_str(),
                message,
            )?;
            mailer.send(mail).await?;
            true
        }
        Some(_) => {
            tracing::warn!("Applicant email is malformed, skipping notification");
            false
        }
        None => false,
    };

    Ok(StatusUpdateOutcome {
        request_id: request_id.to_string(),
        status: update.status,
        notified,
    })
}
