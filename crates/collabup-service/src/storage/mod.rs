//! Signed-URL issuance for direct-to-storage uploads and reads.

pub mod signer;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collabup_core::types::{CallerIdentity, StorageAction};
use collabup_db::db::DocumentStore;
use serde::Serialize;

use crate::auth::path_policy::PathPolicy;
use crate::auth::role::resolve_role;
use crate::error::{ServiceError, ServiceResult};

pub use signer::{V4Signer, default_ttl};

/// Message returned to callers whose path was denied. The reason is only logged.
pub const PATH_DENIED_MESSAGE: &str = "Not authorized for this path";

/// One object, one action, one lifetime.
#[derive(Debug, Clone)]
pub struct SignRequest<'a> {
    pub object_path: &'a str,
    pub action: StorageAction,
    pub content_type: Option<&'a str>,
    pub ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub url: String,
    pub method: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// ## Errors
    /// Returns an error if the request cannot be signed.
    async fn sign(&self, request: &SignRequest<'_>) -> ServiceResult<SignedUrl>;
}

/// ## Summary
/// Authorizes the caller for the requested path and, if allowed, returns a signed URL
/// scoped to that single object and action.
///
/// ## Errors
/// - `ValidationError` if the path is empty.
/// - `AuthorizationError` with [`PATH_DENIED_MESSAGE`] if the path is outside the caller's reach.
/// - `DatabaseError` if the caller's role cannot be looked up, or signer errors.
#[tracing::instrument(
    skip(policy, store, signer, caller, request),
    fields(uid = %caller.uid, path = %request.object_path, action = %request.action)
)]
pub async fn issue_signed_url(
    policy: &PathPolicy,
    store: &dyn DocumentStore,
    signer: &dyn UrlSigner,
    caller: &CallerIdentity,
    request: &SignRequest<'_>,
) -> ServiceResult<SignedUrl> {
    if request.object_path.trim().is_empty() {
        return Err(ServiceError::validation("path is required"));
    }

    let resolved = resolve_role(store, &caller.uid).await?;
    let decision = policy.decide(resolved.effective(), &caller.uid, request.object_path);
    if !decision.is_allowed() {
        tracing::warn!(
            role = ?resolved,
            reason = decision.as_str(),
            "Signed URL request denied"
        );
        return Err(ServiceError::forbidden(PATH_DENIED_MESSAGE));
    }

    // Reads carry no body, so a content type would only break the signature.
    let scoped = SignRequest {
        content_type: match request.action {
            StorageAction::Write => request.content_type,
            StorageAction::Read => None,
        },
        ..request.clone()
    };

    let signed = signer.sign(&scoped).await?;

    tracing::info!(expires_at = %signed.expires_at, "Signed URL issued");

    Ok(signed)
}
