//! Role lookup against the `users` collection.

use collabup_core::types::{ResolvedRole, Role};
use collabup_db::db::{DocumentStore, collections};
use collabup_db::model::document::Document;

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Interprets the `role` field of a user document.
///
/// A missing document, a missing field or a non-string value all fall back to
/// `ResolvedRole::Defaulted`.
#[must_use]
pub fn role_from_document(user: Option<&Document>) -> ResolvedRole {
    let Some(raw) = user.and_then(|doc| doc.str_field("role")) else {
        return ResolvedRole::Defaulted;
    };

    match raw.parse::<Role>() {
        Ok(role) => ResolvedRole::Assigned(role),
        Err(_) => ResolvedRole::Unrecognized(raw.to_string()),
    }
}

/// ## Summary
/// Reads `users/{uid}` and resolves the caller's role.
///
/// ## Errors
/// Returns `DatabaseError` if the store cannot be read.
#[tracing::instrument(skip(store))]
pub async fn resolve_role(store: &dyn DocumentStore, uid: &str) -> ServiceResult<ResolvedRole> {
    let user = store.get(collections::USERS, uid).await?;
    let resolved = role_from_document(user.as_ref());

    match &resolved {
        ResolvedRole::Unrecognized(raw) => {
            tracing::warn!(role = %raw, "User record carries an unknown role");
        }
        ResolvedRole::Defaulted => {
            tracing::debug!("No role on record, falling back to {}", ResolvedRole::FALLBACK);
        }
        ResolvedRole::Assigned(role) => tracing::trace!(%role, "Role resolved"),
    }

    Ok(resolved)
}

/// ## Summary
/// Checks the caller's role against the roles a handler accepts. Admins always pass.
///
/// ## Errors
/// Returns `AuthorizationError` when the effective role is missing or not accepted.
pub fn require_role(resolved: &ResolvedRole, allowed: &[Role]) -> ServiceResult<Role> {
    match resolved.effective() {
        Some(role) if role.is_admin() || allowed.contains(&role) => Ok(role),
        Some(role) => Err(ServiceError::forbidden(format!(
            "role {role} is not permitted here"
        ))),
        None => Err(ServiceError::forbidden("caller has no recognised role")),
    }
}
