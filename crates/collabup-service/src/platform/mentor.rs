//! Self-reported mentor activity counters.

use collabup_core::types::{CallerIdentity, Role};
use collabup_db::db::{DocumentStore, WriteMode, collections};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp;
use crate::auth::role::{require_role, resolve_role};
use crate::error::{ServiceError, ServiceResult};

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorStatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_completed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentees_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_mentored: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl MentorStatsUpdate {
    /// ## Errors
    /// Returns `ValidationError` naming the first field out of range, or when no field is set.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.sessions_completed.is_none()
            && self.mentees_count.is_none()
            && self.hours_mentored.is_none()
            && self.rating.is_none()
        {
            return Err(ServiceError::validation("no stats provided"));
        }

        for (field, value) in [
            ("sessionsCompleted", self.sessions_completed),
            ("menteesCount", self.mentees_count),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(ServiceError::validation(format!("{field} must be non-negative")));
            }
        }

        if self.hours_mentored.is_some_and(|h| !h.is_finite() || h < 0.0) {
            return Err(ServiceError::validation("hoursMentored must be non-negative"));
        }
        if self
            .rating
            .is_some_and(|r| !r.is_finite() || !(0.0..=MAX_RATING).contains(&r))
        {
            return Err(ServiceError::validation("rating must be between 0 and 5"));
        }

        Ok(())
    }
}

/// ## Summary
/// Merges the caller's counters into `mentorStats/{uid}` and returns the stored document.
///
/// ## Errors
/// - `AuthorizationError` unless the caller is a mentor or admin.
/// - `ValidationError` if the update is empty or out of range.
#[tracing::instrument(skip(store, caller), fields(uid = %caller.uid))]
pub async fn update_mentor_stats(
    store: &dyn DocumentStore,
    caller: &CallerIdentity,
    update: &MentorStatsUpdate,
) -> ServiceResult<Value> {
    let resolved = resolve_role(store, &caller.uid).await?;
    require_role(&resolved, &[Role::Mentor])?;
    update.validate()?;

    let mut patch = serde_json::to_value(update)
        .map_err(|_e| ServiceError::InvariantViolation("stats serialize to an object"))?;
    if let Value::Object(fields) = &mut patch {
        fields.insert("mentorId".to_string(), Value::String(caller.uid.clone()));
        fields.insert("updatedAt".to_string(), Value::String(timestamp()));
    }

    store
        .set(collections::MENTOR_STATS, &caller.uid, patch, WriteMode::Merge)
        .await?;

    get_mentor_stats(store, &caller.uid).await
}

/// ## Errors
/// Returns `NotFound` if the mentor has never reported stats.
#[tracing::instrument(skip(store))]
pub async fn get_mentor_stats(store: &dyn DocumentStore, uid: &str) -> ServiceResult<Value> {
    store
        .get(collections::MENTOR_STATS, uid)
        .await?
        .map(|doc| doc.into_json_with_id())
        .ok_or_else(|| ServiceError::NotFound(format!("mentor stats {uid}")))
}
