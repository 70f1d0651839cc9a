use collabup_core::types::Role;
use collabup_db::db::{Direction, DocumentQuery, DocumentStore, collections};
use serde_json::Value;

use super::clamp_limit;
use crate::error::ServiceResult;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// ## Summary
/// Faculty profiles ordered by `points`, highest first. Profiles without points sort last
/// and are reported with zero points.
///
/// ## Errors
/// Returns `DatabaseError` if the store query fails.
#[tracing::instrument(skip(store))]
pub async fn faculty_leaderboard(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> ServiceResult<Vec<Value>> {
    let query = DocumentQuery::new()
        .where_eq("role", Role::Faculty.as_str())
        .order_by("points", Direction::Descending)
        .limit(clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT));

    let entries = store
        .query(collections::USERS, &query)
        .await?
        .into_iter()
        .map(|doc| {
            let mut entry = doc.into_json_with_id();
            if let Value::Object(fields) = &mut entry {
                fields.entry("points").or_insert(Value::from(0));
            }
            entry
        })
        .collect();

    Ok(entries)
}
