//! Document-backed platform operations behind the authenticated API.

pub mod leaderboard;
pub mod mentor;
pub mod projects;
pub mod requests;
pub mod talent;

use chrono::{SecondsFormat, Utc};

/// ## Summary
/// Resolves a caller-supplied page size. Missing or zero means `default`, anything
/// above `max` is capped.
#[must_use]
pub fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    match requested {
        None | Some(0) => default,
        Some(n) => n.min(max),
    }
}

/// RFC 3339 timestamp in UTC with millisecond precision, as stored on documents.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
