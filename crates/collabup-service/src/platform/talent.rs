//! Skill-overlap matching of student profiles for startups and faculty.

use collabup_core::types::{CallerIdentity, Role};
use collabup_db::db::{DocumentQuery, DocumentStore, collections};
use collabup_db::model::document::Document;
use serde::Serialize;
use serde_json::{Map, Value};

use super::clamp_limit;
use crate::auth::role::{require_role, resolve_role};
use crate::error::ServiceResult;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// Keys the match itself writes; stored profile fields by these names are dropped.
const MATCH_KEYS: [&str; 3] = ["id", "matchScore", "matchedSkills"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentMatch {
    pub id: String,
    pub match_score: usize,
    pub matched_skills: Vec<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// ## Summary
/// Splits a comma-separated skill list, lowercasing and dropping blanks and repeats.
#[must_use]
pub fn parse_skills(raw: Option<&str>) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in raw.unwrap_or_default().split(',') {
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() && !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}

/// Profile skills may be stored as an array of strings or a comma-separated string.
fn profile_skills(profile: &Document) -> Vec<String> {
    match profile.field("skills") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(list)) => parse_skills(Some(list)),
        _ => Vec::new(),
    }
}

fn score_profile(profile: Document, wanted: &[String]) -> TalentMatch {
    let have = profile_skills(&profile);
    let matched_skills: Vec<String> = wanted
        .iter()
        .filter(|skill| have.contains(skill))
        .cloned()
        .collect();

    let mut profile_body = match profile.data {
        Value::Object(body) => body,
        _ => Map::new(),
    };
    for key in MATCH_KEYS {
        profile_body.remove(key);
    }

    TalentMatch {
        id: profile.id,
        match_score: matched_skills.len(),
        matched_skills,
        profile: profile_body,
    }
}

/// ## Summary
/// Ranks student profiles by how many of the requested skills they list.
///
/// With no requested skills every student is returned with a score of zero.
///
/// ## Errors
/// Returns `AuthorizationError` unless the caller is a startup, faculty member or admin.
#[tracing::instrument(skip(store, caller), fields(uid = %caller.uid))]
pub async fn find_talent(
    store: &dyn DocumentStore,
    caller: &CallerIdentity,
    skills: &[String],
    limit: Option<usize>,
) -> ServiceResult<Vec<TalentMatch>> {
    let resolved = resolve_role(store, &caller.uid).await?;
    require_role(&resolved, &[Role::Startup, Role::Faculty])?;

    let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
    let students = store
        .query(
            collections::USERS,
            &DocumentQuery::new().where_eq("role", Role::Student.as_str()),
        )
        .await?;

    let mut matches: Vec<TalentMatch> = students
        .into_iter()
        .map(|profile| score_profile(profile, skills))
        .filter(|candidate| skills.is_empty() || candidate.match_score > 0)
        .collect();
    // Stable sort keeps store order (by id) for equal scores.
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matches.truncate(limit);

    tracing::debug!(count = matches.len(), "Talent matches found");

    Ok(matches)
}
