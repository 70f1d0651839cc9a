//! Keyword recommendations across projects and mentor profiles.
//!
//! A free-text query is split into categorised tokens (`query`), every candidate
//! document is scored against them (`scoring`, `similarity`) and the best
//! candidates of each source are returned.

pub mod query;
pub mod scoring;
pub mod similarity;

use std::collections::BTreeMap;

use collabup_core::types::Role;
use collabup_db::db::{DocumentQuery, DocumentStore, collections};
use collabup_db::model::document::Document;
use serde::Serialize;
use serde_json::Value;

use crate::error::ServiceResult;
use crate::platform::clamp_limit;

pub use query::{CategorizedTokens, Category, parse_query};
pub use scoring::{ItemKind, score};

pub const DEFAULT_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 50;
/// Candidates at or below this score are not reported.
pub const MIN_SCORE: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub student_projects: Vec<Value>,
    pub startup_projects: Vec<Value>,
    pub mentor_profiles: Vec<Value>,
    pub research_projects: Vec<Value>,
}

impl RecommendationResponse {
    fn slot_mut(&mut self, kind: ItemKind) -> &mut Vec<Value> {
        match kind {
            ItemKind::StudentProject => &mut self.student_projects,
            ItemKind::StartupProject => &mut self.startup_projects,
            ItemKind::MentorProfile => &mut self.mentor_profiles,
            ItemKind::ResearchProject => &mut self.research_projects,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.student_projects.len()
            + self.startup_projects.len()
            + self.mentor_profiles.len()
            + self.research_projects.len()
    }
}

/// Where candidates of each kind are read from.
fn source(kind: ItemKind) -> (&'static str, DocumentQuery) {
    match kind {
        ItemKind::StudentProject => (collections::STUDENT_PROJECTS, DocumentQuery::new()),
        ItemKind::StartupProject => (collections::STARTUP_PROJECTS, DocumentQuery::new()),
        ItemKind::MentorProfile => (
            collections::USERS,
            DocumentQuery::new().where_eq("role", Role::Mentor.as_str()),
        ),
        ItemKind::ResearchProject => (collections::RESEARCH_PROJECTS, DocumentQuery::new()),
    }
}

fn scored_entry(doc: Document, similarity: f64) -> Value {
    let mut entry = doc.into_json_with_id();
    if let Value::Object(fields) = &mut entry {
        fields.insert("similarity_score".to_string(), Value::from(similarity));
    }
    entry
}

/// ## Summary
/// Scores every candidate of every source against `query` and keeps the best `top_n`
/// (default 5) of each whose score exceeds [`MIN_SCORE`].
///
/// ## Errors
/// Returns `DatabaseError` if a source cannot be read.
#[tracing::instrument(skip(store))]
pub async fn recommend(
    store: &dyn DocumentStore,
    query: &str,
    top_n: Option<usize>,
) -> ServiceResult<RecommendationResponse> {
    let tokens = parse_query(query);
    let mut response = RecommendationResponse::default();
    if tokens.is_empty() {
        tracing::debug!("Query has no usable tokens");
        return Ok(response);
    }

    let top_n = clamp_limit(top_n, DEFAULT_TOP_N, MAX_TOP_N);

    for kind in ItemKind::ALL {
        let (collection, source_query) = source(kind);
        let candidates = store.query(collection, &source_query).await?;
        let considered = candidates.len();

        let mut ranked: Vec<(f64, Document)> = candidates
            .into_iter()
            .map(|doc| (score(&tokens, &doc.data, kind), doc))
            .filter(|(similarity, _)| *similarity > MIN_SCORE)
            .collect();
        ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        ranked.truncate(top_n);

        tracing::debug!(
            source = kind.as_str(),
            considered,
            kept = ranked.len(),
            "Scored recommendation source"
        );

        *response.slot_mut(kind) = ranked
            .into_iter()
            .map(|(similarity, doc)| scored_entry(doc, similarity))
            .collect();
    }

    tracing::info!(total = response.total(), "Recommendations computed");

    Ok(response)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugReport {
    pub query: String,
    pub categorized_tokens: CategorizedTokens,
    pub sample_scores: BTreeMap<&'static str, f64>,
    pub sample_data: BTreeMap<&'static str, Value>,
}

/// ## Summary
/// Shows how `query` is tokenised and how the first candidate of each source scores.
///
/// ## Errors
/// Returns `DatabaseError` if a source cannot be read.
#[tracing::instrument(skip(store))]
pub async fn debug_query(store: &dyn DocumentStore, query: &str) -> ServiceResult<DebugReport> {
    let tokens = parse_query(query);
    let mut sample_scores = BTreeMap::new();
    let mut sample_data = BTreeMap::new();

    for kind in ItemKind::ALL {
        let (collection, source_query) = source(kind);
        let sample = store
            .query(collection, &source_query.limit(1))
            .await?
            .into_iter()
            .next();

        if let Some(doc) = sample {
            sample_scores.insert(kind.as_str(), score(&tokens, &doc.data, kind));
            sample_data.insert(collection, doc.data);
        }
    }

    Ok(DebugReport {
        query: query.to_string(),
        categorized_tokens: tokens,
        sample_scores,
        sample_data,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub count: u64,
    pub description: &'static str,
}

/// ## Summary
/// Document counts and descriptions of the collections recommendations draw from.
///
/// ## Errors
/// Returns `DatabaseError` if a count fails.
#[tracing::instrument(skip(store))]
pub async fn collections_info(
    store: &dyn DocumentStore,
) -> ServiceResult<BTreeMap<&'static str, CollectionInfo>> {
    let mut info = BTreeMap::new();
    for collection in [
        collections::STUDENT_PROJECTS,
        collections::STARTUP_PROJECTS,
        collections::USERS,
        collections::RESEARCH_PROJECTS,
    ] {
        let count = store.count(collection).await?;
        info.insert(
            collection,
            CollectionInfo {
                count,
                description: collections::describe(collection),
            },
        );
    }
    Ok(info)
}
