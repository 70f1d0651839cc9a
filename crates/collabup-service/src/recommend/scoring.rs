//! Weighted relevance scores for the four recommendation sources.

use serde_json::Value;

use super::query::{Category, CategorizedTokens};
use super::similarity::fuzzy_similarity;

const CATEGORY_BONUS: f64 = 1.2;
const MULTI_TOKEN_BONUS: f64 = 1.1;

/// A scored field: alternative names tried in order, and its weight.
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    names: &'static [&'static str],
    weight: f64,
}

impl FieldSpec {
    const fn new(names: &'static [&'static str], weight: f64) -> Self {
        Self { names, weight }
    }
}

const STUDENT_PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(&["title"], 3.0),
    FieldSpec::new(&["description"], 1.5),
    FieldSpec::new(&["domain"], 2.5),
    FieldSpec::new(&["level"], 1.0),
];

const STARTUP_PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(&["title"], 3.0),
    FieldSpec::new(&["startupName", "company"], 2.0),
    FieldSpec::new(&["description"], 1.5),
    FieldSpec::new(&["domain"], 2.5),
    FieldSpec::new(&["location"], 1.5),
    FieldSpec::new(&["founderName"], 1.0),
];

const MENTOR_PROFILE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(&["name", "fullName"], 2.0),
    FieldSpec::new(&["bio"], 1.5),
    FieldSpec::new(&["currentCompany"], 2.0),
    FieldSpec::new(&["designation"], 1.5),
    FieldSpec::new(&["experience", "yearsOfExperience"], 1.0),
];

const RESEARCH_PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(&["title"], 3.0),
    FieldSpec::new(&["description"], 1.5),
    FieldSpec::new(&["domain"], 2.5),
    FieldSpec::new(&["location"], 1.0),
    FieldSpec::new(&["level"], 1.0),
    FieldSpec::new(&["facultyName"], 2.0),
    FieldSpec::new(&["instituteName"], 2.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    StudentProject,
    StartupProject,
    MentorProfile,
    ResearchProject,
}

impl ItemKind {
    pub const ALL: [Self; 4] = [
        Self::StudentProject,
        Self::StartupProject,
        Self::MentorProfile,
        Self::ResearchProject,
    ];

    /// Key under which results of this kind are reported.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudentProject => "student_projects",
            Self::StartupProject => "startup_projects",
            Self::MentorProfile => "mentor_profiles",
            Self::ResearchProject => "research_projects",
        }
    }

    /// Scalar fields of this kind, and the list field whose entries are scored one by one.
    const fn fields(self) -> (&'static [FieldSpec], FieldSpec) {
        match self {
            Self::StudentProject => (
                STUDENT_PROJECT_FIELDS,
                FieldSpec::new(&["skills", "technologies"], 2.0),
            ),
            Self::StartupProject => (STARTUP_PROJECT_FIELDS, FieldSpec::new(&["skills"], 2.0)),
            Self::MentorProfile => (
                MENTOR_PROFILE_FIELDS,
                FieldSpec::new(&["expertise", "expertiseAreas"], 3.0),
            ),
            Self::ResearchProject => (RESEARCH_PROJECT_FIELDS, FieldSpec::new(&["skills"], 2.0)),
        }
    }

    const fn category_bonus(self, category: Category) -> f64 {
        let boosted = matches!(
            (category, self),
            (Category::Skills, Self::StudentProject | Self::MentorProfile)
                | (Category::Domains, Self::StudentProject | Self::StartupProject)
                | (Category::Companies, Self::MentorProfile)
                | (Category::Institutes, Self::ResearchProject)
                | (Category::Locations, Self::StartupProject)
        );
        if boosted { CATEGORY_BONUS } else { 1.0 }
    }
}

/// The first of `names` present on the item.
fn first_present<'a>(item: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| item.get(*name))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Weighted text fields of an item. List fields may be arrays or comma-separated strings.
fn weighted_texts(item: &Value, kind: ItemKind) -> Vec<(String, f64)> {
    let (scalars, list) = kind.fields();

    let mut texts: Vec<(String, f64)> = scalars
        .iter()
        .filter_map(|field| {
            first_present(item, field.names)
                .and_then(as_text)
                .map(|text| (text, field.weight))
        })
        .collect();

    match first_present(item, list.names) {
        Some(Value::Array(entries)) => {
            texts.extend(entries.iter().filter_map(as_text).map(|t| (t, list.weight)));
        }
        Some(Value::String(entries)) => texts.extend(
            entries
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| (t.to_string(), list.weight)),
        ),
        _ => {}
    }

    texts
}

/// ## Summary
/// Sums, over all query tokens, the best weighted similarity against any field of the
/// item, boosting tokens whose category suits the item kind. Queries with more than one
/// token get a further bonus when anything matched.
#[must_use]
pub fn score(tokens: &CategorizedTokens, item: &Value, kind: ItemKind) -> f64 {
    let texts = weighted_texts(item, kind);

    let total: f64 = tokens
        .tokens()
        .map(|(category, token)| {
            let best = texts
                .iter()
                .map(|(text, weight)| fuzzy_similarity(token, text) * weight)
                .fold(0.0, f64::max);
            best * kind.category_bonus(category)
        })
        .sum();

    if tokens.total() > 1 && total > 0.0 {
        total * MULTI_TOKEN_BONUS
    } else {
        total
    }
}
