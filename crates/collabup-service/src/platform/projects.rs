use collabup_core::types::{CallerIdentity, Role};
use collabup_db::db::{DocumentStore, collections};
use serde_json::Value;

use super::timestamp;
use crate::auth::role::{require_role, resolve_role};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Research,
    Startup,
    Student,
}

impl ProjectKind {
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Research => collections::RESEARCH_PROJECTS,
            Self::Startup => collections::STARTUP_PROJECTS,
            Self::Student => collections::STUDENT_PROJECTS,
        }
    }

    /// The role that may create this kind of project, besides admins.
    #[must_use]
    pub const fn owner_role(self) -> Role {
        match self {
            Self::Research => Role::Faculty,
            Self::Startup => Role::Startup,
            Self::Student => Role::Student,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Startup => "startup",
            Self::Student => "student",
        }
    }
}

impl std::str::FromStr for ProjectKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "research" => Ok(Self::Research),
            "startup" => Ok(Self::Startup),
            "student" => Ok(Self::Student),
            other => Err(ServiceError::NotFound(format!("project kind {other}"))),
        }
    }
}

fn required_text<'a>(body: &'a serde_json::Map<String, Value>, field: &str) -> ServiceResult<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ServiceError::validation(format!("{field} is required")))
}

/// ## Summary
/// Creates a project owned by the caller and returns its id.
///
/// Any extra fields in `body` are kept. Ownership and status fields are always
/// set by the server.
///
/// ## Errors
/// - `AuthorizationError` if the caller's role may not create this kind of project.
/// - `ValidationError` if the body is not an object or lacks `title` or `description`.
#[tracing::instrument(skip(store, caller, body), fields(uid = %caller.uid, kind = kind.as_str()))]
pub async fn create_project(
    store: &dyn DocumentStore,
    caller: &CallerIdentity,
    kind: ProjectKind,
    body: Value,
) -> ServiceResult<String> {
    let resolved = resolve_role(store, &caller.uid).await?;
    require_role(&resolved, &[kind.owner_role()])?;

    let Value::Object(mut project) = body else {
        return Err(ServiceError::validation("body must be a JSON object"));
    };
    let title = required_text(&project, "title")?.to_string();
    let description = required_text(&project, "description")?.to_string();

    project.insert("title".to_string(), Value::String(title));
    project.insert("description".to_string(), Value::String(description));
    project.insert("ownerId".to_string(), Value::String(caller.uid.clone()));
    project.insert(
        "ownerEmail".to_string(),
        caller.email.clone().map_or(Value::Null, Value::String),
    );
    project.insert("status".to_string(), Value::String("open".to_string()));
    project.insert("createdAt".to_string(), Value::String(timestamp()));

    let created = store.create(kind.collection(), Value::Object(project)).await?;

    tracing::info!(id = %created.id, "Project created");

    Ok(created.id)
}
