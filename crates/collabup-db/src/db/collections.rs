//! Collection names shared by every document-store adapter.

pub const USERS: &str = "users";
pub const STUDENT_PROJECTS: &str = "studentProjects";
pub const STARTUP_PROJECTS: &str = "startupProjects";
pub const RESEARCH_PROJECTS: &str = "researchProjects";
pub const REQUESTS: &str = "requests";
pub const MENTOR_STATS: &str = "mentorStats";

/// ## Summary
/// Human readable description of a collection, used by the collections info endpoint.
#[must_use]
pub fn describe(collection: &str) -> &'static str {
    match collection {
        STUDENT_PROJECTS => "Student-created projects looking for collaborators",
        STARTUP_PROJECTS => "Startup projects and opportunities",
        USERS => "User profiles (including mentors)",
        RESEARCH_PROJECTS => "Academic faculty and research projects",
        REQUESTS => "Collaboration requests awaiting a decision",
        MENTOR_STATS => "Per-mentor activity counters",
        _ => "Unknown collection",
    }
}
