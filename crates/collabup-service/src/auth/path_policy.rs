//! Role-based authorization for object-storage paths.
//!
//! A caller may receive a signed URL for `object_path` when:
//! 1. the path starts with one of the prefixes allowed for the caller's role,
//!    or with one of the legacy prefixes every role keeps, and
//! 2. the caller is an admin, or the path contains the caller's uid anywhere.
//!
//! The uid check is a plain substring test, not a path-segment match, so
//! `projects/student-projects/other123_u1/data` passes for uid `u1`.

use std::collections::HashMap;

use collabup_core::types::Role;

/// Placeholder replaced by the caller's uid in prefix templates.
pub const UID_PLACEHOLDER: &str = "{uid}";

/// Prefixes kept for objects uploaded before role-scoped paths existed.
pub const LEGACY_PREFIXES: &[&str] = &[
    "profile-pictures/{uid}/",
    "id-documents/{uid}/",
    "enrollments/{uid}/",
    "project-files/",
];

/// The prefix templates one role may write to or read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    pub role: Role,
    pub prefixes: Vec<String>,
}

impl PrefixRule {
    #[must_use]
    pub fn new(role: Role, prefixes: &[&str]) -> Self {
        Self {
            role,
            prefixes: prefixes.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Why a path was allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDecision {
    Allowed,
    /// Empty uid or empty path.
    InvalidInput,
    /// The path is outside every prefix the role may use.
    NoMatchingPrefix,
    /// The path matched a prefix but does not mention the caller's uid.
    NotOwner,
}

impl PathDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::InvalidInput => "invalid_input",
            Self::NoMatchingPrefix => "no_matching_prefix",
            Self::NotOwner => "not_owner",
        }
    }
}

/// Immutable prefix table, built once at start-up and shared by the URL handlers.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    rules: HashMap<Role, Vec<String>>,
    legacy: Vec<String>,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::new(
            vec![
                PrefixRule::new(
                    Role::Student,
                    &["users/students/{uid}/", "projects/student-projects/"],
                ),
                PrefixRule::new(
                    Role::Faculty,
                    &["users/faculty/{uid}/", "projects/research-projects/"],
                ),
                PrefixRule::new(Role::Mentor, &["users/mentors/{uid}/"]),
                PrefixRule::new(
                    Role::Startup,
                    &["users/startups/{uid}/", "projects/startup-projects/"],
                ),
                PrefixRule::new(Role::Admin, &["users/admins/{uid}/", "projects/", "users/"]),
            ],
            LEGACY_PREFIXES.iter().map(|p| (*p).to_string()).collect(),
        )
    }
}

impl PathPolicy {
    /// Rules for the same role are concatenated in order.
    #[must_use]
    pub fn new(rules: Vec<PrefixRule>, legacy: Vec<String>) -> Self {
        let mut table: HashMap<Role, Vec<String>> = HashMap::new();
        for rule in rules {
            table.entry(rule.role).or_default().extend(rule.prefixes);
        }
        Self {
            rules: table,
            legacy,
        }
    }

    /// ## Summary
    /// Returns the concrete prefixes for a caller: role-specific ones first, then legacy ones.
    /// An unknown role (`None`) only gets the legacy prefixes.
    #[must_use]
    pub fn candidate_prefixes(&self, role: Option<Role>, uid: &str) -> Vec<String> {
        let role_specific = role
            .and_then(|role| self.rules.get(&role))
            .map(Vec::as_slice)
            .unwrap_or_default();

        role_specific
            .iter()
            .chain(self.legacy.iter())
            .map(|template| template.replace(UID_PLACEHOLDER, uid))
            .collect()
    }

    /// ## Summary
    /// Decides whether `uid` acting as `role` may access `object_path`.
    #[must_use]
    pub fn decide(&self, role: Option<Role>, uid: &str, object_path: &str) -> PathDecision {
        if uid.is_empty() || object_path.is_empty() {
            return PathDecision::InvalidInput;
        }

        let matches_prefix = self
            .candidate_prefixes(role, uid)
            .iter()
            .any(|prefix| object_path.starts_with(prefix.as_str()));
        if !matches_prefix {
            return PathDecision::NoMatchingPrefix;
        }

        let is_admin = role.is_some_and(Role::is_admin);
        if !is_admin && !object_path.contains(uid) {
            return PathDecision::NotOwner;
        }

        PathDecision::Allowed
    }

    #[must_use]
    pub fn is_allowed(&self, role: Option<Role>, uid: &str, object_path: &str) -> bool {
        self.decide(role, uid, object_path).is_allowed()
    }
}
