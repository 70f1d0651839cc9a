use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Coarse-grained permission class stored on a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Mentor,
    Startup,
    Admin,
}

impl Role {
    pub const ALL: [Self; 5] = [
        Self::Student,
        Self::Faculty,
        Self::Mentor,
        Self::Startup,
        Self::Admin,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Mentor => "mentor",
            Self::Startup => "startup",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

/// Outcome of looking up a caller's role in the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRole {
    /// The user record carries one of the known roles.
    Assigned(Role),
    /// The user record carries a role string outside the known set.
    Unrecognized(String),
    /// No user record, or no role on it. Treated as a student.
    Defaulted,
}

impl ResolvedRole {
    pub const FALLBACK: Role = Role::Student;

    /// The role used for authorization decisions, if any.
    #[must_use]
    pub fn effective(&self) -> Option<Role> {
        match self {
            Self::Assigned(role) => Some(*role),
            Self::Defaulted => Some(Self::FALLBACK),
            Self::Unrecognized(_) => None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.effective().is_some_and(Role::is_admin)
    }
}

/// Verified caller, valid for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    pub uid: String,
    pub email: Option<String>,
}

impl CallerIdentity {
    #[must_use]
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// The single action a signed storage URL grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageAction {
    Read,
    Write,
}

impl StorageAction {
    #[must_use]
    pub const fn http_method(self) -> &'static str {
        match self {
            Self::Read => "GET",
            Self::Write => "PUT",
        }
    }
}

impl std::fmt::Display for StorageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}
