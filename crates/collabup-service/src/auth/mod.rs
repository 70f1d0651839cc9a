//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: bearer-token extraction and identity verification (JWKS, single user)
//! - `depot`: helpers for storing and reading the verified caller in the Salvo depot
//! - `path_policy`: role-based authorization of object-storage paths
//! - `role`: role lookup in the user directory and role gates for handlers

pub mod authenticate;
pub mod depot;
pub mod path_policy;
pub mod role;

pub use authenticate::{
    IdentityVerifier, JwksVerifier, SingleUserVerifier, bearer_token, build_identity_verifier,
};
pub use depot::{get_caller_from_depot, set_caller_in_depot};
pub use path_policy::{PathDecision, PathPolicy, PrefixRule};
pub use role::{require_role, resolve_role, role_from_document};
