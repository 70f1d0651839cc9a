//! CollabUp backend - integration test support.
//!
//! Stand-ins for the external collaborators (identity provider, mail transport)
//! and a builder that assembles the full HTTP service around an in-memory store.

pub mod doubles;
pub mod fixture;

pub use collabup_app as app;
pub use collabup_core as core;
pub use collabup_db as db;
pub use collabup_service as service;
