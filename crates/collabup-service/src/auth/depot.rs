//! Depot helpers for the authenticated caller.

use collabup_core::types::CallerIdentity;

use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const CALLER_IDENTITY: &str = "__caller_identity";
}

/// Get the verified caller from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if the authentication middleware did not run or rejected the request.
pub fn get_caller_from_depot(depot: &salvo::Depot) -> ServiceResult<&CallerIdentity> {
    depot
        .get::<CallerIdentity>(depot_keys::CALLER_IDENTITY)
        .map_err(|_e| ServiceError::NotAuthenticated)
}

/// Store the verified caller for downstream handlers.
pub fn set_caller_in_depot(depot: &mut salvo::Depot, caller: CallerIdentity) {
    depot.insert(depot_keys::CALLER_IDENTITY, caller);
}
