//! Depot injection for the shared collaborators handlers need besides the store:
//! identity verifier, mailer, URL signer and the path policy.

use std::sync::Arc;

use collabup_core::error::CoreError;
use collabup_service::auth::{IdentityVerifier, PathPolicy};
use collabup_service::mail::Mailer;
use collabup_service::storage::UrlSigner;
use salvo::async_trait;

use crate::error::AppResult;

/// Injects one shared `Arc<T>` into every request's depot.
pub struct ProviderHandler<T: ?Sized> {
    pub value: Arc<T>,
}

impl<T: ?Sized> ProviderHandler<T> {
    #[must_use]
    pub fn new(value: Arc<T>) -> Self {
        Self { value }
    }
}

#[async_trait]
impl<T> salvo::Handler for ProviderHandler<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.value));
    }
}

fn obtain<T>(depot: &salvo::Depot, missing: &'static str) -> AppResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    depot
        .obtain::<Arc<T>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation(missing).into())
}

/// ## Errors
/// Returns an error if the verifier is not found in the depot.
pub fn get_verifier_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn IdentityVerifier>> {
    obtain(depot, "Identity verifier not found in depot")
}

/// ## Errors
/// Returns an error if the mailer is not found in the depot.
pub fn get_mailer_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn Mailer>> {
    obtain(depot, "Mailer not found in depot")
}

/// ## Errors
/// Returns an error if the signer is not found in the depot.
pub fn get_signer_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn UrlSigner>> {
    obtain(depot, "URL signer not found in depot")
}

/// ## Errors
/// Returns an error if the path policy is not found in the depot.
pub fn get_policy_from_depot(depot: &salvo::Depot) -> AppResult<Arc<PathPolicy>> {
    obtain(depot, "Path policy not found in depot")
}
