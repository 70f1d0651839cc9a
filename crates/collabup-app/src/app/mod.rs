pub mod api;

use std::sync::Arc;

use collabup_db::db::DocumentStore;
use collabup_service::auth::{IdentityVerifier, PathPolicy};
use collabup_service::mail::Mailer;
use collabup_service::storage::UrlSigner;
use salvo::{Router, Service};

use crate::config::{ConfigHandler, Settings};
use crate::db_handler::DocumentStoreHandler;
use crate::middleware::cors::{OriginGuard, cors_handler};
use crate::providers::ProviderHandler;

/// The shared collaborators every request may reach through the depot.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub mailer: Arc<dyn Mailer>,
    pub signer: Arc<dyn UrlSigner>,
    pub policy: Arc<PathPolicy>,
}

/// ## Summary
/// Builds the router with the settings and collaborators injected ahead of every route.
#[must_use]
pub fn router(settings: Arc<Settings>, collaborators: Collaborators) -> Router {
    Router::new()
        .hoop(DocumentStoreHandler {
            store: collaborators.store,
        })
        .hoop(ConfigHandler { settings })
        .hoop(ProviderHandler::new(collaborators.verifier))
        .hoop(ProviderHandler::new(collaborators.mailer))
        .hoop(ProviderHandler::new(collaborators.signer))
        .hoop(ProviderHandler::new(collaborators.policy))
        .push(api::routes())
}

/// ## Summary
/// Wraps the router in a service with the origin allow-list and CORS headers.
/// Service-level hoops also run for preflight requests that match no route.
#[must_use]
pub fn service(settings: Arc<Settings>, collaborators: Collaborators) -> Service {
    let guard = OriginGuard::from_config(&settings.cors);
    let cors = cors_handler(&settings.cors);

    Service::new(router(settings, collaborators))
        .hoop(guard)
        .hoop(cors)
}
