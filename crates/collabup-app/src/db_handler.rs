use std::sync::Arc;

use collabup_core::error::CoreError;
use collabup_db::db::DocumentStore;
use salvo::async_trait;

use crate::error::AppResult;

pub struct DocumentStoreHandler {
    pub store: Arc<dyn DocumentStore>,
}

#[async_trait]
impl salvo::Handler for DocumentStoreHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Retrieves the document store from the depot.
///
/// ## Errors
/// Returns an error if the document store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn DocumentStore>> {
    depot
        .obtain::<Arc<dyn DocumentStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Document store not found in depot").into())
}
