use salvo::{Depot, Writer};

use crate::error::AppError;
use crate::providers::get_verifier_from_depot;
use collabup_service::auth::{bearer_token, set_caller_in_depot};

/// ## Summary
/// Authentication middleware that verifies the bearer token and stores the caller in the depot.
/// Use this as a hoop on routes that require a signed-in caller.
///
/// ## Side Effects
/// Inserts the verified `CallerIdentity` into the depot for downstream handlers to access.
///
/// ## Errors
/// Responds 401 `{"error": "Unauthorized"}` when the header is missing or the token is rejected,
/// and 500 when the identity provider cannot be reached.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            return;
        }

        let verifier = match get_verifier_from_depot(depot) {
            Ok(v) => v,
            Err(e) => {
                e.write(req, depot, res).await;
                ctrl.skip_rest();
                return;
            }
        };

        let verified = match bearer_token(req) {
            Ok(token) => verifier.verify(token).await,
            Err(e) => Err(e),
        };

        match verified {
            Ok(caller) => {
                tracing::debug!(uid = %caller.uid, "Caller authenticated");
                set_caller_in_depot(depot, caller);
            }
            Err(e) => {
                AppError::from(e).write(req, depot, res).await;
                ctrl.skip_rest();
            }
        }
    }
}
