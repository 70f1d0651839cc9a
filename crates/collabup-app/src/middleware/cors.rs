//! Browser origin handling: an allow-list guard plus salvo's CORS headers.

use std::collections::HashSet;
use std::sync::Arc;

use salvo::cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors, CorsHandler};
use salvo::http::header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use salvo::http::{HeaderValue, Method, StatusCode};
use salvo::writing::Json;
use salvo::{Depot, FlowCtrl, Request, Response};

use crate::config::CorsConfig;
use crate::error::ErrorResponse;

pub const ORIGIN_DENIED_MESSAGE: &str = "Origin not allowed";

/// Rejects requests whose `Origin` is not on the allow-list.
/// Requests without an `Origin` header (server-to-server, curl) pass.
#[derive(Debug, Clone)]
pub struct OriginGuard {
    allowed: Arc<HashSet<String>>,
}

impl OriginGuard {
    #[must_use]
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: Arc::new(origins.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.origins())
    }

    #[must_use]
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        origin.is_none_or(|origin| self.allowed.contains(origin))
    }
}

#[salvo::async_trait]
impl salvo::Handler for OriginGuard {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        req: &mut Request,
        _depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let origin = req.headers().get(ORIGIN).map(|v| v.to_str().unwrap_or_default());
        if self.is_allowed(origin) {
            return;
        }

        tracing::warn!(origin = ?origin, path = %req.uri().path(), "Blocked cross-origin request");
        res.status_code(StatusCode::FORBIDDEN);
        res.render(Json(ErrorResponse::new(ORIGIN_DENIED_MESSAGE)));
        ctrl.skip_rest();
    }
}

/// ## Summary
/// CORS response headers for the allowed origins: GET, POST and OPTIONS with
/// `authorization` and `content-type` headers and credentials.
#[must_use]
pub fn cors_handler(config: &CorsConfig) -> CorsHandler {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    Cors::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::list(vec![
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list(vec![AUTHORIZATION, CONTENT_TYPE]))
        .allow_credentials(true)
        .into_handler()
}
