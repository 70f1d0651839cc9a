use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use collabup_core::config::{IdentityConfig, IdentityMethod};
use collabup_core::types::CallerIdentity;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ServiceError, ServiceResult};

/// Verifies bearer tokens issued by the external identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// ## Errors
    /// `InvalidToken` when the token is rejected, `UpstreamError` or `HttpError`
    /// when the provider cannot be reached.
    async fn verify(&self, token: &str) -> ServiceResult<CallerIdentity>;
}

/// ## Summary
/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// ## Errors
/// Returns `NotAuthenticated` if the header is missing, not a bearer header, or empty.
pub fn bearer_token(req: &salvo::Request) -> ServiceResult<&str> {
    let header = req
        .headers()
        .get(salvo::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServiceError::NotAuthenticated)?;

    parse_bearer(header).ok_or(ServiceError::NotAuthenticated)
}

fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
}

struct CachedJwks {
    keys: JwkSet,
    expires_at: Instant,
}

/// Verifies RS256 ID tokens against the provider's published JWK set.
///
/// The key set is cached for `identity.jwks_ttl_secs` and refetched early when a
/// token names a key id the cached set lacks.
pub struct JwksVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    ttl: Duration,
    cache: RwLock<Option<CachedJwks>>,
}

impl JwksVerifier {
    /// ## Errors
    /// Returns `InvalidConfiguration` if the project id (and so the audience) is missing.
    pub fn from_config(config: &IdentityConfig, client: reqwest::Client) -> ServiceResult<Self> {
        let audience = config.project_id.clone().ok_or_else(|| {
            ServiceError::InvalidConfiguration("identity.project_id is required".to_string())
        })?;
        let issuer = config.issuer().ok_or_else(|| {
            ServiceError::InvalidConfiguration("identity issuer cannot be derived".to_string())
        })?;

        Ok(Self {
            client,
            jwks_url: config.jwks_url.clone(),
            issuer,
            audience,
            ttl: Duration::from_secs(config.jwks_ttl_secs),
            cache: RwLock::new(None),
        })
    }

    /// ## Summary
    /// Returns the signing key for `kid`, from the cache while it is fresh.
    ///
    /// ## Errors
    /// `InvalidToken` if the key id is unknown even after a refetch, or the fetch errors.
    async fn key_for(&self, kid: &str) -> ServiceResult<Jwk> {
        {
            let cached = self.cache.read().await;
            if let Some(entry) = cached.as_ref()
                && entry.expires_at > Instant::now()
                && let Some(jwk) = entry.keys.find(kid)
            {
                return Ok(jwk.clone());
            }
        }

        // Expired, empty, or the provider has rotated keys.
        let keys = self.fetch_keys().await?;
        let jwk = keys.find(kid).cloned();
        *self.cache.write().await = Some(CachedJwks {
            keys,
            expires_at: Instant::now() + self.ttl,
        });

        jwk.ok_or_else(|| ServiceError::InvalidToken(format!("unknown key id {kid}")))
    }

    #[tracing::instrument(skip(self), fields(url = %self.jwks_url))]
    async fn fetch_keys(&self) -> ServiceResult<JwkSet> {
        let response = self.client.get(&self.jwks_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamError(format!(
                "JWKS endpoint returned {status}"
            )));
        }
        Ok(response.json::<JwkSet>().await?)
    }
}

#[async_trait]
impl IdentityVerifier for JwksVerifier {
    #[tracing::instrument(skip(self, token))]
    async fn verify(&self, token: &str) -> ServiceResult<CallerIdentity> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| ServiceError::InvalidToken(format!("malformed header: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| ServiceError::InvalidToken("missing key id".to_string()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| ServiceError::UpstreamError(format!("unusable signing key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let claims = jsonwebtoken::decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| ServiceError::InvalidToken(e.to_string()))?
            .claims;

        if claims.sub.is_empty() {
            return Err(ServiceError::InvalidToken("empty subject".to_string()));
        }

        tracing::debug!(uid = %claims.sub, "Token verified");

        Ok(CallerIdentity::new(claims.sub, claims.email))
    }
}

/// Development verifier: any non-empty bearer token is the configured user.
pub struct SingleUserVerifier {
    identity: CallerIdentity,
}

impl SingleUserVerifier {
    #[must_use]
    pub fn new(identity: CallerIdentity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl IdentityVerifier for SingleUserVerifier {
    async fn verify(&self, token: &str) -> ServiceResult<CallerIdentity> {
        if token.is_empty() {
            return Err(ServiceError::InvalidToken("empty token".to_string()));
        }
        Ok(self.identity.clone())
    }
}

/// ## Summary
/// Builds the verifier selected by `identity.method`.
///
/// ## Errors
/// Returns `InvalidConfiguration` when the selected method is missing its settings.
pub fn build_identity_verifier(
    config: &IdentityConfig,
    client: reqwest::Client,
) -> ServiceResult<Arc<dyn IdentityVerifier>> {
    match config.method {
        IdentityMethod::Jwks => Ok(Arc::new(JwksVerifier::from_config(config, client)?)),
        IdentityMethod::SingleUser => {
            let user = config.single_user.as_ref().ok_or_else(|| {
                ServiceError::InvalidConfiguration(
                    "identity.single_user is required for single_user".to_string(),
                )
            })?;
            tracing::warn!(uid = %user.uid, "Single-user identity verification is enabled");
            Ok(Arc::new(SingleUserVerifier::new(CallerIdentity::new(
                user.uid.clone(),
                user.email.clone(),
            ))))
        }
    }
}
