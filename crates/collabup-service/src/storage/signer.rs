//! V4 query-string signing for a GCS-compatible bucket.
//!
//! Two credential kinds are understood: HMAC interoperability keys
//! (`GOOG4-HMAC-SHA256`) and service-account keys (`GOOG4-RSA-SHA256`). Both
//! share the canonical request; only the signature step differs.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use collabup_core::config::{Secret, StorageConfig};
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, EncodingKey};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{SignRequest, SignedUrl, UrlSigner};
use crate::error::{ServiceError, ServiceResult};

type HmacSha256 = Hmac<Sha256>;

const HMAC_ALGORITHM: &str = "GOOG4-HMAC-SHA256";
const RSA_ALGORITHM: &str = "GOOG4-RSA-SHA256";
const SCOPE_SUFFIX: &str = "auto/storage/goog4_request";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Everything but RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const OBJECT_PATH: &AsciiSet = &QUERY_VALUE.remove(b'/');

/// Credential files as found on disk. Service-account files carry many more
/// fields; only the two needed for signing are read.
#[derive(Deserialize)]
#[serde(untagged)]
enum StorageCredentials {
    ServiceAccount {
        client_email: String,
        private_key: Secret,
    },
    Hmac {
        #[serde(rename = "accessId", alias = "access_id")]
        access_id: String,
        secret: Secret,
    },
}

enum SigningKey {
    Hmac { access_id: String, secret: Secret },
    ServiceAccount { client_email: String, key: EncodingKey },
}

impl SigningKey {
    const fn algorithm(&self) -> &'static str {
        match self {
            Self::Hmac { .. } => HMAC_ALGORITHM,
            Self::ServiceAccount { .. } => RSA_ALGORITHM,
        }
    }

    fn credential_id(&self) -> &str {
        match self {
            Self::Hmac { access_id, .. } => access_id,
            Self::ServiceAccount { client_email, .. } => client_email,
        }
    }
}

pub struct V4Signer {
    origin: String,
    host: String,
    bucket: String,
    key: SigningKey,
}

impl std::fmt::Debug for V4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4Signer")
            .field("origin", &self.origin)
            .field("bucket", &self.bucket)
            .field("algorithm", &self.key.algorithm())
            .field("credential", &self.key.credential_id())
            .finish_non_exhaustive()
    }
}

/// Splits an endpoint URL into its origin and its `host[:port]`.
fn endpoint_parts(endpoint: &str) -> ServiceResult<(String, String)> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| {
        ServiceError::InvalidConfiguration(format!("storage.endpoint is invalid: {e}"))
    })?;
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => {
            return Err(ServiceError::InvalidConfiguration(
                "storage.endpoint has no host".to_string(),
            ));
        }
    };
    Ok((format!("{}://{host}", url.scheme()), host))
}

impl V4Signer {
    fn with_key(endpoint: &str, bucket: String, key: SigningKey) -> ServiceResult<Self> {
        let (origin, host) = endpoint_parts(endpoint)?;
        Ok(Self {
            origin,
            host,
            bucket,
            key,
        })
    }

    /// Signs with an HMAC interoperability key.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the endpoint is not an absolute URL with a host.
    pub fn hmac(
        endpoint: &str,
        bucket: impl Into<String>,
        access_id: impl Into<String>,
        secret: Secret,
    ) -> ServiceResult<Self> {
        Self::with_key(
            endpoint,
            bucket.into(),
            SigningKey::Hmac {
                access_id: access_id.into(),
                secret,
            },
        )
    }

    /// Signs with a service account's RSA private key (PKCS#8 or PKCS#1 PEM).
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the endpoint is invalid or the key is not an RSA PEM.
    pub fn service_account(
        endpoint: &str,
        bucket: impl Into<String>,
        client_email: impl Into<String>,
        private_key_pem: &str,
    ) -> ServiceResult<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
            ServiceError::InvalidConfiguration(format!("service account key is invalid: {e}"))
        })?;
        Self::with_key(
            endpoint,
            bucket.into(),
            SigningKey::ServiceAccount {
                client_email: client_email.into(),
                key,
            },
        )
    }

    /// ## Summary
    /// Builds the signer from `storage.*` settings. Credentials come from
    /// `storage.credentials_json` or, failing that, `storage.credentials_file`
    /// (which defaults to `GOOGLE_APPLICATION_CREDENTIALS`). A service-account
    /// key file selects RSA signing, an `{accessId, secret}` object selects HMAC.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if no usable credentials are configured.
    pub fn from_config(config: &StorageConfig) -> ServiceResult<Self> {
        let raw = if let Some(inline) = &config.credentials_json {
            inline.expose().to_string()
        } else if let Some(path) = &config.credentials_file {
            std::fs::read_to_string(path).map_err(|e| {
                ServiceError::InvalidConfiguration(format!(
                    "cannot read storage credentials from {path}: {e}"
                ))
            })?
        } else {
            return Err(ServiceError::InvalidConfiguration(
                "storage credentials are not configured".to_string(),
            ));
        };

        let credentials: StorageCredentials = serde_json::from_str(&raw).map_err(|e| {
            ServiceError::InvalidConfiguration(format!(
                "storage credentials are neither a service account key nor an HMAC key: {e}"
            ))
        })?;

        let signer = match credentials {
            StorageCredentials::ServiceAccount {
                client_email,
                private_key,
            } => Self::service_account(
                &config.endpoint,
                config.bucket.clone(),
                client_email,
                private_key.expose(),
            )?,
            StorageCredentials::Hmac { access_id, secret } => {
                Self::hmac(&config.endpoint, config.bucket.clone(), access_id, secret)?
            }
        };

        tracing::info!(
            algorithm = signer.key.algorithm(),
            credential = signer.key.credential_id(),
            "Storage signer configured"
        );

        Ok(signer)
    }

    /// ## Summary
    /// Signs a request as of `now`.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the lifetime is zero or longer than seven days.
    pub fn sign_at(
        &self,
        request: &SignRequest<'_>,
        now: DateTime<Utc>,
    ) -> ServiceResult<SignedUrl> {
        let ttl_secs = request.ttl.as_secs();
        if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
            return Err(ServiceError::validation(format!(
                "signed URL lifetime must be between 1 and {MAX_TTL_SECS} seconds"
            )));
        }

        let algorithm = self.key.algorithm();
        let method = request.action.http_method();
        let datestamp = now.format("%Y%m%d").to_string();
        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = format!("{datestamp}/{SCOPE_SUFFIX}");

        let canonical_path = format!(
            "/{}/{}",
            self.bucket,
            utf8_percent_encode(request.object_path, OBJECT_PATH)
        );

        let content_type = request.content_type.filter(|ct| !ct.is_empty());
        let (canonical_headers, signed_headers) = match content_type {
            Some(ct) => (
                format!("content-type:{}\nhost:{}\n", ct.trim(), self.host),
                "content-type;host",
            ),
            None => (format!("host:{}\n", self.host), "host"),
        };

        let credential = format!("{}/{scope}", self.key.credential_id());
        let ttl = ttl_secs.to_string();
        // Already in lexicographic order.
        let params = [
            ("X-Goog-Algorithm", algorithm),
            ("X-Goog-Credential", credential.as_str()),
            ("X-Goog-Date", timestamp.as_str()),
            ("X-Goog-Expires", ttl.as_str()),
            ("X-Goog-SignedHeaders", signed_headers),
        ];
        let canonical_query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", utf8_percent_encode(value, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_request = [
            method,
            canonical_path.as_str(),
            canonical_query.as_str(),
            canonical_headers.as_str(),
            signed_headers,
            UNSIGNED_PAYLOAD,
        ]
        .join("\n");

        let string_to_sign = format!(
            "{algorithm}\n{timestamp}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.signature(&datestamp, &string_to_sign)?;

        tracing::trace!(%canonical_request, "Signed storage request");

        let expires_at = now
            + chrono::Duration::from_std(request.ttl)
                .map_err(|_e| ServiceError::InvariantViolation("ttl out of range"))?;

        Ok(SignedUrl {
            url: format!(
                "{}{canonical_path}?{canonical_query}&X-Goog-Signature={signature}",
                self.origin
            ),
            method: method.to_string(),
            expires_at,
        })
    }

    /// Hex-encoded signature of `string_to_sign`.
    fn signature(&self, datestamp: &str, string_to_sign: &str) -> ServiceResult<String> {
        match &self.key {
            SigningKey::Hmac { secret, .. } => {
                let mut key = format!("GOOG4{}", secret.expose()).into_bytes();
                for part in [datestamp, "auto", "storage", "goog4_request", string_to_sign] {
                    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_e| {
                        ServiceError::InvariantViolation("HMAC accepts keys of any length")
                    })?;
                    mac.update(part.as_bytes());
                    key = mac.finalize().into_bytes().to_vec();
                }
                Ok(hex::encode(key))
            }
            SigningKey::ServiceAccount { key, .. } => {
                // RS256 is RSASSA-PKCS1-v1_5 over SHA-256, as GOOG4-RSA-SHA256 requires.
                let encoded =
                    jsonwebtoken::crypto::sign(string_to_sign.as_bytes(), key, Algorithm::RS256)
                        .map_err(|e| {
                            ServiceError::InvalidConfiguration(format!(
                                "service account key cannot sign: {e}"
                            ))
                        })?;
                let raw = URL_SAFE_NO_PAD.decode(encoded).map_err(|_e| {
                    ServiceError::InvariantViolation("RS256 signatures are base64url")
                })?;
                Ok(hex::encode(raw))
            }
        }
    }
}

#[async_trait]
impl UrlSigner for V4Signer {
    #[tracing::instrument(skip(self, request), fields(path = %request.object_path, action = %request.action))]
    async fn sign(&self, request: &SignRequest<'_>) -> ServiceResult<SignedUrl> {
        self.sign_at(request, Utc::now())
    }
}

#[must_use]
pub fn default_ttl(config: &StorageConfig) -> Duration {
    Duration::from_secs(u64::from(config.url_ttl_secs))
}
