use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use collabup_core::types::CallerIdentity;
use collabup_service::auth::IdentityVerifier;
use collabup_service::error::{ServiceError, ServiceResult};
use collabup_service::mail::{Mailer, OutgoingMail};

/// Prefix of every token `StaticVerifier` accepts; the rest of the token is the uid.
pub const TOKEN_PREFIX: &str = "test-token:";

/// ## Summary
/// Returns the bearer token that authenticates as `uid`.
#[must_use]
pub fn token_for(uid: &str) -> String {
    format!("{TOKEN_PREFIX}{uid}")
}

/// Accepts `test-token:<uid>` and answers with `<uid>@collabup.test`. Anything else is rejected.
#[derive(Debug, Default)]
pub struct StaticVerifier;

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> ServiceResult<CallerIdentity> {
        let uid = token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| ServiceError::InvalidToken("not a test token".to_string()))?;
        Ok(CallerIdentity::new(uid, Some(format!("{uid}@collabup.test"))))
    }
}

/// Keeps every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()> {
        tracing::debug!(to = %mail.to, subject = %mail.subject, "Recorded mail");
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mail);
        Ok(())
    }
}
