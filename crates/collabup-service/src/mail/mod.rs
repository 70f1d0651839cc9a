//! Transactional email.
//!
//! `Mailer` is the seam to the mail transport. `RelayMailer` posts messages to an
//! HTTP relay, `LogMailer` only records them and is meant for local development.

pub mod relay;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use collabup_core::config::{MailConfig, MailMethod};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

pub use relay::RelayMailer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl OutgoingMail {
    /// ## Summary
    /// Builds a message after checking the recipient, subject and body.
    ///
    /// ## Errors
    /// Returns `ValidationError` naming the first missing or malformed field.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        text: Option<String>,
        html: Option<String>,
    ) -> ServiceResult<Self> {
        let to = to.into().trim().to_string();
        let subject = subject.into().trim().to_string();
        let text = text.filter(|t| !t.trim().is_empty());
        let html = html.filter(|h| !h.trim().is_empty());

        if !looks_like_email(&to) {
            return Err(ServiceError::validation("to must be an email address"));
        }
        if subject.is_empty() {
            return Err(ServiceError::validation("subject is required"));
        }
        if text.is_none() && html.is_none() {
            return Err(ServiceError::validation("text or html is required"));
        }

        Ok(Self {
            to,
            subject,
            text,
            html,
            reply_to: None,
        })
    }

    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Minimal shape check: one `@` with something on both sides and a dot in the domain.
#[must_use]
pub fn looks_like_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// ## Errors
    /// Returns an error if the transport rejects or cannot accept the message.
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()>;
}

/// Development mailer that records messages in the log instead of sending them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            reply_to = ?mail.reply_to,
            "Mail not delivered (log transport)"
        );
        Ok(())
    }
}

/// ## Summary
/// Builds the mailer selected by `mail.method`.
///
/// ## Errors
/// Returns `InvalidConfiguration` if the relay is selected without its URL or key.
pub fn build_mailer(config: &MailConfig, client: reqwest::Client) -> ServiceResult<Arc<dyn Mailer>> {
    match config.method {
        MailMethod::Relay => Ok(Arc::new(RelayMailer::from_config(config, client)?)),
        MailMethod::Log => {
            tracing::warn!("Mail is logged, not delivered");
            Ok(Arc::new(LogMailer))
        }
    }
}
