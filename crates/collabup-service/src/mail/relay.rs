use async_trait::async_trait;
use collabup_core::config::{MailConfig, Secret};
use serde::Serialize;

use super::{Mailer, OutgoingMail};
use crate::error::{ServiceError, ServiceResult};

/// Wire body accepted by the mail relay.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayMessage<'a> {
    from: &'a str,
    #[serde(flatten)]
    mail: &'a OutgoingMail,
}

/// Delivers mail through an HTTP relay that accepts JSON messages with a bearer key.
pub struct RelayMailer {
    client: reqwest::Client,
    url: String,
    api_key: Secret,
    from: String,
}

impl RelayMailer {
    /// ## Errors
    /// Returns `InvalidConfiguration` if `mail.relay_url` or `mail.api_key` is missing.
    pub fn from_config(config: &MailConfig, client: reqwest::Client) -> ServiceResult<Self> {
        let url = config.relay_url.clone().ok_or_else(|| {
            ServiceError::InvalidConfiguration("mail.relay_url is required".to_string())
        })?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            ServiceError::InvalidConfiguration("mail.api_key is required".to_string())
        })?;

        Ok(Self {
            client,
            url,
            api_key,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    #[tracing::instrument(skip(self, mail), fields(url = %self.url, to = %mail.to, status = tracing::field::Empty))]
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&RelayMessage {
                from: &self.from,
                mail: &mail,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "Mail relay rejected message");
            return Err(ServiceError::UpstreamError(format!(
                "mail relay returned {status}"
            )));
        }

        tracing::debug!("Mail handed to relay");

        Ok(())
    }
}
