use collabup_service::error::ServiceError;
use collabup_service::mail::{OutgoingMail, looks_like_email, templates};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_body;
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::providers::get_mailer_from_depot;

/// ## Summary
/// Feedback form payload
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// ## Summary
/// Send email request payload
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

/// ## Summary
/// POST /send-feedback - Forward a message from the public site to the team inbox.
///
/// ## Errors
/// Returns HTTP 400 if the sender address or message is missing
/// Returns HTTP 500 if no feedback recipient is configured or the mail cannot be sent
#[handler]
async fn send_feedback(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let body: FeedbackRequest = parse_body(req).await?;

    let email = body.email.trim();
    if !looks_like_email(email) {
        return Err(ServiceError::validation("email must be an email address").into());
    }
    if body.message.trim().is_empty() {
        return Err(ServiceError::validation("message is required").into());
    }

    let settings = get_config_from_depot(depot)?;
    let recipient = settings.mail.feedback_recipient.as_deref().ok_or_else(|| {
        ServiceError::InvalidConfiguration("mail.feedback_recipient is not set".to_string())
    })?;

    let mail = templates::feedback_mail(recipient, body.name.as_deref(), email, body.message.trim())?;
    get_mailer_from_depot(depot)?.send(mail).await?;

    tracing::info!("Feedback forwarded");

    Ok(Json(json!({ "success": true })))
}

/// ## Summary
/// POST /api/send-email - Send one message through the configured transport.
///
/// ## Errors
/// Returns HTTP 400 if the recipient, subject or body is missing
/// Returns HTTP 500 if the mail cannot be sent
#[handler]
async fn send_email(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let body: SendEmailRequest = parse_body(req).await?;

    let mail = OutgoingMail::new(body.to, body.subject, body.text, body.html)?;
    get_mailer_from_depot(depot)?.send(mail).await?;

    Ok(Json(json!({ "success": true })))
}

#[must_use]
pub fn feedback_routes() -> Router {
    Router::with_path("send-feedback").post(send_feedback)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("send-email").post(send_email)
}
