//! Message bodies for the mails the platform sends on its own behalf.

use super::OutgoingMail;
use crate::error::ServiceResult;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// ## Summary
/// Feedback submitted from the public site, addressed to the team with reply-to the sender.
///
/// ## Errors
/// Returns `ValidationError` if the recipient is not a valid address.
pub fn feedback_mail(
    recipient: &str,
    name: Option<&str>,
    sender_email: &str,
    message: &str,
) -> ServiceResult<OutgoingMail> {
    let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Anonymous");

    let text = format!("From: {name} <{sender_email}>\n\n{message}");
    let html = format!(
        "<p><strong>From:</strong> {} &lt;{}&gt;</p><p>{}</p>",
        escape_html(name),
        escape_html(sender_email),
        escape_html(message).replace('\n', "<br>")
    );

    Ok(OutgoingMail::new(
        recipient,
        format!("CollabUp feedback from {name}"),
        Some(text),
        Some(html),
    )?
    .with_reply_to(sender_email))
}

/// ## Summary
/// Tells an applicant that the owner changed the status of their request.
///
/// ## Errors
/// Returns `ValidationError` if the applicant address is not valid.
pub fn status_notification(
    applicant_email: &str,
    project_title: Option<&str>,
    status: &str,
    message: Option<&str>,
) -> ServiceResult<OutgoingMail> {
    let project = project_title.unwrap_or("your collaboration request");

    let mut text = format!("The status of {project} is now: {status}.");
    let mut html = format!(
        "<p>The status of <strong>{}</strong> is now: <strong>{}</strong>.</p>",
        escape_html(project),
        escape_html(status)
    );
    if let Some(note) = message.map(str::trim).filter(|m| !m.is_empty()) {
        text.push_str("\n\nMessage from the project owner:\n");
        text.push_str(note);
        html.push_str("<p>Message from the project owner:</p><blockquote>");
        html.push_str(&escape_html(note));
        html.push_str("</blockquote>");
    }

    OutgoingMail::new(
        applicant_email,
        format!("CollabUp request {status}"),
        Some(text),
        Some(html),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_escapes_html_and_sets_reply_to() {
        let mail = feedback_mail(
            "team@collabup.app",
            Some("<Ada>"),
            "ada@uni.edu",
            "Great <b>work</b>\nthanks",
        )
        .expect("valid");

        assert_eq!(mail.to, "team@collabup.app");
        assert_eq!(mail.reply_to.as_deref(), Some("ada@uni.edu"));
        assert_eq!(mail.subject, "CollabUp feedback from <Ada>");
        let html = mail.html.expect("html body");
        assert!(html.contains("&lt;Ada&gt;"));
        assert!(html.contains("Great &lt;b&gt;work&lt;/b&gt;<br>thanks"));
    }

    #[test]
    fn feedback_without_name_is_anonymous() {
        let mail = feedback_mail("team@collabup.app", Some("  "), "a@b.co", "hi").expect("valid");
        assert!(mail.subject.ends_with("Anonymous"));
    }

    #[test]
    fn status_notification_includes_the_owner_message() {
        let mail = status_notification("ada@uni.edu", Some("Drone"), "accepted", Some("Welcome!"))
            .expect("valid");

        assert_eq!(mail.subject, "CollabUp request accepted");
        let text = mail.text.expect("text body");
        assert!(text.starts_with("The status of Drone is now: accepted."));
        assert!(text.ends_with("Welcome!"));
    }
}
