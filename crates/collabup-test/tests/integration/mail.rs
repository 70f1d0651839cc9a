//! Feedback and generic mail endpoints.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn feedback_is_forwarded_with_reply_to_sender() {
    let app = TestApp::new();

    TestRequest::post("/send-feedback")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.org",
            "message": "Love the <b>matching</b> page"
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("\"success\":true");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, FEEDBACK_RECIPIENT);
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.org"));
    assert!(
        sent[0]
            .html
            .as_deref()
            .is_some_and(|html| html.contains("&lt;b&gt;matching&lt;/b&gt;"))
    );
}

#[test_log::test(tokio::test)]
async fn feedback_requires_a_sender_address() {
    let app = TestApp::new();

    TestRequest::post("/send-feedback")
        .json(&json!({ "email": "not-an-address", "message": "hi" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("email must be an email address");

    assert!(app.mailer.sent().is_empty());
}

#[test_log::test(tokio::test)]
async fn send_email_requires_a_body() {
    let app = TestApp::new();

    TestRequest::post("/api/send-email")
        .json(&json!({ "to": "someone@example.org", "subject": "Hello" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("text or html is required");
}

#[test_log::test(tokio::test)]
async fn send_email_hands_message_to_the_transport() {
    let app = TestApp::new();

    TestRequest::post("/api/send-email")
        .json(&json!({ "to": "someone@example.org", "subject": "Hello", "text": "Hi there" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Hello");
    assert_eq!(sent[0].text.as_deref(), Some("Hi there"));
}
