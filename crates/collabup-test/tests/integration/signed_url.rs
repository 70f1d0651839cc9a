//! Signed URL issuance over HTTP.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

/// ## Summary
/// A request without a bearer token never reaches the path policy.
#[test_log::test(tokio::test)]
async fn signed_url_without_bearer_is_unauthorized() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .json(&json!({ "path": "users/students/u1/resume.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Unauthorized");
}

#[test_log::test(tokio::test)]
async fn signed_url_with_rejected_token_is_unauthorized() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .header("Authorization", "Bearer forged")
        .json(&json!({ "path": "users/students/u1/resume.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Unauthorized");
}

#[test_log::test(tokio::test)]
async fn signed_url_outside_role_prefixes_is_forbidden() {
    let app = TestApp::new();
    app.seed_user("u1", "student").await;

    TestRequest::post("/signed-url")
        .bearer("u1")
        .json(&json!({ "path": "users/faculty/u1/cv.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Not authorized for this path");
}

#[test_log::test(tokio::test)]
async fn signed_url_for_another_users_folder_is_forbidden() {
    let app = TestApp::new();
    app.seed_user("m1", "mentor").await;

    TestRequest::post("/signed-url-read")
        .bearer("m1")
        .json(&json!({ "path": "users/mentors/m2/notes.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Not authorized for this path");
}

/// ## Summary
/// Allowed uploads get a PUT URL for exactly the requested object with a five-minute lifetime.
#[test_log::test(tokio::test)]
async fn signed_upload_url_for_own_folder() {
    let app = TestApp::new();
    app.seed_user("u1", "student").await;

    let response = TestRequest::post("/signed-url")
        .bearer("u1")
        .json(&json!({
            "path": "users/students/u1/my resume.pdf",
            "contentType": "application/pdf"
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["method"], "PUT");
    let url = body["url"].as_str().expect("url should be a string");
    assert!(url.starts_with(&format!(
        "https://storage.googleapis.com/{TEST_BUCKET}/users/students/u1/my%20resume.pdf?"
    )));
    assert!(url.contains("X-Goog-Expires=300"));
    assert!(url.contains("X-Goog-Algorithm=GOOG4-HMAC-SHA256"));
    assert!(body["expiresAt"].is_string());
}

#[test_log::test(tokio::test)]
async fn signed_read_url_accepts_file_path_alias() {
    let app = TestApp::new();
    app.seed_user("s1", "startup").await;

    let body = TestRequest::post("/signed-url-read")
        .bearer("s1")
        .json(&json!({ "filePath": "projects/startup-projects/s1/deck.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["method"], "GET");
    assert!(
        body["url"]
            .as_str()
            .is_some_and(|url| url.contains("X-Goog-SignedHeaders=host&"))
    );
}

/// ## Summary
/// A caller without a user document is treated as a student.
#[test_log::test(tokio::test)]
async fn unknown_caller_defaults_to_student_prefixes() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .bearer("newcomer")
        .json(&json!({ "path": "users/students/newcomer/avatar.png", "contentType": "image/png" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::post("/signed-url")
        .bearer("newcomer")
        .json(&json!({ "path": "users/startups/newcomer/logo.png" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn admin_may_sign_any_users_object() {
    let app = TestApp::new();
    app.seed_user("root", "admin").await;

    TestRequest::post("/signed-url-read")
        .bearer("root")
        .json(&json!({ "path": "users/students/u9/transcript.pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn missing_path_is_a_bad_request() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .bearer("u1")
        .json(&json!({ "contentType": "application/pdf" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("path is required");
}

#[test_log::test(tokio::test)]
async fn non_json_body_is_a_bad_request() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .bearer("u1")
        .content_type("application/json")
        .body("path=users/students/u1/x")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid JSON body");
}
