//! Owner decisions on collaboration requests.

use collabup_test::db::db::{DocumentStore, collections};
use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

async fn seeded() -> TestApp {
    let app = TestApp::new();
    app.seed_user("owner", "startup").await;
    app.seed_user("other", "startup").await;
    app.seed_user("root", "admin").await;
    app.store
        .insert(
            collections::REQUESTS,
            "r1",
            json!({
                "projectOwnerId": "owner",
                "applicantEmail": "applicant@collabup.test",
                "projectTitle": "Campus delivery robots",
                "status": "pending"
            }),
        )
        .await;
    app
}

#[test_log::test(tokio::test)]
async fn owner_accepts_and_applicant_is_notified() {
    let app = seeded().await;

    let body = TestRequest::post("/api/requests/update-status")
        .bearer("owner")
        .json(&json!({ "requestId": "r1", "status": "accepted", "message": "Welcome aboard" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body, json!({ "requestId": "r1", "status": "accepted", "notified": true }));

    let stored = app
        .store
        .get(collections::REQUESTS, "r1")
        .await
        .expect("store should answer")
        .expect("request should exist");
    assert_eq!(stored.data["status"], "accepted");
    assert_eq!(stored.data["updatedBy"], "owner");
    assert_eq!(stored.data["responseMessage"], "Welcome aboard");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "applicant@collabup.test");
    assert!(sent[0].subject.contains("accepted"));
}

#[test_log::test(tokio::test)]
async fn non_owner_is_forbidden() {
    let app = seeded().await;

    TestRequest::post("/api/requests/update-status")
        .bearer("other")
        .json(&json!({ "requestId": "r1", "status": "rejected" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Forbidden");

    assert!(app.mailer.sent().is_empty());
}

#[test_log::test(tokio::test)]
async fn admin_may_decide_for_the_owner() {
    let app = seeded().await;

    TestRequest::post("/api/requests/update-status")
        .bearer("root")
        .json(&json!({ "requestId": "r1", "status": "rejected" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn unknown_status_is_a_bad_request() {
    let app = seeded().await;

    TestRequest::post("/api/requests/update-status")
        .bearer("owner")
        .json(&json!({ "requestId": "r1", "status": "maybe" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("status must be one of pending, accepted, rejected");
}

#[test_log::test(tokio::test)]
async fn missing_request_is_not_found() {
    let app = seeded().await;

    TestRequest::post("/api/requests/update-status")
        .bearer("owner")
        .json(&json!({ "requestId": "nope", "status": "accepted" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Not found");
}
