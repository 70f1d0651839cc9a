//! Project creation per role.

use collabup_test::db::db::{DocumentStore, collections};
use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

fn project() -> serde_json::Value {
    json!({
        "title": "Soil moisture sensing",
        "description": "Low-power sensors for campus gardens",
        "domain": "IoT"
    })
}

#[test_log::test(tokio::test)]
async fn faculty_creates_research_project() {
    let app = TestApp::new();
    app.seed_user("f1", "faculty").await;

    let body = TestRequest::post("/api/projects/research")
        .bearer("f1")
        .json(&project())
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    let id = body["id"].as_str().expect("id should be a string");
    let stored = app
        .store
        .get(collections::RESEARCH_PROJECTS, id)
        .await
        .expect("store should answer")
        .expect("project should be stored");

    assert_eq!(stored.data["ownerId"], "f1");
    assert_eq!(stored.data["ownerEmail"], "f1@collabup.test");
    assert_eq!(stored.data["status"], "open");
    assert_eq!(stored.data["domain"], "IoT");
    assert!(stored.data["createdAt"].is_string());
}

#[test_log::test(tokio::test)]
async fn other_roles_may_not_create_research_projects() {
    let app = TestApp::new();
    app.seed_user("s1", "student").await;
    app.seed_user("m1", "mentor").await;

    for uid in ["s1", "m1"] {
        TestRequest::post("/api/projects/research")
            .bearer(uid)
            .json(&project())
            .send(&app.service)
            .await
            .assert_status(StatusCode::FORBIDDEN)
            .assert_error("Forbidden");
    }
}

#[test_log::test(tokio::test)]
async fn admin_may_create_any_kind() {
    let app = TestApp::new();
    app.seed_user("root", "admin").await;

    for kind in ["research", "startup", "student"] {
        TestRequest::post(&format!("/api/projects/{kind}"))
            .bearer("root")
            .json(&project())
            .send(&app.service)
            .await
            .assert_status(StatusCode::CREATED);
    }

    assert_eq!(
        app.store
            .count(collections::STARTUP_PROJECTS)
            .await
            .expect("count"),
        1
    );
}

#[test_log::test(tokio::test)]
async fn missing_title_is_a_bad_request() {
    let app = TestApp::new();
    app.seed_user("s1", "student").await;

    TestRequest::post("/api/projects/student")
        .bearer("s1")
        .json(&json!({ "description": "No title" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("title is required");
}

#[test_log::test(tokio::test)]
async fn unknown_kind_is_not_found() {
    let app = TestApp::new();
    app.seed_user("root", "admin").await;

    TestRequest::post("/api/projects/hackathon")
        .bearer("root")
        .json(&project())
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Not found");
}

#[test_log::test(tokio::test)]
async fn project_creation_requires_authentication() {
    let app = TestApp::new();

    TestRequest::post("/api/projects/student")
        .json(&project())
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
