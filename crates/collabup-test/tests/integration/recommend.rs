//! Keyword recommendations over HTTP.

use collabup_test::db::db::collections;
use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

async fn seeded() -> TestApp {
    let app = TestApp::new();
    app.store
        .insert(
            collections::STUDENT_PROJECTS,
            "p1",
            json!({ "title": "Rust compiler", "description": "A toy compiler", "skills": "rust" }),
        )
        .await;
    app.store
        .insert(
            collections::STUDENT_PROJECTS,
            "p2",
            json!({ "title": "Clay modelling", "description": "Clay and glaze" }),
        )
        .await;
    app.seed_user_with(
        "m1",
        json!({ "role": "mentor", "name": "Grace", "expertise": "rust systems" }),
    )
    .await;
    app
}

#[test_log::test(tokio::test)]
async fn recommend_returns_matching_student_projects() {
    let app = seeded().await;

    let body = TestRequest::post("/recommend")
        .json(&json!({ "query": "rust", "top_n": 3 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let projects = body["student_projects"]
        .as_array()
        .expect("student_projects should be an array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], "p1");
    assert!(projects[0]["similarity_score"].as_f64().is_some_and(|s| s > 0.1));
    assert!(body["research_projects"].as_array().is_some_and(Vec::is_empty));
}

#[test_log::test(tokio::test)]
async fn recommend_skips_mentors_that_only_look_alike() {
    let app = seeded().await;
    // Spelled close to "rust" without sharing a word with it.
    app.seed_user_with(
        "m2",
        json!({ "role": "mentor", "name": "Rusk", "expertise": "ruts", "bio": "Roasted nuts" }),
    )
    .await;

    let body = TestRequest::post("/recommend")
        .json(&json!({ "query": "rust" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let mentor_ids: Vec<&str> = body["mentor_profiles"]
        .as_array()
        .expect("mentor_profiles should be an array")
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(mentor_ids, ["m1"]);
}

#[test_log::test(tokio::test)]
async fn blank_query_returns_empty_lists() {
    let app = seeded().await;

    let body = TestRequest::post("/recommend")
        .json(&json!({ "query": " ; a " }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(
        body,
        json!({
            "student_projects": [],
            "startup_projects": [],
            "mentor_profiles": [],
            "research_projects": []
        })
    );
}

#[test_log::test(tokio::test)]
async fn collections_info_counts_documents() {
    let app = seeded().await;

    let body = TestRequest::get("/collections-info")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["studentProjects"]["count"], 2);
    assert_eq!(body["users"]["count"], 1);
    assert_eq!(body["researchProjects"]["count"], 0);
    assert!(body["studentProjects"]["description"].is_string());
}

#[test_log::test(tokio::test)]
async fn debug_query_requires_a_query() {
    let app = seeded().await;

    TestRequest::get("/debug-query")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("query is required");

    let body = TestRequest::get("/debug-query?query=rust")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["query"], "rust");
    assert!(body["sample_scores"]["student_projects"].is_number());
}
