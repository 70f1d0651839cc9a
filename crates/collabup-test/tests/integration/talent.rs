//! Talent matching and the faculty leaderboard.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

async fn seeded() -> TestApp {
    let app = TestApp::new();
    app.seed_user("boss", "startup").await;
    app.seed_user("s0", "student").await;
    app.seed_user_with("s1", json!({ "role": "student", "skills": ["Rust", "SQL"] }))
        .await;
    app.seed_user_with("s2", json!({ "role": "student", "skills": "python, rust, go" }))
        .await;
    app.seed_user_with("s3", json!({ "role": "student", "skills": ["design"] }))
        .await;
    app.seed_user_with("f1", json!({ "role": "faculty", "points": 40 })).await;
    app.seed_user_with("f2", json!({ "role": "faculty", "points": 90 })).await;
    app.seed_user_with("f3", json!({ "role": "faculty" })).await;
    app
}

#[test_log::test(tokio::test)]
async fn startup_gets_students_ranked_by_skill_overlap() {
    let app = seeded().await;

    let body = TestRequest::get("/api/talent/matches?skills=rust,python")
        .bearer("boss")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let ids: Vec<&str> = body
        .as_array()
        .expect("matches should be an array")
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, ["s2", "s1"]);
    assert_eq!(body[0]["matchScore"], 2);
    assert_eq!(body[0]["matchedSkills"], json!(["rust", "python"]));
}

#[test_log::test(tokio::test)]
async fn talent_limit_is_applied() {
    let app = seeded().await;

    let body = TestRequest::get("/api/talent/matches?limit=2")
        .bearer("f1")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[test_log::test(tokio::test)]
async fn students_may_not_search_talent() {
    let app = seeded().await;

    TestRequest::get("/api/talent/matches?skills=rust")
        .bearer("s1")
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn leaderboard_is_public_and_ordered_by_points() {
    let app = seeded().await;

    let body = TestRequest::get("/api/faculty/leaderboard")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let ranking: Vec<(&str, i64)> = body
        .as_array()
        .expect("leaderboard should be an array")
        .iter()
        .filter_map(|entry| Some((entry["id"].as_str()?, entry["points"].as_i64()?)))
        .collect();
    assert_eq!(ranking, [("f2", 90), ("f1", 40), ("f3", 0)]);
}
