//! Mentor activity counters.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn mentor_reports_stats_and_anyone_reads_them() {
    let app = TestApp::new();
    app.seed_user("m1", "mentor").await;

    TestRequest::post("/api/mentor/stats")
        .bearer("m1")
        .json(&json!({ "sessionsCompleted": 4, "rating": 4.5 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::post("/api/mentor/stats")
        .bearer("m1")
        .json(&json!({ "menteesCount": 2 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let body = TestRequest::get("/api/mentor/stats/m1")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["sessionsCompleted"], 4);
    assert_eq!(body["menteesCount"], 2);
    assert_eq!(body["rating"], 4.5);
    assert_eq!(body["mentorId"], "m1");
}

#[test_log::test(tokio::test)]
async fn students_may_not_report_mentor_stats() {
    let app = TestApp::new();
    app.seed_user("s1", "student").await;

    TestRequest::post("/api/mentor/stats")
        .bearer("s1")
        .json(&json!({ "sessionsCompleted": 1 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn out_of_range_rating_is_a_bad_request() {
    let app = TestApp::new();
    app.seed_user("m1", "mentor").await;

    TestRequest::post("/api/mentor/stats")
        .bearer("m1")
        .json(&json!({ "rating": 7 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("rating must be between 0 and 5");
}

#[test_log::test(tokio::test)]
async fn unknown_mentor_stats_are_not_found() {
    let app = TestApp::new();

    TestRequest::get("/api/mentor/stats/ghost")
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Not found");
}
