use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn health_reports_store_status() {
    let app = TestApp::new();

    let body = TestRequest::get("/health")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[test_log::test(tokio::test)]
async fn unknown_route_is_not_found() {
    let app = TestApp::new();

    TestRequest::get("/api/nothing-here")
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
