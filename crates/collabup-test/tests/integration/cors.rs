//! Origin allow-list and CORS headers.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn disallowed_origin_is_forbidden() {
    let app = TestApp::new();

    TestRequest::get("/health")
        .origin("https://evil.example")
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Origin not allowed");
}

#[test_log::test(tokio::test)]
async fn request_without_origin_proceeds() {
    let app = TestApp::new();

    TestRequest::get("/health")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn allowed_origins_get_cors_headers() {
    let app = TestApp::new();

    for origin in ["http://localhost:5173", EXTRA_ORIGIN] {
        TestRequest::get("/health")
            .origin(origin)
            .send(&app.service)
            .await
            .assert_status(StatusCode::OK)
            .assert_header("access-control-allow-origin", origin);
    }
}

/// ## Summary
/// Preflight requests carry no bearer token and must not be rejected by authentication.
#[test_log::test(tokio::test)]
async fn preflight_for_protected_route_succeeds() {
    let app = TestApp::new();

    TestRequest::options("/signed-url")
        .origin("https://collabup.app")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization, content-type")
        .send(&app.service)
        .await
        .assert_success()
        .assert_header("access-control-allow-origin", "https://collabup.app");
}

#[test_log::test(tokio::test)]
async fn disallowed_origin_is_rejected_before_authentication() {
    let app = TestApp::new();

    TestRequest::post("/signed-url")
        .origin("https://evil.example")
        .bearer("u1")
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Origin not allowed");
}
