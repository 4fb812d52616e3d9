mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::Duration;
use common::{RecordingNotifier, TestApp, OTHER_PRIVATE_PEM, OTHER_PUBLIC_PEM};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use waitlist_backend::auth::JwtHandler;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_then_list_with_token() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/addWaitlist",
            json!({ "email": "u@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "User added to waitlist");

    let token = app.token("a@x.com");
    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let entries = body_json(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["email"], "u@x.com");
    assert!(entries[0]["timestamp"].as_i64().unwrap() > 0);
    assert_eq!(app.notifier.sent_count(), 1);
}

#[tokio::test]
async fn test_duplicate_signup_already_reported() {
    let app = TestApp::new();

    for _ in 0..2 {
        app.router()
            .oneshot(json_request(
                "POST",
                "/api/addWaitlist",
                json!({ "email": "u@x.com" }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/addWaitlist",
            json!({ "email": "u@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ALREADY_REPORTED);
    assert_eq!(
        body_json(response).await["message"],
        "Email already added to waitlist"
    );
    assert_eq!(app.store.count_waitlist().await.unwrap(), 1);
}

#[tokio::test]
async fn test_add_with_bad_body_is_400() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/addWaitlist")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation");
    assert!(body["message"].is_string());

    let response = app
        .router()
        .oneshot(json_request("POST", "/api/addWaitlist", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notifier_failure_is_500_but_entry_kept() {
    let app = TestApp::with_notifier(RecordingNotifier::failing());

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/addWaitlist",
            json!({ "email": "u@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "notifier");
    assert_eq!(body["message"], "Unable to send email");

    assert!(app
        .store
        .find_waitlist_by_email("u@x.com")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_list_requires_token() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/getWaitlist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "no auth token provided");

    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "could not validate auth token"
    );
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_rejected() {
    let app = TestApp::new();

    let expired = app
        .state
        .jwt_handler
        .generate_token_with_ttl("a@x.com", Duration::hours(-1))
        .unwrap();
    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", &expired))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let foreign = JwtHandler::from_pem(OTHER_PRIVATE_PEM, OTHER_PUBLIC_PEM)
        .unwrap()
        .generate_token("a@x.com")
        .unwrap();
    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", &foreign))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_prefix_accepted() {
    let app = TestApp::new();
    let token = format!("Bearer {}", app.token("a@x.com"));

    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_lifecycle() {
    let app = TestApp::new();
    let token = app.token("a@x.com");

    app.router()
        .oneshot(json_request(
            "POST",
            "/api/addWaitlist",
            json!({ "email": "u@x.com" }),
        ))
        .await
        .unwrap();

    let response = app
        .router()
        .oneshot(authed_request("DELETE", "/api/deleteWaitlist/u@x.com", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Email deleted from waitlist"
    );

    let response = app
        .router()
        .oneshot(authed_request("DELETE", "/api/deleteWaitlist/u@x.com", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Email not found");
}

#[tokio::test]
async fn test_delete_without_email_is_400() {
    let app = TestApp::new();
    let token = app.token("a@x.com");

    for uri in ["/api/deleteWaitlist", "/api/deleteWaitlist/"] {
        let response = app
            .router()
            .oneshot(authed_request("DELETE", uri, &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation");
        assert_eq!(body["message"], "Email parameter is missing");
    }

    // Still behind the token gate
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/deleteWaitlist/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_requires_token() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/deleteWaitlist/u@x.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_admin_then_signin() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/create",
            json!({ "email": "a@x.com", "password": "pw123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        body_json(response).await["message"],
        "successfully created admin"
    );

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            json!({ "email": "a@x.com", "password": "pw123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let token = response
        .headers()
        .get(header::AUTHORIZATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(!token.is_empty());
    assert_eq!(
        app.state.jwt_handler.validate_token(&token).unwrap().email,
        "a@x.com"
    );

    // The issued token opens the protected routes
    let response = app
        .router()
        .oneshot(authed_request("GET", "/api/getWaitlist", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            json!({ "email": "a@x.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_signin_unknown_email_matches_wrong_password() {
    let app = TestApp::new();

    app.router()
        .oneshot(json_request(
            "POST",
            "/api/create",
            json!({ "email": "a@x.com", "password": "pw123" }),
        ))
        .await
        .unwrap();

    let wrong_password = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            json!({ "email": "a@x.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            json!({ "email": "nobody@x.com", "password": "pw123" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), unknown_email.status());
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_email).await
    );
}

#[tokio::test]
async fn test_duplicate_admin_is_409() {
    let app = TestApp::new();
    let body = json!({ "email": "a@x.com", "password": "pw123" });

    let first = app
        .router()
        .oneshot(json_request("POST", "/api/create", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = app
        .router()
        .oneshot(json_request("POST", "/api/create", body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_preflight_short_circuits_with_cors_headers() {
    let app = TestApp::new();

    // Protected route: the preflight must not hit the token gate
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/getWaitlist")
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS],
        "Authorization"
    );
}

#[tokio::test]
async fn test_regular_responses_carry_cors_headers() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            json!({ "email": "nobody@x.com", "password": "pw" }),
        ))
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS],
        "Authorization"
    );
}
