/// HTTP-level tests for the lead endpoint
/// Drives the axum router directly with `oneshot`, Wizzio is mocked with wiremock
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use rust_wizzio_lead::config::Config;
use rust_wizzio_lead::field_mapping::FieldSchema;
use rust_wizzio_lead::handlers::AppState;
use rust_wizzio_lead::router::{assemble, build_router, LEAD_PATH};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORIGIN: &str = "https://www.perenitis.fr";

/// Helper function to create test config
fn create_test_config(wizzio_base_url: String) -> Config {
    Config {
        wizzio_api_key: Some("TestKey".to_string()),
        wizzio_api_secret: Some("TestSecret".to_string()),
        wizzio_base_url,
        field_schema: FieldSchema::Minimal,
        cors_allowed_origin: Some(ORIGIN.to_string()),
        ..Config::default()
    }
}

fn create_app(config: Config) -> Router {
    build_router(Arc::new(AppState::new(config).unwrap()))
}

fn post_lead(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(LEAD_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const VALID_LEAD: &str =
    r#"{"nom":"Dupont","email":"claire@example.fr","telephone1":"06 12 34 56 78"}"#;

#[tokio::test]
async fn test_health() {
    let app = create_app(Config::default());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_post_relays_wizzio_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/PushLead/push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": 1, "id": 42})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(create_test_config(mock_server.uri()));
    let response = app.oneshot(post_lead(VALID_LEAD)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"state": 1, "id": 42}));
}

#[tokio::test]
async fn test_upstream_failure_is_http_200_with_state_9() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("oops"))
        .mount(&mock_server)
        .await;

    let app = create_app(create_test_config(mock_server.uri()));
    let response = app.oneshot(post_lead(VALID_LEAD)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"state": 9, "message": "Importation Lead Error", "status": 503, "raw": "oops"})
    );
}

#[tokio::test]
async fn test_missing_credentials_skip_wizzio() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": 1})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = Config {
        wizzio_api_secret: None,
        ..create_test_config(mock_server.uri())
    };
    let response = create_app(config).oneshot(post_lead(VALID_LEAD)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"state": 9, "message": "Missing Wizzio API credentials"})
    );
}

#[tokio::test]
async fn test_missing_fields_are_listed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": 1})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_app(create_test_config(mock_server.uri()));
    let response = app
        .oneshot(post_lead(r#"{"nom":"Dupont","telephone1":"0612345678"}"#))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["state"], 9);
    assert_eq!(body["missing"], json!(["email"]));
}

#[tokio::test]
async fn test_malformed_json_is_treated_as_empty_submission() {
    let app = create_app(create_test_config("http://127.0.0.1:1".to_string()));
    let response = app.oneshot(post_lead("{nom: Dupont")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["missing"], json!(["nom", "email", "telephone1"]));
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let app = create_app(Config::default());

    let response = app
        .oneshot(Request::get(LEAD_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        json_body(response).await,
        json!({"state": 9, "message": "Method not allowed"})
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = create_app(create_test_config("http://127.0.0.1:1".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(LEAD_PATH)
                .header(header::ORIGIN, ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_plain_options_is_ok() {
    let app = create_app(Config::default());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(LEAD_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = create_app(create_test_config("http://127.0.0.1:1".to_string()));
    let huge = format!(r#"{{"nom":"{}"}}"#, "x".repeat(128 * 1024));

    let response = app.oneshot(post_lead(&huge)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

async fn exploding_handler() -> StatusCode {
    panic!("boom")
}

#[tokio::test]
async fn test_panic_in_handler_becomes_server_error_envelope() {
    let config = create_test_config("http://127.0.0.1:1".to_string());
    let state = Arc::new(AppState::new(config).unwrap());
    let routes = Router::new().route(LEAD_PATH, post(exploding_handler));
    let app = assemble(state, routes);

    let response = app.oneshot(post_lead(VALID_LEAD)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"state": 9, "message": "Server error", "error": "boom"})
    );
}
