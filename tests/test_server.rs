use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use mockito::Server;
use recipe_vision::providers::{OpenAIProvider, VisionProvider};
use recipe_vision::server::{router, AppState};
use recipe_vision::{FallbackCatalog, Orchestrator};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

fn catalog() -> Arc<FallbackCatalog> {
    Arc::new(FallbackCatalog::builtin().unwrap())
}

fn app(providers: Vec<Box<dyn VisionProvider>>) -> Router {
    router(AppState::new(Orchestrator::new(providers, catalog())))
}

fn catalog_recipes() -> Value {
    serde_json::to_value(&catalog().recipes).unwrap()
}

async fn post_analyze(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/analyze-image")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_no_providers_returns_demo_recipes() {
    let body = json!({ "imageBase64": IMAGE }).to_string();
    let (status, value) = post_analyze(app(Vec::new()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({
            "recipes": catalog_recipes(),
            "apiUsed": "Demo",
            "notice": "Using demo recipes - API unavailable"
        })
    );
}

#[tokio::test]
async fn test_provider_success_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"content": "[{\"title\": \"Avocado Toast\", \"instructions\": [\"Toast\", \"Smash\"]}]"}}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider: Box<dyn VisionProvider> = Box::new(OpenAIProvider::with_base_url(
        "key".to_string(),
        server.url(),
        "gpt-4o".to_string(),
    ));
    let body = json!({ "imageBase64": IMAGE }).to_string();
    let (status, value) = post_analyze(app(vec![provider]), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["apiUsed"], "OpenAI");
    assert_eq!(value["recipes"][0]["title"], "Avocado Toast");
    assert_eq!(value["recipes"][0]["id"], "recipe-1");
    assert!(value["recipes"][0]["imageUrl"].as_str().unwrap().starts_with("https://"));
    assert!(value.get("notice").is_none());
    assert!(value.get("error").is_none());
}

#[tokio::test]
async fn test_malformed_body_still_returns_ok() {
    let (status, value) = post_analyze(app(Vec::new()), "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["apiUsed"], "Demo");
    assert_eq!(value["recipes"], catalog_recipes());
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed request body"));
}

#[tokio::test]
async fn test_missing_image_field() {
    let (status, value) = post_analyze(app(Vec::new()), "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["apiUsed"], "Demo");
    assert_eq!(value["error"], "No image data provided");
    assert_eq!(value["notice"], "Using demo recipes - invalid image data");
}

#[tokio::test]
async fn test_invalid_prefix_is_rejected_without_provider_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let provider: Box<dyn VisionProvider> = Box::new(OpenAIProvider::with_base_url(
        "key".to_string(),
        server.url(),
        "gpt-4o".to_string(),
    ));
    let body = json!({ "imageBase64": "aGVsbG8gd29ybGQ=" }).to_string();
    let (status, value) = post_analyze(app(vec![provider]), body).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["apiUsed"], "Demo");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("Invalid image format"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = app(Vec::new())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/analyze-image")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(
                    header::ACCESS_CONTROL_REQUEST_HEADERS,
                    "authorization,x-client-info,apikey,content-type",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-client-info"));
    assert!(allowed.contains("apikey"));
}

#[tokio::test]
async fn test_health() {
    let response = app(Vec::new())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["service"], "recipe-vision");
}
