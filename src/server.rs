//! HTTP front for the orchestrator.
//!
//! `POST /analyze-image` always answers 200; degraded results are signalled
//! in-band through `notice` and `error`.

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AnalyzerError, ValidationError};
use crate::model::{AnalysisResult, AnalyzeRequest};
use crate::orchestrator::Orchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        AppState {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Routes plus a permissive CORS layer that answers preflight requests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze-image", post(analyze_image_handler))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<(), AnalyzerError> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// Body is taken as raw bytes so a malformed payload still gets the
// catalog answer instead of axum's 4xx rejection.
async fn analyze_image_handler(State(state): State<AppState>, body: Bytes) -> Json<AnalysisResult> {
    let orchestrator = &state.orchestrator;

    let result = match serde_json::from_slice::<AnalyzeRequest>(&body) {
        Ok(AnalyzeRequest {
            image_base64: Some(image),
        }) => orchestrator.analyze(&image).await,
        Ok(_) => {
            warn!("Request carried no imageBase64 field");
            orchestrator.invalid_request(&ValidationError::MissingImage)
        }
        Err(e) => {
            warn!("Could not decode request body: {}", e);
            orchestrator.invalid_request(&ValidationError::MalformedBody(e.to_string()))
        }
    };

    info!(
        "Returning {} recipes using {}",
        result.recipes.len(),
        result.provider_used
    );
    Json(result)
}
