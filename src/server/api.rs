use crate::catalog::query::ProductQuery;
use crate::catalog::service::CatalogService;
use crate::catalog::CatalogError;
use crate::models::catalog::ApiEnvelope;
use crate::models::chat::Suggestion;
use crate::responder::{ self, quick_suggestions, DEFAULT_SITE_NAME };
use std::collections::HashMap;
use std::error::Error;
use std::net::SocketAddr;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ Path, Query, State },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error, warn };

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub contact_link: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
    show_suggestions: bool,
    intent: &'static str,
    suggestions: Vec<Suggestion>,
}

#[derive(Serialize)]
struct WidgetResponse {
    site_name: String,
    suggestions: Vec<Suggestion>,
    contact_link: String,
}

#[derive(Serialize)]
struct ReloadResponse {
    success: bool,
    message: String,
    products: usize,
    categories: usize,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/homepage", get(homepage_handler))
        .route("/api/products", get(products_handler))
        .route("/api/products/{slug}", get(product_detail_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/articles/{slug}", get(article_detail_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/widget", get(widget_handler))
        .route("/api/catalog/reload", post(reload_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    http_port: u16,
    state: AppState
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(state);

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            }
        }
    });

    info!("HTTP server started");
    Ok(())
}

fn ok<T: Serialize>(data: T) -> Response {
    Json(ApiEnvelope {
        success: Some(true),
        data: Some(data),
        meta: None,
        message: None,
    }).into_response()
}

fn failure(code: StatusCode, message: String) -> Response {
    (code, Json(ApiEnvelope::<()> {
        success: Some(false),
        data: None,
        meta: None,
        message: Some(message),
    })).into_response()
}

fn catalog_failure(err: CatalogError) -> Response {
    match err {
        CatalogError::NotFound(slug) => failure(StatusCode::NOT_FOUND, format!("'{}' not found", slug)),
        other => {
            error!("Catalog read failed: {}", other);
            failure(StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn homepage_handler(State(state): State<AppState>) -> Response {
    match state.catalog.homepage().await {
        Ok(data) => ok(data),
        Err(e) => catalog_failure(e),
    }
}

async fn products_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>
) -> Response {
    let query = ProductQuery::from_params(&params);
    match state.catalog.products(&query).await {
        Ok(page) =>
            Json(ApiEnvelope {
                success: Some(true),
                data: Some(page.data),
                meta: Some(page.meta),
                message: None,
            }).into_response(),
        Err(e) => catalog_failure(e),
    }
}

async fn product_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>
) -> Response {
    match state.catalog.product_detail(&slug).await {
        Ok(product) => ok(product),
        Err(e) => catalog_failure(e),
    }
}

async fn categories_handler(State(state): State<AppState>) -> Response {
    match state.catalog.categories().await {
        Ok(categories) => ok(categories),
        Err(e) => catalog_failure(e),
    }
}

async fn article_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>
) -> Response {
    match state.catalog.article_detail(&slug).await {
        Ok(detail) => ok(detail),
        Err(e) => catalog_failure(e),
    }
}

/// Stateless single-shot answer against the current snapshot, no delay.
async fn chat_handler(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    if req.message.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Message must not be empty".to_string());
    }

    let snapshot = state.catalog.snapshot().await;
    let resolution = responder::classify(&req.message, &snapshot);
    let show_suggestions = resolution.reply.show_suggestions;

    Json(ChatResponse {
        reply: resolution.reply.text,
        show_suggestions,
        intent: resolution.intent.as_str(),
        suggestions: if show_suggestions { quick_suggestions() } else { Vec::new() },
    }).into_response()
}

async fn widget_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.catalog.snapshot().await;
    Json(WidgetResponse {
        site_name: snapshot.settings.get_or("site_name", DEFAULT_SITE_NAME).to_string(),
        suggestions: quick_suggestions(),
        contact_link: state.contact_link.clone(),
    }).into_response()
}

async fn reload_handler(State(state): State<AppState>) -> Response {
    match state.catalog.refresh().await {
        Ok(snapshot) =>
            Json(ReloadResponse {
                success: true,
                message: "Catalog reloaded".to_string(),
                products: snapshot.products.len(),
                categories: snapshot.categories.len(),
            }).into_response(),
        Err(e) => {
            warn!("Manual catalog reload failed: {}", e);
            let current = state.catalog.snapshot().await;
            (
                StatusCode::BAD_GATEWAY,
                Json(ReloadResponse {
                    success: false,
                    message: format!("Reload failed, keeping current catalog: {}", e),
                    products: current.products.len(),
                    categories: current.categories.len(),
                }),
            ).into_response()
        }
    }
}
