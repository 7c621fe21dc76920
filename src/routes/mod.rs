//! Rutas HTTP
//!
//! Adaptador delgado sobre los servicios: cada handler extrae parámetros,
//! llama al servicio y devuelve JSON. Los errores se convierten con
//! `AppError: IntoResponse`.

pub mod analytics_routes;
pub mod tour_routes;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la API
pub fn create_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api/tours", tour_routes::create_tour_router())
        .nest("/api/analytics", analytics_routes::create_analytics_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check con ping al almacenamiento; 503 si no responde
async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "store": "ok", "timestamp": timestamp })),
        ),
        Err(e) => {
            tracing::error!("❌ Almacenamiento no disponible: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "store": "error",
                    "message": e.to_string(),
                    "timestamp": timestamp,
                })),
            )
        }
    }
}
