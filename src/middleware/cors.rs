//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::EnvironmentConfig;

/// CORS según el entorno: abierto en desarrollo, sólo lectura y creación
/// de giras con cabeceras JSON en el resto
pub fn cors_middleware(config: &EnvironmentConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}
