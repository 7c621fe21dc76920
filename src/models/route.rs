//! Modelo de Route
//!
//! Itinerarios de referencia (sólo lectura para el núcleo).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Route principal - mapea a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub name: String,
    /// Duración nominal en días
    pub duration_days: i32,
    pub active: bool,
}
