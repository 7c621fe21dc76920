//! Planificación de giras y analítica de flota
//!
//! Núcleo de un operador de giras: detección de dobles reservas de
//! vehículos, asignación voraz de la flota propia con desbordamiento a
//! alquiler externo y reportes de capacidad (pico diario, balance mensual,
//! recomendaciones por temporada y volúmenes).

pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
