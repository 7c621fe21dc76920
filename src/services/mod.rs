//! Services module
//!
//! Este módulo contiene la lógica de negocio: detección de conflictos,
//! asignación de vehículos y reportes de capacidad. Los cálculos son
//! funciones puras; `tour_service` y `analytics_service` los orquestan
//! sobre el almacenamiento.

pub mod allocator;
pub mod analytics_service;
pub mod conflict_detector;
pub mod monthly_balance;
pub mod peak_concurrency;
pub mod recommendation;
pub mod tour_service;
pub mod volume;

pub use analytics_service::AnalyticsService;
pub use conflict_detector::ConflictDetector;
pub use tour_service::TourService;
