//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de flota, itinerarios,
//! giras y reportes de capacidad.

pub mod analytics;
pub mod route;
pub mod tour;
pub mod vehicle;

pub use route::Route;
pub use tour::{Assignment, CreateTourRequest, NewTour, ProposedTour, Tour};
pub use vehicle::{Vehicle, VehicleStatus};
