//! Repositorios
//!
//! Contrato de almacenamiento que consume el núcleo de planificación y sus
//! dos implementaciones: PostgreSQL (sqlx) y memoria.

pub mod memory_repository;
pub mod postgres_repository;

pub use memory_repository::InMemoryStore;
pub use postgres_repository::PgStore;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{NewTour, Route, Tour, Vehicle};
use crate::utils::errors::AppResult;
use crate::utils::validation::year_bounds;

/// Capacidad de almacenamiento mínima que necesita el núcleo
///
/// Los rangos de fechas se evalúan sobre el día natural de salida de la
/// gira y son inclusivos en ambos extremos.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Giras del vehículo cuyo intervalo choca con `[start, end)`
    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Tour>>;

    async fn insert(&self, tour: NewTour) -> AppResult<Tour>;

    /// IDs de vehículos activos en orden ascendente
    async fn list_active_vehicles(&self) -> AppResult<Vec<i64>>;

    async fn list_tours_in_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Tour>>;

    async fn list_tours_by_year(&self, year: i32) -> AppResult<Vec<Tour>> {
        let (first, last) = year_bounds(year)?;
        self.list_tours_in_range(first, last).await
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>>;

    async fn find_route(&self, id: i64) -> AppResult<Option<Route>>;

    async fn list_routes(&self) -> AppResult<Vec<Route>>;

    /// Comprobar que el almacenamiento responde
    async fn ping(&self) -> AppResult<()> {
        self.list_routes().await.map(|_| ())
    }
}
