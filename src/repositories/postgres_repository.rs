//! Repositorio PostgreSQL
//!
//! Implementación de `SchedulingStore` con SQLx. El esquema se aprovisiona
//! fuera de este servicio; las columnas esperadas son:
//!
//! - `vehicles(id BIGINT, license_plate TEXT, seating_capacity INT, make TEXT,
//!   model TEXT, acquisition_year INT, status vehicle_status)`
//! - `routes(id BIGINT, name TEXT, duration_days INT, active BOOL)`
//! - `tours(id BIGSERIAL, route_id BIGINT, vehicle_id BIGINT NULL,
//!   start_at TIMESTAMP, end_at TIMESTAMP, passengers INT, price NUMERIC(12,2),
//!   notes TEXT, externally_rented BOOL, created_at TIMESTAMPTZ)`
//!
//! Para despliegues con varias instancias se recomienda además la restricción
//! `EXCLUDE USING gist (vehicle_id WITH =, tsrange(start_at, end_at) WITH &&)`;
//! sus violaciones se devuelven como `ScheduleConflict`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::PgPool;

use super::SchedulingStore;
use crate::models::{NewTour, Route, Tour, Vehicle};
use crate::utils::errors::{AppError, AppResult};

/// SQLSTATE de `exclusion_violation`
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_insert_error(e: sqlx::Error, tour: &NewTour) -> AppError {
        if let (sqlx::Error::Database(db), Some(vehicle_id)) = (&e, tour.vehicle_id) {
            if db.code().as_deref() == Some(EXCLUSION_VIOLATION) {
                return AppError::ScheduleConflict {
                    vehicle_id,
                    start: tour.start_at,
                    end: tour.end_at,
                };
            }
        }
        AppError::Storage(e)
    }
}

#[async_trait]
impl SchedulingStore for PgStore {
    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Tour>> {
        let tours = sqlx::query_as::<_, Tour>(
            r#"
            SELECT * FROM tours
            WHERE vehicle_id = $1
            AND $2 < end_at
            AND start_at < $3
            ORDER BY start_at, id
            "#,
        )
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(tours)
    }

    async fn insert(&self, tour: NewTour) -> AppResult<Tour> {
        let stored = sqlx::query_as::<_, Tour>(
            r#"
            INSERT INTO tours (route_id, vehicle_id, start_at, end_at, passengers, price, notes, externally_rented, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(tour.route_id)
        .bind(tour.vehicle_id)
        .bind(tour.start_at)
        .bind(tour.end_at)
        .bind(tour.passengers)
        .bind(tour.price)
        .bind(tour.notes.as_deref())
        .bind(tour.externally_rented())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, &tour))?;

        Ok(stored)
    }

    async fn list_active_vehicles(&self) -> AppResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM vehicles WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn list_tours_in_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Tour>> {
        let tours = sqlx::query_as::<_, Tour>(
            r#"
            SELECT * FROM tours
            WHERE start_at::date BETWEEN $1 AND $2
            ORDER BY start_at, id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(tours)
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_route(&self, id: i64) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
