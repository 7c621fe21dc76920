//! Detector de conflictos
//!
//! Decide si un vehículo ya está reservado en un intervalo. Los intervalos
//! son semiabiertos: una gira que termina a las T no choca con otra que
//! empieza a las T.

use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::models::Tour;
use crate::repositories::SchedulingStore;
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_interval;

/// Filtrar las giras de `vehicle_id` que chocan con `[start, end)`
pub fn conflicting_tours<'a>(
    existing: &'a [Tour],
    vehicle_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> impl Iterator<Item = &'a Tour> + 'a {
    existing
        .iter()
        .filter(move |t| t.vehicle_id == Some(vehicle_id) && t.overlaps(start, end))
}

#[derive(Clone)]
pub struct ConflictDetector {
    store: Arc<dyn SchedulingStore>,
}

impl ConflictDetector {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// `true` si alguna gira del vehículo choca con `[start, end)`
    pub async fn check_conflict(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<bool> {
        Ok(self.find_conflict(vehicle_id, start, end).await?.is_some())
    }

    /// Primera gira en conflicto, si existe
    pub async fn find_conflict(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Option<Tour>> {
        validate_interval(start, end)?;

        let candidates = self.store.find_overlapping(vehicle_id, start, end).await?;
        let conflict = conflicting_tours(&candidates, vehicle_id, start, end).next().cloned();

        if let Some(tour) = &conflict {
            tracing::debug!(
                "🚫 Vehículo {} ocupado por la gira {} ({} - {})",
                vehicle_id,
                tour.id,
                tour.start_at,
                tour.end_at
            );
        }

        Ok(conflict)
    }
}
