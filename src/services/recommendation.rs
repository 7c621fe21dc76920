//! Recomendaciones por temporada
//!
//! Compara la media diaria de salidas en temporada alta y baja con la
//! capacidad de flota. El texto de los avisos es cosa de la presentación;
//! aquí sólo se devuelven el tipo de aviso y sus parámetros.

use chrono::Datelike;

use super::volume::daily_counts;
use crate::models::analytics::{HighSeasonAdvisory, LowSeasonAdvisory, Recommendation, Season};
use crate::models::Tour;

/// Por debajo de esta media diaria en temporada baja se propone liberar
/// vehículos. Literal independiente de la capacidad de flota.
pub const LOW_SEASON_UTILIZATION_THRESHOLD: f64 = 20.0;

pub fn advise_high_season(avg_daily: f64, fleet_capacity: u32) -> HighSeasonAdvisory {
    let capacity = f64::from(fleet_capacity);
    if avg_daily > capacity {
        HighSeasonAdvisory::AcquireVehicles {
            count: (avg_daily - capacity).round() as u32,
        }
    } else {
        HighSeasonAdvisory::FleetSufficient
    }
}

pub fn advise_low_season(avg_daily: f64, fleet_capacity: u32) -> LowSeasonAdvisory {
    if avg_daily < LOW_SEASON_UTILIZATION_THRESHOLD {
        // una capacidad menor que la media no deja nada que liberar
        let idle = (f64::from(fleet_capacity) - avg_daily).round().max(0.0);
        LowSeasonAdvisory::FreeVehicles { count: idle as u32 }
    } else {
        LowSeasonAdvisory::UtilizationReasonable
    }
}

/// Media, sobre los días con salidas, del número de giras por día
fn average_daily(counts: &[u32]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().map(|&c| f64::from(c)).sum::<f64>() / counts.len() as f64
}

/// Calcular la recomendación anual para las giras que salen en `year`
pub fn recommend(tours: &[Tour], year: i32, fleet_capacity: u32) -> Recommendation {
    let of_year: Vec<&Tour> = tours.iter().filter(|t| t.start_at.year() == year).collect();

    let (high, low): (Vec<_>, Vec<_>) = daily_counts(of_year.iter().copied())
        .into_iter()
        .partition(|day| Season::of_date(day.date) == Season::High);

    let high_counts: Vec<u32> = high.iter().map(|d| d.tour_count).collect();
    let low_counts: Vec<u32> = low.iter().map(|d| d.tour_count).collect();

    let high_season_avg_daily = average_daily(&high_counts);
    let low_season_avg_daily = average_daily(&low_counts);

    Recommendation {
        year,
        high_season_avg_daily,
        low_season_avg_daily,
        fleet_capacity,
        total_external_rentals: of_year.iter().filter(|t| t.externally_rented).count() as u32,
        advisory_high_season: advise_high_season(high_season_avg_daily, fleet_capacity),
        advisory_low_season: advise_low_season(low_season_avg_daily, fleet_capacity),
    }
}
