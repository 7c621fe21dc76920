//! Concurrencia pico de flota
//!
//! Aproxima la demanda simultánea de vehículos como el máximo de giras que
//! salen el mismo día natural dentro del rango. Una gira de varios días sólo
//! cuenta en su día de salida.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::volume::{daily_counts, in_range};
use crate::models::analytics::PeakConcurrencyReport;
use crate::models::Tour;

/// `max(0, demand - capacity)`
pub fn shortage(demand: u32, fleet_capacity: u32) -> u32 {
    demand.saturating_sub(fleet_capacity)
}

/// `max(0, capacity - demand)`
pub fn surplus(demand: u32, fleet_capacity: u32) -> u32 {
    fleet_capacity.saturating_sub(demand)
}

/// Calcular el reporte de concurrencia para `[from, to]`
///
/// Las giras fuera del rango se ignoran, así que el resultado no depende de
/// cuánto filtre el almacenamiento.
pub fn compute_peak(
    tours: &[Tour],
    from: NaiveDate,
    to: NaiveDate,
    fleet_capacity: u32,
) -> PeakConcurrencyReport {
    let selected: Vec<&Tour> = in_range(tours, from, to).collect();

    let peak_concurrent = daily_counts(selected.iter().copied())
        .iter()
        .map(|day| day.tour_count)
        .max()
        .unwrap_or(0);

    let distinct_vehicles: BTreeSet<i64> = selected.iter().filter_map(|t| t.vehicle_id).collect();
    let external_count = selected.iter().filter(|t| t.externally_rented).count();

    PeakConcurrencyReport {
        from,
        to,
        total_tours: selected.len() as u32,
        distinct_vehicles_used: distinct_vehicles.len() as u32,
        external_count: external_count as u32,
        peak_concurrent,
        fleet_capacity,
        shortage: shortage(peak_concurrent, fleet_capacity),
        surplus: surplus(peak_concurrent, fleet_capacity),
    }
}
