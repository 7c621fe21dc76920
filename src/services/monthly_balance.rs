//! Balance mensual de flota
//!
//! Para cada mes natural: giras, días con salidas y una demanda aproximada
//! como media de giras por día activo. Es una aproximación distinta del
//! máximo diario de `peak_concurrency` y ambas se mantienen.
//!
//! Estado, déficit y excedente se calculan sobre la media sin redondear;
//! `peak_concurrent` es sólo su valor redondeado para mostrar.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use crate::models::analytics::{MonthStatus, MonthlyBalance};
use crate::models::Tour;

/// Por debajo de esta demanda media un mes se considera con excedente.
/// Es un literal independiente de la capacidad de flota.
pub const SURPLUS_STATUS_THRESHOLD: f64 = 25.0;

/// Clasificar la demanda media de un mes
pub fn classify_month(average_daily: f64, fleet_capacity: u32) -> MonthStatus {
    if average_daily > f64::from(fleet_capacity) {
        MonthStatus::Insufficient
    } else if average_daily < SURPLUS_STATUS_THRESHOLD {
        MonthStatus::Surplus
    } else {
        MonthStatus::Normal
    }
}

/// `round(max(0, media - capacidad))`
fn monthly_shortage(average_daily: f64, fleet_capacity: u32) -> u32 {
    (average_daily - f64::from(fleet_capacity)).max(0.0).round() as u32
}

/// `round(max(0, capacidad - media))`
fn monthly_surplus(average_daily: f64, fleet_capacity: u32) -> u32 {
    (f64::from(fleet_capacity) - average_daily).max(0.0).round() as u32
}

#[derive(Default)]
struct MonthAccumulator {
    tour_count: u32,
    external_count: u32,
    active_days: BTreeSet<NaiveDate>,
}

/// Doce registros, de enero a diciembre, para las giras que salen en `year`
pub fn monthly_balance(tours: &[Tour], year: i32, fleet_capacity: u32) -> Vec<MonthlyBalance> {
    let mut months: Vec<MonthAccumulator> = (0..12).map(|_| MonthAccumulator::default()).collect();

    for tour in tours.iter().filter(|t| t.start_at.year() == year) {
        let date = tour.start_date();
        let month = &mut months[date.month0() as usize];
        month.tour_count += 1;
        if tour.externally_rented {
            month.external_count += 1;
        }
        month.active_days.insert(date);
    }

    months
        .into_iter()
        .enumerate()
        .map(|(index, acc)| {
            let active_days = acc.active_days.len() as u32;
            let average_daily = if active_days == 0 {
                0.0
            } else {
                f64::from(acc.tour_count) / f64::from(active_days)
            };

            MonthlyBalance {
                month: index as u32 + 1,
                tour_count: acc.tour_count,
                external_count: acc.external_count,
                active_days,
                average_daily,
                peak_concurrent: average_daily.round() as u32,
                fleet_capacity,
                shortage: monthly_shortage(average_daily, fleet_capacity),
                surplus: monthly_surplus(average_daily, fleet_capacity),
                status: classify_month(average_daily, fleet_capacity),
            }
        })
        .collect()
}
