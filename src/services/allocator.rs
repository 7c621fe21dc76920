//! Asignación masiva de vehículos
//!
//! Planificación voraz sobre un conjunto fijo de vehículos: las giras se
//! procesan en orden de salida y cada una toma el primer vehículo (por ID
//! ascendente) libre en su hora de salida. Si no hay ninguno, la gira queda
//! como alquiler externo y no consume capacidad.
//!
//! El estado "libre desde" vive en un mapa local a cada ejecución, así que
//! la misma entrada produce siempre la misma asignación.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::conflict_detector::conflicting_tours;
use crate::models::{Assignment, ProposedTour, Tour};

/// Totales de una ejecución del asignador
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub total: usize,
    pub assigned: usize,
    pub external: usize,
}

impl AllocationSummary {
    pub fn of(assignments: &[Assignment]) -> Self {
        let external = assignments.iter().filter(|a| a.is_external()).count();
        Self {
            total: assignments.len(),
            assigned: assignments.len() - external,
            external,
        }
    }
}

/// Asignar vehículos del `pool` a las giras propuestas
///
/// Devuelve una asignación por gira, en orden de procesamiento (salida
/// ascendente; los empates conservan el orden de entrada). `sequence`
/// apunta a la posición original de la gira.
pub fn allocate(tours: &[ProposedTour], pool: &[i64]) -> Vec<Assignment> {
    allocate_around(tours, pool, &[])
}

/// Igual que [`allocate`], pero un vehículo no se elige para una gira que
/// choque con alguna de sus reservas en `booked`
pub fn allocate_around(tours: &[ProposedTour], pool: &[i64], booked: &[Tour]) -> Vec<Assignment> {
    let mut available_from: BTreeMap<i64, NaiveDateTime> = pool
        .iter()
        .map(|&vehicle_id| (vehicle_id, NaiveDateTime::MIN))
        .collect();

    let mut order: Vec<usize> = (0..tours.len()).collect();
    order.sort_by_key(|&i| tours[i].start_at);

    order
        .into_iter()
        .map(|sequence| {
            let tour = &tours[sequence];
            let vehicle_id = available_from
                .iter_mut()
                .find(|(vehicle_id, free_at)| {
                    **free_at <= tour.start_at
                        && conflicting_tours(booked, **vehicle_id, tour.start_at, tour.end_at)
                            .next()
                            .is_none()
                })
                .map(|(&vehicle_id, free_at)| {
                    *free_at = tour.end_at;
                    vehicle_id
                });

            Assignment {
                sequence,
                tour: tour.clone(),
                vehicle_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn proposed(start: NaiveDateTime, end: NaiveDateTime) -> ProposedTour {
        ProposedTour {
            route_id: 1,
            start_at: start,
            end_at: end,
            passengers: 20,
            price: Decimal::new(10_000, 0),
            notes: None,
        }
    }

    #[test]
    fn test_two_vehicle_scenario() {
        let tours = vec![
            proposed(at(1, 8), at(3, 17)),
            proposed(at(2, 9), at(4, 10)),
            proposed(at(3, 18), at(5, 9)),
        ];

        let assignments = allocate(&tours, &[1, 2]);
        let vehicles: Vec<Option<i64>> = assignments.iter().map(|a| a.vehicle_id).collect();

        assert_eq!(vehicles, vec![Some(1), Some(2), Some(1)]);
        assert_eq!(AllocationSummary::of(&assignments).external, 0);
    }

    #[test]
    fn test_touching_tours_reuse_vehicle() {
        let tours = vec![proposed(at(1, 8), at(3, 17)), proposed(at(3, 17), at(4, 9))];
        let assignments = allocate(&tours, &[5, 9]);
        assert_eq!(assignments[0].vehicle_id, Some(5));
        assert_eq!(assignments[1].vehicle_id, Some(5));
    }

    #[test]
    fn test_exhausted_pool_spills_to_external() {
        let tours = vec![
            proposed(at(1, 8), at(3, 17)),
            proposed(at(1, 9), at(3, 17)),
            proposed(at(1, 10), at(3, 17)),
        ];

        let assignments = allocate(&tours, &[1, 2]);
        assert_eq!(assignments[2].vehicle_id, None);
        assert_eq!(
            AllocationSummary::of(&assignments),
            AllocationSummary { total: 3, assigned: 2, external: 1 }
        );
    }

    #[test]
    fn test_empty_pool_makes_everything_external() {
        let tours = vec![proposed(at(1, 8), at(2, 8))];
        let assignments = allocate(&tours, &[]);
        assert!(assignments.iter().all(|a| a.is_external()));
    }

    #[test]
    fn test_unsorted_input_processed_chronologically() {
        let tours = vec![
            proposed(at(3, 18), at(5, 9)),
            proposed(at(1, 8), at(3, 17)),
            proposed(at(2, 9), at(4, 10)),
        ];

        let assignments = allocate(&tours, &[2, 1]);
        let order: Vec<usize> = assignments.iter().map(|a| a.sequence).collect();
        assert_eq!(order, vec![1, 2, 0]);
        // el pool se recorre por ID ascendente aunque venga desordenado
        assert_eq!(assignments[0].vehicle_id, Some(1));
        assert_eq!(assignments[1].vehicle_id, Some(2));
        assert_eq!(assignments[2].vehicle_id, Some(1));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tours = vec![proposed(at(1, 8), at(2, 8)), proposed(at(1, 8), at(3, 8))];
        let assignments = allocate(&tours, &[1, 2]);
        assert_eq!(assignments[0].sequence, 0);
        assert_eq!(assignments[0].vehicle_id, Some(1));
        assert_eq!(assignments[1].sequence, 1);
        assert_eq!(assignments[1].vehicle_id, Some(2));
    }

    #[test]
    fn test_deterministic_and_never_double_books() {
        let mut tours = Vec::new();
        for i in 0..200u32 {
            let start = at(1, 0) + Duration::hours(i64::from((i * 7) % 240));
            let end = start + Duration::hours(i64::from(20 + (i * 13) % 60));
            tours.push(proposed(start, end));
        }
        let pool: Vec<i64> = (1..=15).collect();

        let first = allocate(&tours, &pool);
        let second = allocate(&tours, &pool);
        assert_eq!(first, second);

        let mut by_vehicle: HashMap<i64, Vec<&Assignment>> = HashMap::new();
        for assignment in &first {
            if let Some(vehicle_id) = assignment.vehicle_id {
                by_vehicle.entry(vehicle_id).or_default().push(assignment);
            }
        }
        for assignments in by_vehicle.values() {
            for (i, a) in assignments.iter().enumerate() {
                for b in &assignments[i + 1..] {
                    assert!(
                        !(a.tour.start_at < b.tour.end_at && b.tour.start_at < a.tour.end_at),
                        "double booking between {} and {}",
                        a.sequence,
                        b.sequence
                    );
                }
            }
        }
    }

    #[test]
    fn test_existing_bookings_are_skipped() {
        let booked = vec![Tour {
            id: 77,
            route_id: 1,
            vehicle_id: Some(1),
            start_at: at(5, 0),
            end_at: at(5, 12),
            passengers: 10,
            price: Decimal::ZERO,
            notes: None,
            externally_rented: false,
            created_at: chrono::Utc::now(),
        }];
        let tours = vec![proposed(at(1, 8), at(2, 8)), proposed(at(5, 6), at(6, 6))];

        let assignments = allocate_around(&tours, &[1, 2], &booked);
        let vehicles: Vec<Option<i64>> = assignments.iter().map(|a| a.vehicle_id).collect();
        assert_eq!(vehicles, vec![Some(1), Some(2)]);

        // con un solo vehículo la gira que choca pasa a alquiler externo
        let assignments = allocate_around(&tours, &[1], &booked);
        assert_eq!(assignments[1].vehicle_id, None);
        // una reserva que termina justo a la salida no bloquea
        let tours = vec![proposed(at(5, 12), at(6, 12))];
        assert_eq!(allocate_around(&tours, &[1], &booked)[0].vehicle_id, Some(1));
    }
}
