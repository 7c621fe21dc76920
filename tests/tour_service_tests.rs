use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Arc;

use fleet_scheduling::models::{
    CreateTourRequest, ProposedTour, Route, Tour, Vehicle, VehicleStatus,
};
use fleet_scheduling::repositories::InMemoryStore;
use fleet_scheduling::services::TourService;
use fleet_scheduling::AppError;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn vehicle(id: i64, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id,
        license_plate: format!("34 TUR {:03}", id),
        seating_capacity: 16,
        make: Some("Mercedes".to_string()),
        model: Some("Sprinter".to_string()),
        acquisition_year: Some(2020),
        status,
    }
}

async fn setup(vehicles: i64) -> (InMemoryStore, TourService) {
    let store = InMemoryStore::new();
    store
        .add_route(Route { id: 1, name: "Kapadokya".to_string(), duration_days: 2, active: true })
        .await;
    for id in 1..=vehicles {
        store.add_vehicle(vehicle(id, VehicleStatus::Active)).await;
    }
    let service = TourService::new(Arc::new(store.clone()));
    (store, service)
}

fn request(vehicle_id: Option<i64>, start: NaiveDateTime, end: NaiveDateTime) -> CreateTourRequest {
    CreateTourRequest {
        route_id: 1,
        vehicle_id,
        start_at: start,
        end_at: end,
        passengers: 12,
        price: Decimal::new(45_000, 2),
        notes: None,
    }
}

fn proposed(start: NaiveDateTime, end: NaiveDateTime) -> ProposedTour {
    ProposedTour {
        route_id: 1,
        start_at: start,
        end_at: end,
        passengers: 10,
        price: Decimal::new(30_000, 2),
        notes: None,
    }
}

fn assert_no_double_booking(tours: &[Tour]) {
    for (i, a) in tours.iter().enumerate() {
        for b in &tours[i + 1..] {
            if a.vehicle_id.is_some() && a.vehicle_id == b.vehicle_id {
                assert!(
                    !a.overlaps(b.start_at, b.end_at),
                    "tours {} and {} overlap on vehicle {:?}",
                    a.id,
                    b.id,
                    a.vehicle_id
                );
            }
        }
    }
}

#[tokio::test]
async fn test_create_then_conflict() {
    let (_, service) = setup(1).await;

    let created = service
        .create_tour(request(Some(1), at(1, 8), at(3, 8)))
        .await
        .unwrap();
    assert_eq!(created.vehicle_id, Some(1));
    assert!(!created.externally_rented);

    let overlapping = service.create_tour(request(Some(1), at(2, 8), at(4, 8))).await;
    match overlapping {
        Err(AppError::ScheduleConflict { vehicle_id, .. }) => assert_eq!(vehicle_id, 1),
        other => panic!("expected a schedule conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_touching_intervals_do_not_conflict() {
    let (store, service) = setup(1).await;

    service.create_tour(request(Some(1), at(1, 8), at(3, 8))).await.unwrap();
    service.create_tour(request(Some(1), at(3, 8), at(5, 8))).await.unwrap();

    assert_eq!(store.tours().await.len(), 2);
}

#[tokio::test]
async fn test_external_tours_never_conflict() {
    let (store, service) = setup(1).await;

    for _ in 0..3 {
        let tour = service.create_tour(request(None, at(1, 8), at(3, 8))).await.unwrap();
        assert!(tour.externally_rented);
    }
    assert_eq!(store.tours().await.len(), 3);
}

#[tokio::test]
async fn test_missing_references_and_bad_input() {
    let (_, service) = setup(1).await;

    let mut unknown_route = request(Some(1), at(1, 8), at(2, 8));
    unknown_route.route_id = 99;
    assert!(matches!(
        service.create_tour(unknown_route).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        service.create_tour(request(Some(99), at(1, 8), at(2, 8))).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        service.create_tour(request(Some(1), at(2, 8), at(2, 8))).await,
        Err(AppError::Validation(_))
    ));

    let mut empty = request(Some(1), at(1, 8), at(2, 8));
    empty.passengers = 0;
    assert!(matches!(
        service.create_tour(empty).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_books_vehicle_once() {
    let (store, service) = setup(1).await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            // todas chocan entre sí alrededor del día 10
            let start = at(10, 6) + Duration::minutes(i * 5);
            tokio::spawn(async move {
                service
                    .create_tour(request(Some(1), start, start + Duration::hours(8)))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::ScheduleConflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(store.tours().await.len(), 1);
}

#[tokio::test]
async fn test_random_requests_never_double_book() {
    let (store, service) = setup(5).await;
    let mut rng = StdRng::seed_from_u64(20240501);
    let mut accepted: Vec<(i64, NaiveDateTime, NaiveDateTime)> = Vec::new();

    for _ in 0..300 {
        let vehicle_id = rng.gen_range(1..=5);
        let start = at(1, 0) + Duration::hours(rng.gen_range(0..24 * 28));
        let end = start + Duration::hours(rng.gen_range(1..72));

        let expected_conflict = accepted
            .iter()
            .any(|&(v, s, e)| v == vehicle_id && start < e && s < end);

        let result = service.create_tour(request(Some(vehicle_id), start, end)).await;
        match result {
            Ok(_) => {
                assert!(!expected_conflict);
                accepted.push((vehicle_id, start, end));
            }
            Err(AppError::ScheduleConflict { .. }) => assert!(expected_conflict),
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    let tours = store.tours().await;
    assert_eq!(tours.len(), accepted.len());
    assert_no_double_booking(&tours);
}

#[tokio::test]
async fn test_bulk_allocate_uses_active_pool() {
    let (store, service) = setup(2).await;
    store.add_vehicle(vehicle(3, VehicleStatus::UnderMaintenance)).await;

    let tours = vec![
        proposed(at(1, 8), at(3, 8)),
        proposed(at(2, 8), at(4, 8)),
        proposed(at(3, 8), at(5, 8)),
        proposed(at(3, 9), at(4, 9)),
    ];

    let assignments = service.bulk_allocate(&tours, 10).await.unwrap();
    let vehicles: Vec<Option<i64>> = assignments.iter().map(|a| a.vehicle_id).collect();
    assert_eq!(vehicles, vec![Some(1), Some(2), Some(1), None]);

    // el pool se recorta a los primeros vehículos activos por ID
    let assignments = service.bulk_allocate(&tours, 1).await.unwrap();
    let vehicles: Vec<Option<i64>> = assignments.iter().map(|a| a.vehicle_id).collect();
    assert_eq!(vehicles, vec![Some(1), None, Some(1), None]);

    // la asignación no persiste nada
    assert!(store.tours().await.is_empty());
}

#[tokio::test]
async fn test_bulk_allocate_rejects_invalid_tour() {
    let (_, service) = setup(2).await;
    let tours = vec![proposed(at(1, 8), at(3, 8)), proposed(at(4, 8), at(4, 8))];

    assert!(matches!(
        service.bulk_allocate(&tours, 2).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_backfill_persists_assignments() {
    let (store, service) = setup(2).await;
    let tours = vec![
        proposed(at(1, 8), at(3, 8)),
        proposed(at(2, 8), at(4, 8)),
        proposed(at(3, 8), at(5, 8)),
        proposed(at(2, 12), at(2, 18)),
    ];

    let created = service.backfill(&tours, 2).await.unwrap();
    assert_eq!(created.len(), 4);
    assert_eq!(created.iter().filter(|t| t.externally_rented).count(), 1);

    let stored = store.tours().await;
    assert_eq!(stored.len(), 4);
    assert_no_double_booking(&stored);
}

#[tokio::test]
async fn test_backfill_routes_around_existing_bookings() {
    let (store, service) = setup(2).await;
    service.create_tour(request(Some(1), at(5, 0), at(5, 12))).await.unwrap();

    let tours = vec![proposed(at(1, 8), at(2, 8)), proposed(at(5, 6), at(6, 6))];
    let created = service.backfill(&tours, 2).await.unwrap();

    let vehicles: Vec<Option<i64>> = created.iter().map(|t| t.vehicle_id).collect();
    assert_eq!(vehicles, vec![Some(1), Some(2)]);

    let stored = store.tours().await;
    assert_eq!(stored.len(), 3);
    assert_no_double_booking(&stored);
}

#[tokio::test]
async fn test_backfill_spills_to_external_when_pool_is_booked() {
    let (store, service) = setup(1).await;
    service.create_tour(request(Some(1), at(5, 0), at(5, 12))).await.unwrap();

    let tours = vec![proposed(at(1, 8), at(2, 8)), proposed(at(5, 6), at(6, 6))];
    let created = service.backfill(&tours, 1).await.unwrap();

    assert_eq!(created[0].vehicle_id, Some(1));
    assert!(created[1].externally_rented);
    assert_no_double_booking(&store.tours().await);
}

#[tokio::test]
async fn test_failed_backfill_persists_nothing() {
    let (store, service) = setup(2).await;
    service.create_tour(request(Some(1), at(5, 0), at(5, 12))).await.unwrap();

    let mut unknown_route = proposed(at(5, 6), at(6, 6));
    unknown_route.route_id = 99;
    let tours = vec![proposed(at(1, 8), at(2, 8)), unknown_route];

    assert!(matches!(
        service.backfill(&tours, 2).await,
        Err(AppError::NotFound(_))
    ));
    // sólo queda la reserva previa
    assert_eq!(store.tours().await.len(), 1);
}
