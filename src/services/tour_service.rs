//! Servicio de giras
//!
//! Camino de escritura del núcleo: creación individual protegida contra
//! dobles reservas, asignación masiva y carga histórica (backfill).
//!
//! La comprobación de conflictos y la inserción se ejecutan bajo un candado
//! por vehículo, de modo que dos creaciones concurrentes sobre el mismo
//! vehículo no pueden pasar ambas la comprobación.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

use super::allocator::{allocate, allocate_around, AllocationSummary};
use super::conflict_detector::ConflictDetector;
use crate::models::{Assignment, CreateTourRequest, NewTour, ProposedTour, Tour};
use crate::repositories::SchedulingStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_interval;

type VehicleLocks = Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>;

#[derive(Clone)]
pub struct TourService {
    store: Arc<dyn SchedulingStore>,
    detector: ConflictDetector,
    vehicle_locks: VehicleLocks,
}

impl TourService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            detector: ConflictDetector::new(store.clone()),
            store,
            vehicle_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Crear una gira a partir de una petición externa
    pub async fn create_tour(&self, request: CreateTourRequest) -> AppResult<Tour> {
        request.validate()?;
        self.create(NewTour::from(request)).await
    }

    /// Crear una gira comprobando referencias y conflictos
    pub async fn create(&self, tour: NewTour) -> AppResult<Tour> {
        self.check_references(&tour).await?;

        let Some(vehicle_id) = tour.vehicle_id else {
            let stored = self.store.insert(tour).await?;
            info!("🚌 Gira {} creada con alquiler externo", stored.id);
            return Ok(stored);
        };

        let _guard = self.vehicle_lock(vehicle_id).await.lock_owned().await;
        self.ensure_free(&tour).await?;

        let stored = self.store.insert(tour).await?;
        info!("✅ Gira {} creada en el vehículo {}", stored.id, vehicle_id);
        Ok(stored)
    }

    /// Asignar vehículos propios a una secuencia de giras propuestas
    ///
    /// El pool son los primeros `pool_size` vehículos activos por ID, todos
    /// libres desde el principio: es una planificación, no mira reservas.
    pub async fn bulk_allocate(
        &self,
        proposed: &[ProposedTour],
        pool_size: usize,
    ) -> AppResult<Vec<Assignment>> {
        validate_proposals(proposed)?;
        let pool = self.active_pool(pool_size).await?;

        let assignments = allocate(proposed, &pool);
        log_summary(&assignments, pool.len());
        Ok(assignments)
    }

    /// Asignar respetando las reservas existentes y persistir todo o nada
    ///
    /// Los vehículos del pool quedan bloqueados durante toda la operación y
    /// cada gira se comprueba antes de la primera inserción.
    pub async fn backfill(&self, proposed: &[ProposedTour], pool_size: usize) -> AppResult<Vec<Tour>> {
        validate_proposals(proposed)?;
        let pool = self.active_pool(pool_size).await?;

        // orden ascendente de ID, el mismo para cualquier backfill concurrente
        let mut guards = Vec::with_capacity(pool.len());
        for &vehicle_id in &pool {
            guards.push(self.vehicle_lock(vehicle_id).await.lock_owned().await);
        }

        let booked = self.booked_during(&pool, proposed).await?;
        let assignments = allocate_around(proposed, &pool, &booked);
        log_summary(&assignments, pool.len());

        let tours: Vec<NewTour> = assignments.into_iter().map(Assignment::into_new_tour).collect();
        for tour in &tours {
            self.check_references(tour).await?;
            self.ensure_free(tour).await?;
        }

        let mut created = Vec::with_capacity(tours.len());
        for tour in tours {
            created.push(self.store.insert(tour).await?);
        }

        drop(guards);

        info!("✅ Backfill completado: {} giras", created.len());
        Ok(created)
    }

    /// Intervalo válido, itinerario y vehículo existentes
    async fn check_references(&self, tour: &NewTour) -> AppResult<()> {
        validate_interval(tour.start_at, tour.end_at)?;

        if self.store.find_route(tour.route_id).await?.is_none() {
            return Err(not_found_error("Route", tour.route_id));
        }
        if let Some(vehicle_id) = tour.vehicle_id {
            if self.store.find_vehicle(vehicle_id).await?.is_none() {
                return Err(not_found_error("Vehicle", vehicle_id));
            }
        }
        Ok(())
    }

    /// Requiere el candado del vehículo
    async fn ensure_free(&self, tour: &NewTour) -> AppResult<()> {
        let Some(vehicle_id) = tour.vehicle_id else {
            return Ok(());
        };

        if let Some(existing) = self
            .detector
            .find_conflict(vehicle_id, tour.start_at, tour.end_at)
            .await?
        {
            warn!(
                "❌ Conflicto: vehículo {} ya asignado a la gira {}",
                vehicle_id, existing.id
            );
            return Err(AppError::ScheduleConflict {
                vehicle_id,
                start: tour.start_at,
                end: tour.end_at,
            });
        }
        Ok(())
    }

    async fn active_pool(&self, pool_size: usize) -> AppResult<Vec<i64>> {
        Ok(self
            .store
            .list_active_vehicles()
            .await?
            .into_iter()
            .take(pool_size)
            .collect())
    }

    /// Reservas del pool que chocan con la ventana de las giras propuestas
    async fn booked_during(&self, pool: &[i64], proposed: &[ProposedTour]) -> AppResult<Vec<Tour>> {
        let window = proposed
            .iter()
            .map(|t| t.start_at)
            .min()
            .zip(proposed.iter().map(|t| t.end_at).max());
        let Some((from, to)) = window else {
            return Ok(Vec::new());
        };

        let mut booked = Vec::new();
        for &vehicle_id in pool {
            booked.extend(self.store.find_overlapping(vehicle_id, from, to).await?);
        }
        debug!("📅 {} reservas existentes en la ventana del backfill", booked.len());
        Ok(booked)
    }

    async fn vehicle_lock(&self, vehicle_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.vehicle_locks.lock().await;
        let lock = locks.entry(vehicle_id).or_default().clone();
        debug!("🔒 Candados de vehículo activos: {}", locks.len());
        lock
    }
}

fn validate_proposals(proposed: &[ProposedTour]) -> AppResult<()> {
    for tour in proposed {
        tour.validate()?;
        validate_interval(tour.start_at, tour.end_at)?;
    }
    Ok(())
}

fn log_summary(assignments: &[Assignment], pool_len: usize) {
    let summary = AllocationSummary::of(assignments);
    info!(
        "📋 Asignación: {} giras, {} con vehículo propio, {} externas (pool de {})",
        summary.total, summary.assigned, summary.external, pool_len
    );
}
