//! Almacenamiento en memoria
//!
//! Implementación de `SchedulingStore` sobre colecciones protegidas por un
//! `RwLock`. La usan los tests y el servidor cuando no hay `DATABASE_URL`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::SchedulingStore;
use crate::models::{NewTour, Route, Tour, Vehicle};
use crate::utils::errors::AppResult;

#[derive(Debug, Default)]
struct StoreData {
    vehicles: BTreeMap<i64, Vehicle>,
    routes: BTreeMap<i64, Route>,
    tours: Vec<Tour>,
    next_tour_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrar (o reemplazar) un vehículo
    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        let mut data = self.data.write().await;
        data.vehicles.insert(vehicle.id, vehicle);
    }

    /// Registrar (o reemplazar) un itinerario
    pub async fn add_route(&self, route: Route) {
        let mut data = self.data.write().await;
        data.routes.insert(route.id, route);
    }

    /// Copia de todas las giras en orden de inserción
    pub async fn tours(&self) -> Vec<Tour> {
        self.data.read().await.tours.clone()
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Tour>> {
        let data = self.data.read().await;
        Ok(data
            .tours
            .iter()
            .filter(|t| t.vehicle_id == Some(vehicle_id) && t.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn insert(&self, tour: NewTour) -> AppResult<Tour> {
        let mut data = self.data.write().await;
        data.next_tour_id += 1;
        let stored = Tour {
            id: data.next_tour_id,
            externally_rented: tour.externally_rented(),
            route_id: tour.route_id,
            vehicle_id: tour.vehicle_id,
            start_at: tour.start_at,
            end_at: tour.end_at,
            passengers: tour.passengers,
            price: tour.price,
            notes: tour.notes,
            created_at: Utc::now(),
        };
        data.tours.push(stored.clone());
        Ok(stored)
    }

    async fn list_active_vehicles(&self) -> AppResult<Vec<i64>> {
        let data = self.data.read().await;
        Ok(data
            .vehicles
            .values()
            .filter(|v| v.is_active())
            .map(|v| v.id)
            .collect())
    }

    async fn list_tours_in_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Tour>> {
        let data = self.data.read().await;
        let mut tours: Vec<Tour> = data
            .tours
            .iter()
            .filter(|t| (from..=to).contains(&t.start_date()))
            .cloned()
            .collect();
        tours.sort_by_key(|t| (t.start_at, t.id));
        Ok(tours)
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.data.read().await.vehicles.get(&id).cloned())
    }

    async fn find_route(&self, id: i64) -> AppResult<Option<Route>> {
        Ok(self.data.read().await.routes.get(&id).cloned())
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        Ok(self.data.read().await.routes.values().cloned().collect())
    }
}
