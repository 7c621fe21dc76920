//! Servicio de analítica
//!
//! Valida los parámetros, obtiene las giras del almacenamiento y delega en
//! las funciones puras de cada reporte.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

use super::monthly_balance::monthly_balance;
use super::peak_concurrency::compute_peak;
use super::recommendation::recommend;
use super::volume::{bucket_tours, daily_counts, route_volume};
use crate::models::analytics::{
    DailyTourCount, DashboardSummary, Granularity, MonthlyBalance, PeakConcurrencyReport,
    Recommendation, RouteVolume, VolumeBucket,
};
use crate::repositories::SchedulingStore;
use crate::utils::errors::AppResult;
use crate::utils::validation::{validate_date_range, validate_year};

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn SchedulingStore>,
    fleet_capacity: u32,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn SchedulingStore>, fleet_capacity: u32) -> Self {
        Self {
            store,
            fleet_capacity,
        }
    }

    pub fn fleet_capacity(&self) -> u32 {
        self.fleet_capacity
    }

    /// Concurrencia pico en `[from, to]`
    pub async fn peak_concurrency(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<PeakConcurrencyReport> {
        validate_date_range(from, to)?;
        let tours = self.store.list_tours_in_range(from, to).await?;
        let report = compute_peak(&tours, from, to, self.fleet_capacity);
        info!(
            "📊 Pico {} → {}: {} giras, pico {} (capacidad {})",
            from, to, report.total_tours, report.peak_concurrent, self.fleet_capacity
        );
        Ok(report)
    }

    /// Balance mensual de un año
    pub async fn monthly_balance(&self, year: i32) -> AppResult<Vec<MonthlyBalance>> {
        validate_year(year)?;
        let tours = self.store.list_tours_by_year(year).await?;
        debug!("📅 Balance mensual {}: {} giras", year, tours.len());
        Ok(monthly_balance(&tours, year, self.fleet_capacity))
    }

    /// Recomendación de flota por temporada
    pub async fn recommendation(&self, year: i32) -> AppResult<Recommendation> {
        validate_year(year)?;
        let tours = self.store.list_tours_by_year(year).await?;
        let recommendation = recommend(&tours, year, self.fleet_capacity);
        info!(
            "💡 Recomendación {}: alta {:.1}/día, baja {:.1}/día",
            year, recommendation.high_season_avg_daily, recommendation.low_season_avg_daily
        );
        Ok(recommendation)
    }

    pub async fn tour_volume(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        granularity: Granularity,
    ) -> AppResult<Vec<VolumeBucket>> {
        validate_date_range(from, to)?;
        let tours = self.store.list_tours_in_range(from, to).await?;
        Ok(bucket_tours(&tours, granularity))
    }

    pub async fn route_volume(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<RouteVolume>> {
        validate_date_range(from, to)?;
        let tours = self.store.list_tours_in_range(from, to).await?;
        let routes = self.store.list_routes().await?;
        Ok(route_volume(&tours, &routes))
    }

    /// Salidas por día, opcionalmente de un solo itinerario
    pub async fn daily_tours(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        route_id: Option<i64>,
    ) -> AppResult<Vec<DailyTourCount>> {
        validate_date_range(from, to)?;
        let tours = self.store.list_tours_in_range(from, to).await?;
        let selected = tours
            .iter()
            .filter(|t| route_id.map_or(true, |id| t.route_id == id));
        Ok(daily_counts(selected))
    }

    /// Resumen para el panel de control
    pub async fn summary(&self, from: NaiveDate, to: NaiveDate) -> AppResult<DashboardSummary> {
        validate_date_range(from, to)?;
        let tours = self.store.list_tours_in_range(from, to).await?;
        let routes = self.store.list_routes().await?;

        let total_revenue: Decimal = tours.iter().map(|t| t.price).sum();
        let average_passengers = if tours.is_empty() {
            0
        } else {
            let passengers: i64 = tours.iter().map(|t| i64::from(t.passengers)).sum();
            (passengers as f64 / tours.len() as f64).round() as u32
        };

        Ok(DashboardSummary {
            from,
            to,
            total_tours: tours.len() as u32,
            total_revenue,
            average_passengers,
            routes: route_volume(&tours, &routes),
            fleet: compute_peak(&tours, from, to, self.fleet_capacity),
        })
    }
}
