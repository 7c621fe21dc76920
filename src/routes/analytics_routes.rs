use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::models::analytics::{
    DailyTourCount, DashboardSummary, Granularity, MonthlyBalance, PeakConcurrencyReport,
    Recommendation, RouteVolume, VolumeBucket,
};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/", get(analytics_index))
        .route("/fleet-concurrency", get(fleet_concurrency))
        .route("/monthly-fleet-balance", get(monthly_fleet_balance))
        .route("/recommendations", get(recommendations))
        .route("/tour-volume", get(tour_volume))
        .route("/route-volume", get(route_volume))
        .route("/daily-tours", get(daily_tours))
        .route("/summary", get(summary))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct VolumeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyToursQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub route_id: Option<i64>,
}

async fn analytics_index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "fleet_capacity": state.analytics.fleet_capacity(),
        "reports": [
            "fleet-concurrency",
            "monthly-fleet-balance",
            "recommendations",
            "tour-volume",
            "route-volume",
            "daily-tours",
            "summary"
        ]
    }))
}

async fn fleet_concurrency(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<PeakConcurrencyReport>, AppError> {
    let report = state.analytics.peak_concurrency(query.from, query.to).await?;
    Ok(Json(report))
}

async fn monthly_fleet_balance(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<MonthlyBalance>>, AppError> {
    Ok(Json(state.analytics.monthly_balance(query.year).await?))
}

async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Recommendation>, AppError> {
    Ok(Json(state.analytics.recommendation(query.year).await?))
}

async fn tour_volume(
    State(state): State<AppState>,
    Query(query): Query<VolumeQuery>,
) -> Result<Json<Vec<VolumeBucket>>, AppError> {
    let granularity = match query.group.as_deref() {
        None => Granularity::default(),
        Some(group) => group
            .parse()
            .map_err(|_| validation_error("group", "group must be day, week, month or year"))?,
    };
    let buckets = state
        .analytics
        .tour_volume(query.from, query.to, granularity)
        .await?;
    Ok(Json(buckets))
}

async fn route_volume(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<RouteVolume>>, AppError> {
    Ok(Json(state.analytics.route_volume(query.from, query.to).await?))
}

async fn daily_tours(
    State(state): State<AppState>,
    Query(query): Query<DailyToursQuery>,
) -> Result<Json<Vec<DailyTourCount>>, AppError> {
    let days = state
        .analytics
        .daily_tours(query.from, query.to, query.route_id)
        .await?;
    Ok(Json(days))
}

async fn summary(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(state.analytics.summary(query.from, query.to).await?))
}
