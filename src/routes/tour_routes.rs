use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Assignment, CreateTourRequest, ProposedTour, Tour};
use crate::services::allocator::AllocationSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_tour_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tour))
        .route("/allocate", post(allocate_tours))
        .route("/backfill", post(backfill_tours))
}

/// Petición de asignación masiva
#[derive(Debug, Deserialize, Validate)]
pub struct AllocationRequest {
    #[validate]
    pub tours: Vec<ProposedTour>,

    #[validate(range(max = 10000))]
    pub vehicle_pool_size: u32,
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub summary: AllocationSummary,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub created: usize,
    pub tours: Vec<Tour>,
}

async fn create_tour(
    State(state): State<AppState>,
    Json(request): Json<CreateTourRequest>,
) -> Result<(StatusCode, Json<Tour>), AppError> {
    let tour = state.tours.create_tour(request).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

async fn allocate_tours(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResponse>, AppError> {
    request.validate()?;
    let assignments = state
        .tours
        .bulk_allocate(&request.tours, request.vehicle_pool_size as usize)
        .await?;
    Ok(Json(AllocationResponse {
        summary: AllocationSummary::of(&assignments),
        assignments,
    }))
}

async fn backfill_tours(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<(StatusCode, Json<BackfillResponse>), AppError> {
    request.validate()?;
    let tours = state
        .tours
        .backfill(&request.tours, request.vehicle_pool_size as usize)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BackfillResponse {
            created: tours.len(),
            tours,
        }),
    ))
}
