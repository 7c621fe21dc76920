//! Modelo de Tour
//!
//! Este módulo contiene el struct Tour y sus variantes para creación
//! individual y asignación masiva. Mapea a la tabla tours.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Tour principal - mapea exactamente a la tabla tours
///
/// `vehicle_id == None` significa alquiler externo; `externally_rented`
/// repite esa información para simplificar las consultas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tour {
    pub id: i64,
    pub route_id: i64,
    pub vehicle_id: Option<i64>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub passengers: i32,
    pub price: Decimal,
    pub notes: Option<String>,
    pub externally_rented: bool,
    pub created_at: DateTime<Utc>,
}

impl Tour {
    /// Solapamiento semiabierto: `[a, b)` y `[c, d)` chocan si `a < d && c < b`
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end_at && self.start_at < end
    }

    /// Día natural de salida (clave de todos los reportes)
    pub fn start_date(&self) -> NaiveDate {
        self.start_at.date()
    }
}

/// Datos de una gira lista para insertar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTour {
    pub route_id: i64,
    pub vehicle_id: Option<i64>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub passengers: i32,
    pub price: Decimal,
    pub notes: Option<String>,
}

impl NewTour {
    pub fn externally_rented(&self) -> bool {
        self.vehicle_id.is_none()
    }
}

/// Request para crear una nueva gira
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTourRequest {
    #[validate(range(min = 1))]
    pub route_id: i64,

    #[validate(range(min = 1))]
    pub vehicle_id: Option<i64>,

    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,

    #[validate(range(min = 1))]
    pub passengers: i32,

    pub price: Decimal,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<CreateTourRequest> for NewTour {
    fn from(request: CreateTourRequest) -> Self {
        Self {
            route_id: request.route_id,
            vehicle_id: request.vehicle_id,
            start_at: request.start_at,
            end_at: request.end_at,
            passengers: request.passengers,
            price: request.price,
            notes: request.notes,
        }
    }
}

/// Gira propuesta para la asignación masiva (todavía sin vehículo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProposedTour {
    #[validate(range(min = 1))]
    pub route_id: i64,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    #[validate(range(min = 1))]
    pub passengers: i32,
    pub price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Resultado de la asignación de una gira propuesta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Posición de la gira en la secuencia de entrada
    pub sequence: usize,
    pub tour: ProposedTour,
    /// `None` = alquiler externo
    pub vehicle_id: Option<i64>,
}

impl Assignment {
    pub fn is_external(&self) -> bool {
        self.vehicle_id.is_none()
    }

    pub fn into_new_tour(self) -> NewTour {
        NewTour {
            route_id: self.tour.route_id,
            vehicle_id: self.vehicle_id,
            start_at: self.tour.start_at,
            end_at: self.tour.end_at,
            passengers: self.tour.passengers,
            price: self.tour.price,
            notes: self.tour.notes,
        }
    }
}
