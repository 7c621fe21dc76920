//! Modelo de Vehicle
//!
//! Vehículos de la flota propia. El registro de flota es externo al núcleo:
//! aquí sólo se leen, nunca se crean ni se modifican.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    Active,
    Inactive,
    UnderMaintenance,
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub license_plate: String,
    pub seating_capacity: i32,
    pub make: Option<String>,
    pub model: Option<String>,
    pub acquisition_year: Option<i32>,
    pub status: VehicleStatus,
}

impl Vehicle {
    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}
