//! Modelos de Analytics
//!
//! Este módulo contiene los reportes de capacidad de flota: concurrencia
//! pico, balance mensual, recomendaciones por temporada y volúmenes.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meses de temporada alta (abril, mayo, junio, septiembre, octubre)
pub const HIGH_SEASON_MONTHS: [u32; 5] = [4, 5, 6, 9, 10];

/// Temporada a la que pertenece un mes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    High,
    Low,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        if HIGH_SEASON_MONTHS.contains(&month) {
            Season::High
        } else {
            Season::Low
        }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self::of_month(date.month())
    }
}

/// Reporte de concurrencia pico para un rango de fechas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakConcurrencyReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_tours: u32,
    pub distinct_vehicles_used: u32,
    pub external_count: u32,
    /// Máximo de giras que salen el mismo día natural
    pub peak_concurrent: u32,
    pub fleet_capacity: u32,
    pub shortage: u32,
    pub surplus: u32,
}

/// Clasificación de un mes frente a la capacidad de flota
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthStatus {
    Insufficient,
    Surplus,
    Normal,
}

/// Balance de flota de un mes natural
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub month: u32,
    pub tour_count: u32,
    pub external_count: u32,
    /// Días distintos del mes con al menos una salida
    pub active_days: u32,
    /// `tour_count / active_days` sin redondear
    pub average_daily: f64,
    /// `average_daily` redondeada; el estado se decide sobre la media exacta
    pub peak_concurrent: u32,
    pub fleet_capacity: u32,
    pub shortage: u32,
    pub surplus: u32,
    pub status: MonthStatus,
}

/// Recomendación para temporada alta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HighSeasonAdvisory {
    AcquireVehicles { count: u32 },
    FleetSufficient,
}

/// Recomendación para temporada baja
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LowSeasonAdvisory {
    FreeVehicles { count: u32 },
    UtilizationReasonable,
}

/// Recomendación anual para la gerencia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub year: i32,
    pub high_season_avg_daily: f64,
    pub low_season_avg_daily: f64,
    pub fleet_capacity: u32,
    pub total_external_rentals: u32,
    pub advisory_high_season: HighSeasonAdvisory,
    pub advisory_low_season: LowSeasonAdvisory,
}

/// Granularidad de agrupación de los reportes de volumen
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity '{}'", other)),
        }
    }
}

/// Periodo de un bucket; el orden derivado es cronológico dentro de
/// una misma granularidad
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum Period {
    Day { date: NaiveDate },
    /// Semana ISO (lunes como primer día). `year` es el año ISO, no el
    /// natural: los últimos días de diciembre pueden caer en la semana 1 del
    /// año siguiente, y los primeros de enero en la 52/53 del anterior.
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Period::Day { date },
            Granularity::Week => {
                let iso = date.iso_week();
                Period::Week { year: iso.year(), week: iso.week() }
            }
            Granularity::Month => Period::Month { year: date.year(), month: date.month() },
            Granularity::Year => Period::Year { year: date.year() },
        }
    }
}

/// Volumen de giras de un periodo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeBucket {
    pub period: Period,
    pub tour_count: u32,
    pub revenue: Decimal,
    pub external_count: u32,
}

/// Volumen por itinerario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteVolume {
    pub route_id: i64,
    pub route_name: String,
    pub tour_count: u32,
    pub revenue: Decimal,
}

/// Salidas de un día (vista de calendario)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTourCount {
    pub date: NaiveDate,
    pub tour_count: u32,
}

/// Resumen para dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_tours: u32,
    pub total_revenue: Decimal,
    pub average_passengers: u32,
    pub routes: Vec<RouteVolume>,
    pub fleet: PeakConcurrencyReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_of_month() {
        for month in [4, 5, 6, 9, 10] {
            assert_eq!(Season::of_month(month), Season::High);
        }
        for month in [1, 2, 3, 7, 8, 11, 12] {
            assert_eq!(Season::of_month(month), Season::Low);
        }
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("WEEK".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!(Granularity::default(), Granularity::Month);
        assert!("quarter".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_iso_week_period_crosses_year() {
        // 2024-12-30 pertenece a la semana ISO 1 de 2025
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(
            Period::containing(date, Granularity::Week),
            Period::Week { year: 2025, week: 1 }
        );
    }

    #[test]
    fn test_advisory_serialization() {
        let json = serde_json::to_value(HighSeasonAdvisory::AcquireVehicles { count: 8 }).unwrap();
        assert_eq!(json["kind"], "acquire_vehicles");
        assert_eq!(json["count"], 8);
        let json = serde_json::to_value(MonthStatus::Insufficient).unwrap();
        assert_eq!(json, "INSUFFICIENT");
    }
}
