//! Utilidades de validación
//!
//! Comprobaciones compartidas por el camino de creación de giras y por los
//! reportes: intervalos, rangos de fechas y años.

use chrono::{NaiveDate, NaiveDateTime};

use super::errors::{validation_error, AppResult};

pub const MIN_REPORT_YEAR: i32 = 1900;
pub const MAX_REPORT_YEAR: i32 = 2100;

/// Validar un intervalo semiabierto `[start, end)`
pub fn validate_interval(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if start >= end {
        return Err(validation_error("end", "end must be strictly after start"));
    }
    Ok(())
}

/// Validar un rango de fechas inclusivo `[from, to]`
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> AppResult<()> {
    if from > to {
        return Err(validation_error("to", "to must not be before from"));
    }
    Ok(())
}

/// Validar el año de un reporte
pub fn validate_year(year: i32) -> AppResult<()> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return Err(validation_error("year", "year must be between 1900 and 2100"));
    }
    Ok(())
}

/// Primer y último día de un año
pub fn year_bounds(year: i32) -> AppResult<(NaiveDate, NaiveDate)> {
    validate_year(year)?;
    match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(validation_error("year", "year is out of the supported calendar")),
    }
}
