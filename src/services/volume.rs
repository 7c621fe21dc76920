//! Agregación de volumen
//!
//! Una única función de agrupación por periodo (día, semana ISO, mes o año)
//! sobre el día natural de salida de cada gira. Los demás reportes se
//! construyen encima de ella.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::analytics::{DailyTourCount, Granularity, Period, RouteVolume, VolumeBucket};
use crate::models::{Route, Tour};

/// Agrupar giras por periodo, en orden cronológico
pub fn bucket_tours<'a, I>(tours: I, granularity: Granularity) -> Vec<VolumeBucket>
where
    I: IntoIterator<Item = &'a Tour>,
{
    let mut buckets: BTreeMap<Period, VolumeBucket> = BTreeMap::new();

    for tour in tours {
        let period = Period::containing(tour.start_date(), granularity);
        let bucket = buckets.entry(period).or_insert_with(|| VolumeBucket {
            period,
            tour_count: 0,
            revenue: Decimal::ZERO,
            external_count: 0,
        });
        bucket.tour_count += 1;
        bucket.revenue += tour.price;
        if tour.externally_rented {
            bucket.external_count += 1;
        }
    }

    buckets.into_values().collect()
}

/// Salidas por día natural (sólo días con al menos una gira)
pub fn daily_counts<'a, I>(tours: I) -> Vec<DailyTourCount>
where
    I: IntoIterator<Item = &'a Tour>,
{
    bucket_tours(tours, Granularity::Day)
        .into_iter()
        .filter_map(|bucket| match bucket.period {
            Period::Day { date } => Some(DailyTourCount {
                date,
                tour_count: bucket.tour_count,
            }),
            _ => None,
        })
        .collect()
}

/// Giras cuyo día de salida cae en `[from, to]`
pub fn in_range<'a>(tours: &'a [Tour], from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = &'a Tour> + 'a {
    tours.iter().filter(move |t| (from..=to).contains(&t.start_date()))
}

/// Volumen por itinerario, de mayor a menor número de giras
///
/// Las giras de itinerarios desconocidos se agrupan igualmente con su ID.
pub fn route_volume<'a, I>(tours: I, routes: &[Route]) -> Vec<RouteVolume>
where
    I: IntoIterator<Item = &'a Tour>,
{
    let names: HashMap<i64, &str> = routes.iter().map(|r| (r.id, r.name.as_str())).collect();
    let mut totals: BTreeMap<i64, (u32, Decimal)> = BTreeMap::new();

    for tour in tours {
        let entry = totals.entry(tour.route_id).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += tour.price;
    }

    let mut volumes: Vec<RouteVolume> = totals
        .into_iter()
        .map(|(route_id, (tour_count, revenue))| RouteVolume {
            route_id,
            route_name: names
                .get(&route_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", route_id)),
            tour_count,
            revenue,
        })
        .collect();

    // sort estable: los empates quedan por route_id ascendente
    volumes.sort_by(|a, b| b.tour_count.cmp(&a.tour_count));
    volumes
}
