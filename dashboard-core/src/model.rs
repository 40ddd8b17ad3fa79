use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A supported city. The registry owns one entry per city; reports carry
/// their own copy rather than borrowing from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

/// Monthly temperature readings. Any reading may be missing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One calendar month of aggregated weather observations.
///
/// Missing numeric fields stay `None` and are excluded from aggregates;
/// they are never substituted with zero (precipitation totals are the one
/// documented exception, see [`crate::metrics::summarize`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// First day of the month this record covers.
    pub month: NaiveDate,
    pub temperature: Temperature,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub humidity_pct: Option<f64>,
}

/// A full year of monthly data for one city.
///
/// Always exactly 12 records, January through December. Partial years are
/// rejected during validation and never reach this type. A new fetch
/// produces a wholly new report; reports are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: City,
    pub year: i32,
    pub records: Vec<MonthlyRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Year-level reduction of the 12 monthly records.
///
/// Fields are `None` when every contributing monthly value was missing,
/// except `total_precip` which defaults to zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub total_precip: f64,
    pub avg_wind: Option<f64>,
    pub avg_humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Heat,
    Cold,
    Rain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// A single threshold breach in one month. A month may raise up to three
/// alerts (one per kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub month: String,
    pub severity: Severity,
    pub message: String,
}
