//! Year-level reductions over the 12 monthly records.
//!
//! Both entry points are pure: same records in, same summary and alert
//! list out. Missing monthly values are skipped, not zeroed, so a city
//! with no humidity data reports `avg_humidity: None` rather than a
//! misleading 0%.

use crate::model::{Alert, AlertKind, MonthlyRecord, Severity, SummaryMetrics};

/// Temperatures above this (°C, monthly average) raise a heat alert.
const HEAT_WARNING_C: f64 = 30.0;
const HEAT_CRITICAL_C: f64 = 35.0;

/// Temperatures below this raise a cold alert.
const COLD_WARNING_C: f64 = 0.0;
const COLD_CRITICAL_C: f64 = -10.0;

/// Monthly precipitation above this (mm) raises a rain alert.
const RAIN_WARNING_MM: f64 = 40.0;
const RAIN_CRITICAL_MM: f64 = 80.0;

/// Reduce the monthly records to single year-level figures.
///
/// The hottest-month figure (`max_temp`) is read off the monthly *average*
/// temperature series, not the daily maxima, so it stays comparable with
/// `avg_temp`. `min_temp` comes from the monthly minima. A metric with no
/// present values at all yields `None`, except precipitation whose total
/// defaults to 0.
pub fn summarize(records: &[MonthlyRecord]) -> SummaryMetrics {
    let avgs: Vec<f64> = records.iter().filter_map(|r| r.temperature.avg).collect();
    let mins: Vec<f64> = records.iter().filter_map(|r| r.temperature.min).collect();

    SummaryMetrics {
        avg_temp: mean(&avgs),
        max_temp: avgs.iter().copied().reduce(f64::max),
        min_temp: mins.iter().copied().reduce(f64::min),
        total_precip: records.iter().filter_map(|r| r.precipitation_mm).sum(),
        avg_wind: mean(&records.iter().filter_map(|r| r.wind_speed_kmh).collect::<Vec<_>>()),
        avg_humidity: mean(&records.iter().filter_map(|r| r.humidity_pct).collect::<Vec<_>>()),
    }
}

/// Scan the records in month order and report threshold breaches.
///
/// Each month is checked independently for heat, cold and rain, in that
/// order, so the result is sorted by month first and kind second. All
/// thresholds are exclusive: a monthly average of exactly 30°C is not a
/// heat alert.
pub fn detect_alerts(records: &[MonthlyRecord]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for record in records {
        let month = record.month.format("%B %Y").to_string();

        if let Some(avg) = record.temperature.avg {
            if avg > HEAT_WARNING_C {
                alerts.push(Alert {
                    kind: AlertKind::Heat,
                    month: month.clone(),
                    severity: severity(avg > HEAT_CRITICAL_C),
                    message: format!("Average temperature of {avg:.1}°C in {month}"),
                });
            }
            if avg < COLD_WARNING_C {
                alerts.push(Alert {
                    kind: AlertKind::Cold,
                    month: month.clone(),
                    severity: severity(avg < COLD_CRITICAL_C),
                    message: format!("Average temperature of {avg:.1}°C in {month}"),
                });
            }
        }

        if let Some(precip) = record.precipitation_mm {
            if precip > RAIN_WARNING_MM {
                alerts.push(Alert {
                    kind: AlertKind::Rain,
                    month: month.clone(),
                    severity: severity(precip > RAIN_CRITICAL_MM),
                    message: format!("{precip:.1}mm of precipitation in {month}"),
                });
            }
        }
    }

    alerts
}

fn severity(critical: bool) -> Severity {
    if critical {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
