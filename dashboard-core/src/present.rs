//! Render-ready view models.
//!
//! Everything here is plain data derivation; the actual rendering layer
//! (terminal, browser, whatever) consumes these structs and never touches
//! the raw records directly.

use serde::{Deserialize, Serialize};

use crate::model::{MonthlyRecord, SummaryMetrics};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Icon for a monthly card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthIcon {
    Rain,
    LightRain,
    Sun,
    PartialSun,
    Cloud,
    Snow,
    Unknown,
}

impl MonthIcon {
    /// Fixed decision table. Precipitation always wins over temperature;
    /// a month with heavy rain shows a rain icon no matter how warm it is.
    fn for_record(record: &MonthlyRecord) -> Self {
        match record.precipitation_mm {
            Some(p) if p > 50.0 => return Self::Rain,
            Some(p) if p > 20.0 => return Self::LightRain,
            _ => {}
        }

        match record.temperature.avg {
            None => Self::Unknown,
            Some(t) if t > 25.0 => Self::Sun,
            Some(t) if t > 15.0 => Self::PartialSun,
            Some(t) if t > 5.0 => Self::Cloud,
            Some(_) => Self::Snow,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Rain => "🌧",
            Self::LightRain => "🌦",
            Self::Sun => "☀",
            Self::PartialSun => "⛅",
            Self::Cloud => "☁",
            Self::Snow => "❄",
            Self::Unknown => "?",
        }
    }
}

/// One card per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVm {
    pub label: String,
    pub icon: MonthIcon,
    pub temp_avg: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub humidity_pct: Option<f64>,
}

/// Chart inputs: parallel 12-element series plus their labels.
///
/// Temperature keeps its gaps so the chart can break the line; missing
/// precipitation is coerced to 0 for the bars only, never for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<&'static str>,
    pub temp_series: Vec<Option<f64>>,
    pub precip_series: Vec<f64>,
}

/// Coarse label driving the ambient visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sunny,
    Rainy,
    Cold,
    Cloudy,
}

pub fn to_card_view_models(records: &[MonthlyRecord]) -> Vec<CardVm> {
    records
        .iter()
        .map(|r| CardVm {
            label: r.month.format("%b").to_string(),
            icon: MonthIcon::for_record(r),
            temp_avg: r.temperature.avg,
            temp_min: r.temperature.min,
            temp_max: r.temperature.max,
            precipitation_mm: r.precipitation_mm,
            humidity_pct: r.humidity_pct,
        })
        .collect()
}

pub fn to_chart_series(records: &[MonthlyRecord]) -> ChartSeries {
    ChartSeries {
        labels: MONTH_LABELS.to_vec(),
        temp_series: records.iter().map(|r| r.temperature.avg).collect(),
        precip_series: records
            .iter()
            .map(|r| r.precipitation_mm.unwrap_or(0.0))
            .collect(),
    }
}

/// First match wins: sunny, then rainy, then cold, then cloudy.
///
/// The sunny branch needs both heat and low average precipitation; a hot
/// but wet year falls through to the rainy check.
pub fn classify_mood(summary: &SummaryMetrics) -> Mood {
    let avg_precip = summary.total_precip / 12.0;

    if summary.avg_temp.is_some_and(|t| t > 25.0) && avg_precip < 30.0 {
        Mood::Sunny
    } else if avg_precip > 40.0 {
        Mood::Rainy
    } else if summary.avg_temp.is_some_and(|t| t < 5.0) {
        Mood::Cold
    } else {
        Mood::Cloudy
    }
}
