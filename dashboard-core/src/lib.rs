//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The fixed city registry and shared domain models
//! - The backend client (fetch + structural validation)
//! - Aggregation of monthly records into summary metrics and alerts
//! - Render-ready view models and the per-search session state
//!
//! It is used by `dashboard-cli`, but can also be reused by other
//! binaries or services; it contains no rendering code of its own.

pub mod client;
pub mod config;
pub mod metrics;
pub mod model;
pub mod present;
pub mod registry;
pub mod session;

pub use client::{FetchError, HttpWeatherClient, REPORT_YEAR, WeatherClient};
pub use config::Config;
pub use metrics::{detect_alerts, summarize};
pub use model::{
    Alert, AlertKind, City, MonthlyRecord, Severity, SummaryMetrics, Temperature, WeatherReport,
};
pub use present::{
    CardVm, ChartSeries, MONTH_LABELS, MonthIcon, Mood, classify_mood, to_card_view_models,
    to_chart_series,
};
pub use registry::CityRegistry;
pub use session::{
    DashboardView, QueryError, RequestTicket, SearchSession, ViewState, build_view, run_query,
};
