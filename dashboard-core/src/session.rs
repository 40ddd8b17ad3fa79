//! One search cycle: resolve, fetch, aggregate, build view models.
//!
//! Each cycle produces a fresh, immutable [`DashboardView`]; nothing is
//! patched in place between cycles. [`SearchSession`] sequences cycles so
//! that a slow response from an old search can never overwrite the result
//! of a newer one. The transport cannot be cancelled, so stale responses
//! are dropped on arrival by ticket comparison instead.

use thiserror::Error;
use tracing::{debug, info};

use crate::client::{FetchError, WeatherClient};
use crate::metrics::{detect_alerts, summarize};
use crate::model::{Alert, SummaryMetrics, WeatherReport};
use crate::present::{CardVm, ChartSeries, Mood, classify_mood, to_card_view_models, to_chart_series};
use crate::registry::CityRegistry;

/// Everything the rendering layer needs for one display cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub report: WeatherReport,
    pub summary: SummaryMetrics,
    pub alerts: Vec<Alert>,
    pub cards: Vec<CardVm>,
    pub chart: ChartSeries,
    pub mood: Mood,
}

/// Why a search produced no view.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The name failed local resolution; no request was sent.
    #[error("unknown city '{name}' (supported: {})", supported.join(", "))]
    UnknownCity {
        name: String,
        supported: Vec<String>,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl QueryError {
    /// Human-readable message for the display surface, one distinct
    /// message per failure class.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownCity { name, supported } => format!(
                "'{name}' is not a supported city. Try one of: {}.",
                supported.join(", ")
            ),
            Self::Fetch(FetchError::Network(reason)) => {
                format!("Could not reach the weather backend ({reason}). Is it running?")
            }
            Self::Fetch(FetchError::UpstreamStatus {
                code: 400,
                available_cities,
            }) => {
                if available_cities.is_empty() {
                    "The backend rejected the city name.".to_string()
                } else {
                    format!(
                        "The backend rejected the city name. It serves: {}.",
                        available_cities.join(", ")
                    )
                }
            }
            Self::Fetch(FetchError::UpstreamStatus { code: 404, .. }) => {
                "The backend endpoint was not found; check the configured backend URL.".to_string()
            }
            Self::Fetch(FetchError::UpstreamStatus {
                code: code @ (500 | 503),
                ..
            }) => {
                format!("The weather backend failed upstream (HTTP {code}). Try again later.")
            }
            Self::Fetch(FetchError::UpstreamStatus { code, .. }) => {
                format!("The weather backend returned an unexpected HTTP {code}.")
            }
            Self::Fetch(FetchError::InvalidShape(reason)) => {
                format!("The backend sent a malformed response ({reason}).")
            }
        }
    }
}

/// Derive the full view from a validated report. Pure.
pub fn build_view(report: WeatherReport) -> DashboardView {
    let summary = summarize(&report.records);
    let alerts = detect_alerts(&report.records);
    let cards = to_card_view_models(&report.records);
    let chart = to_chart_series(&report.records);
    let mood = classify_mood(&summary);

    DashboardView {
        report,
        summary,
        alerts,
        cards,
        chart,
        mood,
    }
}

/// Run one full pipeline pass for a city name.
///
/// Unknown names fail fast without touching the network.
pub async fn run_query(
    registry: &CityRegistry,
    client: &dyn WeatherClient,
    name: &str,
) -> Result<DashboardView, QueryError> {
    let city = registry
        .resolve(name)
        .ok_or_else(|| QueryError::UnknownCity {
            name: name.to_string(),
            supported: registry.list_all().iter().map(|c| c.name.clone()).collect(),
        })?;

    let report = client.fetch_monthly(city).await?;
    debug!(city = %city.name, year = report.year, "report fetched, building view");

    Ok(build_view(report))
}

/// What the display surface currently shows.
///
/// A failed search clears all data sections; there is no path that keeps
/// stale cards next to a fresh error banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Empty,
    Loaded(DashboardView),
    Failed {
        message: String,
    },
}

/// Ticket identifying one search. Compared, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Latest-wins sequencing for one display surface.
#[derive(Debug, Default)]
pub struct SearchSession {
    issued: u64,
    state: ViewState,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, superseding any still in flight.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Install the outcome of a search, unless a newer one has been
    /// issued since. Returns `false` when the result was stale-dropped.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<DashboardView, QueryError>,
    ) -> bool {
        if ticket.0 != self.issued {
            info!(ticket = ticket.0, latest = self.issued, "dropping stale search result");
            return false;
        }

        self.state = match outcome {
            Ok(view) => ViewState::Loaded(view),
            Err(err) => ViewState::Failed {
                message: err.user_message(),
            },
        };
        true
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }
}
