//! Terminal rendering of the core's view models.
//!
//! Consumes [`ViewState`] only; no aggregation or validation happens here.

use dashboard_core::{DashboardView, Mood, Severity, ViewState};

pub fn view_state(state: &ViewState) {
    match state {
        ViewState::Empty => println!("No search yet."),
        ViewState::Failed { message } => println!("Error: {message}"),
        ViewState::Loaded(view) => dashboard(view),
    }
}

fn dashboard(view: &DashboardView) {
    let report = &view.report;
    println!(
        "{}, {} — {} ({})",
        report.city.name,
        report.city.country,
        report.year,
        mood_label(view.mood)
    );
    println!();

    println!(
        "  avg {}  ·  hottest month {}  ·  coldest month {}",
        fmt_temp(view.summary.avg_temp),
        fmt_temp(view.summary.max_temp),
        fmt_temp(view.summary.min_temp),
    );
    println!(
        "  precipitation {:.1}mm/yr  ·  wind {}  ·  humidity {}",
        view.summary.total_precip,
        fmt_unit(view.summary.avg_wind, "km/h"),
        fmt_unit(view.summary.avg_humidity, "%"),
    );
    println!();

    for card in &view.cards {
        println!(
            "  {:<4} {}  {:>8}  {:>8}",
            card.label,
            card.icon.glyph(),
            fmt_temp(card.temp_avg),
            card.precipitation_mm
                .map_or_else(|| "—".to_string(), |p| format!("{p:.1}mm")),
        );
    }

    // Poor man's precipitation chart: one block per 10mm.
    println!();
    for (label, precip) in view.chart.labels.iter().zip(&view.chart.precip_series) {
        let bars = (precip / 10.0).round() as usize;
        println!("  {:<4} {}", label, "▇".repeat(bars));
    }

    if !view.alerts.is_empty() {
        println!();
        println!("Alerts:");
        for alert in &view.alerts {
            let tag = match alert.severity {
                Severity::Warning => "warning ",
                Severity::Critical => "CRITICAL",
            };
            println!("  [{tag}] {}", alert.message);
        }
    }
}

fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Sunny => "sunny year",
        Mood::Rainy => "rainy year",
        Mood::Cold => "cold year",
        Mood::Cloudy => "cloudy year",
    }
}

fn fmt_temp(value: Option<f64>) -> String {
    fmt_unit(value, "°C")
}

fn fmt_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}{unit}"))
}
