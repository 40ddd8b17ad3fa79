use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};

use dashboard_core::{CityRegistry, Config, HttpWeatherClient, SearchSession, run_query};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the yearly dashboard for a city.
    Show {
        /// City name, exact and case-sensitive (e.g. "Berlin").
        /// Prompts interactively when omitted.
        city: Option<String>,
    },

    /// List the supported cities.
    Cities,

    /// Set the backend URL and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city } => show(city).await,
            Command::Cities => {
                for city in CityRegistry::builtin().list_all() {
                    println!(
                        "{:<10} {:>9.4}  {:>9.4}  {}",
                        city.name, city.latitude, city.longitude, city.country
                    );
                }
                Ok(())
            }
            Command::Configure => configure(),
        }
    }
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let registry = CityRegistry::builtin();

    let name = match city {
        Some(name) => name,
        None => {
            let options: Vec<String> =
                registry.list_all().iter().map(|c| c.name.clone()).collect();
            Select::new("City:", options)
                .prompt()
                .context("City selection cancelled")?
        }
    };

    let config = Config::load()?;
    let client = HttpWeatherClient::with_timeout(config.backend_url.clone(), config.timeout())
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

    // One surface, one search; the session still guards against a stale
    // result if this ever grows a concurrent path.
    let mut session = SearchSession::new();
    let ticket = session.begin();
    let outcome = run_query(registry, &client, &name).await;
    session.complete(ticket, outcome);

    render::view_state(session.state());
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let backend_url = Text::new("Backend URL:")
        .with_initial_value(&current.backend_url)
        .prompt()
        .context("Configuration cancelled")?;

    let timeout_secs: u64 = Text::new("Request timeout (seconds):")
        .with_initial_value(&current.timeout_secs.to_string())
        .prompt()
        .context("Configuration cancelled")?
        .trim()
        .parse()
        .context("Timeout must be a whole number of seconds")?;

    let config = Config {
        backend_url,
        timeout_secs,
    };
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
