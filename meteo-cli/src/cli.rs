use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use meteo_core::{Config, ForecastRequest, WeatherFetcher};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Open-Meteo forecast CLI")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// Latitude in decimal degrees; defaults to the configured location.
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude in decimal degrees; defaults to the configured location.
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// IANA timezone, or "auto".
        #[arg(long)]
        timezone: Option<String>,

        /// Number of upcoming hours to print.
        #[arg(long, default_value_t = 12)]
        hours: usize,

        /// Print the forecast as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, timezone, hours, json } => {
                let config = Config::load()?;
                let request = resolve_request(&config, lat, lon, timezone)?;
                debug!(?request, endpoint = config.endpoint(), "Resolved forecast request");
                let forecast = WeatherFetcher::from_config(&config)?.fetch(&request).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&forecast)?);
                } else {
                    print!("{}", output::render(&forecast, hours));
                }
                Ok(())
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

/// Flags win over the configured location; a bare `--timezone` overrides only the zone.
fn resolve_request(
    config: &Config,
    lat: Option<f64>,
    lon: Option<f64>,
    timezone: Option<String>,
) -> Result<ForecastRequest> {
    let mut request = match (lat, lon) {
        (Some(lat), Some(lon)) => ForecastRequest::new(lat, lon, "auto"),
        (None, None) => config.default_request()?,
        _ => bail!("--lat and --lon must be given together"),
    };

    if let Some(tz) = timezone {
        request.timezone = tz;
    }

    Ok(request)
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let current = config.location.clone();

    let mut lat = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please enter a number, e.g. 52.52");
    let mut lon = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please enter a number, e.g. 13.41");
    if let Some(loc) = &current {
        lat = lat.with_default(loc.latitude);
        lon = lon.with_default(loc.longitude);
    }
    let latitude = lat.prompt()?;
    let longitude = lon.prompt()?;

    let default_tz = current.as_ref().map_or("auto", |loc| loc.timezone.as_str());
    let timezone = Text::new("Timezone:")
        .with_default(default_tz)
        .with_help_message("IANA name such as Europe/Berlin, or auto")
        .prompt()?;

    config.set_location(ForecastRequest::new(latitude, longitude, timezone));
    config.save()?;

    println!("Saved default location to {}", Config::config_file_path()?.display());
    Ok(())
}
