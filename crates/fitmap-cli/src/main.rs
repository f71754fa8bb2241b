mod nearby;
mod output;
mod search;

use clap::{Args, Parser, Subcommand};
use fitmap_core::{AttributeTag, Coordinate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fitmap")]
#[command(about = "Find exercise facilities near you")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List gyms, parks and walking courses around a position
    Nearby {
        #[command(flatten)]
        position: PositionArgs,
        /// Only show facilities within this many kilometers
        #[arg(long, value_parser = parse_radius_km)]
        radius_km: Option<f64>,
        /// Attribute filter (free, indoor, outdoor, course, open_now); repeat to OR
        #[arg(long = "filter")]
        filters: Vec<AttributeTag>,
        /// Search around the first place matching this query instead
        #[arg(long)]
        near: Option<String>,
    },
    /// Look up destinations to search around
    Search {
        query: String,
        #[command(flatten)]
        position: PositionArgs,
    },
}

/// Current position; geolocation falls back to the configured default
/// center when omitted.
#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct PositionArgs {
    /// Latitude in degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

impl PositionArgs {
    /// `None` when no position was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate is out of range.
    pub(crate) fn coordinate(self) -> anyhow::Result<Option<Coordinate>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
            _ => Ok(None),
        }
    }
}

fn parse_radius_km(raw: &str) -> Result<f64, String> {
    let radius: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(format!("radius must be a positive number of kilometers, got {raw}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = fitmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Nearby {
            position,
            radius_km,
            filters,
            near,
        } => {
            nearby::run_nearby(&config, position, radius_km, &filters, near.as_deref()).await?;
        }
        Commands::Search { query, position } => {
            search::run_search(&config, &query, position).await?;
        }
    }

    Ok(())
}
