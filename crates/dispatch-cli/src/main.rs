mod facilities;

use clap::{Parser, Subcommand};
use dispatch_core::Coordinate;

#[derive(Debug, Parser)]
#[command(name = "dispatch-cli")]
#[command(about = "Emergency facility locator for dispatch operators")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for emergency facilities near a point and rank them
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value = "5000")]
        radius: u32,
    },
    /// Great-circle distance and driving ETA between two points
    Distance {
        /// Origin as LAT,LNG
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,
        /// Destination as LAT,LNG
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
        #[arg(long, default_value = "2.0")]
        minutes_per_mile: f64,
    },
    /// Print the built-in seed facilities
    Seed,
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{raw}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lng}'"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinate out of range: {lat},{lng}"));
    }
    Ok(Coordinate::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Nearby { lat, lng, radius }) => {
            let config = dispatch_core::load_app_config()?;
            facilities::run_nearby(&config, Coordinate::new(lat, lng), radius).await?;
        }
        Some(Commands::Distance {
            from,
            to,
            minutes_per_mile,
        }) => facilities::run_distance(from, to, minutes_per_mile),
        Some(Commands::Seed) => facilities::run_seed(),
        None => println!("dispatch-cli: run with --help for commands"),
    }

    Ok(())
}
