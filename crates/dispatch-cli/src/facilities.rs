//! Facility command handlers for the CLI.

use anyhow::Context;
use dispatch_core::{
    eta_minutes, haversine_miles, rank_facilities, seed_facilities, AppConfig, Coordinate,
    Facility, RankingConfig, RawFacility,
};
use dispatch_places::PlacesClient;

/// Runs both upstream searches around `center` and prints the ranked list.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    center: Coordinate,
    radius: u32,
) -> anyhow::Result<()> {
    let api_key = config.require_places_api_key()?;
    let client = PlacesClient::with_base_url(
        api_key,
        config.places_timeout_secs,
        &config.places_base_url,
    )?;

    let places = client
        .search_emergency_facilities(center, radius)
        .await
        .context("place search failed")?;
    tracing::debug!(count = places.len(), %center, radius, "place search complete");

    let ranking = RankingConfig::new(center, config.eta_minutes_per_mile);
    let ranked = rank_facilities(places.into_iter().map(RawFacility::from).collect(), &ranking);
    if ranked.is_empty() {
        println!("No facilities found within {radius} m of {center}.");
        return Ok(());
    }

    print_table(&ranked);
    Ok(())
}

pub(crate) fn run_distance(from: Coordinate, to: Coordinate, minutes_per_mile: f64) {
    let miles = haversine_miles(from, to);
    println!(
        "{miles:.2} mi, ETA {} min",
        eta_minutes(miles, minutes_per_mile)
    );
}

pub(crate) fn run_seed() {
    print_table(&seed_facilities());
}

fn print_table(facilities: &[Facility]) {
    println!("{:<4} {:<45} {:<15} {:>7} {:>5}", "#", "Name", "Category", "Miles", "ETA");
    for (rank, facility) in facilities.iter().enumerate() {
        println!("{}", format_row(rank + 1, facility));
    }
}

fn format_row(rank: usize, facility: &Facility) -> String {
    format!(
        "{:<4} {:<45} {:<15} {:>7.2} {:>5}",
        rank,
        truncate(&facility.name, 45),
        facility.category.as_str(),
        facility.distance_miles,
        facility.eta_minutes
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}
