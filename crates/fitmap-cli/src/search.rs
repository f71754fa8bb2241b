//! `fitmap search`: free-text destination lookup.

use fitmap_core::AppConfig;
use fitmap_places::{DESTINATION_RADIUS_M, MAX_PAGE_SIZE};

use crate::nearby::build_client;
use crate::output::write_destinations;
use crate::PositionArgs;

/// Print places matching `query`, nearest first when a position is given.
///
/// # Errors
///
/// Returns an error if the position is out of range or the API request
/// fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    position: PositionArgs,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let center = position.coordinate()?;
    let places = client
        .search_keyword(query, center, DESTINATION_RADIUS_M, MAX_PAGE_SIZE)
        .await?;

    tracing::info!(query, results = places.len(), "destination search completed");

    let mut stdout = std::io::stdout().lock();
    write_destinations(&mut stdout, &places)?;
    Ok(())
}
