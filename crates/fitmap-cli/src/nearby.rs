//! `fitmap nearby`: run the full discovery pipeline once and print the list.

use std::collections::BTreeSet;

use anyhow::Context;
use fitmap_core::{load_discovery, AppConfig, AttributeTag, Coordinate, DiscoveryFile};
use fitmap_places::{
    GeolocationProvider, InMemoryViewport, KakaoLocalClient, NearbySession, PlaceSearchAggregator,
    PlaceSearchProvider, PresentationSink, RefreshOutcome, SearchStatus, SessionSettings,
    StaticGeolocation, ViewportAccessor,
};

use crate::output::{write_listing, LatestFrameSink};
use crate::PositionArgs;

/// Built-in keywords and rules unless the config names a discovery file.
pub(crate) fn discovery_for(config: &AppConfig) -> anyhow::Result<DiscoveryFile> {
    match &config.discovery_path {
        Some(path) => load_discovery(path)
            .with_context(|| format!("loading discovery file {}", path.display())),
        None => Ok(DiscoveryFile::default()),
    }
}

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<KakaoLocalClient> {
    KakaoLocalClient::with_base_url(
        &config.kakao_rest_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.kakao_base_url,
    )
    .context("building Kakao Local client")
}

/// Locate first, then look up `query` around the located viewport and return
/// the first match that has a coordinate.
pub(crate) async fn find_destination<P, G, V, S>(
    session: &mut NearbySession<P, G, V, S>,
    query: &str,
) -> anyhow::Result<(String, Coordinate)>
where
    P: PlaceSearchProvider,
    G: GeolocationProvider,
    V: ViewportAccessor,
    S: PresentationSink,
{
    session.locate().await;
    let response = session.search_destinations(query).await;
    if let SearchStatus::Error(message) = &response.status {
        anyhow::bail!("destination search for '{query}' failed: {message}");
    }
    response
        .places
        .iter()
        .find_map(|place| place.coordinate.map(|c| (place.name.clone(), c)))
        .ok_or_else(|| anyhow::anyhow!("no destination found for '{query}'"))
}

/// Aggregate facilities around the given position (or `near` destination),
/// apply the requested filters and print them nearest first.
///
/// # Errors
///
/// Returns an error if the discovery file or client cannot be loaded, the
/// position is out of range, or the `near` query finds nothing usable.
/// Individual keyword search failures are logged and skipped.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    position: PositionArgs,
    radius_km: Option<f64>,
    filters: &[AttributeTag],
    near: Option<&str>,
) -> anyhow::Result<()> {
    let discovery = discovery_for(config)?;
    let aggregator = PlaceSearchAggregator::new(build_client(config)?, discovery, config.page_size);
    let mut session = NearbySession::new(
        aggregator,
        StaticGeolocation::new(position.coordinate()?),
        InMemoryViewport::new(config.default_center, config.default_zoom),
        LatestFrameSink::default(),
        SessionSettings::from_config(config),
    );

    // Repeated flags would toggle each other off.
    let unique: BTreeSet<AttributeTag> = filters.iter().copied().collect();
    for tag in unique {
        session.toggle_filter(tag);
    }
    session.set_radius(radius_km);

    let outcome = match near {
        Some(query) => {
            let (name, destination) = find_destination(&mut session, query).await?;
            println!("searching around {name} ({destination})");
            session.select_search_result(destination).await
        }
        None => session.start().await,
    };

    if outcome == RefreshOutcome::Superseded {
        anyhow::bail!("search was superseded before it completed");
    }

    tracing::debug!(
        renders = session.sink().renders(),
        base = ?session.distance_base(),
        "nearby run finished"
    );

    let mut stdout = std::io::stdout().lock();
    write_listing(&mut stdout, session.sink().latest())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use fitmap_places::{RawPlace, SearchResponse};

    use super::*;

    const CITY_HALL: Coordinate = Coordinate {
        lat: 37.5665,
        lng: 126.978,
    };
    const BUSAN: Coordinate = Coordinate {
        lat: 35.1796,
        lng: 129.0756,
    };

    /// Answers every search with one place at the request center.
    struct EchoProvider;

    impl PlaceSearchProvider for EchoProvider {
        async fn search(
            &self,
            keyword: &str,
            center: Coordinate,
            _radius_m: u32,
            _page_size: u32,
        ) -> SearchResponse {
            SearchResponse::from_places(vec![RawPlace {
                id: keyword.to_string(),
                name: keyword.to_string(),
                coordinate: Some(center),
                address: None,
                category: String::new(),
                distance_meters: None,
                url: None,
                phone: None,
            }])
        }
    }

    fn session(
        position: Option<Coordinate>,
    ) -> NearbySession<EchoProvider, StaticGeolocation, InMemoryViewport, LatestFrameSink>
    {
        NearbySession::new(
            PlaceSearchAggregator::new(EchoProvider, DiscoveryFile::default(), 15),
            StaticGeolocation::new(position),
            InMemoryViewport::new(CITY_HALL, 4),
            LatestFrameSink::default(),
            SessionSettings {
                search_radius_m: 2000,
                default_center: CITY_HALL,
                default_zoom: 4,
            },
        )
    }

    #[tokio::test]
    async fn destination_lookup_runs_around_the_given_position() {
        let mut session = session(Some(BUSAN));

        let (name, destination) = find_destination(&mut session, "해운대")
            .await
            .expect("destination should be found");

        assert_eq!(name, "해운대");
        assert_eq!(destination, BUSAN);
        assert_eq!(session.viewport().center, BUSAN);
    }

    #[tokio::test]
    async fn destination_lookup_without_position_uses_default_center() {
        let mut session = session(None);

        let (_, destination) = find_destination(&mut session, "서울숲")
            .await
            .expect("destination should be found");

        assert_eq!(destination, CITY_HALL);
    }
}
