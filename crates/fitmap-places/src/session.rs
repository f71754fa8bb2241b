//! Drives the discovery pipeline for one user session.
//!
//! Holds the filter selections, the search center, the last geolocation fix
//! and the facility set from the latest completed aggregation run. Filter
//! changes re-render from that cached set; position changes re-aggregate.

use fitmap_core::{
    apply_filters, resolve_distance_base, sort_by_distance, AppConfig, AttributeTag, Coordinate,
    Facility, FilterState,
};

use crate::aggregate::{AggregateOutcome, PlaceSearchAggregator, MAX_PAGE_SIZE};
use crate::generation::GenerationCounter;
use crate::geolocation::GeolocationProvider;
use crate::provider::{PlaceSearchProvider, SearchResponse};
use crate::viewport::ViewportAccessor;

/// Radius for destination lookups, the provider maximum.
pub const DESTINATION_RADIUS_M: u32 = 20_000;

/// Receives each filtered, sorted facility list.
pub trait PresentationSink {
    fn render(&mut self, facilities: &[Facility], count: usize);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Radius of every per-keyword search, in meters.
    pub search_radius_m: u32,
    pub default_center: Coordinate,
    pub default_zoom: u8,
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            search_radius_m: config.search_radius_m,
            default_center: config.default_center,
            default_zoom: config.default_zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The sink received a list of this many facilities.
    Rendered(usize),
    /// A newer run started first; nothing was rendered.
    Superseded,
}

pub struct NearbySession<P, G, V, S> {
    aggregator: PlaceSearchAggregator<P>,
    geolocation: G,
    viewport: V,
    sink: S,
    settings: SessionSettings,
    generations: GenerationCounter,
    filter_state: FilterState,
    search_center: Option<Coordinate>,
    user_position: Option<Coordinate>,
    facilities: Vec<Facility>,
    /// Center the cached facilities were searched around.
    facilities_center: Option<Coordinate>,
}

impl<P, G, V, S> NearbySession<P, G, V, S>
where
    P: PlaceSearchProvider,
    G: GeolocationProvider,
    V: ViewportAccessor,
    S: PresentationSink,
{
    pub fn new(
        aggregator: PlaceSearchAggregator<P>,
        geolocation: G,
        viewport: V,
        sink: S,
        settings: SessionSettings,
    ) -> Self {
        Self {
            aggregator,
            geolocation,
            viewport,
            sink,
            settings,
            generations: GenerationCounter::new(),
            filter_state: FilterState::default(),
            search_center: None,
            user_position: None,
            facilities: Vec::new(),
            facilities_center: None,
        }
    }

    /// Locate the user, then aggregate and render around them.
    pub async fn start(&mut self) -> RefreshOutcome {
        self.locate().await;
        self.refresh().await
    }

    /// Drop any selected search result, locate again and re-aggregate.
    pub async fn recenter(&mut self) -> RefreshOutcome {
        self.search_center = None;
        self.locate().await;
        self.refresh().await
    }

    /// Aggregate around `coordinate` and, once that run completes, make it
    /// the distance base. A superseded run leaves the session untouched.
    pub async fn select_search_result(&mut self, coordinate: Coordinate) -> RefreshOutcome {
        tracing::info!(%coordinate, "search result selected as distance base");
        let Some(facilities) = self.aggregate_around(coordinate).await else {
            return RefreshOutcome::Superseded;
        };
        self.search_center = Some(coordinate);
        self.viewport.set_center(coordinate);
        self.commit(facilities, coordinate)
    }

    /// Run a fresh aggregation around the current distance base and render.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let center = self.distance_base().unwrap_or(self.settings.default_center);
        match self.aggregate_around(center).await {
            Some(facilities) => self.commit(facilities, center),
            None => RefreshOutcome::Superseded,
        }
    }

    /// Ask for a position fix and center the viewport on it, falling back to
    /// the configured default center when geolocation fails.
    pub async fn locate(&mut self) {
        let center = match self.geolocation.current_position().await {
            Ok(position) => {
                tracing::info!(%position, "geolocation fix obtained");
                self.user_position = Some(position);
                position
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    fallback = %self.settings.default_center,
                    "geolocation failed; using default center"
                );
                self.settings.default_center
            }
        };
        self.viewport.set_center(center);
        self.viewport.set_zoom_level(self.settings.default_zoom);
    }

    /// Look up destinations by free text near the current viewport, for the
    /// user to pick a search center from.
    pub async fn search_destinations(&self, query: &str) -> SearchResponse {
        self.aggregator
            .provider()
            .search(
                query,
                self.viewport.center(),
                DESTINATION_RADIUS_M,
                MAX_PAGE_SIZE,
            )
            .await
    }

    /// `None` removes the radius limit. Re-renders from the cached set.
    pub fn set_radius(&mut self, radius_km: Option<f64>) -> usize {
        self.filter_state.selected_radius_km = radius_km;
        self.render()
    }

    /// Flip an attribute filter. Re-renders from the cached set.
    pub fn toggle_filter(&mut self, tag: AttributeTag) -> usize {
        let active = self.filter_state.toggle(tag);
        tracing::debug!(%tag, active, "attribute filter toggled");
        self.render()
    }

    pub fn clear_filters(&mut self) -> usize {
        self.filter_state.active_filters.clear();
        self.render()
    }

    /// Filter and sort the cached facility set and hand it to the sink.
    pub fn render(&mut self) -> usize {
        let base = self.distance_base();
        let mut visible = apply_filters(&self.facilities, &self.filter_state, base);
        if base != self.facilities_center {
            // Provider distances are measured from the search center.
            for facility in &mut visible {
                facility.distance_meters = None;
            }
        }
        let ordered = sort_by_distance(visible, base);
        let count = ordered.len();
        self.sink.render(&ordered, count);
        count
    }

    /// Search center, then user position, then viewport center.
    #[must_use]
    pub fn distance_base(&self) -> Option<Coordinate> {
        resolve_distance_base(
            self.search_center,
            self.user_position,
            Some(self.viewport.center()),
        )
    }

    /// A handle that can supersede this session's in-flight aggregation.
    #[must_use]
    pub fn generations(&self) -> GenerationCounter {
        self.generations.clone()
    }

    #[must_use]
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    #[must_use]
    pub fn search_center(&self) -> Option<Coordinate> {
        self.search_center
    }

    #[must_use]
    pub fn user_position(&self) -> Option<Coordinate> {
        self.user_position
    }

    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// `None` when a newer run superseded this one.
    async fn aggregate_around(&self, center: Coordinate) -> Option<Vec<Facility>> {
        let token = self.generations.begin();
        let outcome = self
            .aggregator
            .aggregate(
                center,
                self.settings.search_radius_m,
                &self.aggregator.discovery().keywords,
                &token,
            )
            .await;

        match outcome {
            AggregateOutcome::Completed(facilities) => Some(facilities),
            AggregateOutcome::Superseded => {
                tracing::debug!(
                    generation = token.generation(),
                    %center,
                    "aggregation superseded; keeping previous facilities"
                );
                None
            }
        }
    }

    fn commit(&mut self, facilities: Vec<Facility>, center: Coordinate) -> RefreshOutcome {
        self.facilities = facilities;
        self.facilities_center = Some(center);
        RefreshOutcome::Rendered(self.render())
    }
}
