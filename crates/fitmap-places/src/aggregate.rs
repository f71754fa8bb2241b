//! Fan-out keyword search with fan-in merge.
//!
//! One search per keyword is put in flight at once; results are merged in
//! completion order on the calling task. First-seen place IDs win, so a
//! facility keeps the classification of whichever keyword surfaced it first.

use std::collections::HashSet;

use fitmap_core::{Coordinate, DiscoveryFile, Facility};
use futures::stream::{self, StreamExt};

use crate::generation::RunToken;
use crate::provider::{PlaceSearchProvider, RawPlace, SearchStatus};

/// Per-keyword page size ceiling imposed by the provider.
pub const MAX_PAGE_SIZE: u32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    /// Every keyword search settled while this run was still current.
    Completed(Vec<Facility>),
    /// A newer run began before this one finished; its results are discarded.
    Superseded,
}

pub struct PlaceSearchAggregator<P> {
    provider: P,
    discovery: DiscoveryFile,
    page_size: u32,
}

impl<P: PlaceSearchProvider> PlaceSearchAggregator<P> {
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(provider: P, discovery: DiscoveryFile, page_size: u32) -> Self {
        Self {
            provider,
            discovery,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn discovery(&self) -> &DiscoveryFile {
        &self.discovery
    }

    /// Search every keyword around `center` and merge the results.
    ///
    /// Completes once every search has settled. A failed or empty keyword
    /// contributes nothing and does not affect the others. If `token` stops
    /// being current while searches are outstanding, the remaining requests
    /// are dropped and [`AggregateOutcome::Superseded`] is returned.
    pub async fn aggregate(
        &self,
        center: Coordinate,
        radius_m: u32,
        keywords: &[String],
        token: &RunToken,
    ) -> AggregateOutcome {
        let generation = token.generation();
        let mut searches = stream::iter(keywords)
            .map(|keyword| async move {
                let response = self
                    .provider
                    .search(keyword, center, radius_m, self.page_size)
                    .await;
                (keyword.as_str(), response)
            })
            .buffer_unordered(keywords.len().max(1));

        let mut seen: HashSet<String> = HashSet::new();
        let mut facilities: Vec<Facility> = Vec::new();
        let mut failed = 0usize;

        while let Some((keyword, response)) = searches.next().await {
            if !token.is_current() {
                tracing::debug!(generation, keyword, "discarding results from superseded run");
                return AggregateOutcome::Superseded;
            }

            match &response.status {
                SearchStatus::Ok => {}
                SearchStatus::NoResult => {
                    tracing::debug!(generation, keyword, "keyword search returned no places");
                    continue;
                }
                SearchStatus::Error(message) => {
                    failed += 1;
                    tracing::warn!(
                        generation,
                        keyword,
                        error = %message,
                        "keyword search failed; contributing no facilities"
                    );
                    continue;
                }
            }

            for place in response.places {
                if let Some(facility) = self.merge_place(keyword, place, &mut seen) {
                    facilities.push(facility);
                }
            }
        }

        if !token.is_current() {
            return AggregateOutcome::Superseded;
        }

        tracing::info!(
            generation,
            keywords = keywords.len(),
            failed,
            facilities = facilities.len(),
            "aggregation run completed"
        );
        AggregateOutcome::Completed(facilities)
    }

    /// Classify `place` unless it is a duplicate or has no usable coordinate.
    fn merge_place(
        &self,
        keyword: &str,
        place: RawPlace,
        seen: &mut HashSet<String>,
    ) -> Option<Facility> {
        let Some(location) = place.coordinate else {
            tracing::debug!(keyword, id = %place.id, "dropping place without coordinates");
            return None;
        };
        if !seen.insert(place.id.clone()) {
            return None;
        }

        let attributes = self
            .discovery
            .classify(keyword, &place.name, &place.category);

        Some(Facility {
            id: place.id,
            name: place.name,
            location,
            address: place.address,
            url: place.url,
            phone: place.phone,
            distance_meters: place.distance_meters,
            category: place.category,
            keyword: keyword.to_string(),
            attributes,
        })
    }
}
