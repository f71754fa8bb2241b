//! Provider-neutral place-search contract.

use std::future::Future;

use fitmap_core::Coordinate;
use serde::{Deserialize, Serialize};

/// A place record as returned by a search provider, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    pub id: String,
    pub name: String,
    /// Absent when the provider sent missing or malformed coordinates.
    pub coordinate: Option<Coordinate>,
    pub address: Option<String>,
    pub category: String,
    pub distance_meters: Option<u32>,
    pub url: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    NoResult,
    Error(String),
}

/// Outcome of a single keyword search. Never an `Err`: failures are carried
/// in `status` so one keyword cannot abort an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub places: Vec<RawPlace>,
}

impl SearchResponse {
    /// `Ok` with `places`, or `NoResult` when `places` is empty.
    #[must_use]
    pub fn from_places(places: Vec<RawPlace>) -> Self {
        let status = if places.is_empty() {
            SearchStatus::NoResult
        } else {
            SearchStatus::Ok
        };
        Self { status, places }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error(message.into()),
            places: Vec::new(),
        }
    }
}

/// Keyword search around a center point.
pub trait PlaceSearchProvider {
    /// Search for `keyword` within `radius_m` of `center`, returning at most
    /// `page_size` places.
    fn search(
        &self,
        keyword: &str,
        center: Coordinate,
        radius_m: u32,
        page_size: u32,
    ) -> impl Future<Output = SearchResponse> + Send;
}
