//! Kakao Local API response types.
//!
//! Every numeric field in a keyword-search document (`x`, `y`, `distance`)
//! arrives as a string; conversion happens in [`KakaoDocument::into_raw_place`].

use fitmap_core::Coordinate;
use serde::Deserialize;

use crate::provider::RawPlace;

/// Envelope for `GET /v2/local/search/keyword.json`.
#[derive(Debug, Deserialize)]
pub struct KeywordSearchResponse {
    pub meta: SearchMeta,
    #[serde(default)]
    pub documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMeta {
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub pageable_count: u32,
    #[serde(default)]
    pub is_end: bool,
}

/// One place in a keyword-search result.
#[derive(Debug, Deserialize)]
pub struct KakaoDocument {
    pub id: String,
    pub place_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_group_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
    /// Longitude.
    #[serde(default)]
    pub x: String,
    /// Latitude.
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub place_url: String,
    /// Meters from the request center; empty when no center was sent.
    #[serde(default)]
    pub distance: String,
}

/// Error body returned with 4xx responses.
#[derive(Debug, Deserialize)]
pub struct KakaoErrorBody {
    #[serde(rename = "errorType", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

impl KakaoDocument {
    /// Convert to a provider-neutral [`RawPlace`].
    ///
    /// Unparseable or out-of-range coordinates leave `coordinate` empty so
    /// the aggregator can drop the record.
    #[must_use]
    pub fn into_raw_place(self) -> RawPlace {
        let coordinate = match (self.y.trim().parse::<f64>(), self.x.trim().parse::<f64>()) {
            (Ok(lat), Ok(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        };

        let address = non_empty(self.road_address_name).or_else(|| non_empty(self.address_name));

        RawPlace {
            id: self.id,
            name: self.place_name,
            coordinate,
            address,
            category: self.category_name,
            distance_meters: self.distance.trim().parse::<u32>().ok(),
            url: non_empty(self.place_url),
            phone: non_empty(self.phone),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
