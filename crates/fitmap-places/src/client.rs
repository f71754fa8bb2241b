//! HTTP client for the Kakao Local keyword-search API.
//!
//! Wraps `reqwest` with Kakao-specific authentication, error-body handling
//! and typed response deserialization.

use std::time::Duration;

use fitmap_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::provider::{PlaceSearchProvider, RawPlace, SearchResponse};
use crate::types::{KakaoErrorBody, KeywordSearchResponse};

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const KEYWORD_SEARCH_PATH: &str = "v2/local/search/keyword.json";

/// Client for the Kakao Local REST API.
///
/// Use [`KakaoLocalClient::new`] for production or
/// [`KakaoLocalClient::with_base_url`] to point at a mock server in tests.
pub struct KakaoLocalClient {
    client: Client,
    api_key: String,
    keyword_url: Url,
}

impl KakaoLocalClient {
    /// Creates a new client pointed at the production Kakao API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let keyword_url = Url::parse(&normalised)
            .and_then(|base| base.join(KEYWORD_SEARCH_PATH))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            keyword_url,
        })
    }

    /// Searches places by keyword, nearest first when a center is given.
    ///
    /// Documents with missing or malformed coordinates are still returned
    /// (with `coordinate: None`); dropping them is the caller's decision.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if the API answers with a non-2xx status.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_keyword(
        &self,
        query: &str,
        center: Option<Coordinate>,
        radius_m: u32,
        page_size: u32,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let url = self.build_url(query, center, radius_m, page_size);
        let body = self.request_text(&url).await?;

        let response: KeywordSearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("keyword search(query={query})"),
                source: e,
            })?;

        tracing::debug!(
            query,
            total_count = response.meta.total_count,
            returned = response.documents.len(),
            is_end = response.meta.is_end,
            "keyword search completed"
        );

        Ok(response
            .documents
            .into_iter()
            .map(crate::types::KakaoDocument::into_raw_place)
            .collect())
    }

    /// Builds the keyword-search URL with percent-encoded query parameters.
    fn build_url(
        &self,
        query: &str,
        center: Option<Coordinate>,
        radius_m: u32,
        page_size: u32,
    ) -> Url {
        let mut url = self.keyword_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            if let Some(center) = center {
                pairs.append_pair("x", &center.lng.to_string());
                pairs.append_pair("y", &center.lat.to_string());
                pairs.append_pair("radius", &radius_m.to_string());
                pairs.append_pair("sort", "distance");
            }
            pairs.append_pair("size", &page_size.to_string());
        }
        url
    }

    /// Sends an authenticated GET and returns the body of a 2xx response.
    async fn request_text(&self, url: &Url) -> Result<String, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<KakaoErrorBody>(&body)
                .ok()
                .map(|e| {
                    if e.error_type.is_empty() {
                        e.message
                    } else {
                        format!("{}: {}", e.error_type, e.message)
                    }
                })
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "no error message".to_string());
            return Err(PlacesError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

impl PlaceSearchProvider for KakaoLocalClient {
    async fn search(
        &self,
        keyword: &str,
        center: Coordinate,
        radius_m: u32,
        page_size: u32,
    ) -> SearchResponse {
        match self
            .search_keyword(keyword, Some(center), radius_m, page_size)
            .await
        {
            Ok(places) => SearchResponse::from_places(places),
            Err(err) => SearchResponse::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> KakaoLocalClient {
        KakaoLocalClient::with_base_url("test-key", 30, "fitmap-test", base_url)
            .expect("client construction should not fail")
    }

    const CITY_HALL: Coordinate = Coordinate {
        lat: 37.5665,
        lng: 126.978,
    };

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://dapi.kakao.com");
        let url = client.build_url("gym", Some(CITY_HALL), 2000, 15);
        assert_eq!(
            url.as_str(),
            "https://dapi.kakao.com/v2/local/search/keyword.json\
             ?query=gym&x=126.978&y=37.5665&radius=2000&sort=distance&size=15"
        );
    }

    #[test]
    fn build_url_without_center_omits_location_params() {
        let client = test_client("https://dapi.kakao.com/");
        let url = client.build_url("gym", None, 2000, 5);
        assert_eq!(
            url.as_str(),
            "https://dapi.kakao.com/v2/local/search/keyword.json?query=gym&size=5"
        );
    }

    #[test]
    fn build_url_encodes_hangul_query() {
        let client = test_client("https://dapi.kakao.com");
        let url = client.build_url("헬스장", None, 2000, 15);
        assert!(
            url.as_str().contains("query=%ED%97%AC%EC%8A%A4%EC%9E%A5"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let client = test_client("http://127.0.0.1:9000/proxy");
        let url = client.build_url("pool", None, 100, 1);
        assert!(url
            .as_str()
            .starts_with("http://127.0.0.1:9000/proxy/v2/local/search/keyword.json"));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = KakaoLocalClient::with_base_url("k", 5, "ua", "not a url");
        assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
    }
}
