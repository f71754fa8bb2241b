pub mod aggregate;
pub mod client;
pub mod error;
pub mod generation;
pub mod geolocation;
pub mod provider;
pub mod session;
pub mod types;
pub mod viewport;

pub use aggregate::{AggregateOutcome, PlaceSearchAggregator, MAX_PAGE_SIZE};
pub use client::KakaoLocalClient;
pub use error::PlacesError;
pub use generation::{GenerationCounter, RunToken};
pub use geolocation::{GeolocationError, GeolocationProvider, StaticGeolocation};
pub use provider::{PlaceSearchProvider, RawPlace, SearchResponse, SearchStatus};
pub use session::{
    NearbySession, PresentationSink, RefreshOutcome, SessionSettings, DESTINATION_RADIUS_M,
};
pub use types::{KakaoDocument, KeywordSearchResponse, SearchMeta};
pub use viewport::{InMemoryViewport, ViewportAccessor};
