use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

/// Whether a facility is open right now.
///
/// The place-search provider does not publish live opening hours, so the
/// classifier records [`OpenState::AssumedOpen`] rather than claiming to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenState {
    Open,
    Closed,
    AssumedOpen,
}

impl OpenState {
    #[must_use]
    pub fn is_open_now(self) -> bool {
        matches!(self, OpenState::Open | OpenState::AssumedOpen)
    }
}

/// Semantic flags derived at classification time. Not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FacilityAttributes {
    pub is_free: bool,
    pub is_indoor: bool,
    pub is_course: bool,
    pub is_outdoor: bool,
    pub open_now: OpenState,
}

impl Default for FacilityAttributes {
    fn default() -> Self {
        Self {
            is_free: false,
            is_indoor: false,
            is_course: false,
            is_outdoor: false,
            open_now: OpenState::AssumedOpen,
        }
    }
}

/// One discoverable place, created once per aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Provider-assigned place ID; unique within one aggregation run.
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    pub address: Option<String>,
    /// External deep link to the provider's place page.
    pub url: Option<String>,
    pub phone: Option<String>,
    /// Provider-reported distance from the search center. `None` until the
    /// sort stage fills it in from the current distance base.
    pub distance_meters: Option<u32>,
    /// Raw provider category label, e.g. `"스포츠,레저 > 스포츠시설 > 헬스클럽"`.
    pub category: String,
    /// The search keyword that first surfaced this facility.
    pub keyword: String,
    pub attributes: FacilityAttributes,
}

/// A user-selectable attribute filter. Active filters combine with OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeTag {
    Free,
    Indoor,
    Outdoor,
    Course,
    OpenNow,
}

impl AttributeTag {
    pub const ALL: [AttributeTag; 5] = [
        AttributeTag::Free,
        AttributeTag::Indoor,
        AttributeTag::Outdoor,
        AttributeTag::Course,
        AttributeTag::OpenNow,
    ];

    /// Whether `facility` satisfies this single filter.
    ///
    /// `Outdoor` is "neither indoor nor a course"; it does not consult
    /// [`FacilityAttributes::is_outdoor`].
    #[must_use]
    pub fn matches(self, facility: &Facility) -> bool {
        let attrs = &facility.attributes;
        match self {
            AttributeTag::Free => attrs.is_free,
            AttributeTag::Indoor => attrs.is_indoor,
            AttributeTag::Outdoor => !attrs.is_indoor && !attrs.is_course,
            AttributeTag::Course => attrs.is_course,
            AttributeTag::OpenNow => attrs.open_now.is_open_now(),
        }
    }
}

impl std::fmt::Display for AttributeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeTag::Free => write!(f, "free"),
            AttributeTag::Indoor => write!(f, "indoor"),
            AttributeTag::Outdoor => write!(f, "outdoor"),
            AttributeTag::Course => write!(f, "course"),
            AttributeTag::OpenNow => write!(f, "open_now"),
        }
    }
}

impl std::str::FromStr for AttributeTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(AttributeTag::Free),
            "indoor" => Ok(AttributeTag::Indoor),
            "outdoor" => Ok(AttributeTag::Outdoor),
            "course" => Ok(AttributeTag::Course),
            "open_now" | "open-now" => Ok(AttributeTag::OpenNow),
            other => Err(CoreError::UnknownAttributeTag(other.to_string())),
        }
    }
}
