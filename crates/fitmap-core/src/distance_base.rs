//! Reference point for "how far away is this facility".

use crate::geo::Coordinate;

/// Pick the distance base for a filter pass.
///
/// First available wins: the selected search result, then the user's
/// geolocation fix, then the map's visual center. Returns `None` only when
/// none of the three is known.
#[must_use]
pub fn resolve_distance_base(
    search_center: Option<Coordinate>,
    user_position: Option<Coordinate>,
    viewport_center: Option<Coordinate>,
) -> Option<Coordinate> {
    search_center.or(user_position).or(viewport_center)
}
