use crate::facility::Facility;
use crate::geo::{distance_meters, Coordinate};

/// Order facilities nearest-first.
///
/// Facilities without a provider-reported distance get one computed from
/// `distance_base`. When there is no base, unknown distances stay unknown
/// and sort after every known one. The sort is stable, so equal distances
/// keep their incoming order.
#[must_use]
pub fn sort_by_distance(
    mut facilities: Vec<Facility>,
    distance_base: Option<Coordinate>,
) -> Vec<Facility> {
    if let Some(base) = distance_base {
        for facility in &mut facilities {
            if facility.distance_meters.is_none() {
                facility.distance_meters = Some(distance_meters(base, facility.location));
            }
        }
    }

    facilities.sort_by_key(|facility| facility.distance_meters.map_or(u64::MAX, u64::from));
    facilities
}
