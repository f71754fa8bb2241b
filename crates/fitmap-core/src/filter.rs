//! Radius and attribute filtering over an aggregated facility set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::facility::{AttributeTag, Facility};
use crate::geo::{distance_km, Coordinate};

/// Snapshot of the user's filter selections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// `None` means no radius exclusion.
    pub selected_radius_km: Option<f64>,
    pub active_filters: BTreeSet<AttributeTag>,
}

impl FilterState {
    /// Flip `tag` on or off. Returns `true` if the tag is now active.
    pub fn toggle(&mut self, tag: AttributeTag) -> bool {
        if self.active_filters.remove(&tag) {
            false
        } else {
            self.active_filters.insert(tag);
            true
        }
    }

    /// OR across the active set; an empty set accepts everything.
    #[must_use]
    pub fn accepts_attributes(&self, facility: &Facility) -> bool {
        self.active_filters.is_empty()
            || self.active_filters.iter().any(|tag| tag.matches(facility))
    }

    fn within_radius(&self, base: Coordinate, facility: &Facility) -> bool {
        self.selected_radius_km
            .is_none_or(|limit| distance_km(base, facility.location) <= limit)
    }
}

/// Apply the radius and attribute filters to `all`, preserving input order.
///
/// With no distance base the input is returned unfiltered: neither the
/// radius nor the attribute test runs.
#[must_use]
pub fn apply_filters(
    all: &[Facility],
    state: &FilterState,
    distance_base: Option<Coordinate>,
) -> Vec<Facility> {
    let Some(base) = distance_base else {
        tracing::debug!(
            count = all.len(),
            "no distance base available; surfacing facilities unfiltered"
        );
        return all.to_vec();
    };

    let visible: Vec<Facility> = all
        .iter()
        .filter(|facility| state.within_radius(base, facility))
        .filter(|facility| state.accepts_attributes(facility))
        .cloned()
        .collect();

    tracing::debug!(
        total = all.len(),
        visible = visible.len(),
        radius_km = ?state.selected_radius_km,
        filters = ?state.active_filters,
        "applied facility filters"
    );
    visible
}
