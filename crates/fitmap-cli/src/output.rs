//! Plain-text rendering of facility lists and destination lookups.

use std::io::{self, Write};

use fitmap_core::{format_distance, AttributeTag, Facility};
use fitmap_places::{PresentationSink, RawPlace};

/// Keeps only the most recent frame; the CLI prints once the session settles.
#[derive(Debug, Default)]
pub(crate) struct LatestFrameSink {
    latest: Vec<Facility>,
    renders: usize,
}

impl LatestFrameSink {
    pub(crate) fn latest(&self) -> &[Facility] {
        &self.latest
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders
    }
}

impl PresentationSink for LatestFrameSink {
    fn render(&mut self, facilities: &[Facility], _count: usize) {
        self.latest = facilities.to_vec();
        self.renders += 1;
    }
}

fn distance_label(meters: Option<u32>) -> String {
    meters.map_or_else(|| "\u{2014}".to_string(), format_distance)
}

/// Comma-separated attribute badges, e.g. `free, course`.
fn badges(facility: &Facility) -> String {
    AttributeTag::ALL
        .iter()
        .filter(|tag| **tag != AttributeTag::OpenNow && tag.matches(facility))
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write one card per facility, nearest first as given.
pub(crate) fn write_listing<W: Write>(out: &mut W, facilities: &[Facility]) -> io::Result<()> {
    if facilities.is_empty() {
        writeln!(out, "no facilities found; try a wider radius or fewer filters")?;
        return Ok(());
    }

    writeln!(out, "{} facilities", facilities.len())?;
    for (i, facility) in facilities.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {}  {}",
            i + 1,
            facility.name,
            distance_label(facility.distance_meters)
        )?;
        if let Some(address) = &facility.address {
            writeln!(out, "     {address}")?;
        }
        let badges = badges(facility);
        if !badges.is_empty() {
            writeln!(out, "     [{badges}]")?;
        }
        if let Some(url) = &facility.url {
            writeln!(out, "     {url}")?;
        }
    }
    Ok(())
}

pub(crate) fn write_destinations<W: Write>(out: &mut W, places: &[RawPlace]) -> io::Result<()> {
    if places.is_empty() {
        writeln!(out, "no destinations found")?;
        return Ok(());
    }

    writeln!(out, "{:<10}{:<24}{:<10}ADDRESS", "DISTANCE", "NAME", "LAT,LNG")?;
    for place in places {
        let position = place
            .coordinate
            .map_or_else(|| "\u{2014}".to_string(), |c| format!("{:.4},{:.4}", c.lat, c.lng));
        writeln!(
            out,
            "{:<10}{:<24}{:<10}{}",
            distance_label(place.distance_meters),
            place.name,
            position,
            place.address.as_deref().unwrap_or("\u{2014}")
        )?;
    }
    Ok(())
}
