//! Map viewport state the pipeline reads and moves.

use fitmap_core::Coordinate;

pub trait ViewportAccessor {
    fn center(&self) -> Coordinate;
    fn set_center(&mut self, center: Coordinate);
    fn set_zoom_level(&mut self, level: u8);
}

/// Viewport held in memory, for headless front ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InMemoryViewport {
    pub center: Coordinate,
    /// 1 (closest) to 14 (widest).
    pub zoom_level: u8,
}

impl InMemoryViewport {
    #[must_use]
    pub fn new(center: Coordinate, zoom_level: u8) -> Self {
        Self { center, zoom_level }
    }
}

impl ViewportAccessor for InMemoryViewport {
    fn center(&self) -> Coordinate {
        self.center
    }

    fn set_center(&mut self, center: Coordinate) {
        self.center = center;
    }

    fn set_zoom_level(&mut self, level: u8) {
        self.zoom_level = level.clamp(1, 14);
    }
}
