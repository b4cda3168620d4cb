//! Collision-avoiding screen placement for simultaneously visible captions.

use serde::{Deserialize, Serialize};

use super::model::{Caption, Position};

/// A candidate screen position. Lower `priority` is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionZone {
    pub x: f64,
    pub y: f64,
    pub priority: u32,
}

impl PositionZone {
    pub const fn new(x: f64, y: f64, priority: u32) -> Self {
        Self { x, y, priority }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Safe zones around the frame edges, keeping the center (faces) clear.
pub const DEFAULT_ZONES: [PositionZone; 8] = [
    PositionZone::new(50.0, 85.0, 1), // bottom-center
    PositionZone::new(50.0, 15.0, 2), // top-center
    PositionZone::new(20.0, 85.0, 3), // bottom-left
    PositionZone::new(80.0, 85.0, 4), // bottom-right
    PositionZone::new(20.0, 15.0, 5), // top-left
    PositionZone::new(80.0, 15.0, 6), // top-right
    PositionZone::new(15.0, 50.0, 7), // middle-left
    PositionZone::new(85.0, 50.0, 8), // middle-right
];

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Candidate zones, priorities strictly increasing
    pub zones: Vec<PositionZone>,
    /// Zones closer than this (percent-space) to an overlapping caption are rejected
    pub min_distance: f64,
    /// Assumed position of unplaced captions and the exhaustion fallback
    pub default_position: Position,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            zones: DEFAULT_ZONES.to_vec(),
            min_distance: 15.0,
            default_position: Position::new(50.0, 85.0),
        }
    }
}

impl PlacementConfig {
    pub fn priorities_increasing(&self) -> bool {
        self.zones.windows(2).all(|w| w[0].priority < w[1].priority)
    }

    fn resolved(&self, caption: &Caption) -> Position {
        Position::new(
            caption.position_x.unwrap_or(self.default_position.x),
            caption.position_y.unwrap_or(self.default_position.y),
        )
    }
}

/// Pick a screen position for `caption` that keeps clear of every other
/// caption visible at the same time.
///
/// Captions that already carry both coordinates keep them. Otherwise the
/// first zone at least `min_distance` away from all overlapping captions
/// wins; when every zone collides the default position is returned anyway.
pub fn find_optimal_position(
    caption: &Caption,
    all_captions: &[Caption],
    current_index: usize,
    config: &PlacementConfig,
) -> Position {
    if let Some(position) = caption.placed_position() {
        return position;
    }

    let occupied: Vec<Position> = all_captions
        .iter()
        .enumerate()
        .filter(|(idx, other)| *idx != current_index && caption.overlaps(other))
        .map(|(_, other)| config.resolved(other))
        .collect();

    config
        .zones
        .iter()
        .map(PositionZone::position)
        .find(|zone| {
            occupied
                .iter()
                .all(|taken| zone.distance(taken) >= config.min_distance)
        })
        .unwrap_or(config.default_position)
}
