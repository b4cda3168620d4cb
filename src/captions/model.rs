use serde::{Deserialize, Serialize};

/// One timed caption word as the editor works with it.
///
/// Style and position fields stay `None` until something sets them, so
/// "already placed" can be told apart from "placed at the default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub word: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    #[serde(default)]
    pub is_keyword: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Text color as `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Horizontal position in percent of the frame width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    /// Vertical position in percent of the frame height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
}

impl Caption {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
            is_keyword: false,
            font_size: None,
            font_family: None,
            color: None,
            background_color: None,
            position_x: None,
            position_y: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open interval overlap: captions that merely touch do not overlap.
    pub fn overlaps(&self, other: &Caption) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The explicit position, only when both axes are set.
    pub fn placed_position(&self) -> Option<Position> {
        match (self.position_x, self.position_y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        }
    }
}

/// A point on screen in percent of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Convert to pixel coordinates on a `width`x`height` canvas.
    pub fn to_pixels(&self, width: u32, height: u32) -> (i64, i64) {
        (
            (self.x / 100.0 * width as f64).round() as i64,
            (self.y / 100.0 * height as f64).round() as i64,
        )
    }

    /// Inverse of [`Position::to_pixels`].
    pub fn from_pixels(px: f64, py: f64, width: u32, height: u32) -> Self {
        Self {
            x: px / width.max(1) as f64 * 100.0,
            y: py / height.max(1) as f64 * 100.0,
        }
    }
}

/// Values used wherever a caption leaves a style field unset.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub background_color: String,
    pub position: Position,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_size: 32.0,
            font_family: "Inter".to_string(),
            color: "#FFFFFF".to_string(),
            background_color: "transparent".to_string(),
            position: Position::new(50.0, 85.0),
        }
    }
}

/// A caption's effective style with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub background_color: String,
    pub position: Position,
}

/// Resolve the effective style of `caption`, falling back to `defaults`
/// field by field.
pub fn resolve_style(caption: &Caption, defaults: &StyleDefaults) -> ResolvedStyle {
    ResolvedStyle {
        font_size: caption.font_size.unwrap_or(defaults.font_size),
        font_family: caption
            .font_family
            .clone()
            .unwrap_or_else(|| defaults.font_family.clone()),
        color: caption
            .color
            .clone()
            .unwrap_or_else(|| defaults.color.clone()),
        background_color: caption
            .background_color
            .clone()
            .unwrap_or_else(|| defaults.background_color.clone()),
        position: Position {
            x: caption.position_x.unwrap_or(defaults.position.x),
            y: caption.position_y.unwrap_or(defaults.position.y),
        },
    }
}
