//! Interactive edits to a caption list: timeline drags and style changes.

use super::color::hex_to_ass_color;
use super::error::{CaptionError, Result};
use super::model::Caption;

/// Bounds enforced on edited captions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditLimits {
    /// Shortest allowed caption, in seconds
    pub min_duration: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for EditLimits {
    fn default() -> Self {
        Self {
            min_duration: 0.1,
            min_font_size: 12.0,
            max_font_size: 144.0,
        }
    }
}

/// A partial update to one caption. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionEdit {
    pub word: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub is_keyword: Option<bool>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

impl CaptionEdit {
    pub fn is_empty(&self) -> bool {
        *self == CaptionEdit::default()
    }
}

fn caption_at(captions: &mut [Caption], index: usize) -> Result<&mut Caption> {
    let len = captions.len();
    captions
        .get_mut(index)
        .ok_or(CaptionError::IndexOutOfRange { index, len })
}

fn check_timing(start: f64, end: f64, limits: &EditLimits) -> Result<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(CaptionError::InvalidTiming(format!(
            "times must be finite (start {start}, end {end})"
        )));
    }
    if start < 0.0 {
        return Err(CaptionError::InvalidTiming(format!(
            "start {start} is before the beginning of the video"
        )));
    }
    if end <= start {
        return Err(CaptionError::InvalidTiming(format!(
            "caption must end after it starts (start {start}, end {end})"
        )));
    }
    // Tolerate float noise from drag arithmetic
    if end - start < limits.min_duration - 1e-9 {
        return Err(CaptionError::InvalidTiming(format!(
            "caption must last at least {}s (start {start}, end {end})",
            limits.min_duration
        )));
    }
    Ok(())
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Apply `edit` to the caption at `index`.
///
/// Everything is validated before anything is written, so a rejected edit
/// leaves the caption exactly as it was.
pub fn apply_edit(
    captions: &mut [Caption],
    index: usize,
    edit: &CaptionEdit,
    limits: &EditLimits,
) -> Result<()> {
    let caption = caption_at(captions, index)?;

    let start = edit.start.unwrap_or(caption.start);
    let end = edit.end.unwrap_or(caption.end);
    if edit.start.is_some() || edit.end.is_some() {
        check_timing(start, end, limits)?;
    }

    if let Some(size) = edit.font_size
        && !(limits.min_font_size..=limits.max_font_size).contains(&size)
    {
        return Err(CaptionError::FontSizeOutOfRange {
            size,
            min: limits.min_font_size,
            max: limits.max_font_size,
        });
    }

    if let Some(color) = &edit.color {
        hex_to_ass_color(color)?;
    }

    caption.start = start;
    caption.end = end;
    if let Some(word) = &edit.word {
        caption.word = word.clone();
    }
    if let Some(is_keyword) = edit.is_keyword {
        caption.is_keyword = is_keyword;
    }
    if let Some(size) = edit.font_size {
        caption.font_size = Some(size);
    }
    if let Some(family) = &edit.font_family {
        caption.font_family = Some(family.clone());
    }
    if let Some(color) = &edit.color {
        caption.color = Some(color.to_uppercase());
    }
    if let Some(background) = &edit.background_color {
        caption.background_color = Some(background.clone());
    }
    if let Some(x) = edit.position_x {
        caption.position_x = Some(clamp_percent(x));
    }
    if let Some(y) = edit.position_y {
        caption.position_y = Some(clamp_percent(y));
    }

    Ok(())
}

/// Move a caption along the timeline by `delta` seconds, keeping its
/// duration. Moves past zero stop at zero.
pub fn shift_caption(captions: &mut [Caption], index: usize, delta: f64) -> Result<()> {
    if !delta.is_finite() {
        return Err(CaptionError::InvalidTiming(format!(
            "shift amount {delta} is not finite"
        )));
    }

    let caption = caption_at(captions, index)?;
    let duration = caption.duration();
    let start = (caption.start + delta).max(0.0);
    caption.start = start;
    caption.end = start + duration;
    Ok(())
}
