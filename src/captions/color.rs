//! Conversion between web hex colors and ASS packed colors.
//!
//! ASS stores colors as `&HAABBGGRR`: blue-green-red byte order with an
//! inverted alpha, so `00` is fully opaque.

use super::error::{CaptionError, Result};

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Convert `#RRGGBB` into an opaque ASS color (`&H00BBGGRR`).
pub fn hex_to_ass_color(hex: &str) -> Result<String> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| hex.len() == 7 && is_hex(d))
        .ok_or_else(|| CaptionError::InvalidColor(hex.to_string()))?;

    let (r, g, b) = (&digits[0..2], &digits[2..4], &digits[4..6]);
    Ok(format!("&H00{b}{g}{r}").to_uppercase())
}

/// Convert an ASS color (`&HAABBGGRR`) into `#RRGGBB`, dropping alpha.
pub fn ass_color_to_hex(ass: &str) -> Result<String> {
    let digits = ass
        .strip_prefix("&H")
        .filter(|d| ass.len() == 10 && is_hex(d))
        .ok_or_else(|| CaptionError::InvalidColor(ass.to_string()))?;

    let (b, g, r) = (&digits[2..4], &digits[4..6], &digits[6..8]);
    Ok(format!("#{r}{g}{b}").to_uppercase())
}

/// Decode a color written inside an override tag.
///
/// Hand-edited documents use `&HBBGGRR&` as often as the packed
/// `&HAABBGGRR` form, with or without the trailing `&`.
pub fn override_color_to_hex(value: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('&');
    let digits = trimmed
        .strip_prefix("&H")
        .or_else(|| trimmed.strip_prefix("&h"))
        .filter(|d| is_hex(d))
        .ok_or_else(|| CaptionError::InvalidColor(value.to_string()))?;

    match digits.len() {
        8 => ass_color_to_hex(&format!("&H{digits}")),
        6 => ass_color_to_hex(&format!("&H00{digits}")),
        _ => Err(CaptionError::InvalidColor(value.to_string())),
    }
}
