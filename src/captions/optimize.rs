//! Whole-list caption styling and placement.

use super::keyword::detect_keyword;
use super::model::Caption;
use super::placement::{PlacementConfig, find_optimal_position};

/// Styling applied by [`optimize_captions`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub placement: PlacementConfig,
    pub font_size: f64,
    pub font_family: String,
    /// Multiplier applied to a keyword's font size
    pub keyword_scale: f64,
    pub keyword_color: String,
    pub keyword_background: String,
    pub normal_color: String,
    pub normal_background: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            font_size: 32.0,
            font_family: "Inter".to_string(),
            keyword_scale: 1.3,
            keyword_color: "#FFD700".to_string(),
            keyword_background: "rgba(0,0,0,0.8)".to_string(),
            normal_color: "#FFFFFF".to_string(),
            normal_background: "rgba(0,0,0,0.5)".to_string(),
        }
    }
}

/// Detect keywords, style and place every caption in one pass.
///
/// The input is left untouched. Placement for caption `i` sees the raw
/// positions of the input list, except that captions before `i` are seen
/// where this pass already put them. Existing positions always win over
/// computed ones.
pub fn optimize_captions(captions: &[Caption], config: &OptimizerConfig) -> Vec<Caption> {
    let mut placed = captions.to_vec();

    for idx in 0..placed.len() {
        let position = find_optimal_position(&placed[idx], &placed, idx, &config.placement);
        let caption = &mut placed[idx];
        caption.position_x = caption.position_x.or(Some(position.x));
        caption.position_y = caption.position_y.or(Some(position.y));
    }

    captions
        .iter()
        .zip(placed)
        .map(|(original, placed)| style_caption(original, &placed, config))
        .collect()
}

fn style_caption(original: &Caption, placed: &Caption, config: &OptimizerConfig) -> Caption {
    let is_keyword = detect_keyword(&original.word);
    let base_size = original.font_size.unwrap_or(config.font_size);

    let (font_size, color, background) = if is_keyword {
        (
            base_size * config.keyword_scale,
            original.color.clone().unwrap_or_else(|| config.keyword_color.clone()),
            config.keyword_background.clone(),
        )
    } else {
        (
            base_size,
            original.color.clone().unwrap_or_else(|| config.normal_color.clone()),
            config.normal_background.clone(),
        )
    };

    Caption {
        is_keyword,
        font_size: Some(font_size),
        font_family: Some(
            original
                .font_family
                .clone()
                .unwrap_or_else(|| config.font_family.clone()),
        ),
        color: Some(color),
        background_color: Some(background),
        position_x: placed.position_x,
        position_y: placed.position_y,
        ..original.clone()
    }
}
