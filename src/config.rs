use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::captions::edit::EditLimits;
use crate::captions::optimize::OptimizerConfig;
use crate::captions::placement::{DEFAULT_ZONES, PlacementConfig, PositionZone};
use crate::captions::{Position, StyleDefaults};
use crate::common::config::DocumentedConfig;
use crate::common::paths;
// #[macro_export] places the macro at the crate root
use crate::documented_config;
use crate::subtitles::{AssOptions, SerializeMode};

/// User settings for styling, placement and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptuneConfig {
    pub font_family: String,
    pub font_size: f64,
    pub keyword_scale: f64,
    pub keyword_color: String,
    pub keyword_background: String,
    pub normal_color: String,
    pub normal_background: String,
    pub min_zone_distance: f64,
    pub default_position: Position,
    pub zones: Vec<PositionZone>,
    pub ass_title: String,
    pub play_res_x: u32,
    pub play_res_y: u32,
    pub serialize_mode: SerializeMode,
    pub min_caption_duration: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Directory exports land in when no output path is given
    pub export_dir: Option<String>,
}

impl Default for CaptuneConfig {
    fn default() -> Self {
        let optimizer = OptimizerConfig::default();
        let limits = EditLimits::default();
        let ass = AssOptions::default();
        Self {
            font_family: optimizer.font_family,
            font_size: optimizer.font_size,
            keyword_scale: optimizer.keyword_scale,
            keyword_color: optimizer.keyword_color,
            keyword_background: optimizer.keyword_background,
            normal_color: optimizer.normal_color,
            normal_background: optimizer.normal_background,
            min_zone_distance: optimizer.placement.min_distance,
            default_position: optimizer.placement.default_position,
            zones: DEFAULT_ZONES.to_vec(),
            ass_title: ass.title,
            play_res_x: ass.play_res_x,
            play_res_y: ass.play_res_y,
            serialize_mode: ass.mode,
            min_caption_duration: limits.min_duration,
            min_font_size: limits.min_font_size,
            max_font_size: limits.max_font_size,
            export_dir: None,
        }
    }
}

documented_config!(CaptuneConfig {
    fields: [
        font_family, "Font used when a caption sets none",
        font_size, "Base caption font size in pixels",
        keyword_scale, "Font size multiplier for emphasized words",
        keyword_color, "Text color of emphasized words (#RRGGBB)",
        keyword_background, "Background of emphasized words (CSS color)",
        normal_color, "Text color of regular words (#RRGGBB)",
        normal_background, "Background of regular words (CSS color)",
        min_zone_distance, "Minimum distance between captions shown together (percent of frame)",
        default_position, "Position of unplaced captions and placement fallback (percent)",
        zones, "Candidate positions, tried in increasing priority",
        ass_title, "Title written to exported ASS files",
        play_res_x, "ASS script width in pixels",
        play_res_y, "ASS script height in pixels",
        serialize_mode, "ASS text mode: plain or styled-override",
        min_caption_duration, "Shortest caption an edit may produce (seconds)",
        min_font_size, "Smallest font size an edit may set",
        max_font_size, "Largest font size an edit may set",
    ],
    optional: [
        export_dir, "Directory exports are written to when no output path is given",
    ],
    config_path: paths::config_file(),
});

impl CaptuneConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = <Self as DocumentedConfig>::load_from_path_documented(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, the default location otherwise.
    /// A missing file is created with documented defaults.
    pub fn resolve(path: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => <Self as DocumentedConfig>::config_path()?,
        };
        let config = Self::load_from_path(&path)?;
        Ok((config, path))
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with_documentation(path.as_ref())
    }

    pub fn validate(&self) -> Result<()> {
        if self.zones.is_empty() {
            bail!("zones must list at least one position");
        }
        if !self.placement().priorities_increasing() {
            bail!("zone priorities must be strictly increasing");
        }
        if !(self.min_zone_distance.is_finite() && self.min_zone_distance > 0.0) {
            bail!(
                "min_zone_distance must be positive, got {}",
                self.min_zone_distance
            );
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            bail!("font_size must be positive, got {}", self.font_size);
        }
        if !(self.keyword_scale.is_finite() && self.keyword_scale > 0.0) {
            bail!("keyword_scale must be positive, got {}", self.keyword_scale);
        }
        if self.min_font_size > self.max_font_size {
            bail!(
                "min_font_size {} exceeds max_font_size {}",
                self.min_font_size,
                self.max_font_size
            );
        }
        if !(self.min_caption_duration.is_finite() && self.min_caption_duration > 0.0) {
            bail!(
                "min_caption_duration must be positive, got {}",
                self.min_caption_duration
            );
        }
        if self.play_res_x == 0 || self.play_res_y == 0 {
            bail!("play_res_x and play_res_y must be non-zero");
        }
        Ok(())
    }

    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig {
            zones: self.zones.clone(),
            min_distance: self.min_zone_distance,
            default_position: self.default_position,
        }
    }

    pub fn optimizer(&self) -> OptimizerConfig {
        OptimizerConfig {
            placement: self.placement(),
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            keyword_scale: self.keyword_scale,
            keyword_color: self.keyword_color.clone(),
            keyword_background: self.keyword_background.clone(),
            normal_color: self.normal_color.clone(),
            normal_background: self.normal_background.clone(),
        }
    }

    pub fn style_defaults(&self) -> StyleDefaults {
        StyleDefaults {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            position: self.default_position,
            ..StyleDefaults::default()
        }
    }

    pub fn ass_options(&self) -> AssOptions {
        AssOptions {
            title: self.ass_title.clone(),
            play_res_x: self.play_res_x,
            play_res_y: self.play_res_y,
            mode: self.serialize_mode,
            defaults: self.style_defaults(),
        }
    }

    pub fn edit_limits(&self) -> EditLimits {
        EditLimits {
            min_duration: self.min_caption_duration,
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
        }
    }

    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.as_deref().map(paths::expand_user_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_core_defaults() {
        let config = CaptuneConfig::default();
        assert_eq!(config.optimizer(), OptimizerConfig::default());
        assert_eq!(config.ass_options(), AssOptions::default());
        assert_eq!(config.edit_limits(), EditLimits::default());
        config.validate().unwrap();
    }

    #[test]
    fn first_load_writes_documented_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captune.toml");

        let config = CaptuneConfig::load_from_path(&path).unwrap();
        assert_eq!(config, CaptuneConfig::default());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("keyword_scale = 1.3  # "));
        assert!(written.contains("serialize_mode = \"plain\""));
        assert!(written.contains("# export_dir = \"\""));

        // The documented file must read back to the same values
        let reloaded = CaptuneConfig::load_from_path(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captune.toml");
        fs::write(
            &path,
            "font_size = 40.0\nserialize_mode = \"styled-override\"\nexport_dir = \"/tmp/subs\"\n",
        )
        .unwrap();

        let config = CaptuneConfig::load_from_path(&path).unwrap();
        assert_eq!(config.font_size, 40.0);
        assert_eq!(config.serialize_mode, SerializeMode::StyledOverride);
        assert_eq!(config.export_dir(), Some(PathBuf::from("/tmp/subs")));
        assert_eq!(config.zones, DEFAULT_ZONES.to_vec());
        assert_eq!(config.optimizer().font_size, 40.0);
    }

    #[test]
    fn custom_zones_flow_into_placement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captune.toml");
        fs::write(
            &path,
            "zones = [{ x = 50.0, y = 90.0, priority = 1 }, { x = 50.0, y = 10.0, priority = 2 }]\nmin_zone_distance = 20.0\n",
        )
        .unwrap();

        let placement = CaptuneConfig::load_from_path(&path).unwrap().placement();
        assert_eq!(placement.zones.len(), 2);
        assert_eq!(placement.zones[0].position(), Position::new(50.0, 90.0));
        assert_eq!(placement.min_distance, 20.0);
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = CaptuneConfig::default();
        config.zones.swap(0, 1);
        assert!(config.validate().is_err());

        let mut config = CaptuneConfig::default();
        config.min_zone_distance = 0.0;
        assert!(config.validate().is_err());

        let mut config = CaptuneConfig::default();
        config.min_font_size = 200.0;
        assert!(config.validate().is_err());

        let mut config = CaptuneConfig::default();
        config.zones.clear();
        assert!(config.validate().is_err());

        let mut config = CaptuneConfig::default();
        config.min_caption_duration = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captune.toml");
        fs::write(&path, "serialize_mode = \"fancy\"\n").unwrap();
        assert!(CaptuneConfig::load_from_path(&path).is_err());
    }
}
