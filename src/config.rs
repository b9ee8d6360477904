//! Converter configuration.
//!
//! Handles loading, validating, and merging `punchcards.toml`. The user file
//! is sparse: it is merged key-by-key on top of the stock defaults, then
//! deserialized and validated. Command-line flags override the result.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # title = "Rose"          # Caption prefix and text-file title
//!
//! [card]
//! type = "26x8"             # "26x8" or "50x12"
//! # width = 26              # Explicit geometry, overrides `type`
//! # height = 8              # (set both or neither)
//! strategy = "row-reshape"  # or "row-blocks"
//! invert = false
//!
//! [image]
//! color_mode = 2            # 2, 4 or 8
//!
//! [svg]
//! show_grid = true
//! show_numbers = true
//! hole_radius_mm = 2.0
//! hole_spacing_mm = 5.0
//! scale = 1.0
//! renderer = "direct"       # or "template"
//!
//! [text]
//! hole_char = "#"
//! no_hole_char = "."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::builder::BuildStrategy;
use crate::card::{CardDimensions, CardType};
use crate::export::svg::{HOLE_RADIUS_MM, HOLE_SPACING_MM, SvgExporter, SvgRenderer};
use crate::export::text::{HOLE_CHAR, HOLE_CHARS, NO_HOLE_CHAR, TextExporter};
use crate::imaging::ColorMode;
use crate::pipeline::PipelineOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "punchcards.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Converter configuration loaded from `punchcards.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PunchcardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub card: CardConfig,
    pub image: ImageConfig,
    pub svg: SvgConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    pub strategy: BuildStrategy,
    pub invert: bool,
}

impl CardConfig {
    /// Explicit `width`/`height` if given, otherwise the preset's geometry.
    pub fn dimensions(&self) -> CardDimensions {
        match (self.width, self.height) {
            (Some(width), Some(height)) => CardDimensions::new(width, height),
            _ => self.card_type.dimensions(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub color_mode: ColorMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    pub show_grid: bool,
    pub show_numbers: bool,
    pub hole_radius_mm: f64,
    pub hole_spacing_mm: f64,
    pub scale: f64,
    pub renderer: SvgRenderer,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_numbers: true,
            hole_radius_mm: HOLE_RADIUS_MM,
            hole_spacing_mm: HOLE_SPACING_MM,
            scale: 1.0,
            renderer: SvgRenderer::Direct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub hole_char: char,
    pub no_hole_char: char,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            hole_char: HOLE_CHAR,
            no_hole_char: NO_HOLE_CHAR,
        }
    }
}

impl PunchcardConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.card.width, self.card.height) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(ConfigError::Validation(
                    "card.width and card.height must be non-zero".into(),
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::Validation(
                    "card.width and card.height must be set together".into(),
                ));
            }
            _ => {}
        }
        for (name, value) in [
            ("svg.hole_radius_mm", self.svg.hole_radius_mm),
            ("svg.hole_spacing_mm", self.svg.hole_spacing_mm),
            ("svg.scale", self.svg.scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.svg.hole_radius_mm * 2.0 > self.svg.hole_spacing_mm {
            return Err(ConfigError::Validation(
                "svg.hole_radius_mm must be at most half of svg.hole_spacing_mm".into(),
            ));
        }
        let TextConfig {
            hole_char,
            no_hole_char,
        } = self.text;
        // Anything else would write files `parse` cannot read back.
        if !HOLE_CHARS.contains(&hole_char) {
            return Err(ConfigError::Validation(format!(
                "text.hole_char must be one of '#', 'O' or 'o', got {hole_char:?}"
            )));
        }
        if no_hole_char != NO_HOLE_CHAR {
            return Err(ConfigError::Validation(format!(
                "text.no_hole_char must be '.', got {no_hole_char:?}"
            )));
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            dimensions: self.card.dimensions(),
            strategy: self.card.strategy,
            color_mode: self.image.color_mode,
            invert: self.card.invert,
        }
    }

    pub fn svg_exporter(&self) -> SvgExporter {
        SvgExporter {
            show_grid: self.svg.show_grid,
            show_numbers: self.svg.show_numbers,
            hole_radius: self.svg.hole_radius_mm,
            hole_spacing: self.svg.hole_spacing_mm,
            scale: self.svg.scale,
            renderer: self.svg.renderer,
            ..SvgExporter::default()
        }
    }

    pub fn text_exporter(&self) -> TextExporter {
        TextExporter {
            hole_char: self.text.hole_char,
            no_hole_char: self.text.no_hole_char,
            ..TextExporter::default()
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PunchcardConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PunchcardConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PunchcardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent. With `required`, a missing file is an error instead.
pub fn load_config(path: &Path, required: bool) -> Result<PunchcardConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if required && overlay.is_none() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `punchcards.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Punchcard Converter Configuration
# =================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The converter reads ./punchcards.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Pattern title. Shown in SVG captions as "Title #n/total" and written as
# the Title header of text files.
# title = "Rose"

# ---------------------------------------------------------------------------
# Card geometry
# ---------------------------------------------------------------------------
[card]
# Physical card preset: "26x8" (208 holes) or "50x12" (600 holes).
type = "26x8"

# Explicit columns x rows, overriding `type`. Set both or neither.
# width = 26
# height = 8

# How image rows become cards:
#   "row-reshape" - each image row (width x height cells) folds into one card
#   "row-blocks"  - every `height` image rows (width cells) form one card;
#                   the last card is padded with blank rows
strategy = "row-reshape"

# Swap holes and blanks on every card (negative pattern).
invert = false

# ---------------------------------------------------------------------------
# Image processing
# ---------------------------------------------------------------------------
[image]
# Dithering levels: 2, 4 or 8. Output is always binary; more levels only
# change the error-diffusion pattern.
color_mode = 2

# ---------------------------------------------------------------------------
# SVG output
# ---------------------------------------------------------------------------
[svg]
# Alignment lines behind the holes.
show_grid = true

# Caption above and summary below each card.
show_numbers = true

# Hole geometry in millimeters, before scaling.
hole_radius_mm = 2.0
hole_spacing_mm = 5.0

# Uniform scale factor for hole spacing and radius.
scale = 1.0

# "direct" writes the document by hand, "template" renders it with maud.
# Both produce the same drawing.
renderer = "direct"

# ---------------------------------------------------------------------------
# Text output
# ---------------------------------------------------------------------------
[text]
# Characters written for punched and blank cells. Only characters the
# parser reads are accepted: '#', 'O' or 'o' for a hole, '.' for a blank.
hole_char = "#"
no_hole_char = "."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, content: &str) -> PathBuf {
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = PunchcardConfig::default();
        assert_eq!(config.title, None);
        assert_eq!(config.card.dimensions(), CardDimensions::new(26, 8));
        assert_eq!(config.card.strategy, BuildStrategy::RowReshape);
        assert!(!config.card.invert);
        assert_eq!(config.image.color_mode, ColorMode::Two);
        assert_eq!(config.svg.renderer, SvgRenderer::Direct);
        assert_eq!(config.text.hole_char, '#');
    }

    #[test]
    fn parse_partial_config() {
        let config: PunchcardConfig = toml::from_str(
            r#"
title = "Rose"

[card]
type = "50x12"

[image]
color_mode = 8
"#,
        )
        .unwrap();
        assert_eq!(config.title.as_deref(), Some("Rose"));
        assert_eq!(config.card.dimensions(), CardDimensions::new(50, 12));
        assert_eq!(config.image.color_mode, ColorMode::Eight);
        // Unspecified defaults preserved
        assert!(config.svg.show_grid);
        assert_eq!(config.text.no_hole_char, '.');
    }

    #[test]
    fn explicit_dimensions_override_type() {
        let config: PunchcardConfig = toml::from_str(
            r#"
[card]
type = "50x12"
width = 10
height = 4
strategy = "row-blocks"
"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.card.dimensions(), CardDimensions::new(10, 4));
        assert_eq!(config.pipeline_options().strategy, BuildStrategy::RowBlocks);
    }

    #[test]
    fn bad_enum_values_rejected() {
        assert!(toml::from_str::<PunchcardConfig>("[card]\ntype = \"30x9\"").is_err());
        assert!(toml::from_str::<PunchcardConfig>("[image]\ncolor_mode = 3").is_err());
        assert!(toml::from_str::<PunchcardConfig>("[card]\nstrategy = \"columns\"").is_err());
        assert!(toml::from_str::<PunchcardConfig>("[svg]\nrenderer = \"pdf\"").is_err());
    }

    #[test]
    fn exporters_follow_config() {
        let config: PunchcardConfig = toml::from_str(
            r#"
[svg]
show_grid = false
scale = 1.5
renderer = "template"

[text]
hole_char = "O"
"#,
        )
        .unwrap();
        let svg = config.svg_exporter();
        assert!(!svg.show_grid);
        assert_eq!(svg.scale, 1.5);
        assert_eq!(svg.renderer, SvgRenderer::Template);
        assert_eq!(config.text_exporter().hole_char, 'O');
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME), false).unwrap();
        assert_eq!(config, PunchcardConfig::default());
    }

    #[test]
    fn load_config_required_file_missing() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("missing.toml"), true);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[svg]\nscale = 2.0\n");
        let config = load_config(&path, true).unwrap();
        assert_eq!(config.svg.scale, 2.0);
        assert_eq!(config.svg.hole_spacing_mm, HOLE_SPACING_MM);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "this is not valid toml [[[");
        assert!(matches!(load_config(&path, false), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[card]\nwidth = 10\n");
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[svg]
scale = 1.0
show_grid = true
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[svg]\nscale = 3.0\n").unwrap();
        let merged = merge_toml(base, overlay);
        let svg = merged.get("svg").unwrap();
        assert_eq!(svg.get("scale").unwrap().as_float(), Some(3.0));
        assert_eq!(svg.get("show_grid").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"title = "A""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"title = "B""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("title").unwrap().as_str(), Some("B"));
    }

    // =========================================================================
    // Validation and unknown key tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<PunchcardConfig, _> = toml::from_str("[svg]\nscal = 2.0\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<PunchcardConfig, _> = toml::from_str("[pdf]\npages = 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(PunchcardConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_dimension() {
        let mut config = PunchcardConfig::default();
        config.card.width = Some(0);
        config.card.height = Some(8);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_scale_positive() {
        let mut config = PunchcardConfig::default();
        config.svg.scale = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("svg.scale"));
    }

    #[test]
    fn validate_overlapping_holes() {
        let mut config = PunchcardConfig::default();
        config.svg.hole_radius_mm = 3.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_text_chars_are_parseable() {
        let mut config = PunchcardConfig::default();
        for hole in ['#', 'O', 'o'] {
            config.text.hole_char = hole;
            config.validate().unwrap();
        }

        config.text.hole_char = 'X';
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("text.hole_char"));

        config.text.hole_char = '#';
        for blank in ['#', ' ', '-'] {
            config.text.no_hole_char = blank;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("text.no_hole_char"), "{blank:?}");
        }
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: PunchcardConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config, PunchcardConfig::default());
    }

    #[test]
    fn stock_defaults_value_round_trips() {
        let config = resolve_config(stock_defaults_value().unwrap(), None).unwrap();
        assert_eq!(config, PunchcardConfig::default());
    }
}
