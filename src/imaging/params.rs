//! Parameter types for the imaging stages.
//!
//! These describe *what* the pipeline should produce, independent of the
//! backend that decodes the source image.
//!
//! - [`ColorMode`]: number of quantization levels used while dithering (2, 4 or 8).
//! - [`TargetSize`]: resample target; either edge may be left for the
//!   aspect ratio to decide.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color mode: {0} (must be 2, 4, or 8)")]
pub struct InvalidColorMode(pub u32);

/// Quantization levels applied during Floyd–Steinberg dithering.
///
/// Only the final binary decision survives into the cards: the level count
/// shapes the diffusion pattern, not the output values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ColorMode {
    #[default]
    Two,
    Four,
    Eight,
}

impl ColorMode {
    pub fn levels(self) -> u32 {
        match self {
            ColorMode::Two => 2,
            ColorMode::Four => 4,
            ColorMode::Eight => 8,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ColorMode::Two => "2-color (binary: black/white using dithering)",
            ColorMode::Four => "4-color (4 grayscale levels using dithering patterns)",
            ColorMode::Eight => "8-color (8 grayscale levels using dithering patterns)",
        }
    }
}

impl TryFrom<u32> for ColorMode {
    type Error = InvalidColorMode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ColorMode::Two),
            4 => Ok(ColorMode::Four),
            8 => Ok(ColorMode::Eight),
            other => Err(InvalidColorMode(other)),
        }
    }
}

impl From<ColorMode> for u32 {
    fn from(mode: ColorMode) -> Self {
        mode.levels()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.levels())
    }
}

/// Resample target. `None` on one edge means "derive from the aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetSize {
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl TargetSize {
    /// Fixed width, height follows the source aspect ratio.
    pub fn width(width: usize) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Fixed height, width follows the source aspect ratio.
    pub fn height(height: usize) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    pub fn exact(width: usize, height: usize) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}
