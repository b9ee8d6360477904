//! Card-set statistics.
//!
//! [`generate_metadata`] is recomputed from the cards every time; nothing here
//! is cached or mutated independently. An empty card slice yields
//! `Metadata::default()` so callers can branch on "no cards" without an error.
//!
//! [`InfoReport`] is the JSON shape of the `info` command:
//!
//! ```json
//! {
//!   "filename": "cat.png",
//!   "colorMode": "2-color (binary: black/white using dithering)",
//!   "totalCards": 3,
//!   "cardDimensions": "26x8",
//!   "totalRows": 24,
//!   "averageDensity": "41.7%",
//!   "holesPerCard": [80, 90, 90]
//! }
//! ```

use crate::card::{Card, CardDimensions};
use crate::imaging::ColorMode;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_cards: usize,
    pub card_width: usize,
    pub card_height: usize,
    pub total_rows: usize,
    /// Aligned with card order.
    pub holes_per_card: Vec<usize>,
    /// Percentage in `[0, 100]`.
    pub average_density: f64,
}

impl Metadata {
    pub fn dimensions(&self) -> CardDimensions {
        CardDimensions::new(self.card_width, self.card_height)
    }

    pub fn total_holes(&self) -> usize {
        self.holes_per_card.iter().sum()
    }

    /// `"41.7%"` style label.
    pub fn density_label(&self) -> String {
        format!("{:.1}%", self.average_density)
    }
}

/// Summarize `cards`. Geometry is taken from the first card.
pub fn generate_metadata(cards: &[Card]) -> Metadata {
    let Some(first) = cards.first() else {
        return Metadata::default();
    };

    let holes_per_card: Vec<usize> = cards.iter().map(Card::count_holes).collect();
    let total_holes: usize = holes_per_card.iter().sum();
    let possible = cards.len() * first.width * first.height;
    let average_density = if possible > 0 {
        total_holes as f64 / possible as f64 * 100.0
    } else {
        0.0
    };

    Metadata {
        total_cards: cards.len(),
        card_width: first.width,
        card_height: first.height,
        total_rows: cards.len() * first.height,
        holes_per_card,
        average_density,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoReport {
    pub filename: String,
    pub color_mode: String,
    pub total_cards: usize,
    pub card_dimensions: String,
    pub total_rows: usize,
    pub average_density: String,
    pub holes_per_card: Vec<usize>,
}

impl InfoReport {
    pub fn new(filename: impl Into<String>, mode: ColorMode, metadata: &Metadata) -> Self {
        Self {
            filename: filename.into(),
            color_mode: mode.describe().to_string(),
            total_cards: metadata.total_cards,
            card_dimensions: metadata.dimensions().to_string(),
            total_rows: metadata.total_rows,
            average_density: metadata.density_label(),
            holes_per_card: metadata.holes_per_card.clone(),
        }
    }
}
