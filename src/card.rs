//! Punchcards and card geometry.
//!
//! A [`Card`] is one binary matrix of `height` rows × `width` columns, where
//! `1` is a punched hole (raised thread) and `0` is no hole (lowered thread).
//! Cards are plain owned values: `clone()` is a deep copy and
//! [`Card::invert`] is the only in-place mutation.
//!
//! ## Card types
//!
//! | Type | Columns × rows | Holes |
//! |---|---|---|
//! | `26x8` | 26 × 8 | 208 |
//! | `50x12` | 50 × 12 | 600 |
//!
//! Geometry is always passed around as an explicit [`CardDimensions`] value,
//! so several layouts can be in use at once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid card dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("matrix height ({actual}) does not match card height ({expected})")]
    RowCount { actual: usize, expected: usize },
    #[error("row {row} width ({actual}) does not match card width ({expected})")]
    RowWidth {
        row: usize,
        actual: usize,
        expected: usize,
    },
    #[error("invalid value at ({x},{y}): {value} (must be 0 or 1)")]
    InvalidCell { x: usize, y: usize, value: u8 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row index {index} out of bounds (0-{last})")]
pub struct RowOutOfBounds {
    pub index: usize,
    pub last: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid card type: {0} (must be '26x8' or '50x12')")]
pub struct InvalidCardType(pub String);

/// Physical card presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    #[serde(rename = "26x8")]
    Standard,
    #[serde(rename = "50x12")]
    Large,
}

impl CardType {
    pub const ALL: [CardType; 2] = [CardType::Standard, CardType::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Standard => "26x8",
            CardType::Large => "50x12",
        }
    }

    pub fn dimensions(self) -> CardDimensions {
        match self {
            CardType::Standard => CardDimensions::new(26, 8),
            CardType::Large => CardDimensions::new(50, 12),
        }
    }
}

impl FromStr for CardType {
    type Err = InvalidCardType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InvalidCardType(s.to_string()))
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hole-grid shape of one card: `width` columns × `height` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDimensions {
    pub width: usize,
    pub height: usize,
}

impl CardDimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn for_type(card_type: CardType) -> Self {
        card_type.dimensions()
    }

    /// Number of hole positions on one card.
    pub fn cells(self) -> usize {
        self.width * self.height
    }

    /// The preset with this geometry, if any.
    pub fn card_type(self) -> Option<CardType> {
        CardType::ALL.into_iter().find(|t| t.dimensions() == self)
    }
}

impl Default for CardDimensions {
    fn default() -> Self {
        CardType::default().dimensions()
    }
}

impl fmt::Display for CardDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single Jacquard punchcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// 1-based position in the card sequence.
    pub number: usize,
    pub width: usize,
    pub height: usize,
    /// `height` rows of `width` cells; `1` = hole.
    pub matrix: Vec<Vec<u8>>,
}

impl Card {
    pub fn new(number: usize, matrix: Vec<Vec<u8>>) -> Self {
        let height = matrix.len();
        let width = matrix.first().map_or(0, Vec::len);
        Self {
            number,
            width,
            height,
            matrix,
        }
    }

    /// A card with no holes punched.
    pub fn blank(number: usize, dims: CardDimensions) -> Self {
        Self {
            number,
            width: dims.width,
            height: dims.height,
            matrix: vec![vec![0; dims.width]; dims.height],
        }
    }

    pub fn dimensions(&self) -> CardDimensions {
        CardDimensions::new(self.width, self.height)
    }

    /// Check shape and cell values against the declared dimensions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.matrix.len() != self.height {
            return Err(ValidationError::RowCount {
                actual: self.matrix.len(),
                expected: self.height,
            });
        }
        for (y, row) in self.matrix.iter().enumerate() {
            if row.len() != self.width {
                return Err(ValidationError::RowWidth {
                    row: y,
                    actual: row.len(),
                    expected: self.width,
                });
            }
            if let Some((x, &value)) = row.iter().enumerate().find(|(_, v)| **v > 1) {
                return Err(ValidationError::InvalidCell { x, y, value });
            }
        }
        Ok(())
    }

    pub fn count_holes(&self) -> usize {
        self.matrix.iter().flatten().filter(|&&c| c == 1).count()
    }

    /// Punched share of this card in percent.
    pub fn density(&self) -> f64 {
        let cells = self.width * self.height;
        if cells == 0 {
            return 0.0;
        }
        self.count_holes() as f64 / cells as f64 * 100.0
    }

    pub fn row(&self, index: usize) -> Result<&[u8], RowOutOfBounds> {
        self.matrix
            .get(index)
            .map(Vec::as_slice)
            .ok_or(RowOutOfBounds {
                index,
                last: self.height.saturating_sub(1),
            })
    }

    /// Out-of-range coordinates read as "no hole".
    pub fn is_hole_punched(&self, x: usize, y: usize) -> bool {
        self.matrix
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&c| c == 1)
    }

    /// Flip every cell: holes become blanks and vice versa.
    pub fn invert(&mut self) {
        for cell in self.matrix.iter_mut().flatten() {
            *cell = 1 - (*cell).min(1);
        }
    }

    /// One-line summary, e.g. `Card #3: 26x8, 104 holes (50.0% density)`.
    pub fn info(&self) -> String {
        format!(
            "Card #{}: {}x{}, {} holes ({:.1}% density)",
            self.number,
            self.width,
            self.height,
            self.count_holes(),
            self.density()
        )
    }

    /// Block-character rendering for debugging.
    pub fn binary_string(&self) -> String {
        let mut out = format!("Card #{}:\n", self.number);
        for row in &self.matrix {
            out.extend(row.iter().map(|&c| if c == 1 { '█' } else { '·' }));
            out.push('\n');
        }
        out
    }
}
