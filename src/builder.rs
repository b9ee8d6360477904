//! Binary grid → card sequence.
//!
//! Two named strategies, chosen explicitly through configuration:
//!
//! | Strategy | Required grid width | Cards |
//! |---|---|---|
//! | [`BuildStrategy::RowReshape`] (default) | `Width × Height` | one per grid row |
//! | [`BuildStrategy::RowBlocks`] | `Width` | one per `Height` consecutive rows |
//!
//! Row-reshape folds a single grid row into a `Height × Width` matrix,
//! row-major: `cell[row][col] = source[row * Width + col]`. Row-blocks stacks
//! consecutive grid rows and zero-pads the final partial card.
//!
//! Cards are numbered `1..=N` in source order. Cell values are copied as-is;
//! [`Card::validate`] is where non-binary values get rejected.

use crate::card::{Card, CardDimensions};
use crate::types::BinaryGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("empty matrix provided")]
    EmptyInput,
    #[error(
        "image width ({actual}) does not match expected width ({expected} = {width} x {height})"
    )]
    ReshapeWidth {
        actual: usize,
        expected: usize,
        width: usize,
        height: usize,
    },
    #[error("image width ({actual}) does not match card width ({expected})")]
    BlockWidth { actual: usize, expected: usize },
    #[error("invalid card dimensions: {0}")]
    InvalidDimensions(CardDimensions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStrategy {
    #[default]
    RowReshape,
    RowBlocks,
}

impl BuildStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildStrategy::RowReshape => "row-reshape",
            BuildStrategy::RowBlocks => "row-blocks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardBuilder {
    pub dimensions: CardDimensions,
    pub strategy: BuildStrategy,
}

impl CardBuilder {
    pub fn new(dimensions: CardDimensions, strategy: BuildStrategy) -> Self {
        Self {
            dimensions,
            strategy,
        }
    }

    /// Grid width the builder accepts for its strategy.
    pub fn required_width(&self) -> usize {
        match self.strategy {
            BuildStrategy::RowReshape => self.dimensions.cells(),
            BuildStrategy::RowBlocks => self.dimensions.width,
        }
    }

    pub fn build(&self, grid: &BinaryGrid) -> Result<Vec<Card>, BuildError> {
        let dims = self.dimensions;
        if dims.width == 0 || dims.height == 0 {
            return Err(BuildError::InvalidDimensions(dims));
        }
        if grid.is_empty() {
            return Err(BuildError::EmptyInput);
        }

        let cards = match self.strategy {
            BuildStrategy::RowReshape => reshape_rows(grid, dims)?,
            BuildStrategy::RowBlocks => stack_rows(grid, dims)?,
        };
        debug!(
            strategy = self.strategy.as_str(),
            dimensions = %dims,
            cards = cards.len(),
            "Built cards"
        );
        Ok(cards)
    }
}

fn reshape_rows(grid: &BinaryGrid, dims: CardDimensions) -> Result<Vec<Card>, BuildError> {
    let expected = dims.cells();
    if grid.width() != expected {
        return Err(BuildError::ReshapeWidth {
            actual: grid.width(),
            expected,
            width: dims.width,
            height: dims.height,
        });
    }
    Ok(grid
        .rows()
        .enumerate()
        .map(|(i, source)| {
            let matrix = source.chunks(dims.width).map(<[u8]>::to_vec).collect();
            Card::new(i + 1, matrix)
        })
        .collect())
}

fn stack_rows(grid: &BinaryGrid, dims: CardDimensions) -> Result<Vec<Card>, BuildError> {
    if grid.width() != dims.width {
        return Err(BuildError::BlockWidth {
            actual: grid.width(),
            expected: dims.width,
        });
    }
    let rows: Vec<&[u8]> = grid.rows().collect();
    Ok(rows
        .chunks(dims.height)
        .enumerate()
        .map(|(i, block)| {
            let mut card = Card::blank(i + 1, dims);
            for (dst, src) in card.matrix.iter_mut().zip(block) {
                dst.copy_from_slice(src);
            }
            card
        })
        .collect())
}
