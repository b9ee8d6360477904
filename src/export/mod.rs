//! Card-set serializers.
//!
//! | Format | Exporter | Reader |
//! |---|---|---|
//! | `svg` | [`svg::SvgExporter`] (direct or [`svg_template`]) | - |
//! | `text` | [`text::TextExporter`] | [`text::TextParser`] |
//!
//! Every exporter validates the whole card set before writing a single byte:
//! an empty set, a card that fails [`Card::validate`], or a set with mixed
//! dimensions is an error, never a partial document.

pub mod svg;
pub mod svg_template;
pub mod text;

use crate::card::{Card, CardDimensions, ValidationError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no cards to export")]
    EmptyInput,
    #[error("invalid card {number}: {source}")]
    InvalidCard {
        number: usize,
        source: ValidationError,
    },
    #[error("card {number} is {actual}, expected {expected}")]
    MixedDimensions {
        number: usize,
        expected: CardDimensions,
        actual: CardDimensions,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported output format: {0} (must be 'svg' or 'text')")]
pub struct UnsupportedFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Svg,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svg" => Ok(ExportFormat::Svg),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Text => "text",
        })
    }
}

pub(crate) fn check_card(card: &Card) -> Result<(), ExportError> {
    card.validate().map_err(|source| ExportError::InvalidCard {
        number: card.number,
        source,
    })
}

/// Non-empty, every card valid, all cards shaped like the first.
pub(crate) fn check_deck(cards: &[Card]) -> Result<CardDimensions, ExportError> {
    let first = cards.first().ok_or(ExportError::EmptyInput)?;
    let expected = first.dimensions();
    for card in cards {
        check_card(card)?;
        if card.dimensions() != expected {
            return Err(ExportError::MixedDimensions {
                number: card.number,
                expected,
                actual: card.dimensions(),
            });
        }
    }
    Ok(expected)
}
