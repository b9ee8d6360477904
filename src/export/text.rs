//! Plain-text card format.
//!
//! ```text
//! Title: Rose
//! Cards: 2
//! Holes per card: 208
//!
//! Card 1:
//! #..#......................
//! ... (8 rows of 26 columns)
//!
//! Card 2:
//! ...
//! ```
//!
//! Export characters are configurable; the parser reads `#`, `O` or `o` as a
//! hole and `.` as no hole. Line breaks in the title are written as spaces so
//! the header stays on one line. Only the 0/1 matrix round-trips, not the surface
//! characters. Parsed cards are renumbered `1..=N` in file order, whatever
//! the `Card N:` labels say, and parsing stops once the declared card count
//! has been read.

use super::{ExportError, check_deck};
use crate::card::{Card, CardDimensions, CardType};
use std::io::Write;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Untitled Pattern";
pub const HOLE_CHAR: char = '#';
pub const NO_HOLE_CHAR: char = '.';
/// Every character the parser reads as a punched hole.
pub const HOLE_CHARS: [char; 3] = ['#', 'O', 'o'];

const TITLE_PREFIX: &str = "Title: ";
const CARDS_PREFIX: &str = "Cards: ";
const HOLES_PREFIX: &str = "Holes per card: ";
const CARD_PREFIX: &str = "Card ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid file format: too few lines")]
    TooFewLines,
    #[error("missing {header} header on line {line}")]
    MissingHeader { header: &'static str, line: usize },
    #[error("invalid {header} value on line {line}: {value:?}")]
    InvalidHeaderValue {
        header: &'static str,
        line: usize,
        value: String,
    },
    #[error("file declares no cards (line {line})")]
    NoCards { line: usize },
    #[error("no card type has {0} holes per card (expected 208 or 600)")]
    UnknownDimensions(usize),
    #[error("holes per card ({holes}) is not a multiple of the first row width ({width})")]
    IndivisibleWidth { holes: usize, width: usize },
    #[error("holes per card ({declared}) does not match {dimensions} cards ({expected})")]
    HolesMismatch {
        declared: usize,
        expected: usize,
        dimensions: CardDimensions,
    },
    #[error("expected Card header on line {line}, got: {found}")]
    ExpectedCardHeader { line: usize, found: String },
    #[error("invalid Card header on line {line}: {found}")]
    InvalidCardHeader { line: usize, found: String },
    #[error("unexpected end of file while parsing card {card} row {row}")]
    UnexpectedEof { card: usize, row: usize },
    #[error(
        "card {card} row {row} has incorrect width: expected {expected}, got {actual} (line {line})"
    )]
    RowWidth {
        card: usize,
        row: usize,
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error(
        "invalid character '{ch}' in card {card} row {row} col {col} (expected #, O, or .) (line {line})"
    )]
    InvalidChar {
        ch: char,
        card: usize,
        row: usize,
        col: usize,
        line: usize,
    },
    #[error("expected {expected} cards but found {found}")]
    CardCount { expected: usize, found: usize },
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExporter {
    pub title: Option<String>,
    pub hole_char: char,
    pub no_hole_char: char,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            title: None,
            hole_char: HOLE_CHAR,
            no_hole_char: NO_HOLE_CHAR,
        }
    }
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
    }

    pub fn export_cards(&self, cards: &[Card], w: &mut impl Write) -> Result<(), ExportError> {
        let dims = check_deck(cards)?;
        debug!(cards = cards.len(), dimensions = %dims, "Writing text cards");

        let title = self
            .title
            .as_deref()
            .unwrap_or(DEFAULT_TITLE)
            .replace(['\r', '\n'], " ");
        writeln!(w, "{TITLE_PREFIX}{title}")?;
        writeln!(w, "{CARDS_PREFIX}{}", cards.len())?;
        writeln!(w, "{HOLES_PREFIX}{}", dims.cells())?;
        writeln!(w)?;

        let mut line = String::with_capacity(dims.width * 4);
        for (i, card) in cards.iter().enumerate() {
            writeln!(w, "{CARD_PREFIX}{}:", card.number)?;
            for row in &card.matrix {
                line.clear();
                line.extend(row.iter().map(|&c| {
                    if c == 1 {
                        self.hole_char
                    } else {
                        self.no_hole_char
                    }
                }));
                writeln!(w, "{line}")?;
            }
            if i + 1 < cards.len() {
                writeln!(w)?;
            }
        }
        Ok(())
    }

    pub fn export_to_string(&self, cards: &[Card]) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.export_cards(cards, &mut buf)?;
        // every write above comes from `str` data
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

// ============================================================================
// Parse
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDeck {
    pub title: String,
    pub total_cards: usize,
    pub holes_per_card: usize,
    pub dimensions: CardDimensions,
    pub cards: Vec<Card>,
}

/// Reader for the text format.
///
/// Without explicit dimensions, width is the length of the first card row
/// and height is `Holes per card / width`, so any geometry round-trips. A
/// file with no card rows falls back to the preset with that hole count.
/// With explicit dimensions the header must agree with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextParser {
    pub dimensions: Option<CardDimensions>,
}

impl TextParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(dimensions: CardDimensions) -> Self {
        Self {
            dimensions: Some(dimensions),
        }
    }

    pub fn parse(&self, content: &str) -> Result<ParsedDeck, ParseError> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        if lines.len() < 4 {
            return Err(ParseError::TooFewLines);
        }

        let title = header(lines[0], TITLE_PREFIX, "Title", 1)?.to_string();
        let total_cards = numeric_header(lines[1], CARDS_PREFIX, "Cards", 2)?;
        if total_cards == 0 {
            return Err(ParseError::NoCards { line: 2 });
        }
        let holes_per_card = numeric_header(lines[2], HOLES_PREFIX, "Holes per card", 3)?;
        let dimensions = self.resolve_dimensions(holes_per_card, first_row_width(&lines[3..]))?;

        let mut cards = Vec::with_capacity(total_cards.min(1024));
        let mut idx = 3;
        while idx < lines.len() && cards.len() < total_cards {
            let line = lines[idx];
            if line.trim().is_empty() {
                idx += 1;
                continue;
            }
            let label = card_label(line, idx + 1)?;
            idx += 1;

            let mut matrix = Vec::with_capacity(dimensions.height);
            for row in 1..=dimensions.height {
                let Some(&text) = lines.get(idx) else {
                    return Err(ParseError::UnexpectedEof { card: label, row });
                };
                idx += 1;
                matrix.push(parse_row(text, dimensions.width, label, row, idx)?);
            }
            cards.push(Card::new(cards.len() + 1, matrix));
        }

        if cards.len() != total_cards {
            return Err(ParseError::CardCount {
                expected: total_cards,
                found: cards.len(),
            });
        }
        debug!(cards = cards.len(), dimensions = %dimensions, "Parsed text cards");

        Ok(ParsedDeck {
            title,
            total_cards,
            holes_per_card,
            dimensions,
            cards,
        })
    }

    fn resolve_dimensions(
        &self,
        holes_per_card: usize,
        first_row: Option<usize>,
    ) -> Result<CardDimensions, ParseError> {
        match (self.dimensions, first_row) {
            (Some(dims), _) if dims.cells() == holes_per_card => Ok(dims),
            (Some(dims), _) => Err(ParseError::HolesMismatch {
                declared: holes_per_card,
                expected: dims.cells(),
                dimensions: dims,
            }),
            (None, Some(width)) if width > 0 && holes_per_card % width == 0 => {
                Ok(CardDimensions::new(width, holes_per_card / width))
            }
            (None, Some(width)) if width > 0 => Err(ParseError::IndivisibleWidth {
                holes: holes_per_card,
                width,
            }),
            (None, _) => CardType::ALL
                .into_iter()
                .map(CardType::dimensions)
                .find(|d| d.cells() == holes_per_card)
                .ok_or(ParseError::UnknownDimensions(holes_per_card)),
        }
    }
}

fn header<'a>(
    line: &'a str,
    prefix: &str,
    name: &'static str,
    number: usize,
) -> Result<&'a str, ParseError> {
    line.strip_prefix(prefix).ok_or(ParseError::MissingHeader {
        header: name,
        line: number,
    })
}

fn numeric_header(
    line: &str,
    prefix: &str,
    name: &'static str,
    number: usize,
) -> Result<usize, ParseError> {
    let value = header(line, prefix, name, number)?;
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidHeaderValue {
            header: name,
            line: number,
            value: value.to_string(),
        })
}

/// Character count of the line after the first card header.
fn first_row_width(body: &[&str]) -> Option<usize> {
    let header = body.iter().position(|l| !l.trim().is_empty())?;
    body.get(header + 1).map(|row| row.chars().count())
}

/// `Card 12:` → 12.
fn card_label(line: &str, number: usize) -> Result<usize, ParseError> {
    let rest = line
        .strip_prefix(CARD_PREFIX)
        .ok_or_else(|| ParseError::ExpectedCardHeader {
            line: number,
            found: line.to_string(),
        })?;
    rest.trim_end()
        .strip_suffix(':')
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| ParseError::InvalidCardHeader {
            line: number,
            found: line.to_string(),
        })
}

fn parse_row(
    text: &str,
    width: usize,
    card: usize,
    row: usize,
    line: usize,
) -> Result<Vec<u8>, ParseError> {
    let actual = text.chars().count();
    if actual != width {
        return Err(ParseError::RowWidth {
            card,
            row,
            line,
            expected: width,
            actual,
        });
    }
    text.chars()
        .enumerate()
        .map(|(i, ch)| match ch {
            ch if HOLE_CHARS.contains(&ch) => Ok(1),
            NO_HOLE_CHAR => Ok(0),
            ch => Err(ParseError::InvalidChar {
                ch,
                card,
                row,
                col: i + 1,
                line,
            }),
        })
        .collect()
}
