//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Convert
//!
//! ```text
//! cat.png → cat.svg
//!     Color mode: 2-color (binary: black/white using dithering)
//!     Cards: 12 × 26x8 (96 rows, 41.7% density)
//!     Written: 3 of 12 cards
//! ```
//!
//! ## Info
//!
//! ```text
//! cat.png
//!     Color mode: 2-color (binary: black/white using dithering)
//!     Cards: 2 × 26x8 (16 rows, 41.7% density)
//!     001 80 holes
//!     002 93 holes
//! ```
//!
//! ## Parse
//!
//! ```text
//! Rose (2 cards, 26x8)
//!     001 Card #1: 26x8, 80 holes (38.5% density)
//!     002 Card #2: 26x8, 93 holes (44.7% density)
//! ```

use crate::export::text::ParsedDeck;
use crate::imaging::ColorMode;
use crate::metadata::{InfoReport, Metadata};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `Cards: 12 × 26x8 (96 rows, 41.7% density)`
fn cards_line(metadata: &Metadata) -> String {
    format!(
        "Cards: {} × {} ({} rows, {} density)",
        metadata.total_cards,
        metadata.dimensions(),
        metadata.total_rows,
        metadata.density_label()
    )
}

// ============================================================================
// convert
// ============================================================================

pub fn format_convert_output(
    source: &Path,
    output: &Path,
    mode: ColorMode,
    metadata: &Metadata,
    written: usize,
) -> Vec<String> {
    let mut lines = vec![
        format!("{} → {}", source.display(), output.display()),
        format!("{}Color mode: {}", indent(1), mode.describe()),
        format!("{}{}", indent(1), cards_line(metadata)),
    ];
    if written < metadata.total_cards {
        lines.push(format!(
            "{}Written: {} of {} cards",
            indent(1),
            written,
            metadata.total_cards
        ));
    }
    lines
}

pub fn print_convert_output(
    source: &Path,
    output: &Path,
    mode: ColorMode,
    metadata: &Metadata,
    written: usize,
) {
    for line in format_convert_output(source, output, mode, metadata, written) {
        println!("{}", line);
    }
}

// ============================================================================
// info
// ============================================================================

pub fn format_info_output(report: &InfoReport) -> Vec<String> {
    let mut lines = vec![
        report.filename.clone(),
        format!("{}Color mode: {}", indent(1), report.color_mode),
        format!(
            "{}Cards: {} × {} ({} rows, {} density)",
            indent(1),
            report.total_cards,
            report.card_dimensions,
            report.total_rows,
            report.average_density
        ),
    ];
    lines.extend(
        report
            .holes_per_card
            .iter()
            .enumerate()
            .map(|(i, holes)| format!("{}{} {} holes", indent(1), format_index(i + 1), holes)),
    );
    lines
}

pub fn print_info_output(report: &InfoReport) {
    for line in format_info_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// parse
// ============================================================================

pub fn format_parse_output(deck: &ParsedDeck) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} cards, {})",
        deck.title, deck.total_cards, deck.dimensions
    )];
    lines.extend(
        deck.cards
            .iter()
            .map(|card| format!("{}{} {}", indent(1), format_index(card.number), card.info())),
    );
    lines
}

pub fn print_parse_output(deck: &ParsedDeck) {
    for line in format_parse_output(deck) {
        println!("{}", line);
    }
}
