//! SVG punchcard documents.
//!
//! Every document is millimeter-sized with a pixel `viewBox` (96 DPI,
//! [`MM_TO_PX`] pixels per millimeter). Per card, top to bottom:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        Title #n/total        │  caption (show_numbers)
//! │  ● ○ ○ ● ● ○ ...             │  one circle per cell, grid lines behind
//! │  ...                         │
//! │  26x8 | 104 holes | Card n   │  footer (show_numbers)
//! └──────────────────────────────┘
//! ```
//!
//! Punched cells are filled black circles; unpunched cells get a light guide
//! ring at 30% of the hole radius. Multi-card documents stack cards
//! vertically, [`CARD_SPACING_MM`] apart, each in its own `<g id="card-n">`.
//!
//! Geometry is computed once into a [`DocumentLayout`]; the direct writer in
//! this module and the maud template in
//! [`svg_template`](super::svg_template) both render from it, so the two
//! paths always agree on positions, radii and text.

use super::{ExportError, check_card, check_deck};
use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use tracing::debug;

pub const HOLE_RADIUS_MM: f64 = 2.0;
pub const HOLE_SPACING_MM: f64 = 5.0;
pub const CARD_PADDING_MM: f64 = 10.0;
pub const TEXT_HEIGHT_MM: f64 = 8.0;
pub const CARD_SPACING_MM: f64 = 5.0;
/// 96 DPI.
pub const MM_TO_PX: f64 = 3.78;

const GUIDE_RATIO: f64 = 0.3;
const CAPTION_BASELINE: f64 = 0.8;
const CAPTION_SIZE: f64 = 0.6;
const FOOTER_OFFSET: f64 = 0.3;
const FOOTER_SIZE: f64 = 0.5;

/// Which code path serializes the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgRenderer {
    /// Hand-written `write!` output.
    #[default]
    Direct,
    /// maud template.
    Template,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgExporter {
    pub show_grid: bool,
    pub show_numbers: bool,
    /// Millimeters, before `scale`.
    pub hole_radius: f64,
    /// Center-to-center, millimeters, before `scale`.
    pub hole_spacing: f64,
    pub scale: f64,
    pub title: Option<String>,
    pub total_cards: Option<usize>,
    pub renderer: SvgRenderer,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_numbers: true,
            hole_radius: HOLE_RADIUS_MM,
            hole_spacing: HOLE_SPACING_MM,
            scale: 1.0,
            title: None,
            total_cards: None,
            renderer: SvgRenderer::Direct,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleMark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub punched: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One card's drawable content, in card-local pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub number: usize,
    pub caption: Option<Label>,
    /// Empty when the grid is hidden.
    pub grid: Vec<GridLine>,
    pub holes: Vec<HoleMark>,
    pub footer: Option<Label>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width_mm: f64,
    pub height_mm: f64,
    pub title: String,
    pub description: String,
    /// `true` for card sets: each card goes into its own translated group.
    pub grouped: bool,
    /// Vertical pixel offset paired with each card.
    pub cards: Vec<(f64, CardLayout)>,
}

impl DocumentLayout {
    pub fn width_px(&self) -> f64 {
        self.width_mm * MM_TO_PX
    }

    pub fn height_px(&self) -> f64 {
        self.height_mm * MM_TO_PX
    }
}

impl SvgExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(mut self, renderer: SvgRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Caption becomes `"{title} #n/{total}"`, or `"Card #n/{total}"` without a title.
    pub fn set_title(&mut self, title: impl Into<String>, total_cards: usize) {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self.total_cards = Some(total_cards);
    }

    fn step_mm(&self) -> f64 {
        self.hole_spacing * self.scale
    }

    /// Card outline size in millimeters.
    pub fn card_size_mm(&self, card: &Card) -> (f64, f64) {
        let step = self.step_mm();
        let width = card.width as f64 * step + 2.0 * CARD_PADDING_MM;
        let height = card.height as f64 * step + 2.0 * CARD_PADDING_MM + 2.0 * TEXT_HEIGHT_MM;
        (width, height)
    }

    fn caption_text(&self, number: usize) -> String {
        match (self.title.as_deref(), self.total_cards) {
            (Some(title), Some(total)) if total > 0 => format!("{title} #{number}/{total}"),
            (_, Some(total)) if total > 0 => format!("Card #{number}/{total}"),
            _ => format!("Card #{number}"),
        }
    }

    /// Lay out one card inside a `width_px × height_px` box.
    pub fn layout_card(&self, card: &Card) -> CardLayout {
        let (width_mm, height_mm) = self.card_size_mm(card);
        let width_px = width_mm * MM_TO_PX;
        let height_px = height_mm * MM_TO_PX;
        let step_px = self.step_mm() * MM_TO_PX;
        let start_x = CARD_PADDING_MM * MM_TO_PX;
        let start_y = (CARD_PADDING_MM + TEXT_HEIGHT_MM) * MM_TO_PX;
        let hole_r = self.hole_radius * self.scale * MM_TO_PX;

        let caption = self.show_numbers.then(|| Label {
            x: width_px / 2.0,
            y: TEXT_HEIGHT_MM * MM_TO_PX * CAPTION_BASELINE,
            size: TEXT_HEIGHT_MM * MM_TO_PX * CAPTION_SIZE,
            text: self.caption_text(card.number),
        });

        let mut grid = Vec::new();
        if self.show_grid {
            let end_x = start_x + card.width.saturating_sub(1) as f64 * step_px;
            let end_y = start_y + card.height.saturating_sub(1) as f64 * step_px;
            grid.extend((0..card.width).map(|x| {
                let cx = start_x + x as f64 * step_px;
                GridLine {
                    x1: cx,
                    y1: start_y,
                    x2: cx,
                    y2: end_y,
                }
            }));
            grid.extend((0..card.height).map(|y| {
                let cy = start_y + y as f64 * step_px;
                GridLine {
                    x1: start_x,
                    y1: cy,
                    x2: end_x,
                    y2: cy,
                }
            }));
        }

        let holes = card
            .matrix
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, &cell)| {
                    let punched = cell == 1;
                    HoleMark {
                        cx: start_x + x as f64 * step_px,
                        cy: start_y + y as f64 * step_px,
                        r: if punched { hole_r } else { hole_r * GUIDE_RATIO },
                        punched,
                    }
                })
            })
            .collect();

        let footer = self.show_numbers.then(|| Label {
            x: width_px / 2.0,
            y: height_px - TEXT_HEIGHT_MM * MM_TO_PX * FOOTER_OFFSET,
            size: TEXT_HEIGHT_MM * MM_TO_PX * FOOTER_SIZE,
            text: format!(
                "{}x{} | {} holes | Card {}",
                card.width,
                card.height,
                card.count_holes(),
                card.number
            ),
        });

        CardLayout {
            number: card.number,
            caption,
            grid,
            holes,
            footer,
        }
    }

    /// Single-card document.
    pub fn layout_single(&self, card: &Card) -> DocumentLayout {
        let (width_mm, height_mm) = self.card_size_mm(card);
        DocumentLayout {
            width_mm,
            height_mm,
            title: format!("Jacquard Loom Punchcard #{}", card.number),
            description: format!("{} - For use in Jacquard weaving looms", card.info()),
            grouped: false,
            cards: vec![(0.0, self.layout_card(card))],
        }
    }

    /// Card-set document. `cards` must be non-empty.
    pub fn layout_set(&self, cards: &[Card]) -> DocumentLayout {
        let (width_mm, card_height_mm) = cards
            .first()
            .map_or((0.0, 0.0), |c| self.card_size_mm(c));
        let pitch_mm = card_height_mm + CARD_SPACING_MM;
        let height_mm = cards.len() as f64 * pitch_mm - CARD_SPACING_MM;

        DocumentLayout {
            width_mm,
            height_mm,
            title: format!("Jacquard Loom Punchcards (Set of {})", cards.len()),
            description: format!(
                "Complete set of {} punchcards for Jacquard weaving",
                cards.len()
            ),
            grouped: true,
            cards: cards
                .iter()
                .enumerate()
                .map(|(i, card)| (i as f64 * pitch_mm * MM_TO_PX, self.layout_card(card)))
                .collect(),
        }
    }

    /// Write one card as a standalone document.
    pub fn export_card(&self, card: &Card, w: &mut impl Write) -> Result<(), ExportError> {
        check_card(card)?;
        self.render(&self.layout_single(card), w)
    }

    /// Write all cards into one document, one group per card.
    pub fn export_cards(&self, cards: &[Card], w: &mut impl Write) -> Result<(), ExportError> {
        check_deck(cards)?;
        self.render(&self.layout_set(cards), w)
    }

    fn render(&self, doc: &DocumentLayout, w: &mut impl Write) -> Result<(), ExportError> {
        debug!(
            renderer = ?self.renderer,
            cards = doc.cards.len(),
            width_mm = doc.width_mm,
            height_mm = doc.height_mm,
            "Rendering SVG"
        );
        match self.renderer {
            SvgRenderer::Direct => write_document(doc, w)?,
            SvgRenderer::Template => {
                let markup = super::svg_template::render_document(doc);
                w.write_all(markup.into_string().as_bytes())?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Direct writer
// ============================================================================

/// Escape text content and attribute values.
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_document(doc: &DocumentLayout, w: &mut impl Write) -> std::io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.2}mm" height="{:.2}mm" viewBox="0 0 {:.2} {:.2}">"#,
        doc.width_mm,
        doc.height_mm,
        doc.width_px(),
        doc.height_px()
    )?;
    writeln!(w, "  <title>{}</title>", escape_xml(&doc.title))?;
    writeln!(w, "  <desc>{}</desc>", escape_xml(&doc.description))?;
    writeln!(w)?;
    writeln!(w, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(w)?;

    for (offset, card) in &doc.cards {
        if doc.grouped {
            writeln!(
                w,
                r#"  <g id="card-{}" transform="translate(0, {:.2})">"#,
                card.number, offset
            )?;
            write_card(card, "    ", w)?;
            writeln!(w, "  </g>")?;
            writeln!(w)?;
        } else {
            write_card(card, "  ", w)?;
        }
    }

    writeln!(w, "</svg>")
}

fn write_label(label: &Label, fill: &str, indent: &str, w: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        w,
        r#"{indent}<text x="{:.2}" y="{:.2}" font-family="monospace" font-size="{:.2}" text-anchor="middle" fill="{fill}">{}</text>"#,
        label.x,
        label.y,
        label.size,
        escape_xml(&label.text)
    )
}

fn write_card(card: &CardLayout, indent: &str, w: &mut impl Write) -> std::io::Result<()> {
    if let Some(caption) = &card.caption {
        write_label(caption, "black", indent, w)?;
    }

    if !card.grid.is_empty() {
        writeln!(
            w,
            r#"{indent}<g id="grid-{}" stroke="lightgray" stroke-width="0.5" opacity="0.3">"#,
            card.number
        )?;
        for line in &card.grid {
            writeln!(
                w,
                r#"{indent}  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                line.x1, line.y1, line.x2, line.y2
            )?;
        }
        writeln!(w, "{indent}</g>")?;
    }

    for hole in &card.holes {
        if hole.punched {
            writeln!(
                w,
                r#"{indent}<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="black"/>"#,
                hole.cx, hole.cy, hole.r
            )?;
        } else {
            writeln!(
                w,
                r#"{indent}<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="lightgray" stroke-width="0.5"/>"#,
                hole.cx, hole.cy, hole.r
            )?;
        }
    }

    if let Some(footer) = &card.footer {
        write_label(footer, "gray", indent, w)?;
    }
    Ok(())
}
