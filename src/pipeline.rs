//! End-to-end conversion: image bytes → cards → document bytes.
//!
//! ```text
//! bytes ──decode──▶ PixelGrid ──resize──▶ PixelGrid ──dither──▶ BinaryGrid
//!                                                                  │
//!       document ◀──export── cards (invert?) ◀──────build──────────┘
//! ```
//!
//! The resample width comes from the card builder: `Width × Height` for
//! row-reshape, `Width` for row-blocks. Height always follows the aspect
//! ratio. Everything runs on in-memory data; reading files and writing
//! results belongs to the caller.

use crate::builder::{BuildError, BuildStrategy, CardBuilder};
use crate::card::{Card, CardDimensions};
use crate::export::svg::SvgExporter;
use crate::export::text::{ParseError, TextExporter};
use crate::export::{ExportError, ExportFormat, UnsupportedFormat};
use crate::imaging::{BackendError, ColorMode, ImageBackend, InvalidColorMode, TargetSize};
use crate::imaging::image_to_binary;
use crate::metadata::{Metadata, generate_metadata};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] BackendError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    InvalidColorMode(#[from] InvalidColorMode),
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),
}

/// Image → cards settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    pub dimensions: CardDimensions,
    pub strategy: BuildStrategy,
    pub color_mode: ColorMode,
    /// Flip every card after building (negative pattern).
    pub invert: bool,
}

impl PipelineOptions {
    pub fn builder(&self) -> CardBuilder {
        CardBuilder::new(self.dimensions, self.strategy)
    }
}

/// Cards → document settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderOptions {
    pub format: ExportFormat,
    /// Shown in SVG captions as `Title #n/total` and in the text header.
    pub title: Option<String>,
    /// Only the first `max_cards` cards are written. Numbering and the
    /// caption total still refer to the full set.
    pub max_cards: Option<usize>,
    pub svg: SvgExporter,
    pub text: TextExporter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The full card set, before any `max_cards` cut.
    pub cards: Vec<Card>,
    pub metadata: Metadata,
    pub document: Vec<u8>,
}

/// Decode, resample, dither and build cards.
pub fn image_to_cards(
    backend: &impl ImageBackend,
    bytes: &[u8],
    options: &PipelineOptions,
) -> Result<Vec<Card>, PipelineError> {
    let builder = options.builder();
    let target = TargetSize::width(builder.required_width());
    let grid = image_to_binary(backend, bytes, target, options.color_mode)?;
    let mut cards = builder.build(&grid)?;
    if options.invert {
        cards.iter_mut().for_each(Card::invert);
    }
    Ok(cards)
}

/// Serialize `cards` in the requested format.
pub fn render(cards: &[Card], options: &RenderOptions) -> Result<Vec<u8>, PipelineError> {
    let shown = match options.max_cards {
        Some(n) => &cards[..n.min(cards.len())],
        None => cards,
    };
    let mut out = Vec::new();
    match options.format {
        ExportFormat::Svg => {
            let mut exporter = options.svg.clone();
            if let Some(title) = &options.title {
                exporter.set_title(title.as_str(), cards.len());
            }
            exporter.export_cards(shown, &mut out)?;
        }
        ExportFormat::Text => {
            let mut exporter = options.text.clone();
            if let Some(title) = &options.title {
                exporter.set_title(title.as_str());
            }
            exporter.export_cards(shown, &mut out)?;
        }
    }
    Ok(out)
}

/// Full image → document conversion.
pub fn convert(
    backend: &impl ImageBackend,
    bytes: &[u8],
    options: &PipelineOptions,
    render_options: &RenderOptions,
) -> Result<Conversion, PipelineError> {
    let cards = image_to_cards(backend, bytes, options)?;
    let metadata = generate_metadata(&cards);
    let document = render(&cards, render_options)?;
    info!(
        cards = cards.len(),
        dimensions = %options.dimensions,
        format = %render_options.format,
        bytes = document.len(),
        "Converted image"
    );
    Ok(Conversion {
        cards,
        metadata,
        document,
    })
}
