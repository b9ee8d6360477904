//! # Loom Punchcards
//!
//! Converts raster images into Jacquard loom punchcards: fixed-size binary
//! hole grids, exported as millimeter-accurate SVG for cutting or as an
//! editable plain-text format that parses back losslessly.
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! bytes → grayscale → resample → dither → cards → metadata / export
//! ```
//!
//! Every stage is a pure function of its input; nothing feeds back into an
//! earlier stage. Input bytes are already in memory when the pipeline starts,
//! and each call owns all of its grids and cards, so concurrent callers need
//! no locking.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, luminance, nearest-neighbor resample, Floyd–Steinberg dither |
//! | [`types`] | `PixelGrid` and `BinaryGrid` shared between imaging stages and the builder |
//! | [`card`] | `Card`, `CardDimensions`, `CardType` presets, validation, invert, info strings |
//! | [`builder`] | Binary grid → cards, with named `row-reshape` / `row-blocks` strategies |
//! | [`metadata`] | Hole counts and density over a card set; the `info` JSON report |
//! | [`export`] | SVG (direct and maud-templated) and text exporters, text parser |
//! | [`pipeline`] | End-to-end orchestration: bytes → cards → document bytes |
//! | [`config`] | `punchcards.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Card Geometry
//!
//! Card width and height are never global. A [`card::CardDimensions`] value is
//! passed through the builder, exporters and parser, so a 26x8 and a 50x12
//! conversion can run side by side.
//!
//! ## One Canonical Builder Strategy
//!
//! The default strategy folds each image row into one card, which matches the
//! physical "N columns × M rows" card. Stacking consecutive rows into a card
//! is available as a separately named strategy and is only used when
//! configured.
//!
//! ## Binary Output At Every Color Mode
//!
//! Color modes 4 and 8 quantize to more levels during error diffusion, but
//! the final threshold is always binary. The mode changes the dot pattern,
//! never the number of output states.

pub mod builder;
pub mod card;
pub mod config;
pub mod export;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod types;
