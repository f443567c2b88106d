//! quotecard - quote card image generator
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                QuoteGenerator                 │
//! ├───────────────────────────────────────────────┤
//! │  text + spans → entity (runs)                 │
//! │                    ↓                          │
//! │  layout (auto-fit sizer → placement walker)   │
//! │                    ↓                          │
//! │  render (layers, glyphs, emoji, masks)        │
//! │                    ↓                          │
//! │  PNG bytes                                    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The emoji catalog feeds both the entity converter (tagging emoji spans)
//! and the layout walker (resolving glyph assets for blitting). All layout
//! is driven by the [`font::Measure`] trait so it stays deterministic and
//! testable independently of font files.

pub mod config;
pub mod constants;
pub mod emoji;
pub mod entity;
pub mod error;
pub mod font;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod utils;

pub use config::Config;
pub use emoji::{Chunk, EmojiCatalog};
pub use entity::{runs_from_spans, ColorSet, Run, Span, SpanKind, TextRun};
pub use error::{Error, Result};
pub use font::{FontSet, FontSlot, Measure};
pub use generator::{Background, GeneratorOptions, QuoteGenerator};
pub use geometry::{Grid, Point, Size, SizeBox};
pub use layout::{fit_runs, fit_single_line, layout_runs, Placement, RunFit, SingleLineFit};
pub use render::{AvatarShape, GradientDirection};
