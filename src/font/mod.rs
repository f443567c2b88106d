//! Font loading and text measurement
//!
//! Loads the four-face font set (fontdue) and exposes the measurement
//! primitives the layout engine needs: tight bounding boxes, advance widths
//! and the probe-derived line height. Measurement is deterministic for
//! identical inputs, which the auto-fit search relies on.

use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};
use log::info;

use crate::constants::{LINE_HEIGHT_PADDING, LINE_HEIGHT_PROBE};
use crate::error::{Error, Result};
use crate::geometry::Size;

/// Selects one face of a [`FontSet`].
///
/// Runs carry a slot rather than a font reference so they stay `'static`
/// and trivially copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSlot {
    Regular,
    Bold,
    Italic,
    Mono,
}

/// Text measurement primitives required by the layout engine.
///
/// Implemented by [`FontSet`]; layout code takes `&dyn Measure` so tests can
/// substitute fixed metrics without font files.
pub trait Measure {
    /// Tight bounding box of the rendered string at the given size
    fn measure(&self, slot: FontSlot, size: f32, text: &str) -> Size;

    /// Horizontal advance of the string at the given size
    fn advance(&self, slot: FontSlot, size: f32, text: &str) -> f32;

    /// Vertical pitch between successive lines at the given size,
    /// derived from the probe string plus fixed padding
    fn line_height(&self, size: f32) -> u32 {
        self.measure(FontSlot::Regular, size, LINE_HEIGHT_PROBE).height + LINE_HEIGHT_PADDING
    }
}

/// The four font resource handles of a generator instance.
///
/// Immutable once loaded; shared read-only across all layout operations.
pub struct FontSet {
    regular: Font,
    bold: Font,
    italic: Font,
    mono: Font,
}

impl FontSet {
    /// Load all four faces from TTF/OTF files.
    pub fn load<P: AsRef<Path>>(regular: P, bold: P, italic: P, mono: P) -> Result<Self> {
        let set = Self {
            regular: load_font(regular.as_ref())?,
            bold: load_font(bold.as_ref())?,
            italic: load_font(italic.as_ref())?,
            mono: load_font(mono.as_ref())?,
        };
        info!("font set loaded (regular/bold/italic/mono)");
        Ok(set)
    }

    /// Resolve a slot to its font
    pub fn font(&self, slot: FontSlot) -> &Font {
        match slot {
            FontSlot::Regular => &self.regular,
            FontSlot::Bold => &self.bold,
            FontSlot::Italic => &self.italic,
            FontSlot::Mono => &self.mono,
        }
    }

    /// Distance from the top of a line to the baseline at the given size.
    /// Falls back to the font size itself when the font carries no
    /// horizontal line metrics.
    pub fn ascent(&self, slot: FontSlot, size: f32) -> f32 {
        self.font(slot)
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size)
    }
}

fn load_font(path: &Path) -> Result<Font> {
    let data = fs::read(path).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Font::from_bytes(data, FontSettings::default()).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl Measure for FontSet {
    fn measure(&self, slot: FontSlot, size: f32, text: &str) -> Size {
        let font = self.font(slot);
        let mut cursor = 0.0f32;
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        let mut inked = false;

        for c in text.chars() {
            let m = font.metrics(c, size);
            if m.width > 0 && m.height > 0 {
                inked = true;
                let left = cursor + m.xmin as f32;
                min_x = min_x.min(left);
                max_x = max_x.max(left + m.width as f32);
                min_y = min_y.min(m.ymin as f32);
                max_y = max_y.max((m.ymin + m.height as i32) as f32);
            }
            cursor += m.advance_width;
        }

        if !inked {
            // Whitespace-only string: advance but no ink
            return Size::new(cursor.ceil() as u32, 0);
        }
        Size::new(
            (max_x - min_x).ceil() as u32,
            (max_y - min_y).ceil() as u32,
        )
    }

    fn advance(&self, slot: FontSlot, size: f32, text: &str) -> f32 {
        let font = self.font(slot);
        text.chars().map(|c| font.metrics(c, size).advance_width).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedMeasure;
    use super::*;

    #[test]
    fn test_line_height_derivation() {
        let m = FixedMeasure;
        // Probe height == size, plus fixed padding
        assert_eq!(m.line_height(20.0), 20 + LINE_HEIGHT_PADDING);
        assert_eq!(m.line_height(2.0), 2 + LINE_HEIGHT_PADDING);
    }

    #[test]
    fn test_fixed_measure_scales_with_text() {
        let m = FixedMeasure;
        assert_eq!(m.measure(FontSlot::Regular, 10.0, "abcd").width, 20);
        assert_eq!(m.advance(FontSlot::Bold, 10.0, "ab"), 10.0);
    }
}
