//! Auto-fit sizing and run layout
//!
//! Two passes share one cursor model. The sizer walks the run sequence in
//! measure-only mode at descending candidate font sizes until the cumulative
//! extent fits the target box; the walker then re-walks the runs at the
//! chosen size and emits concrete pixel placements.
//!
//! The search is a linear descent, not a binary search: "fits" is assumed
//! monotonic in font size but pixel rounding can break that at extreme
//! sizes, and the largest size that actually satisfies the predicate must be
//! found.

use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::constants::{CODE_BLOCK_MARGIN, MIN_MULTI_RUN_FONT_SIZE};
use crate::emoji::{Chunk, EmojiCatalog};
use crate::entity::{Run, SpanKind};
use crate::error::{Error, Result};
use crate::font::{FontSlot, Measure};
use crate::geometry::{Point, Size};

/// Result of the single-line fit search
#[derive(Debug, Clone, Copy)]
pub struct SingleLineFit {
    pub font_size: u32,
    /// Measured bounding box of the text at `font_size`
    pub text_size: Size,
}

/// Largest font size whose measured bounding box lies strictly inside the
/// target, searching from `max_font_size` down to 1.
///
/// Used for the title and author name. Failure here is a hard error: an
/// unfittable single line indicates a caller or configuration problem.
pub fn fit_single_line(
    measure: &dyn Measure,
    slot: FontSlot,
    text: &str,
    max_font_size: u32,
    target: Size,
) -> Result<SingleLineFit> {
    for font_size in (1..=max_font_size).rev() {
        let text_size = measure.measure(slot, font_size as f32, text);
        if text_size.width < target.width && text_size.height < target.height {
            return Ok(SingleLineFit {
                font_size,
                text_size,
            });
        }
    }
    Err(Error::NoFittingSize {
        text: text.to_string(),
        max_size: max_font_size,
        box_width: target.width,
        box_height: target.height,
    })
}

/// Result of the multi-run fit search
#[derive(Debug, Clone, Copy)]
pub struct RunFit {
    pub font_size: u32,
    pub line_height: u32,
    /// Simulated extent of the whole sequence, including the trailing line
    pub extent: Size,
}

/// Largest font size at which the simulated line layout of the run sequence
/// fits the target, searching from `max_font_size` down to 2.
///
/// Never fails: when nothing fits, returns the degenerate minimum
/// (size 1, line height 1, unit extent) and lets the content clip. Body
/// text stays renderable for pathologically long quotes.
pub fn fit_runs(
    measure: &dyn Measure,
    catalog: &EmojiCatalog,
    runs: &[Run],
    emoji_scale: f32,
    max_font_size: u32,
    target: Size,
) -> RunFit {
    for font_size in (MIN_MULTI_RUN_FONT_SIZE..=max_font_size).rev() {
        let line_height = measure.line_height(font_size as f32);
        let extent = simulate_extent(measure, catalog, runs, font_size, line_height, emoji_scale);
        if extent.width < target.width && extent.height + line_height < target.height {
            return RunFit {
                font_size,
                line_height,
                extent: Size::new(extent.width, extent.height + line_height),
            };
        }
    }
    RunFit {
        font_size: 1,
        line_height: 1,
        extent: Size::new(1, 1),
    }
}

/// Measure-only walk: cumulative extent of the run sequence at one size.
///
/// Emoji embedded inside text runs (possible in code spans, which the
/// converter does not pre-segment) widen the run by one scaled line height
/// each; standalone emoji runs advance by the emoji-scaled line height.
fn simulate_extent(
    measure: &dyn Measure,
    catalog: &EmojiCatalog,
    runs: &[Run],
    font_size: u32,
    line_height: u32,
    emoji_scale: f32,
) -> Size {
    let lh = line_height as f32;
    let mut cur_x = 0.0f32;
    let mut cur_y = 0.0f32;
    let mut max_x = 0.0f32;
    let mut max_y = lh;

    for run in runs {
        match run {
            Run::Text(t) => {
                let embedded = catalog.emoji_count(&t.content) as f32;
                let mut width = (measure.advance(t.font, font_size as f32, &t.content)
                    + embedded * lh / emoji_scale)
                    .ceil();
                if t.kind == SpanKind::CodeBlock {
                    width += CODE_BLOCK_MARGIN;
                }
                cur_x += width;
            }
            Run::LineBreak { .. } => {
                cur_x = 0.0;
                cur_y += lh;
            }
            Run::Emoji { .. } => {
                cur_x += (lh * emoji_scale).ceil();
            }
        }
        max_x = max_x.max(cur_x);
        max_y = max_y.max(cur_y + lh);
    }

    Size::new(max_x as u32, max_y as u32)
}

/// One drawable placement emitted by the walker
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Text {
        content: String,
        font: FontSlot,
        color: Rgba<u8>,
        position: Point,
    },
    Emoji {
        image: Rc<RgbaImage>,
        position: Point,
        size: u32,
    },
}

/// Walk the runs at the chosen size and emit pixel placements.
///
/// The cursor starts at `origin`; line breaks reset x to `origin.x` and
/// advance y by one line height. Text run content is re-tokenized through
/// the catalog so emoji living inside styled spans still render as glyph
/// images. Standalone emoji advance the cursor by a full line height,
/// keeping a uniform horizontal rhythm; inline emoji advance by their own
/// glyph size. The walker performs no overflow wrapping of its own; width
/// containment comes from the sizer's prior fit check.
pub fn layout_runs(
    measure: &dyn Measure,
    catalog: &EmojiCatalog,
    runs: &[Run],
    origin: Point,
    font_size: u32,
    line_height: u32,
    emoji_scale: f32,
) -> Vec<Placement> {
    let lh = line_height as f32;
    let emoji_size = ((lh / emoji_scale).floor() as u32).max(1);
    let mut placements = Vec::new();
    let mut x = origin.x as f32;
    let mut y = origin.y;

    for run in runs {
        match run {
            Run::Text(t) => {
                for chunk in catalog.tokenize(&t.content) {
                    match chunk {
                        Chunk::Text(piece) => {
                            let advance = measure.advance(t.font, font_size as f32, &piece);
                            placements.push(Placement::Text {
                                content: piece,
                                font: t.font,
                                color: t.color,
                                position: Point::new(x.floor() as i32, y),
                            });
                            x += advance;
                        }
                        Chunk::Emoji(key) => {
                            if let Some(image) = catalog.image(&key) {
                                placements.push(Placement::Emoji {
                                    image,
                                    position: Point::new(x.floor() as i32, y),
                                    size: emoji_size,
                                });
                            }
                            x += emoji_size as f32;
                        }
                    }
                }
            }
            Run::LineBreak { .. } => {
                x = origin.x as f32;
                y += line_height as i32;
            }
            Run::Emoji { image, .. } => {
                placements.push(Placement::Emoji {
                    image: Rc::clone(image),
                    position: Point::new(x.floor() as i32, y),
                    size: emoji_size,
                });
                x += lh;
            }
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{runs_from_spans, ColorSet, Span};
    use crate::font::testing::FixedMeasure;

    fn colors() -> ColorSet {
        ColorSet {
            title: Rgba([255, 255, 255, 255]),
            content: Rgba([240, 240, 240, 255]),
            link: Rgba([0, 0, 255, 255]),
            code: Rgba([255, 0, 0, 255]),
            author_name: Rgba([255, 255, 255, 255]),
        }
    }

    #[test]
    fn test_single_line_returns_maximum_fitting_size() {
        let m = FixedMeasure;
        // width = 2*size for 4 chars, height = size; box 100x30
        let fit =
            fit_single_line(&m, FontSlot::Bold, "abcd", 128, Size::new(100, 30)).unwrap();
        assert_eq!(fit.font_size, 29);
        assert_eq!(fit.text_size, Size::new(58, 29));

        // One size larger must not fit
        let larger = m.measure(FontSlot::Bold, 30.0, "abcd");
        assert!(larger.height >= 30);
    }

    #[test]
    fn test_single_line_unfittable_is_an_error() {
        let m = FixedMeasure;
        let err = fit_single_line(&m, FontSlot::Bold, "abcd", 64, Size::new(1, 1)).unwrap_err();
        match err {
            Error::NoFittingSize {
                text,
                max_size,
                box_width,
                box_height,
            } => {
                assert_eq!(text, "abcd");
                assert_eq!(max_size, 64);
                assert_eq!((box_width, box_height), (1, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_multi_run_fit() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans("aaaa", &[], &colors()).unwrap();

        // width = 2*size; line_height = size + 5; need 2s < 100 and
        // 2(s+5) < 60 -> s = 24
        let fit = fit_runs(&m, &catalog, &runs, 1.3, 128, Size::new(100, 60));
        assert_eq!(fit.font_size, 24);
        assert_eq!(fit.line_height, 29);
        assert_eq!(fit.extent, Size::new(48, 58));
    }

    #[test]
    fn test_multi_run_degenerate_fallback() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans("unfittable", &[], &colors()).unwrap();

        let fit = fit_runs(&m, &catalog, &runs, 1.3, 128, Size::new(3, 3));
        assert_eq!(fit.font_size, 1);
        assert_eq!(fit.line_height, 1);
        assert_eq!(fit.extent, Size::new(1, 1));
    }

    #[test]
    fn test_multi_run_counts_line_breaks() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans("aa\naa\naa", &[], &colors()).unwrap();

        // Three lines: height = 3*lh, plus one more lh headroom required.
        // At size 10: lh = 15, total 45, needs < 64 with headroom -> 61 ok
        let fit = fit_runs(&m, &catalog, &runs, 1.3, 10, Size::new(100, 61));
        assert_eq!(fit.font_size, 10);
        assert_eq!(fit.extent.height, 60);
    }

    #[test]
    fn test_walker_places_adjacent_runs() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans(
            "AB",
            &[Span::Styled {
                kind: SpanKind::Bold,
                offset: 0,
                length: 1,
            }],
            &colors(),
        )
        .unwrap();

        let placements =
            layout_runs(&m, &catalog, &runs, Point::new(10, 20), 10, 15, 1.3);
        assert_eq!(placements.len(), 2);
        match (&placements[0], &placements[1]) {
            (
                Placement::Text {
                    content: a,
                    position: pa,
                    font: fa,
                    ..
                },
                Placement::Text {
                    content: b,
                    position: pb,
                    ..
                },
            ) => {
                assert_eq!(a, "A");
                assert_eq!(*fa, FontSlot::Bold);
                assert_eq!(*pa, Point::new(10, 20));
                assert_eq!(b, "B");
                // origin.x + advance(bold, 10, "A") = 10 + 5
                assert_eq!(*pb, Point::new(15, 20));
            }
            other => panic!("unexpected placements: {other:?}"),
        }
    }

    #[test]
    fn test_walker_line_break_resets_cursor() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans("ab\ncd", &[], &colors()).unwrap();

        let placements =
            layout_runs(&m, &catalog, &runs, Point::new(50, 100), 10, 15, 1.3);
        assert_eq!(placements.len(), 2);
        assert!(matches!(
            &placements[1],
            Placement::Text { position, .. } if *position == Point::new(50, 115)
        ));
    }

    #[test]
    fn test_walker_standalone_emoji_advances_full_line_height() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let image = Rc::new(RgbaImage::new(4, 4));
        let runs = vec![
            Run::Emoji {
                offset: 0,
                length: 1,
                image,
            },
            Run::Text(crate::entity::TextRun {
                kind: SpanKind::Default,
                font: FontSlot::Regular,
                color: Rgba([255, 255, 255, 255]),
                content: "x".into(),
                offset: 1,
                length: 1,
            }),
        ];

        let placements = layout_runs(&m, &catalog, &runs, Point::new(0, 0), 10, 26, 1.3);
        assert_eq!(placements.len(), 2);
        // Emoji glyph is floor(26 / 1.3) = 20 px, but the cursor advances by
        // the full line height
        assert!(matches!(
            &placements[0],
            Placement::Emoji { size: 20, position, .. } if *position == Point::new(0, 0)
        ));
        assert!(matches!(
            &placements[1],
            Placement::Text { position, .. } if *position == Point::new(26, 0)
        ));
    }

    #[test]
    fn test_walker_is_idempotent() {
        let m = FixedMeasure;
        let catalog = EmojiCatalog::empty();
        let runs = runs_from_spans("abc\ndef", &[], &colors()).unwrap();

        let first = layout_runs(&m, &catalog, &runs, Point::new(5, 5), 12, 17, 1.3);
        let second = layout_runs(&m, &catalog, &runs, Point::new(5, 5), 12, 17, 1.3);
        assert_eq!(first, second);
    }
}
