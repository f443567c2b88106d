//! End-to-end layout pipeline tests: spans -> runs -> auto-fit -> placements.
//!
//! Uses a fixed-metrics measurement stub so results are independent of any
//! font file: every character advances size/2 pixels and the bounding box of
//! a string is (chars * size / 2, size).

use image::Rgba;

use quotecard::{
    fit_runs, fit_single_line, layout_runs, runs_from_spans, ColorSet, EmojiCatalog, Error,
    FontSlot, Measure, Placement, Point, Run, Size, Span, SpanKind,
};

struct FixedMeasure;

impl Measure for FixedMeasure {
    fn measure(&self, _slot: FontSlot, size: f32, text: &str) -> Size {
        let n = text.chars().count() as u32;
        Size::new(n * (size as u32) / 2, size as u32)
    }

    fn advance(&self, _slot: FontSlot, size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size / 2.0
    }
}

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
fn styled_body_lays_out_top_to_bottom() {
    let m = FixedMeasure;
    let catalog = EmojiCatalog::empty();
    let text = "The first line\nand the second";
    let spans = vec![Span::Styled {
        kind: SpanKind::Bold,
        offset: 0,
        length: 3,
    }];

    let runs = runs_from_spans(text, &spans, &colors()).unwrap();
    let fit = fit_runs(&m, &catalog, &runs, 1.3, 128, Size::new(400, 200));
    assert!(fit.font_size > 1, "expected a real fit, got fallback");
    // Returned extent already includes the trailing line of headroom
    assert!(fit.extent.width < 400);
    assert!(fit.extent.height < 200);

    let origin = Point::new(20, 30);
    let placements = layout_runs(
        &m,
        &catalog,
        &runs,
        origin,
        fit.font_size,
        fit.line_height,
        1.3,
    );

    // Three text placements: bold "The", default " first line", "and the second"
    let texts: Vec<&Placement> = placements
        .iter()
        .filter(|p| matches!(p, Placement::Text { .. }))
        .collect();
    assert_eq!(texts.len(), 3);

    match (texts[0], texts[1], texts[2]) {
        (
            Placement::Text {
                content: a,
                font: fa,
                position: pa,
                ..
            },
            Placement::Text {
                content: b,
                position: pb,
                ..
            },
            Placement::Text {
                content: c,
                position: pc,
                ..
            },
        ) => {
            assert_eq!(a, "The");
            assert_eq!(*fa, FontSlot::Bold);
            assert_eq!(*pa, origin);

            assert_eq!(b, " first line");
            // Adjacent on the same line, offset by the bold run's advance
            let advance = FixedMeasure.advance(FontSlot::Bold, fit.font_size as f32, "The");
            assert_eq!(pb.x, origin.x + advance as i32);
            assert_eq!(pb.y, origin.y);

            assert_eq!(c, "and the second");
            // Second line starts back at the box's left edge
            assert_eq!(pc.x, origin.x);
            assert_eq!(pc.y, origin.y + fit.line_height as i32);
        }
        other => panic!("unexpected placements: {other:?}"),
    }
}

#[test]
fn run_contents_round_trip_to_source_text() {
    let text = "line one\n\nbold *middle*\nlast";
    let spans = vec![Span::Styled {
        kind: SpanKind::Bold,
        offset: 10,
        length: 13,
    }];
    let runs = runs_from_spans(text, &spans, &colors()).unwrap();

    let mut rebuilt = String::new();
    for run in &runs {
        match run {
            Run::Text(t) => rebuilt.push_str(&t.content),
            Run::LineBreak { .. } => rebuilt.push('\n'),
            Run::Emoji { .. } => {}
        }
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn fit_policies_are_asymmetric() {
    let m = FixedMeasure;
    let catalog = EmojiCatalog::empty();
    let tiny = Size::new(2, 2);

    // Single-line mode fails hard
    let err = fit_single_line(&m, FontSlot::Bold, "unfittable title", 128, tiny).unwrap_err();
    assert!(matches!(err, Error::NoFittingSize { .. }));

    // Multi-run mode degrades to the unit fallback
    let runs = runs_from_spans("unfittable body", &[], &colors()).unwrap();
    let fit = fit_runs(&m, &catalog, &runs, 1.3, 128, tiny);
    assert_eq!((fit.font_size, fit.line_height), (1, 1));
    assert_eq!(fit.extent, Size::new(1, 1));
}

#[test]
fn fit_search_returns_largest_fitting_size() {
    let m = FixedMeasure;
    let target = Size::new(1000, 40);
    let fit = fit_single_line(&m, FontSlot::Bold, "abcdef", 128, target).unwrap();

    // The accepted size fits...
    let accepted = m.measure(FontSlot::Bold, fit.font_size as f32, "abcdef");
    assert!(accepted.width < target.width && accepted.height < target.height);

    // ...and the next size up does not
    let next = m.measure(FontSlot::Bold, (fit.font_size + 1) as f32, "abcdef");
    assert!(next.width >= target.width || next.height >= target.height);
}

#[test]
fn catalog_tokenizes_longest_sequence_first() {
    let dir = tempfile::tempdir().unwrap();
    // Bare heart and heart-on-fire (ZWJ sequence) side by side
    std::fs::write(dir.path().join("U+2764.png"), b"stub").unwrap();
    std::fs::write(
        dir.path().join("U+2764 U+FE0F U+200D U+1F525.png"),
        b"stub",
    )
    .unwrap();

    let catalog = EmojiCatalog::load(dir.path()).unwrap();
    let heart_on_fire = "\u{2764}\u{FE0F}\u{200D}\u{1F525}";

    let chunks = catalog.tokenize(heart_on_fire);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_emoji());
    assert_eq!(chunks[0].content(), heart_on_fire);

    // Embedded in text, both sequences resolve independently
    let mixed = format!("a\u{2764}b{heart_on_fire}");
    let kinds: Vec<bool> = catalog.tokenize(&mixed).iter().map(|c| c.is_emoji()).collect();
    assert_eq!(kinds, vec![false, true, false, true]);
}

#[test]
fn walker_reserves_line_height_for_standalone_emoji() {
    let m = FixedMeasure;
    let catalog = EmojiCatalog::empty();
    let image = std::rc::Rc::new(image::RgbaImage::new(8, 8));
    let text = "x\u{1F602}y";
    let spans = vec![Span::Emoji {
        offset: 1,
        length: 1,
        image,
    }];

    let runs = runs_from_spans(text, &spans, &colors()).unwrap();
    let line_height = 26u32;
    let placements = layout_runs(&m, &catalog, &runs, Point::new(0, 0), 10, line_height, 1.3);
    assert_eq!(placements.len(), 3);

    let emoji_size = (line_height as f32 / 1.3).floor() as u32;
    match (&placements[0], &placements[1], &placements[2]) {
        (
            Placement::Text { position: p0, .. },
            Placement::Emoji { position: p1, size, .. },
            Placement::Text { position: p2, .. },
        ) => {
            assert_eq!(*p0, Point::new(0, 0));
            // "x" advances 5px at size 10
            assert_eq!(*p1, Point::new(5, 0));
            assert_eq!(*size, emoji_size);
            // Cursor advances by the full line height, not the glyph size
            assert_eq!(*p2, Point::new(5 + line_height as i32, 0));
        }
        other => panic!("unexpected placements: {other:?}"),
    }
}
