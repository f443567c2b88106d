//! Span and run model
//!
//! Input spans annotate ranges of the source text with a style or an emoji
//! glyph; the converter turns text + spans into the ordered run sequence the
//! layout engine consumes. Offsets and lengths are in character units.
//!
//! Spans are required to be non-overlapping and in-bounds; out-of-bounds
//! ranges are rejected up front rather than left to slicing panics.

use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::font::FontSlot;

/// Closed set of text style kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Default,
    Bold,
    Italic,
    Underline,
    Code,
    CodeBlock,
    Link,
}

impl SpanKind {
    /// Fixed style -> font table
    pub fn font_slot(self) -> FontSlot {
        match self {
            SpanKind::Bold => FontSlot::Bold,
            SpanKind::Italic | SpanKind::Link => FontSlot::Italic,
            SpanKind::Code | SpanKind::CodeBlock => FontSlot::Mono,
            SpanKind::Underline | SpanKind::Default => FontSlot::Regular,
        }
    }

    /// Fixed style -> color table
    pub fn color(self, colors: &ColorSet) -> Rgba<u8> {
        match self {
            SpanKind::Code | SpanKind::CodeBlock => colors.code,
            SpanKind::Link => colors.link,
            SpanKind::Default | SpanKind::Bold | SpanKind::Italic | SpanKind::Underline => {
                colors.content
            }
        }
    }
}

/// Semantic color roles of a card
#[derive(Debug, Clone, Copy)]
pub struct ColorSet {
    pub title: Rgba<u8>,
    pub content: Rgba<u8>,
    pub link: Rgba<u8>,
    pub code: Rgba<u8>,
    pub author_name: Rgba<u8>,
}

/// Input annotation over a range of the source text
#[derive(Debug, Clone)]
pub enum Span {
    /// Styled text range
    Styled {
        kind: SpanKind,
        offset: usize,
        length: usize,
    },
    /// Pre-resolved emoji glyph occupying a range of the text
    Emoji {
        offset: usize,
        length: usize,
        image: Rc<RgbaImage>,
    },
}

impl Span {
    pub fn offset(&self) -> usize {
        match self {
            Span::Styled { offset, .. } | Span::Emoji { offset, .. } => *offset,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Span::Styled { length, .. } | Span::Emoji { length, .. } => *length,
        }
    }

    fn covers(&self, index: usize) -> bool {
        self.offset() <= index && index < self.offset() + self.length()
    }
}

/// Styled drawable text fragment
#[derive(Debug, Clone)]
pub struct TextRun {
    pub kind: SpanKind,
    pub font: FontSlot,
    pub color: Rgba<u8>,
    pub content: String,
    pub offset: usize,
    pub length: usize,
}

/// Ordered drawable unit derived from spans plus implicit line breaks.
/// Produced only by [`runs_from_spans`]; ordering is the only relationship
/// that matters afterwards.
#[derive(Debug, Clone)]
pub enum Run {
    Text(TextRun),
    Emoji {
        offset: usize,
        length: usize,
        image: Rc<RgbaImage>,
    },
    LineBreak {
        offset: usize,
    },
}

/// Convert raw text plus spans into the ordered run sequence.
///
/// The scan walks the text from offset 0. A span covering the current offset
/// wins (first match in input order; spans may arrive out of offset order).
/// Gaps between spans become Default text runs. Every text run is then split
/// on embedded newlines into per-line runs interleaved with line-break
/// markers.
pub fn runs_from_spans(text: &str, spans: &[Span], colors: &ColorSet) -> Result<Vec<Run>> {
    let chars: Vec<char> = text.chars().collect();

    for span in spans {
        if span.offset() + span.length() > chars.len() {
            return Err(Error::InvalidSpan {
                offset: span.offset(),
                length: span.length(),
                text_len: chars.len(),
            });
        }
    }

    let mut runs = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        match spans.iter().find(|s| s.covers(index)) {
            Some(Span::Styled {
                kind,
                offset,
                length,
            }) => {
                let content: String = chars[*offset..offset + length].iter().collect();
                split_newlines(
                    TextRun {
                        kind: *kind,
                        font: kind.font_slot(),
                        color: kind.color(colors),
                        length: content.chars().count(),
                        content,
                        offset: *offset,
                    },
                    &mut runs,
                );
                index += length;
            }
            Some(Span::Emoji {
                offset,
                length,
                image,
            }) => {
                runs.push(Run::Emoji {
                    offset: *offset,
                    length: *length,
                    image: Rc::clone(image),
                });
                index += length;
            }
            None => {
                let next = spans
                    .iter()
                    .map(Span::offset)
                    .filter(|&o| o > index)
                    .min()
                    .unwrap_or(chars.len());
                let content: String = chars[index..next].iter().collect();
                split_newlines(
                    TextRun {
                        kind: SpanKind::Default,
                        font: SpanKind::Default.font_slot(),
                        color: SpanKind::Default.color(colors),
                        length: content.chars().count(),
                        content,
                        offset: index,
                    },
                    &mut runs,
                );
                index = next;
            }
        }
    }

    Ok(runs)
}

/// Split a text run on embedded newlines.
///
/// Each line becomes its own run; a line-break marker is emitted between
/// lines. Empty lines produce no text run but keep their markers, which
/// preserves blank-line vertical spacing.
fn split_newlines(run: TextRun, out: &mut Vec<Run>) {
    if !run.content.contains('\n') {
        out.push(Run::Text(run));
        return;
    }

    let lines: Vec<&str> = run.content.split('\n').collect();
    let mut offset = run.offset;
    for (i, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            let length = line.chars().count();
            out.push(Run::Text(TextRun {
                kind: run.kind,
                font: run.font,
                color: run.color,
                content: (*line).to_string(),
                offset,
                length,
            }));
            offset += length;
        }
        if i != lines.len() - 1 {
            out.push(Run::LineBreak { offset });
            offset += 1;
        }
    }
}
