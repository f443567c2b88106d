//! Quote card generation
//!
//! Owns the fixed grid, font/color resources and the emoji catalog, and
//! composites the five region layers in their fixed order:
//! title -> diviner -> content -> author image -> author name. Later layers
//! sit on top where boxes overlap. Each layer is a full-canvas transparent
//! buffer alpha-pasted onto the accumulating base image.

use image::{imageops, Rgba, RgbaImage};
use log::{debug, info};

use crate::constants::{DEFAULT_EMOJI_SCALE, DEFAULT_MAX_FONT_SIZE};
use crate::emoji::EmojiCatalog;
use crate::entity::{runs_from_spans, ColorSet, Run, Span, SpanKind, TextRun};
use crate::error::{Error, Result};
use crate::font::{FontSet, FontSlot};
use crate::geometry::{Grid, Point, Size, SizeBox};
use crate::layout::{fit_runs, fit_single_line, layout_runs, SingleLineFit};
use crate::render::{self, AvatarShape, GradientDirection};

/// Base canvas fill applied before any region layer
#[derive(Debug, Clone)]
pub enum Background {
    Solid(Rgba<u8>),
    Gradient {
        from: Rgba<u8>,
        to: Rgba<u8>,
        direction: GradientDirection,
    },
    /// Encoded image, resized to the canvas
    Image(Vec<u8>),
}

/// Tuning knobs of a generator instance
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub avatar_shape: AvatarShape,
    /// Emoji glyph size multiplier relative to line height
    pub emoji_scale: f32,
    /// Upper bound of the font size search
    pub max_font_size: u32,
    /// Optional fill behind the author row
    pub diviner_fill: Option<Rgba<u8>>,
    /// Draw the region/grid overlay on top of the card
    pub debug: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            avatar_shape: AvatarShape::Circle,
            emoji_scale: DEFAULT_EMOJI_SCALE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            diviner_fill: None,
            debug: false,
        }
    }
}

/// Quote card generator.
///
/// All resources are immutable after construction; one `generate` call is a
/// strictly ordered sequence of measurement and drawing steps with no shared
/// mutable state beyond the canvas it owns.
pub struct QuoteGenerator {
    fonts: FontSet,
    colors: ColorSet,
    grid: Grid,
    catalog: EmojiCatalog,
    base: RgbaImage,
    options: GeneratorOptions,
}

impl QuoteGenerator {
    pub fn new(
        fonts: FontSet,
        colors: ColorSet,
        grid: Grid,
        catalog: EmojiCatalog,
        canvas: Size,
        background: &Background,
        options: GeneratorOptions,
    ) -> Result<Self> {
        let base = build_base(canvas, background)?;
        Ok(Self {
            fonts,
            colors,
            grid,
            catalog,
            base,
            options,
        })
    }

    /// Render a quote card and return it as PNG-encoded bytes.
    ///
    /// Fatal layout errors (unfittable title or author name, invalid spans,
    /// undecodable avatar) abort the call with no partial image. Body text
    /// that cannot fit its box degrades to minimum size instead of failing.
    pub fn generate(
        &self,
        title: &str,
        text: &str,
        author_name: &str,
        avatar: &[u8],
        spans: &[Span],
    ) -> Result<Vec<u8>> {
        info!(
            "generating card: title {} chars, body {} chars, {} spans",
            title.chars().count(),
            text.chars().count(),
            spans.len()
        );

        let title_layer = self.title_layer(title)?;

        let mut base = self.base.clone();
        render::paste_layer(&mut base, &title_layer);

        let diviner_layer = self.diviner_layer();
        render::paste_layer(&mut base, &diviner_layer);

        let runs = runs_from_spans(text, spans, &self.colors)?;
        let content_layer = self.content_layer(&runs);
        render::paste_layer(&mut base, &content_layer);

        let author_image_layer = self.author_image_layer(avatar)?;
        render::paste_layer(&mut base, &author_image_layer);

        let author_name_layer = self.author_name_layer(author_name)?;
        render::paste_layer(&mut base, &author_name_layer);

        if self.options.debug {
            render::debug::draw_overlay(&mut base, &self.grid);
        }

        render::encode_png(&base)
    }

    /// Title: largest single-line bold fit, centered horizontally,
    /// top-anchored in the title box.
    fn title_layer(&self, title: &str) -> Result<RgbaImage> {
        let mut layer = self.empty_layer();
        let rect = self.grid.title;
        let fit = fit_single_line(
            &self.fonts,
            FontSlot::Bold,
            title,
            self.options.max_font_size,
            rect.size(),
        )?;
        debug!("title fitted at size {}", fit.font_size);

        let position = Point::new(
            rect.x as i32 + (rect.width as i32 / 2 - fit.text_size.width as i32 / 2),
            rect.y as i32,
        );
        self.draw_single_line(&mut layer, title, FontSlot::Bold, self.colors.title, &fit, position);
        Ok(layer)
    }

    /// Decorative band behind the author row; empty unless a fill is
    /// configured. Keeps its slot in the layer order either way.
    fn diviner_layer(&self) -> RgbaImage {
        let mut layer = self.empty_layer();
        if let Some(color) = self.options.diviner_fill {
            render::fill_rect(&mut layer, self.grid.diviner, color);
        }
        layer
    }

    /// Body text: multi-run auto-fit, then a full layout walk from the
    /// content box origin.
    fn content_layer(&self, runs: &[Run]) -> RgbaImage {
        let mut layer = self.empty_layer();
        let rect = self.grid.content;

        let fit = fit_runs(
            &self.fonts,
            &self.catalog,
            runs,
            self.options.emoji_scale,
            self.options.max_font_size,
            rect.size(),
        );
        debug!(
            "content fitted at size {} (line height {})",
            fit.font_size, fit.line_height
        );

        let placements = layout_runs(
            &self.fonts,
            &self.catalog,
            runs,
            rect.origin(),
            fit.font_size,
            fit.line_height,
            self.options.emoji_scale,
        );
        render::draw_placements(&mut layer, &self.fonts, fit.font_size as f32, &placements);
        layer
    }

    /// Avatar: decode, resize to its box, mask, paste.
    fn author_image_layer(&self, avatar: &[u8]) -> Result<RgbaImage> {
        let mut layer = self.empty_layer();
        let rect = self.grid.author_image;
        let shaped = render::shape_avatar(avatar, rect, self.options.avatar_shape)?;
        render::blit(&mut layer, &shaped, rect.x as i32, rect.y as i32);
        Ok(layer)
    }

    /// Author name: largest single-line bold fit, left-anchored at the
    /// box's vertical midline.
    fn author_name_layer(&self, author_name: &str) -> Result<RgbaImage> {
        let mut layer = self.empty_layer();
        let rect = self.grid.author_name;
        let fit = fit_single_line(
            &self.fonts,
            FontSlot::Bold,
            author_name,
            self.options.max_font_size,
            rect.size(),
        )?;
        debug!("author name fitted at size {}", fit.font_size);

        let position = Point::new(rect.x as i32, rect.y as i32 + rect.height as i32 / 2);
        self.draw_single_line(
            &mut layer,
            author_name,
            FontSlot::Bold,
            self.colors.author_name,
            &fit,
            position,
        );
        Ok(layer)
    }

    /// Draw one line of text (emoji-aware) through the layout walker, using
    /// the measured text height as the line pitch.
    fn draw_single_line(
        &self,
        layer: &mut RgbaImage,
        text: &str,
        font: FontSlot,
        color: Rgba<u8>,
        fit: &SingleLineFit,
        position: Point,
    ) {
        let run = Run::Text(TextRun {
            kind: SpanKind::Bold,
            font,
            color,
            content: text.to_string(),
            offset: 0,
            length: text.chars().count(),
        });
        let line_height = fit.text_size.height.max(1);
        let placements = layout_runs(
            &self.fonts,
            &self.catalog,
            std::slice::from_ref(&run),
            position,
            fit.font_size,
            line_height,
            self.options.emoji_scale,
        );
        render::draw_placements(layer, &self.fonts, fit.font_size as f32, &placements);
    }

    fn empty_layer(&self) -> RgbaImage {
        render::new_layer(self.base.width(), self.base.height())
    }
}

fn build_base(canvas: Size, background: &Background) -> Result<RgbaImage> {
    match background {
        Background::Solid(color) => {
            Ok(RgbaImage::from_pixel(canvas.width, canvas.height, *color))
        }
        Background::Gradient {
            from,
            to,
            direction,
        } => {
            let mut base = render::new_layer(canvas.width, canvas.height);
            render::draw_gradient(
                &mut base,
                SizeBox::new(0, 0, canvas.width, canvas.height),
                *from,
                *to,
                *direction,
            );
            Ok(base)
        }
        Background::Image(bytes) => {
            let decoded = image::load_from_memory(bytes).map_err(Error::Background)?;
            Ok(imageops::resize(
                &decoded.to_rgba8(),
                canvas.width,
                canvas.height,
                imageops::FilterType::Lanczos3,
            ))
        }
    }
}
