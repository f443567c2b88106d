//! Software compositing primitives
//!
//! Full-canvas transparent layers, alpha-blended pastes, glyph and emoji
//! blitting, rectangle and gradient fills, and PNG encoding of the final
//! canvas. All drawing is CPU-side over `image::RgbaImage` buffers.

pub mod debug;
pub mod mask;

use image::{imageops, Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::font::{FontSet, FontSlot};
use crate::geometry::{Point, SizeBox};
use crate::layout::Placement;

pub use mask::AvatarShape;

/// Direction of a two-color gradient fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    LeftRight,
    TopBottom,
    /// Top-left towards bottom-right
    DiagDown,
    /// Top-right towards bottom-left
    DiagUp,
}

/// New fully transparent layer matching the canvas size
pub fn new_layer(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}

/// Source-over blend of one pixel
#[inline]
fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    let da = dst[3] as u32;
    dst[0] = ((src[0] as u32 * sa + dst[0] as u32 * inv) / 255) as u8;
    dst[1] = ((src[1] as u32 * sa + dst[1] as u32 * inv) / 255) as u8;
    dst[2] = ((src[2] as u32 * sa + dst[2] as u32 * inv) / 255) as u8;
    dst[3] = (sa + da * inv / 255) as u8;
}

/// Alpha-composite a full-canvas layer onto the base image.
/// Both buffers must have identical dimensions.
pub fn paste_layer(base: &mut RgbaImage, layer: &RgbaImage) {
    debug_assert_eq!(base.dimensions(), layer.dimensions());
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        blend_pixel(dst, *src);
    }
}

/// Alpha-composite `src` onto `dst` with its top-left corner at (x, y).
/// Pixels falling outside `dst` are clipped.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, &px) in src.enumerate_pixels() {
        let tx = x + sx as i32;
        let ty = y + sy as i32;
        if tx < 0 || ty < 0 || tx >= dw as i32 || ty >= dh as i32 {
            continue;
        }
        blend_pixel(dst.get_pixel_mut(tx as u32, ty as u32), px);
    }
}

/// Rasterize a string top-left-anchored at `pos` with the slot's font.
pub fn draw_text(
    layer: &mut RgbaImage,
    fonts: &FontSet,
    slot: FontSlot,
    size: f32,
    text: &str,
    color: Rgba<u8>,
    pos: Point,
) {
    let font = fonts.font(slot);
    let baseline = pos.y as f32 + fonts.ascent(slot, size);
    let (width, height) = layer.dimensions();
    let mut cursor = pos.x as f32;

    for c in text.chars() {
        let (metrics, coverage) = font.rasterize(c, size);
        let gx = (cursor + metrics.xmin as f32).round() as i32;
        let gy = (baseline - (metrics.ymin + metrics.height as i32) as f32).round() as i32;

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let cov = coverage[row * metrics.width + col];
                if cov == 0 {
                    continue;
                }
                let tx = gx + col as i32;
                let ty = gy + row as i32;
                if tx < 0 || ty < 0 || tx >= width as i32 || ty >= height as i32 {
                    continue;
                }
                let alpha = (cov as u32 * color[3] as u32 / 255) as u8;
                blend_pixel(
                    layer.get_pixel_mut(tx as u32, ty as u32),
                    Rgba([color[0], color[1], color[2], alpha]),
                );
            }
        }
        cursor += metrics.advance_width;
    }
}

/// Draw every placement produced by the layout walker onto the layer.
/// Emoji glyphs are resized with Lanczos3 to their square placement size.
pub fn draw_placements(layer: &mut RgbaImage, fonts: &FontSet, size: f32, placements: &[Placement]) {
    for placement in placements {
        match placement {
            Placement::Text {
                content,
                font,
                color,
                position,
            } => draw_text(layer, fonts, *font, size, content, *color, *position),
            Placement::Emoji {
                image,
                position,
                size,
            } => {
                let glyph =
                    imageops::resize(image.as_ref(), *size, *size, imageops::FilterType::Lanczos3);
                blit(layer, &glyph, position.x, position.y);
            }
        }
    }
}

/// Fill a box with a solid color (replaces pixels, no blending)
pub fn fill_rect(layer: &mut RgbaImage, rect: SizeBox, color: Rgba<u8>) {
    let (w, h) = layer.dimensions();
    let (x0, y0, x1, y1) = rect.corners();
    for y in y0..y1.min(h) {
        for x in x0..x1.min(w) {
            layer.put_pixel(x, y, color);
        }
    }
}

/// One-pixel rectangle outline in corner-pair form
pub fn draw_rect_outline(layer: &mut RgbaImage, rect: SizeBox, color: Rgba<u8>) {
    let (w, h) = layer.dimensions();
    let (x0, y0, x1, y1) = rect.corners();
    if x0 >= w || y0 >= h {
        return;
    }
    let x1 = x1.min(w.saturating_sub(1));
    let y1 = y1.min(h.saturating_sub(1));
    for x in x0..=x1 {
        blend_pixel(layer.get_pixel_mut(x, y0), color);
        blend_pixel(layer.get_pixel_mut(x, y1), color);
    }
    for y in y0..=y1 {
        blend_pixel(layer.get_pixel_mut(x0, y), color);
        blend_pixel(layer.get_pixel_mut(x1, y), color);
    }
}

/// Two-color linear gradient over a box, per-pixel blend
pub fn draw_gradient(
    layer: &mut RgbaImage,
    rect: SizeBox,
    from: Rgba<u8>,
    to: Rgba<u8>,
    direction: GradientDirection,
) {
    let (w, h) = layer.dimensions();
    let (x0, y0, x1, y1) = rect.corners();
    let rw = rect.width.max(1) as f32;
    let rh = rect.height.max(1) as f32;

    for y in y0..y1.min(h) {
        for x in x0..x1.min(w) {
            let fx = (x - x0) as f32;
            let fy = (y - y0) as f32;
            let t = match direction {
                GradientDirection::LeftRight => fx / rw,
                GradientDirection::TopBottom => fy / rh,
                GradientDirection::DiagDown => (fx + fy) / (rw + rh),
                GradientDirection::DiagUp => (rw - fx + fy) / (rw + rh),
            };
            layer.put_pixel(x, y, blend_colors(from, to, t));
        }
    }
}

/// Linear interpolation of two RGBA colors
fn blend_colors(from: Rgba<u8>, to: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (from[i] as f32 + (to[i] as f32 - from[i] as f32) * t) as u8;
    }
    Rgba(out)
}

/// Encode the canvas as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(Error::Encode)?;
        writer
            .write_image_data(image.as_raw())
            .map_err(Error::Encode)?;
    }
    Ok(out)
}

/// Decode avatar bytes, resize to the target box and apply the mask shape.
pub fn shape_avatar(bytes: &[u8], rect: SizeBox, shape: AvatarShape) -> Result<RgbaImage> {
    let decoded = image::load_from_memory(bytes).map_err(Error::Avatar)?;
    let mut resized = imageops::resize(
        &decoded.to_rgba8(),
        rect.width,
        rect.height,
        imageops::FilterType::Lanczos3,
    );
    mask::apply_mask(&mut resized, shape);
    Ok(resized)
}
