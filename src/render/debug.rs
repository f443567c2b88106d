//! Debug overlay drawing
//!
//! Optional decorator around the compositing pipeline: grid cross-hairs,
//! region outlines and layout anchors. Peripheral tooling, never part of the
//! rendered card unless debug mode is on.

use image::{Rgba, RgbaImage};

use crate::constants::{DEBUG_DASH_LEN, DEBUG_DASH_RATIO, DEBUG_GRID_STEP};
use crate::geometry::{Grid, Point, SizeBox};
use crate::render::draw_rect_outline;

/// Draw a dashed line between two points by stepping along the segment.
pub fn draw_line_dashed(
    layer: &mut RgbaImage,
    from: Point,
    to: Point,
    dash_len: f32,
    ratio: f32,
    color: Rgba<u8>,
) {
    let dx = (to.x - from.x) as f32;
    let dy = (to.y - from.y) as f32;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let step = dash_len * ratio;
    let (w, h) = layer.dimensions();

    let mut a0 = 0.0f32;
    while a0 < len {
        let a1 = (a0 + dash_len).min(len);
        let mut t = a0;
        while t <= a1 {
            let x = (from.x as f32 + ux * t).round() as i32;
            let y = (from.y as f32 + uy * t).round() as i32;
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                layer.put_pixel(x as u32, y as u32, color);
            }
            t += 1.0;
        }
        a0 += step;
    }
}

/// Cross-hair marker centered on a layout anchor
pub fn draw_anchor(layer: &mut RgbaImage, pos: Point, arm: i32, color: Rgba<u8>) {
    draw_line_dashed(
        layer,
        Point::new(pos.x - arm, pos.y),
        Point::new(pos.x + arm, pos.y),
        DEBUG_DASH_LEN,
        DEBUG_DASH_RATIO,
        color,
    );
    draw_line_dashed(
        layer,
        Point::new(pos.x, pos.y - arm),
        Point::new(pos.x, pos.y + arm),
        DEBUG_DASH_LEN,
        DEBUG_DASH_RATIO,
        color,
    );
}

/// Outline one region box
pub fn draw_box_outline(layer: &mut RgbaImage, rect: SizeBox, color: Rgba<u8>) {
    draw_rect_outline(layer, rect, color);
}

/// Full overlay: grid cross-hairs every [`DEBUG_GRID_STEP`] pixels plus the
/// outline of every region of the card grid.
pub fn draw_overlay(base: &mut RgbaImage, grid: &Grid) {
    let (w, h) = base.dimensions();
    let grid_color = Rgba([0, 255, 0, 60]);

    let mut x = 0;
    while x <= w {
        draw_line_dashed(
            base,
            Point::new(x as i32, 0),
            Point::new(x as i32, h as i32),
            DEBUG_DASH_LEN,
            DEBUG_DASH_RATIO,
            grid_color,
        );
        x += DEBUG_GRID_STEP;
    }
    let mut y = 0;
    while y <= h {
        draw_line_dashed(
            base,
            Point::new(0, y as i32),
            Point::new(w as i32, y as i32),
            DEBUG_DASH_LEN,
            DEBUG_DASH_RATIO,
            grid_color,
        );
        y += DEBUG_GRID_STEP;
    }

    draw_box_outline(base, grid.title, Rgba([0, 0, 255, 180]));
    draw_box_outline(base, grid.diviner, Rgba([0, 0, 255, 180]));
    draw_box_outline(base, grid.content, Rgba([255, 255, 0, 180]));
    draw_box_outline(base, grid.author_image, Rgba([255, 0, 255, 180]));
    draw_box_outline(base, grid.author_name, Rgba([0, 255, 255, 180]));
}
