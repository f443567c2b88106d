//! Avatar mask shaping
//!
//! Anti-aliased circle, rounded-rectangle and square alpha masks applied to
//! the resized avatar image. Shapes are evaluated as signed distance fields
//! and converted to alpha through a smoothstep transition zone.

use image::RgbaImage;

use crate::constants::MASK_AA_WIDTH;

/// Mask shape applied to the author avatar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvatarShape {
    Circle,
    /// Rounded rectangle with the given corner radius in pixels
    Rounded(f32),
    Square,
}

/// Smoothstep interpolation for anti-aliasing.
///
/// Returns smooth transition from 0 to 1 as t goes from 0 to 1.
/// Uses Hermite interpolation: 3t² - 2t³
#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Compute anti-aliased alpha from signed distance.
///
/// * `d >= 0`: 1.0 (fully inside)
/// * `d < -aa_width`: 0.0 (fully outside)
/// * Otherwise: smooth transition using smoothstep
#[inline]
fn aa_alpha_from_distance(d: f32, aa_width: f32) -> f32 {
    if d >= 0.0 {
        1.0
    } else {
        let t = (d / aa_width + 1.0).clamp(0.0, 1.0);
        smoothstep(t)
    }
}

/// Approximate SDF for an ellipse, positive inside.
///
/// Gradient-corrected normalized distance; exact for circles and visually
/// sufficient for the mild eccentricity of avatar boxes.
#[inline]
fn ellipse_sdf(nx: f32, ny: f32, rx: f32, ry: f32, len: f32) -> f32 {
    if len <= 0.001 {
        // Point at center: inside by the smaller radius
        return rx.min(ry);
    }
    let k = (rx * ry) / (rx * ny.abs() + ry * nx.abs()).max(0.001);
    (1.0 - len) * k.min(rx.min(ry))
}

/// SDF for a rounded rectangle centered at the origin, positive inside.
///
/// `hw`/`hh` are half extents, `r` the corner radius.
#[inline]
fn rounded_rect_sdf(px: f32, py: f32, hw: f32, hh: f32, r: f32) -> f32 {
    let qx = px.abs() - (hw - r);
    let qy = py.abs() - (hh - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    -(outside + inside - r)
}

/// Multiply the image's alpha channel by the shape's coverage.
pub fn apply_mask(image: &mut RgbaImage, shape: AvatarShape) {
    if shape == AvatarShape::Square {
        return;
    }

    let (w, h) = image.dimensions();
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let px = x as f32 + 0.5 - cx;
        let py = y as f32 + 0.5 - cy;

        let d = match shape {
            AvatarShape::Circle => {
                let nx = px / cx;
                let ny = py / cy;
                let len = (nx * nx + ny * ny).sqrt();
                ellipse_sdf(nx, ny, cx, cy, len)
            }
            AvatarShape::Rounded(radius) => {
                let r = radius.min(cx).min(cy);
                rounded_rect_sdf(px, py, cx, cy, r)
            }
            AvatarShape::Square => unreachable!(),
        };

        let coverage = aa_alpha_from_distance(d, MASK_AA_WIDTH);
        pixel[3] = (pixel[3] as f32 * coverage).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_smoothstep_boundaries() {
        assert!((smoothstep(0.0) - 0.0).abs() < 1e-6);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-6);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_circle_mask_center_opaque_corner_clear() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        apply_mask(&mut img, AvatarShape::Circle);
        assert_eq!(img.get_pixel(20, 20)[3], 255);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(39, 39)[3], 0);
    }

    #[test]
    fn test_square_mask_is_identity() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 200]));
        apply_mask(&mut img, AvatarShape::Square);
        assert!(img.pixels().all(|p| p[3] == 200));
    }

    #[test]
    fn test_rounded_mask_trims_corners_keeps_edges() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        apply_mask(&mut img, AvatarShape::Rounded(10.0));
        // Corner sits outside the rounded corner arc
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        // Edge midpoints are untouched
        assert_eq!(img.get_pixel(20, 0)[3], 255);
        assert_eq!(img.get_pixel(0, 20)[3], 255);
        assert_eq!(img.get_pixel(20, 20)[3], 255);
    }
}
