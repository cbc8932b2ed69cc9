//! Stroke rasterization onto an RGBA buffer.
//!
//! Strokes are painted as round-capped capsules: every pixel whose center
//! lies within `width / 2` of the segment is set to the stroke color.
//! Consecutive segments share endpoints, so joins come out round as well.
//! No anti-aliasing is applied, which keeps frames deterministic.

use image::{Rgba, RgbaImage};

use super::types::Point;

/// Fill the whole raster with one color.
pub fn fill(raster: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in raster.pixels_mut() {
        *pixel = color;
    }
}

/// Paint a round-capped segment from `a` to `b`.
///
/// Pixels outside the raster are clipped. A zero-length segment paints a
/// disc of diameter `width`.
pub fn stroke_segment(raster: &mut RgbaImage, a: Point, b: Point, width: f32, color: Rgba<u8>) {
    let radius = width / 2.0;
    if radius.is_nan() || radius <= 0.0 || raster.width() == 0 || raster.height() == 0 {
        return;
    }

    let min_x = (a.x.min(b.x) - radius).floor().max(0.0);
    let min_y = (a.y.min(b.y) - radius).floor().max(0.0);
    let max_x = (a.x.max(b.x) + radius).ceil().min(raster.width() as f32 - 1.0);
    let max_y = (a.y.max(b.y) + radius).ceil().min(raster.height() as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let radius_sq = radius * radius;
    for py in (min_y as u32)..=(max_y as u32) {
        for px in (min_x as u32)..=(max_x as u32) {
            let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
            if distance_sq_to_segment(center, a, b) <= radius_sq {
                raster.put_pixel(px, py, color);
            }
        }
    }
}

/// Squared distance from `p` to the closest point on segment `a`-`b`.
fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx).powi(2) + (p.y - cy).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::types::{BACKGROUND, INK};

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, BACKGROUND)
    }

    fn ink_count(raster: &RgbaImage) -> usize {
        raster.pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn fill_overwrites_every_pixel() {
        let mut r = blank(4, 3);
        fill(&mut r, INK);
        assert_eq!(ink_count(&r), 12);
    }

    #[test]
    fn horizontal_segment_covers_its_path() {
        let mut r = blank(40, 20);
        stroke_segment(&mut r, Point::new(5.0, 10.0), Point::new(30.0, 10.0), 4.0, INK);
        for x in 5..30 {
            assert_eq!(*r.get_pixel(x, 10), INK, "pixel {x},10 should be inked");
        }
        assert_eq!(*r.get_pixel(20, 2), BACKGROUND);
        assert_eq!(*r.get_pixel(20, 17), BACKGROUND);
    }

    #[test]
    fn caps_are_round() {
        let mut r = blank(40, 40);
        stroke_segment(&mut r, Point::new(20.0, 20.0), Point::new(20.0, 20.0), 10.0, INK);
        // Disc of radius 5 centred on (20, 20): the square's corners stay clear.
        assert_eq!(*r.get_pixel(19, 19), INK);
        assert_eq!(*r.get_pixel(15, 15), BACKGROUND);
        assert_eq!(*r.get_pixel(24, 24), BACKGROUND);
    }

    #[test]
    fn segment_outside_raster_is_clipped() {
        let mut r = blank(10, 10);
        stroke_segment(&mut r, Point::new(-50.0, -50.0), Point::new(-40.0, -40.0), 4.0, INK);
        assert_eq!(ink_count(&r), 0);

        stroke_segment(&mut r, Point::new(-5.0, 5.0), Point::new(15.0, 5.0), 2.0, INK);
        assert!(ink_count(&r) >= 10);
    }

    #[test]
    fn non_positive_width_paints_nothing() {
        let mut r = blank(10, 10);
        stroke_segment(&mut r, Point::new(1.0, 1.0), Point::new(8.0, 8.0), 0.0, INK);
        stroke_segment(&mut r, Point::new(1.0, 1.0), Point::new(8.0, 8.0), f32::NAN, INK);
        stroke_segment(&mut r, Point::new(1.0, 1.0), Point::new(8.0, 8.0), -3.0, INK);
        assert_eq!(ink_count(&r), 0);
    }

    #[test]
    fn distance_projects_onto_segment() {
        let d = distance_sq_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d - 9.0).abs() < 1e-4);
        let beyond = distance_sq_to_segment(Point::new(13.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((beyond - 25.0).abs() < 1e-4);
    }
}
