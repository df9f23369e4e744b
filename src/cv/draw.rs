// src/cv/draw.rs

use crate::cv::circles::Circle;
use crate::{PixelBuffer, CHANNELS};

/// Outline color of a detected bubble.
pub const CIRCLE_COLOR: [u8; 4] = [255, 0, 0, 255];
/// Fill color of the center marker.
pub const CENTER_COLOR: [u8; 4] = [0, 0, 255, 255];
pub const CIRCLE_LINE_WIDTH: f64 = 2.0;
pub const CENTER_RADIUS: f64 = 2.0;

#[inline]
fn put_pixel(image: &mut PixelBuffer, x: i64, y: i64, color: [u8; 4]) {
    if x >= 0 && x < image.width as i64 && y >= 0 && y < image.height as i64 {
        let i = (y as usize * image.width as usize + x as usize) * CHANNELS;
        image.data[i..i + CHANNELS].copy_from_slice(&color);
    }
}

/// Paints every pixel whose distance to `(cx, cy)` lies in `[inner, outer]`.
fn paint_annulus(image: &mut PixelBuffer, cx: f64, cy: f64, inner: f64, outer: f64, color: [u8; 4]) {
    let reach = outer.ceil() as i64;
    let x0 = cx.floor() as i64;
    let y0 = cy.floor() as i64;

    for y in (y0 - reach)..=(y0 + reach + 1) {
        for x in (x0 - reach)..=(x0 + reach + 1) {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d >= inner && d <= outer {
                put_pixel(image, x, y, color);
            }
        }
    }
}

/// Strokes a circle outline of `line_width` centred on radius `r`.
pub fn stroke_circle(image: &mut PixelBuffer, cx: f64, cy: f64, r: f64, line_width: f64, color: [u8; 4]) {
    let half = line_width / 2.0;
    paint_annulus(image, cx, cy, (r - half).max(0.0), r + half, color);
}

/// Fills a disc of radius `r`.
pub fn fill_circle(image: &mut PixelBuffer, cx: f64, cy: f64, r: f64, color: [u8; 4]) {
    paint_annulus(image, cx, cy, 0.0, r, color);
}

/// Overlays each circle (red outline, blue center dot) onto `image`.
///
/// `origin` is the top-left corner of the buffer the circles were detected
/// in, so region-local centers land on the right image pixels.
pub fn annotate_circles(mut image: PixelBuffer, origin: (u32, u32), circles: &[Circle]) -> PixelBuffer {
    for circle in circles {
        let cx = origin.0 as f64 + circle.x as f64;
        let cy = origin.1 as f64 + circle.y as f64;
        stroke_circle(
            &mut image,
            cx,
            cy,
            circle.r as f64,
            CIRCLE_LINE_WIDTH,
            CIRCLE_COLOR,
        );
        fill_circle(&mut image, cx, cy, CENTER_RADIUS, CENTER_COLOR);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &PixelBuffer, x: usize, y: usize) -> [u8; 4] {
        let i = (y * image.width as usize + x) * CHANNELS;
        [image.data[i], image.data[i + 1], image.data[i + 2], image.data[i + 3]]
    }

    #[test]
    fn test_annotate_draws_outline_and_center() {
        let src = PixelBuffer::new(vec![255u8; 40 * 40 * 4], 40, 40).unwrap();
        let circles = [Circle {
            x: 10,
            y: 12,
            r: 6,
            score: 1000.0,
        }];

        let annotated = annotate_circles(src, (5, 3), &circles);

        // Global center (15, 15)
        assert_eq!(pixel(&annotated, 15, 15), CENTER_COLOR);
        assert_eq!(pixel(&annotated, 16, 16), CENTER_COLOR);
        assert_eq!(pixel(&annotated, 21, 15), CIRCLE_COLOR);
        assert_eq!(pixel(&annotated, 15, 9), CIRCLE_COLOR);
        // Between marker and outline stays untouched
        assert_eq!(pixel(&annotated, 18, 15), [255, 255, 255, 255]);
        assert_eq!(pixel(&annotated, 0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_drawing_clips_at_borders() {
        let mut image = PixelBuffer::zeroed(8, 8);
        stroke_circle(&mut image, 0.0, 0.0, 5.0, 2.0, CIRCLE_COLOR);
        fill_circle(&mut image, 7.0, 7.0, 2.0, CENTER_COLOR);

        assert_eq!(pixel(&image, 5, 0), CIRCLE_COLOR);
        assert_eq!(pixel(&image, 7, 7), CENTER_COLOR);
        assert_eq!(pixel(&image, 2, 2), [0, 0, 0, 0]);
    }
}
