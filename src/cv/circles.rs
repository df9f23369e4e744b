// src/cv/circles.rs

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{ImageBuffer, Rect};

/// Search parameters for the gradient-scored circle search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleOptions {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Minimum distance between two accepted centers.
    pub min_dist: f64,
    /// Stride between candidate centers, in pixels.
    pub center_step: u32,
    /// Angular spacing of perimeter samples, in degrees.
    pub angle_step_deg: u32,
    /// Gradient magnitude above which a sample counts as an edge hit.
    pub edge_gradient: f64,
    /// A candidate needs strictly more edge hits than this.
    pub min_edge_hits: u32,
    /// A candidate needs a strictly larger summed gradient than this.
    pub min_score: f64,
    /// Only this many of the best scoring circles are kept.
    pub max_circles: usize,
}

impl Default for CircleOptions {
    fn default() -> Self {
        CircleOptions {
            min_radius: 4,
            max_radius: 12,
            min_dist: 12.0,
            center_step: 2,
            angle_step_deg: 10,
            edge_gradient: 30.0,
            min_edge_hits: 15,
            min_score: 800.0,
            max_circles: 20,
        }
    }
}

/// A detected bubble, center in the coordinates of the searched buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub r: u32,
    /// Summed gradient magnitude of the edge hits on the perimeter.
    pub score: f64,
}

impl Circle {
    pub fn diameter(&self) -> f64 {
        2.0 * self.r as f64
    }

    pub fn distance_to(&self, other: &Circle) -> f64 {
        center_distance(self.x, self.y, other.x, other.y)
    }
}

fn center_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> f64 {
    let dx = (x1 - x2) as f64;
    let dy = (y1 - y2) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Rounds half-way cases towards positive infinity.
#[inline]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Forward-difference gradient magnitude at `(x, y)`.
/// The difference along an axis is 0 on the last column/row.
#[inline]
fn gradient_at(src: &ImageBuffer, x: usize, y: usize) -> f64 {
    let width = src.width as usize;
    let height = src.height as usize;
    let center = src.luma(x, y) as f64;
    let dx = if x + 1 < width {
        src.luma(x + 1, y) as f64 - center
    } else {
        0.0
    };
    let dy = if y + 1 < height {
        src.luma(x, y + 1) as f64 - center
    } else {
        0.0
    };
    (dx * dx + dy * dy).sqrt()
}

/// Unit offsets of the perimeter samples, starting at 0 degrees.
fn unit_circle(angle_step_deg: u32) -> Vec<(f64, f64)> {
    (0..360)
        .step_by(angle_step_deg.max(1) as usize)
        .map(|angle| {
            let rad = (angle as f64 * PI) / 180.0;
            (rad.cos(), rad.sin())
        })
        .collect()
}

/// Samples the perimeter of one candidate.
///
/// # Returns
/// `(edge_hits, score)` where score sums the gradients of the hits only.
fn score_candidate(
    src: &ImageBuffer,
    cx: i64,
    cy: i64,
    r: u32,
    unit_circle: &[(f64, f64)],
    edge_gradient: f64,
) -> (u32, f64) {
    let width = src.width as i64;
    let height = src.height as i64;
    let radius = r as f64;
    let mut edge_hits = 0;
    let mut score = 0.0;

    for &(cos, sin) in unit_circle {
        let x = round_half_up(cx as f64 + radius * cos);
        let y = round_half_up(cy as f64 + radius * sin);
        if x < 0 || y < 0 || x >= width || y >= height {
            continue;
        }

        let gradient = gradient_at(src, x as usize, y as usize);
        if gradient > edge_gradient {
            score += gradient;
            edge_hits += 1;
        }
    }

    (edge_hits, score)
}

/// Coarse Hough-style search for circular marks.
///
/// Scan order is fixed: radius ascending, then center row, then column,
/// each on a `center_step` stride with centers kept `r` pixels inside `roi`.
/// A candidate is accepted when it clears both edge thresholds and lies at
/// least `min_dist` from every circle accepted before it, so earlier (and
/// smaller) candidates win. Survivors are sorted by descending score (ties
/// keep scan order) and truncated to `max_circles`.
///
/// # Arguments
/// * `src` - Blurred luma `ImageBuffer`.
/// * `roi` - Search window in `src` coordinates.
/// * `options` - Radius band, thresholds and suppression distance.
pub fn detect_circles(src: &ImageBuffer, roi: &Rect, options: &CircleOptions) -> Vec<Circle> {
    let center_step = options.center_step.max(1) as usize;
    let unit_circle = unit_circle(options.angle_step_deg);

    let roi_x = roi.x as i64;
    let roi_y = roi.y as i64;
    let roi_right = roi_x + roi.width as i64;
    let roi_bottom = roi_y + roi.height as i64;
    let mut circles: Vec<Circle> = Vec::new();

    for r in options.min_radius..=options.max_radius {
        let reach = r as i64;
        for cy in ((roi_y + reach)..(roi_bottom - reach)).step_by(center_step) {
            for cx in ((roi_x + reach)..(roi_right - reach)).step_by(center_step) {
                let (edge_hits, score) =
                    score_candidate(src, cx, cy, r, &unit_circle, options.edge_gradient);
                if edge_hits <= options.min_edge_hits || score <= options.min_score {
                    continue;
                }

                let (x, y) = (cx as i32, cy as i32);
                let too_close = circles
                    .iter()
                    .any(|c| center_distance(x, y, c.x, c.y) < options.min_dist);
                if !too_close {
                    circles.push(Circle { x, y, r, score });
                }
            }
        }
    }

    log::debug!("{} circles passed suppression", circles.len());

    circles.sort_by(|a, b| b.score.total_cmp(&a.score));
    circles.truncate(options.max_circles);
    circles
}
