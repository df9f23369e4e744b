// src/cv/regions.rs

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{ImageBuffer, Point2i, Rect};

/// Luma above which a binary pixel counts as foreground.
pub const FOREGROUND_LEVEL: u8 = 128;

/// Constant offsets for 8-directional sweeping (x, y).
pub const NEIGHBORHOOD: [[i32; 2]; 8] = [
    [1, 0],
    [1, -1],
    [0, -1],
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, 1],
    [1, 1],
];

/// Filtering policy for connected components.
///
/// Area ratios are fractions of the full image area `width * height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Components with this many member pixels or fewer are noise.
    pub min_component_pixels: usize,
    /// Lower bound for a regular document frame.
    pub min_area_general_ratio: f64,
    /// Upper bound for any frame; larger boxes are the page itself.
    pub max_area_ratio: f64,
    /// Lower bound for small header marks.
    pub min_area_smallbox_ratio: f64,
    /// Small boxes are only kept when their top edge is above this fraction of the height.
    pub header_band_ratio: f64,
}

impl Default for RegionOptions {
    fn default() -> Self {
        RegionOptions {
            min_component_pixels: 50,
            min_area_general_ratio: 0.015,
            max_area_ratio: 0.95,
            min_area_smallbox_ratio: 0.001,
            header_band_ratio: 0.25,
        }
    }
}

impl RegionOptions {
    /// Resolves the ratios into absolute limits for an image of the given size.
    pub fn thresholds(&self, width: u32, height: u32) -> AreaThresholds {
        let image_area = width as f64 * height as f64;
        AreaThresholds {
            min_area_general: self.min_area_general_ratio * image_area,
            max_area: self.max_area_ratio * image_area,
            min_area_smallbox: self.min_area_smallbox_ratio * image_area,
            header_limit: self.header_band_ratio * height as f64,
        }
    }
}

/// Absolute area limits for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaThresholds {
    pub min_area_general: f64,
    pub max_area: f64,
    pub min_area_smallbox: f64,
    pub header_limit: f64,
}

impl AreaThresholds {
    /// Whether a bounding box qualifies as a frame.
    pub fn accepts(&self, region: &Region) -> bool {
        let area = region.area as f64;
        if area >= self.min_area_general && area <= self.max_area {
            return true;
        }
        area >= self.min_area_smallbox
            && area < self.min_area_general
            && (region.y as f64) < self.header_limit
    }
}

/// Bounding box of a connected foreground component.
///
/// `width` and `height` are `max - min` of the member coordinates and
/// `area` is always `width * height` of the box, not the pixel count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: u64,
    /// Member pixels, only populated by extraction.
    #[serde(skip)]
    pub points: Vec<Point2i>,
}

impl Region {
    /// Box without member pixels, as produced by manual editing.
    pub fn from_rect(rect: Rect) -> Self {
        Region {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            area: rect.area(),
            points: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Replaces the box geometry, keeping `area` consistent.
    pub fn set_bounds(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self.area = width as u64 * height as u64;
    }

    /// Top-left, top-right, bottom-left and bottom-right corners.
    pub fn corners(&self) -> [Point2i; 4] {
        let left = self.x as i32;
        let top = self.y as i32;
        let right = left + self.width as i32;
        let bottom = top + self.height as i32;
        [
            Point2i::new(left, top),
            Point2i::new(right, top),
            Point2i::new(left, bottom),
            Point2i::new(right, bottom),
        ]
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && x <= (self.x + self.width) as f64
            && y >= self.y as f64
            && y <= (self.y + self.height) as f64
    }
}

/// Per-call record of pixels already claimed by a component.
pub struct VisitedMask {
    visited: Vec<bool>,
    width: usize,
}

impl VisitedMask {
    pub fn new(width: u32, height: u32) -> Self {
        VisitedMask {
            visited: vec![false; width as usize * height as usize],
            width: width as usize,
        }
    }

    #[inline]
    pub fn is_visited(&self, x: usize, y: usize) -> bool {
        self.visited[y * self.width + x]
    }

    /// Marks `(x, y)`; returns false if it was already marked.
    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) -> bool {
        let slot = &mut self.visited[y * self.width + x];
        if *slot {
            return false;
        }
        *slot = true;
        true
    }
}

#[inline]
fn is_foreground(src: &ImageBuffer, x: usize, y: usize) -> bool {
    src.luma(x, y) > FOREGROUND_LEVEL
}

/// Breadth-first 8-connected fill from `(start_x, start_y)`.
///
/// Pixels are marked when queued, so each pixel enters `queue` at most once
/// and the queue never grows past the image size.
///
/// # Arguments
/// * `src` - Binary image, foreground is luma above [`FOREGROUND_LEVEL`].
/// * `visited` - Mask shared across all fills of one extraction.
/// * `queue` - Scratch queue, empty on entry and on return.
/// * `start_x`, `start_y` - An unvisited foreground seed.
///
/// # Returns
/// The component's bounding box with all member pixels.
pub fn flood_fill(
    src: &ImageBuffer,
    visited: &mut VisitedMask,
    queue: &mut VecDeque<(usize, usize)>,
    start_x: usize,
    start_y: usize,
) -> Region {
    let width = src.width as i32;
    let height = src.height as i32;
    let mut points = Vec::new();
    let (mut min_x, mut max_x) = (start_x, start_x);
    let (mut min_y, mut max_y) = (start_y, start_y);

    visited.mark(start_x, start_y);
    queue.push_back((start_x, start_y));

    while let Some((x, y)) = queue.pop_front() {
        points.push(Point2i::new(x as i32, y as i32));
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);

        for [dx, dy] in NEIGHBORHOOD {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width || ny >= height {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !visited.is_visited(nx, ny) && is_foreground(src, nx, ny) {
                visited.mark(nx, ny);
                queue.push_back((nx, ny));
            }
        }
    }

    let box_width = (max_x - min_x) as u32;
    let box_height = (max_y - min_y) as u32;
    Region {
        x: min_x as u32,
        y: min_y as u32,
        width: box_width,
        height: box_height,
        area: box_width as u64 * box_height as u64,
        points,
    }
}

/// Extracts candidate document frames from an inverted binary image.
///
/// Raster-scans for unvisited foreground seeds, grows each into an
/// 8-connected component, drops noise components and boxes outside the
/// area policy, then sorts by box area, largest first (stable for ties).
///
/// # Arguments
/// * `src` - The inverted binary `ImageBuffer`.
/// * `options` - Noise and area filtering policy.
pub fn find_regions(src: &ImageBuffer, options: &RegionOptions) -> Vec<Region> {
    let width = src.width as usize;
    let height = src.height as usize;
    let thresholds = options.thresholds(src.width, src.height);
    let mut visited = VisitedMask::new(src.width, src.height);
    let mut queue = VecDeque::new();
    let mut regions = Vec::new();
    let mut components = 0usize;

    for y in 0..height {
        for x in 0..width {
            if visited.is_visited(x, y) || !is_foreground(src, x, y) {
                continue;
            }

            let region = flood_fill(src, &mut visited, &mut queue, x, y);
            if region.points.len() <= options.min_component_pixels {
                continue;
            }
            components += 1;

            if thresholds.accepts(&region) {
                regions.push(region);
            }
        }
    }

    log::debug!(
        "{} components above noise level, {} accepted as regions",
        components,
        regions.len()
    );

    regions.sort_by(|a, b| b.area.cmp(&a.area));
    regions
}
