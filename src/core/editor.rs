// src/core/editor.rs

use serde::{Deserialize, Serialize};

use crate::cv::regions::Region;
use crate::Rect;

/// Side of the square grab handles drawn on a selected box.
pub const HANDLE_SIZE: f64 = 10.0;
/// Boxes cannot be resized below this width or height.
pub const MIN_REGION_SIZE: i64 = 20;
/// Size of a manually added box.
pub const DEFAULT_REGION_SIZE: (u32, u32) = (120, 80);

/// Grab handle on the corners and edge midpoints of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    W,
    E,
}

impl ResizeHandle {
    /// Hit-test order for overlapping handles.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::W,
        ResizeHandle::E,
    ];

    /// Center of the handle on `rect`.
    pub fn anchor(&self, rect: &Rect) -> (f64, f64) {
        let left = rect.x as f64;
        let top = rect.y as f64;
        let right = left + rect.width as f64;
        let bottom = top + rect.height as f64;
        let mid_x = left + rect.width as f64 / 2.0;
        let mid_y = top + rect.height as f64 / 2.0;
        match self {
            ResizeHandle::Nw => (left, top),
            ResizeHandle::Ne => (right, top),
            ResizeHandle::Sw => (left, bottom),
            ResizeHandle::Se => (right, bottom),
            ResizeHandle::N => (mid_x, top),
            ResizeHandle::S => (mid_x, bottom),
            ResizeHandle::W => (left, mid_y),
            ResizeHandle::E => (right, mid_y),
        }
    }

    fn moves_left(&self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw | ResizeHandle::W)
    }

    fn moves_right(&self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::Se | ResizeHandle::E)
    }

    fn moves_top(&self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne | ResizeHandle::N)
    }

    fn moves_bottom(&self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::Se | ResizeHandle::S)
    }
}

/// Editable copy of the detected frames for an interactive surface.
///
/// The analyzer never reads this back: edits live here until the caller
/// re-runs the analysis, which starts from scratch.
#[derive(Debug, Clone)]
pub struct RegionEditor {
    regions: Vec<Region>,
    original: Vec<Region>,
    canvas_width: u32,
    canvas_height: u32,
    selected: Option<usize>,
}

impl RegionEditor {
    pub fn new(regions: Vec<Region>, canvas_width: u32, canvas_height: u32) -> Self {
        RegionEditor {
            original: regions.clone(),
            regions,
            canvas_width,
            canvas_height,
            selected: None,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.selected.and_then(|i| self.regions.get(i))
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.regions.len());
    }

    /// Selects the topmost (last drawn) box containing the point, or clears
    /// the selection when the point hits nothing.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<usize> {
        self.selected = self.regions.iter().rposition(|r| r.contains(x, y));
        self.selected
    }

    /// Resize handle of the selected box under the point, if any.
    pub fn handle_at(&self, x: f64, y: f64) -> Option<ResizeHandle> {
        let rect = self.selected_region()?.rect();
        let half = HANDLE_SIZE / 2.0;
        ResizeHandle::ALL.into_iter().find(|handle| {
            let (hx, hy) = handle.anchor(&rect);
            x >= hx - half && x <= hx + half && y >= hy - half && y <= hy + half
        })
    }

    /// Moves the selected box so its top-left corner is at `(x, y)`, kept
    /// inside the canvas. Returns false when nothing is selected.
    pub fn move_selected(&mut self, x: i64, y: i64) -> bool {
        let (canvas_w, canvas_h) = (self.canvas_width as i64, self.canvas_height as i64);
        let Some(region) = self.selected.and_then(|i| self.regions.get_mut(i)) else {
            return false;
        };
        let (w, h) = (region.width as i64, region.height as i64);

        let mut new_x = x.max(0);
        let mut new_y = y.max(0);
        if new_x + w > canvas_w {
            new_x = canvas_w - w;
        }
        if new_y + h > canvas_h {
            new_y = canvas_h - h;
        }

        region.set_bounds(
            new_x.max(0) as u32,
            new_y.max(0) as u32,
            region.width,
            region.height,
        );
        true
    }

    /// Drags `handle` of the selected box by `(dx, dy)` relative to `start`,
    /// the box bounds when the drag began.
    ///
    /// Width and height never drop below [`MIN_REGION_SIZE`] (the opposite
    /// edge stays put), then the box is clipped to the canvas.
    pub fn resize_selected(&mut self, handle: ResizeHandle, start: Rect, dx: i64, dy: i64) -> bool {
        let (canvas_w, canvas_h) = (self.canvas_width as i64, self.canvas_height as i64);
        let Some(region) = self.selected.and_then(|i| self.regions.get_mut(i)) else {
            return false;
        };

        let (sx, sy) = (start.x as i64, start.y as i64);
        let (sw, sh) = (start.width as i64, start.height as i64);
        let (mut x, mut y, mut w, mut h) = (sx, sy, sw, sh);

        if handle.moves_left() {
            x = sx + dx;
            w = sw - dx;
        }
        if handle.moves_right() {
            w = sw + dx;
        }
        if handle.moves_top() {
            y = sy + dy;
            h = sh - dy;
        }
        if handle.moves_bottom() {
            h = sh + dy;
        }

        if w < MIN_REGION_SIZE {
            if handle.moves_left() {
                x = sx + sw - MIN_REGION_SIZE;
            }
            w = MIN_REGION_SIZE;
        }
        if h < MIN_REGION_SIZE {
            if handle.moves_top() {
                y = sy + sh - MIN_REGION_SIZE;
            }
            h = MIN_REGION_SIZE;
        }

        if x < 0 {
            w += x;
            x = 0;
        }
        if y < 0 {
            h += y;
            y = 0;
        }
        if x + w > canvas_w {
            w = canvas_w - x;
        }
        if y + h > canvas_h {
            h = canvas_h - y;
        }

        region.set_bounds(x as u32, y as u32, w.max(0) as u32, h.max(0) as u32);
        true
    }

    /// Removes a box, keeping the selection on the same box when possible.
    pub fn delete(&mut self, index: usize) -> Option<Region> {
        if index >= self.regions.len() {
            return None;
        }
        let removed = self.regions.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if index < sel => Some(sel - 1),
            other => other,
        };
        Some(removed)
    }

    /// Appends a default-sized box centred in the canvas and selects it.
    pub fn add_default(&mut self) -> usize {
        let (w, h) = DEFAULT_REGION_SIZE;
        let x = (self.canvas_width / 2).saturating_sub(w / 2);
        let y = (self.canvas_height / 2).saturating_sub(h / 2);
        self.regions.push(Region::from_rect(Rect {
            x,
            y,
            width: w,
            height: h,
        }));
        let index = self.regions.len() - 1;
        self.selected = Some(index);
        index
    }

    /// Restores the boxes as they were detected and clears the selection.
    pub fn reset(&mut self) {
        self.regions = self.original.clone();
        self.selected = None;
    }
}
