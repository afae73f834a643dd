#![forbid(unsafe_code)]

//! Spatial transform math.
//!
//! Pure, deterministic conversions between the three coordinate spaces the
//! editor works in:
//!
//! - **canvas** — screen pixels on the drawing surface
//! - **world** — camera-relative units (canvas with pan/zoom removed)
//! - **cell** — integer grid addresses
//!
//! All functions here are side-effect-free and round-trip:
//! `world_to_cell(cell_to_world(c)) == c` for any valid cell `c`.

use serde::{Deserialize, Serialize};

/// Side length of one grid cell in world units.
pub const CELL_SIZE: f64 = 48.0;

/// Minimum camera zoom factor.
pub const ZOOM_MIN: f64 = 0.2;

/// Maximum camera zoom factor.
pub const ZOOM_MAX: f64 = 4.0;

/// Minimum grid dimension (columns or rows).
pub const GRID_MIN: u32 = 1;

/// Maximum grid dimension (columns or rows).
pub const GRID_MAX: u32 = 1000;

/// A point in canvas or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An integer grid address, 0-based, origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Create a new cell address.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Render the canonical `"x,y"` key used for set/map storage.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse a canonical `"x,y"` key.
    ///
    /// Returns `None` for anything that is not exactly two base-10 integers
    /// joined by a single comma. This is the only supported storage form;
    /// malformed keys are treated as absent during sanitization.
    #[must_use]
    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        let x = x.parse::<i32>().ok()?;
        let y = y.parse::<i32>().ok()?;
        Some(Self { x, y })
    }
}

/// Grid dimensions. Bounds every other entity in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
}

impl Grid {
    /// Create a grid, clamping each dimension to `[GRID_MIN, GRID_MAX]`.
    #[must_use]
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.clamp(GRID_MIN, GRID_MAX),
            rows: rows.clamp(GRID_MIN, GRID_MAX),
        }
    }

    /// Check whether a cell lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self { cols: 12, rows: 8 }
    }
}

/// Screen-space pan offsets and scale factor.
///
/// Not an undoable field: camera motion never enters the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Camera {
    /// Create a camera with the zoom clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self {
            pan_x,
            pan_y,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }

    /// Apply a screen-space pan delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Drawing surface size in pixels. Runtime-only; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check whether the viewport has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An inclusive window of grid cells, used to cull rendering and hit tests
/// to what is actually on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl CellBounds {
    /// Check whether a cell lies inside the window.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x && cell.y >= self.min_y && cell.y <= self.max_y
    }
}

/// Convert a canvas point to world space under the given camera.
#[inline]
#[must_use]
pub fn canvas_to_world(p: Point, camera: &Camera) -> Point {
    Point::new((p.x - camera.pan_x) / camera.zoom, (p.y - camera.pan_y) / camera.zoom)
}

/// Convert a world point back to canvas space. Exact inverse of
/// [`canvas_to_world`].
#[inline]
#[must_use]
pub fn world_to_canvas(w: Point, camera: &Camera) -> Point {
    Point::new(w.x * camera.zoom + camera.pan_x, w.y * camera.zoom + camera.pan_y)
}

/// Floor a world point to the cell containing it.
#[inline]
#[must_use]
pub fn world_to_cell(w: Point, cell_size: f64) -> Cell {
    Cell::new((w.x / cell_size).floor() as i32, (w.y / cell_size).floor() as i32)
}

/// The world-space top-left corner of a cell.
#[inline]
#[must_use]
pub fn cell_to_world(cell: Cell, cell_size: f64) -> Point {
    Point::new(f64::from(cell.x) * cell_size, f64::from(cell.y) * cell_size)
}

/// Compute the window of cells visible through the camera.
///
/// Maps the surface corners to world space, floors to cells, expands by one
/// cell in each direction so edges are not clipped mid-pan, then clamps to
/// the grid. Returns `None` when the viewport is empty or the grid is fully
/// off screen. Grids may be up to 1000x1000, so callers must iterate only
/// this window.
#[must_use]
pub fn visible_cell_bounds(
    viewport: Viewport,
    camera: &Camera,
    grid: Grid,
    cell_size: f64,
) -> Option<CellBounds> {
    if viewport.is_empty() {
        return None;
    }

    let top_left = canvas_to_world(Point::new(0.0, 0.0), camera);
    let bottom_right = canvas_to_world(Point::new(viewport.width, viewport.height), camera);

    let min = world_to_cell(top_left, cell_size);
    let max = world_to_cell(bottom_right, cell_size);

    let min_x = (min.x - 1).max(0);
    let min_y = (min.y - 1).max(0);
    let max_x = (max.x + 1).min(grid.cols as i32 - 1);
    let max_y = (max.y + 1).min(grid.rows as i32 - 1);

    if min_x > max_x || min_y > max_y {
        return None;
    }

    Some(CellBounds {
        min_x,
        min_y,
        max_x,
        max_y,
    })
}
