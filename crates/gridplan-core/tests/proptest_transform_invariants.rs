#![forbid(unsafe_code)]

//! Property tests for the spatial transform round-trip laws.

use gridplan_core::geometry::{
    CELL_SIZE, Camera, Cell, Grid, Point, Viewport, canvas_to_world, cell_to_world,
    visible_cell_bounds, world_to_canvas, world_to_cell,
};
use proptest::prelude::*;

fn arb_camera() -> impl Strategy<Value = Camera> {
    (-10_000.0..10_000.0f64, -10_000.0..10_000.0f64, 0.2..4.0f64)
        .prop_map(|(pan_x, pan_y, zoom)| Camera::new(pan_x, pan_y, zoom))
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    (0..1000i32, 0..1000i32).prop_map(|(x, y)| Cell::new(x, y))
}

proptest! {
    /// `world_to_cell(cell_to_world(c)) == c` exactly, for any valid cell.
    #[test]
    fn cell_world_round_trip(cell in arb_cell()) {
        prop_assert_eq!(world_to_cell(cell_to_world(cell, CELL_SIZE), CELL_SIZE), cell);
    }

    /// Pushing a cell's centre through canvas space and back lands in the
    /// same cell under any camera.
    #[test]
    fn canvas_round_trip_preserves_cell(cell in arb_cell(), camera in arb_camera()) {
        let corner = cell_to_world(cell, CELL_SIZE);
        let centre = Point::new(corner.x + CELL_SIZE / 2.0, corner.y + CELL_SIZE / 2.0);
        let back = canvas_to_world(world_to_canvas(centre, &camera), &camera);
        prop_assert_eq!(world_to_cell(back, CELL_SIZE), cell);
    }

    /// The visible window is always inside the grid and non-empty when
    /// the camera looks at the grid origin.
    #[test]
    fn visible_bounds_stay_inside_grid(
        cols in 1u32..1000,
        rows in 1u32..1000,
        zoom in 0.2..4.0f64,
        width in 1.0..4000.0f64,
        height in 1.0..4000.0f64,
    ) {
        let grid = Grid::new(cols, rows);
        let camera = Camera::new(0.0, 0.0, zoom);
        let bounds = visible_cell_bounds(Viewport::new(width, height), &camera, grid, CELL_SIZE)
            .expect("origin camera always sees cell (0,0)");
        prop_assert!(bounds.min_x >= 0 && bounds.min_y >= 0);
        prop_assert!(bounds.max_x < cols as i32 && bounds.max_y < rows as i32);
        prop_assert!(bounds.min_x <= bounds.max_x && bounds.min_y <= bounds.max_y);
        prop_assert!(bounds.contains(Cell::new(0, 0)));
    }
}
