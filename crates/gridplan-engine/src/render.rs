#![forbid(unsafe_code)]

//! Pull-based render scene builder.
//!
//! Mutations set a dirty flag on the editor; the host calls
//! [`Editor::take_scene`](crate::engine::Editor::take_scene) once per
//! scheduler tick, which clears the flag and returns the display list
//! built here. Nothing draws continuously.
//!
//! Draw order is fixed: background, grid lines and outer border (visible
//! window only), blocked fills, selected-blocked outline, components
//! (visible window only), drag ghost with its drop-validity outline, and
//! finally the floating hover label. The item being dragged is skipped at
//! its origin so only the ghost shows it. Stroke widths are world-space
//! values pre-divided by the zoom so they stay constant on screen.

use gridplan_core::document::{ComponentId, ComponentType, Document, Selection};
use gridplan_core::geometry::{
    Camera, Cell, CellBounds, Point, Viewport, cell_to_world, visible_cell_bounds, world_to_canvas,
};

use crate::session::{HoverTarget, Session};

/// Base stroke width in world units at zoom 1.
const BASE_STROKE: f64 = 1.0;

/// One drawing instruction. Coordinates are cell addresses or world-space
/// points; the host applies the scene's camera transform when painting.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear the surface.
    Background,
    /// Grid lines across the visible cell window.
    GridLines {
        bounds: CellBounds,
        stroke_width: f64,
    },
    /// The outer border of the whole grid.
    GridBorder { stroke_width: f64 },
    /// Fill of a blocked cell.
    BlockedFill { cell: Cell },
    /// Emphasis outline around the selected blocked cell.
    SelectedBlockedOutline { cell: Cell, stroke_width: f64 },
    /// A placed component.
    Component {
        id: ComponentId,
        kind: ComponentType,
        cell: Cell,
        name: String,
        selected: bool,
    },
    /// Translucent preview of a drag at the cell under the cursor, with a
    /// drop-validity outline (green/red is the host's choice of palette).
    DragGhost {
        /// The dragged component's type, or `None` for a blocked cell.
        kind: Option<ComponentType>,
        cell: Cell,
        valid: bool,
        stroke_width: f64,
    },
    /// Floating label near the hovered item.
    HoverLabel { position: Point, text: String },
}

/// A complete frame: the display list plus the transform to paint it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub viewport: Viewport,
    pub cell_size: f64,
    pub ops: Vec<DrawOp>,
}

/// Build the display list for the current state.
#[must_use]
pub fn build_scene(
    document: &Document,
    camera: &Camera,
    viewport: Viewport,
    session: &Session,
    hover: Option<&HoverTarget>,
    cell_size: f64,
) -> Scene {
    let mut ops = vec![DrawOp::Background];
    let stroke_width = BASE_STROKE / camera.zoom;

    let bounds = visible_cell_bounds(viewport, camera, document.grid, cell_size);
    if let Some(bounds) = bounds {
        ops.push(DrawOp::GridLines {
            bounds,
            stroke_width,
        });
        ops.push(DrawOp::GridBorder { stroke_width });
    }

    // The key/component mid-drag is drawn only as the ghost.
    let dragging_key = match session {
        Session::DragBlocked { from_key, .. } => Some(from_key.as_str()),
        _ => None,
    };
    let dragging_component = match session {
        Session::DragComponent { id, .. } => Some(id),
        _ => None,
    };

    for key in &document.blocked {
        if Some(key.as_str()) == dragging_key {
            continue;
        }
        let Some(cell) = Cell::parse_key(key) else {
            continue;
        };
        if bounds.is_some_and(|b| b.contains(cell)) {
            ops.push(DrawOp::BlockedFill { cell });
        }
    }

    if let Selection::Blocked(key) = &document.selection
        && Some(key.as_str()) != dragging_key
        && let Some(cell) = Cell::parse_key(key)
        && bounds.is_some_and(|b| b.contains(cell))
    {
        ops.push(DrawOp::SelectedBlockedOutline { cell, stroke_width });
    }

    for component in &document.components {
        if Some(&component.id) == dragging_component {
            continue;
        }
        if bounds.is_some_and(|b| b.contains(component.cell)) {
            ops.push(DrawOp::Component {
                id: component.id.clone(),
                kind: component.kind,
                cell: component.cell,
                name: component.display_name().to_string(),
                selected: document.selection == Selection::Component(component.id.clone()),
            });
        }
    }

    match session {
        Session::DragComponent { id, hover: Some(cell), .. } => {
            let kind = document.component(id).map(|c| c.kind);
            ops.push(DrawOp::DragGhost {
                kind,
                cell: *cell,
                valid: document.can_move_component(id, *cell),
                stroke_width,
            });
        }
        Session::DragBlocked { from_key, hover: Some(cell), .. } => {
            ops.push(DrawOp::DragGhost {
                kind: None,
                cell: *cell,
                valid: document.can_move_blocked(from_key, *cell),
                stroke_width,
            });
        }
        _ => {}
    }

    if session.is_idle()
        && let Some(op) = hover_label(document, camera, hover, cell_size)
    {
        ops.push(op);
    }

    Scene {
        camera: *camera,
        viewport,
        cell_size,
        ops,
    }
}

fn hover_label(
    document: &Document,
    camera: &Camera,
    hover: Option<&HoverTarget>,
    cell_size: f64,
) -> Option<DrawOp> {
    let (cell, text) = match hover? {
        HoverTarget::Component(id) => {
            let component = document.component(id)?;
            (component.cell, component.display_name().to_string())
        }
        HoverTarget::Blocked(key) => {
            let cell = Cell::parse_key(key)?;
            let text = document
                .blocked_labels
                .get(key)
                .cloned()
                .unwrap_or_else(|| "Blocked".to_string());
            (cell, text)
        }
        HoverTarget::Cell(_) => return None,
    };
    let position = world_to_canvas(cell_to_world(cell, cell_size), camera);
    Some(DrawOp::HoverLabel { position, text })
}
