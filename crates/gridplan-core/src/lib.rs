#![forbid(unsafe_code)]

//! Core types for the Gridplan layout editor.
//!
//! This crate is the pure, host-independent layer: spatial transform math,
//! canonical input event types, and the document model with its typed
//! mutation operations. It has no opinion about rendering surfaces, storage,
//! or scheduling; those live in `gridplan-engine` and `gridplan-store`.

pub mod document;
pub mod event;
pub mod geometry;

pub use document::{
    ComponentId, ComponentType, Document, EditError, ItemRef, MutationOutcome, PlaceMode,
    PlacedComponent, RejectReason, Selection, Tool, max_auto_suffix,
};
pub use event::{InputEvent, Modifiers, PointerButton, PointerEvent, PointerId, PointerPhase, WheelEvent};
pub use geometry::{
    Camera, Cell, CellBounds, Grid, Point, Viewport, CELL_SIZE, GRID_MAX, GRID_MIN, ZOOM_MAX,
    ZOOM_MIN, canvas_to_world, cell_to_world, visible_cell_bounds, world_to_canvas, world_to_cell,
};
