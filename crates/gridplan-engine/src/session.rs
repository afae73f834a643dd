#![forbid(unsafe_code)]

//! Interaction session state machine.
//!
//! One session is active at a time, keyed by the pointer id that started
//! it. Events carrying a different id never affect the session; press,
//! moves, and release/cancel are strictly ordered per pointer.
//!
//! # Design Notes
//!
//! - A session holds only transient interaction state; the document is
//!   never mutated mid-session. Drags resolve to a single document
//!   mutation on release, so an aborted or invalid drag leaves nothing to
//!   clean up.
//! - Switching tools aborts the session atomically before the next event
//!   is processed.

use gridplan_core::document::ComponentId;
use gridplan_core::event::PointerId;
use gridplan_core::geometry::{Cell, Point};

/// The in-flight interaction, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    /// No interaction in flight.
    #[default]
    Idle,
    /// Camera pan; each move applies the screen-space delta since `last`.
    Pan {
        /// The pointer that started the pan.
        pointer: PointerId,
        /// Canvas position at the previous move.
        last: Point,
    },
    /// A component is being dragged.
    DragComponent {
        /// The pointer that started the drag.
        pointer: PointerId,
        /// The dragged component.
        id: ComponentId,
        /// Where the drag started, for reverting display.
        origin: Cell,
        /// The cell currently under the cursor, inside the grid or not.
        hover: Option<Cell>,
    },
    /// A blocked cell is being dragged.
    DragBlocked {
        /// The pointer that started the drag.
        pointer: PointerId,
        /// Canonical key of the dragged blocked cell.
        from_key: String,
        /// The cell currently under the cursor.
        hover: Option<Cell>,
    },
}

impl Session {
    /// Check whether no interaction is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// The pointer id that owns this session, if any.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            Session::Idle => None,
            Session::Pan { pointer, .. }
            | Session::DragComponent { pointer, .. }
            | Session::DragBlocked { pointer, .. } => Some(*pointer),
        }
    }
}

/// What the cursor is over while no session is active. Drives the cursor
/// shape and the floating hover label; only an identity change triggers a
/// redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    /// A placed component.
    Component(ComponentId),
    /// A blocked cell, by canonical key.
    Blocked(String),
    /// An empty in-grid cell.
    Cell(Cell),
}

/// Cursor shape requested from the hosting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a selectable item.
    Pointer,
    /// Pan tool, not panning.
    Grab,
    /// Panning or dragging.
    Grabbing,
    /// Place/erase over a legal target.
    Crosshair,
    /// Place over an illegal target.
    NotAllowed,
}

/// Side effect requested from the hosting surface. Effects are advisory:
/// releasing a capture that was never taken is a no-op on the host side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The scene changed; schedule a `take_scene` call.
    RequestRedraw,
    /// The cursor shape changed.
    CursorChanged(Cursor),
    /// Capture the pointer so moves outside the surface keep arriving.
    CapturePointer(PointerId),
    /// Release a previously captured pointer.
    ReleasePointer(PointerId),
}
