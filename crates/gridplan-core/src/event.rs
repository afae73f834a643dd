#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The editor consumes raw pointer and wheel input through these types. All
//! events derive `Clone` and `PartialEq` for use in tests and pattern
//! matching.
//!
//! # Design Notes
//!
//! - Positions are canvas-space pixels relative to the drawing surface
//! - A drag or pan session is keyed by the originating [`PointerId`];
//!   events carrying a different id must not affect the session
//! - [`InputEvent::WindowRelease`] is the surface-external release
//!   fallback: pointer capture does not guarantee the release event fires
//!   over the original surface

use bitflags::bitflags;

use crate::geometry::Point;

/// Identifier of a pointing device, as reported by the hosting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i64);

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button (usually left).
    Primary,
    /// Secondary button (usually right).
    Secondary,
    /// Auxiliary button (usually middle / wheel click).
    Auxiliary,
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// The phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed down.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released.
    Up,
    /// Interaction cancelled by the host (treated exactly like `Up`).
    Cancel,
}

/// A pointer event on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The phase of the event.
    pub phase: PointerPhase,
    /// Identifier of the originating pointer.
    pub id: PointerId,
    /// The button involved, if any.
    pub button: Option<PointerButton>,
    /// Position in canvas pixels.
    pub position: Point,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event with no button and no modifiers.
    #[must_use]
    pub const fn new(phase: PointerPhase, id: PointerId, position: Point) -> Self {
        Self {
            phase,
            id,
            button: None,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach a button to the event.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Attach modifiers to the event.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check whether this is a primary-button press.
    #[must_use]
    pub fn is_primary_down(&self) -> bool {
        self.phase == PointerPhase::Down && self.button == Some(PointerButton::Primary)
    }
}

/// A wheel event, used for zooming about the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Cursor position in canvas pixels at the time of the event.
    pub position: Point,
    /// Vertical scroll delta; negative scrolls up (zoom in).
    pub delta_y: f64,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Create a new wheel event with no modifiers.
    #[must_use]
    pub const fn new(position: Point, delta_y: f64) -> Self {
        Self {
            position,
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Canonical input event consumed by the editing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer event on the drawing surface.
    Pointer(PointerEvent),

    /// A wheel event on the drawing surface.
    Wheel(WheelEvent),

    /// The drawing surface was resized.
    ///
    /// Resizes are coalesced through one scheduler tick before being
    /// committed, to avoid redundant redraws during continuous resize.
    Resize {
        /// New surface width in pixels.
        width: f64,
        /// New surface height in pixels.
        height: f64,
    },

    /// Window-level release of a captured pointer.
    ///
    /// Resolves an in-flight drag or pan when the release never reached the
    /// drawing surface.
    WindowRelease(PointerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_down_detection() {
        let down = PointerEvent::new(PointerPhase::Down, PointerId(1), Point::new(0.0, 0.0))
            .with_button(PointerButton::Primary);
        assert!(down.is_primary_down());

        let secondary = down.with_button(PointerButton::Secondary);
        assert!(!secondary.is_primary_down());

        let up = PointerEvent::new(PointerPhase::Up, PointerId(1), Point::new(0.0, 0.0))
            .with_button(PointerButton::Primary);
        assert!(!up.is_primary_down());
    }

    #[test]
    fn modifiers_default_to_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        let event = PointerEvent::new(PointerPhase::Move, PointerId(2), Point::new(1.0, 2.0));
        assert_eq!(event.modifiers, Modifiers::NONE);
    }

    #[test]
    fn event_variants_construct() {
        let _pointer = InputEvent::Pointer(PointerEvent::new(
            PointerPhase::Cancel,
            PointerId(0),
            Point::new(3.0, 4.0),
        ));
        let _wheel = InputEvent::Wheel(WheelEvent::new(Point::new(10.0, 10.0), -120.0));
        let _resize = InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        };
        let _release = InputEvent::WindowRelease(PointerId(7));
    }
}
