//! Input model: modifier keys, buttons, touches, and the interaction state machine.
//!
//! This module defines the types consumed by the engine. `Modifiers`,
//! `Button`, `Key`, `WheelDelta` and `TouchPoint` capture one raw input event.
//! `InteractionState` is the single active gesture or edit; every variant
//! carries the context it needs, so illegal combinations such as dragging
//! and panning at once cannot be represented. `UiState` holds the pieces that
//! are orthogonal to the gesture (selection, hover, new-box settings).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{BoxId, NewBoxSettings};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether any modifier is held.
    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Enter"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// One active touch contact, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// State orthogonal to the active gesture.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The selected box, if any.
    pub selected: Option<BoxId>,
    /// The box showing its delete affordance (mouse hover or touch long-press).
    pub hovered: Option<BoxId>,
    /// Size and font size for the next inserted box.
    pub new_box: NewBoxSettings,
    /// Dark theme enabled.
    pub theme: bool,
}

/// The single active interaction.
///
/// Each active variant carries the context needed to process the next event
/// without consulting any other flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture or edit in progress.
    #[default]
    Idle,
    /// A box follows the pointer.
    DraggingBox {
        /// Box being dragged.
        id: BoxId,
        /// Pointer offset from the box's top-left corner, in document units.
        grab: Point,
    },
    /// The canvas layer follows the pointer.
    PanningGrid {
        /// Pointer screen position minus pan at the start of the gesture.
        anchor: Point,
    },
    /// Two fingers are on the screen; their spread drives zoom.
    PinchZooming {
        /// Finger distance at the previous update, in screen pixels.
        last_distance: f64,
    },
    /// A single touch landed on a box and has not yet become a drag.
    TouchPending {
        /// Box under the touch.
        id: BoxId,
        /// Touch offset from the box's top-left corner, in document units.
        grab: Point,
        /// Document-space touch position at touch-start.
        origin: Point,
        /// Clock reading at touch-start, in ms.
        started_ms: f64,
        /// The long-press affordance has already fired.
        long_pressed: bool,
    },
    /// The box's on-canvas label is being edited.
    EditingBoxText {
        id: BoxId,
        /// Uncommitted text.
        draft: String,
    },
    /// The box's label is being edited from the list.
    EditingListLabel {
        id: BoxId,
        /// Uncommitted text.
        draft: String,
    },
}

impl InteractionState {
    /// The box referenced by this state, if any.
    #[must_use]
    pub fn box_id(&self) -> Option<BoxId> {
        match self {
            Self::DraggingBox { id, .. }
            | Self::TouchPending { id, .. }
            | Self::EditingBoxText { id, .. }
            | Self::EditingListLabel { id, .. } => Some(*id),
            Self::Idle | Self::PanningGrid { .. } | Self::PinchZooming { .. } => None,
        }
    }

    /// Whether a label edit (canvas or list) is open.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::EditingBoxText { .. } | Self::EditingListLabel { .. })
    }

    /// Whether a pointer gesture is in progress.
    #[must_use]
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::DraggingBox { .. } | Self::PanningGrid { .. } | Self::PinchZooming { .. } | Self::TouchPending { .. }
        )
    }

    /// CSS cursor for the canvas in this state.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match self {
            Self::DraggingBox { .. } | Self::PanningGrid { .. } => "grabbing",
            Self::EditingBoxText { .. } | Self::EditingListLabel { .. } => "text",
            Self::Idle | Self::PinchZooming { .. } | Self::TouchPending { .. } => "grab",
        }
    }
}
