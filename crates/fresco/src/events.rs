//! Event model: host input and classified gesture output.
//!
//! Input arrives as [`HostEvent`] values - a closed enumeration of the
//! discrete interaction messages the host runtime delivers, dispatched
//! through an exhaustive `match` (there is deliberately no name-keyed
//! handler table to miss at runtime). Output leaves the gesture classifier
//! as [`Gesture`] values, equally closed.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keyboard modifier state accompanying a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt/Option key is held.
    pub alt: bool,
    /// Caps Lock is engaged.
    pub caps_lock: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        caps_lock: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        caps_lock: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        caps_lock: false,
    };

    /// Alt/Option modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        caps_lock: false,
    };

    /// Whether any modifier is active.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.caps_lock
    }
}

/// One pointer measurement: position in surface coordinates plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    /// Position in surface coordinates.
    pub pos: Point,
    /// Keyboard modifiers held at the time of the event.
    pub modifiers: KeyboardModifiers,
}

impl PointerSample {
    /// Create a sample at `(x, y)` with no modifiers.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Point::new(x, y),
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Create a sample with explicit modifiers.
    pub fn with_modifiers(x: f32, y: f32, modifiers: KeyboardModifiers) -> Self {
        Self {
            pos: Point::new(x, y),
            modifiers,
        }
    }
}

/// A discrete interaction message from the host runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Primary button went down.
    Press(PointerSample),
    /// Pointer moved while the primary button is held.
    Move(PointerSample),
    /// Primary button was released.
    Release(PointerSample),
    /// Pointer came to rest over the surface.
    IdleEnter(PointerSample),
    /// Pointer left the surface after idling.
    IdleExit(PointerSample),
    /// The drawing surface was resized.
    Resize { width: f32, height: f32 },
}

/// Drag deltas carried by every [`Gesture::DragMove`].
///
/// All fields are in surface coordinates; element-local variants are derived
/// by the dispatcher when it hands the gesture to an interaction handler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragInfo {
    /// Pointer position when the drag started.
    pub start: Point,
    /// Pointer position at the previous drag-move.
    pub last: Point,
    /// Delta from the previous drag-move.
    pub delta: Point,
    /// Delta from the drag start.
    pub total: Point,
}

/// A classified gesture, produced by the
/// [`GestureClassifier`](crate::gesture::GestureClassifier).
///
/// `target` is the index of the region (and element) the gesture resolved
/// to; gestures over no region are suppressed inside the classifier and
/// never reach this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A press/release pair with no second press inside the double-click
    /// window and no hold past the drag-initiation window.
    Click {
        target: usize,
        sample: PointerSample,
    },
    /// Two presses inside the double-click window.
    DoubleClick {
        target: usize,
        sample: PointerSample,
    },
    /// The button was held past the drag-initiation window.
    DragStart {
        target: usize,
        sample: PointerSample,
    },
    /// Pointer motion during a drag.
    DragMove {
        target: usize,
        sample: PointerSample,
        drag: DragInfo,
    },
    /// The drag finished (release, or continuation target lost).
    DragEnd { target: usize },
}

impl Gesture {
    /// The region/element index this gesture resolved to.
    pub fn target(&self) -> usize {
        match self {
            Self::Click { target, .. }
            | Self::DoubleClick { target, .. }
            | Self::DragStart { target, .. }
            | Self::DragMove { target, .. }
            | Self::DragEnd { target } => *target,
        }
    }
}
