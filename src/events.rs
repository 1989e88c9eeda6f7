//! Input Events - Raw event records delivered to scenes.
//!
//! The windowing collaborator translates device input into these records
//! and hands them to [`Scene::handle_event`](crate::scene::Scene::handle_event)
//! once per frame. The toolkit reads nothing beyond position, keycode and
//! text payload; device specifics stay with the backend.

use crate::types::Point;

// =============================================================================
// Events
// =============================================================================

/// Pointer buttons the toolkit distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Keys with toolkit-level meaning. Printable input arrives as
/// [`Event::TextInput`], not as key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    /// Confirm key; defocuses input fields.
    Return,
    Escape,
    /// Any other keycode, passed through untouched.
    Other(u32),
}

/// A raw input event record.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PointerMoved { pos: Point },
    PointerDown { pos: Point, button: PointerButton },
    KeyDown { key: Key },
    /// A chunk of committed text while text capture is active.
    TextInput { text: String },
}

impl Event {
    /// Pointer position carried by the event, if any.
    pub fn pointer_pos(&self) -> Option<Point> {
        match self {
            Event::PointerMoved { pos } | Event::PointerDown { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}
