//! Rectangle - Solid color quad.
//!
//! The simplest visual node: fills its resolved rect with one color.
//! Used standalone and as the debug overlay scrim.

use crate::backend::RenderBackend;
use crate::types::{Color, Rect};

/// A solid color fill over the node's rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    color: Color,
}

impl Rectangle {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn draw(&self, backend: &mut dyn RenderBackend, abs: Rect) {
        backend.fill_rect(abs, self.color);
    }
}
