//! Label - Font-rendered text node.
//!
//! Keeps a text buffer and regenerates its texture through the backend
//! font renderer whenever the text or color changes. Regeneration is
//! deferred to the next draw, which knows the resolved rect (needed for
//! wrapping width).

use crate::backend::{RenderBackend, TextureId};
use crate::types::{Color, Rect};

// =============================================================================
// Label
// =============================================================================

/// A block of rendered text.
#[derive(Debug)]
pub struct Label {
    text: String,
    color: Color,
    /// Wrap at the resolved rect's width instead of one long line.
    wrap: bool,
    texture: Option<TextureId>,
    dirty: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            wrap: false,
            texture: None,
            dirty: true,
        }
    }

    pub fn with_wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. The texture regenerates on the next draw.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.dirty = true;
        }
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        if wrap != self.wrap {
            self.wrap = wrap;
            self.dirty = true;
        }
    }

    /// Draw at the top-left of the resolved rect, at the texture's natural
    /// size. Empty text draws nothing.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, abs: Rect) {
        if self.dirty {
            self.regenerate(backend, abs);
        }
        let Some(id) = self.texture else { return };
        let Some((w, h)) = backend.texture_size(id) else {
            return;
        };
        backend.blit(
            id,
            Rect::new(abs.x, abs.y, w as i32, h as i32),
            0.0,
            crate::types::Flip::empty(),
        );
    }

    fn regenerate(&mut self, backend: &mut dyn RenderBackend, abs: Rect) {
        if let Some(old) = self.texture.take() {
            backend.destroy_texture(old);
        }
        self.dirty = false;

        if self.text.is_empty() {
            return;
        }
        let wrap_width = if self.wrap && abs.w > 0 {
            Some(abs.w as u32)
        } else {
            None
        };
        match backend.render_text(&self.text, self.color, wrap_width) {
            Ok(id) => self.texture = Some(id),
            Err(err) => tracing::error!(%err, "failed to render label text"),
        }
    }

    /// Destroy the rendered texture. Labels always own their texture.
    pub(crate) fn release(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(id) = self.texture.take() {
            backend.destroy_texture(id);
        }
        self.dirty = true;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{headless::DrawCall, HeadlessBackend};

    #[test]
    fn test_regenerates_only_when_dirty() {
        let mut backend = HeadlessBackend::new();
        let mut label = Label::new("hi", Color::BLACK);

        label.draw(&mut backend, Rect::new(0, 0, 100, 20));
        assert_eq!(backend.created_textures(), 1);

        // Unchanged text reuses the texture.
        label.draw(&mut backend, Rect::new(0, 0, 100, 20));
        assert_eq!(backend.created_textures(), 1);

        label.set_text("hello");
        label.draw(&mut backend, Rect::new(0, 0, 100, 20));
        assert_eq!(backend.created_textures(), 2);
        assert_eq!(backend.destroyed_textures(), 1);
        assert_eq!(backend.alive_textures(), 1);
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut backend = HeadlessBackend::new();
        let mut label = Label::new("", Color::BLACK);
        label.draw(&mut backend, Rect::new(0, 0, 100, 20));
        assert!(backend.draw_log().is_empty());
        assert_eq!(backend.created_textures(), 0);
    }

    #[test]
    fn test_draws_at_natural_size() {
        let mut backend = HeadlessBackend::new();
        let mut label = Label::new("abc", Color::BLACK);
        label.draw(&mut backend, Rect::new(10, 20, 500, 300));

        match &backend.draw_log()[0] {
            DrawCall::Blit { dst, .. } => {
                assert_eq!((dst.x, dst.y), (10, 20));
                assert!(dst.w < 500, "text texture is not stretched to the rect");
            }
            other => panic!("unexpected draw call: {other:?}"),
        }
    }

    #[test]
    fn test_release_frees_texture() {
        let mut backend = HeadlessBackend::new();
        let mut label = Label::new("bye", Color::BLACK);
        label.draw(&mut backend, Rect::new(0, 0, 100, 20));
        label.release(&mut backend);
        assert_eq!(backend.alive_textures(), 0);
    }
}
