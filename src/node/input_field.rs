//! InputField - Blinking-caret text entry.
//!
//! Focus state machine: a pointer-down inside the field focuses it, a
//! pointer-down outside or the confirm key defocuses it. While focused,
//! text input events mutate the buffer and regenerate the rendered text
//! texture; numeric mode drops non-digits and password mode renders mask
//! glyphs over an intact buffer.
//!
//! The scene counts focused fields and keeps backend text capture active
//! exactly while that count is above zero.

use crate::backend::{RenderBackend, TextureId};
use crate::events::{Event, Key};
use crate::types::{Color, CursorKind, InputMode, Point, Rect};

/// Frames between caret visibility toggles.
const CARET_BLINK_INTERVAL: u32 = 30;

/// Padding between the field edge and its text, in pixels.
const TEXT_PAD: i32 = 10;

/// Caret quad width in pixels.
const CARET_W: i32 = 2;

// =============================================================================
// Focus change signal
// =============================================================================

/// Reported to the scene so it can maintain the text-capture refcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Gained,
    Lost,
}

// =============================================================================
// InputField
// =============================================================================

/// A single-line text entry field.
#[derive(Debug)]
pub struct InputField {
    text: String,
    placeholder: String,
    mode: InputMode,
    /// 0 = unlimited.
    max_length: usize,
    focused: bool,
    hovered: bool,
    caret_visible: bool,
    caret_counter: u32,
    text_texture: Option<TextureId>,
    placeholder_texture: Option<TextureId>,
    dirty: bool,
}

impl InputField {
    pub fn new(placeholder: impl Into<String>, mode: InputMode) -> Self {
        Self {
            text: String::new(),
            placeholder: placeholder.into(),
            mode,
            max_length: 0,
            focused: false,
            hovered: false,
            caret_visible: true,
            caret_counter: 0,
            text_texture: None,
            placeholder_texture: None,
            dirty: true,
        }
    }

    /// Cap the buffer length; further input is silently dropped.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The real buffer, unmasked even in password mode.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Defocus without an event, e.g. when the field is removed from the
    /// scene. Returns true if the field was focused, so the caller can
    /// release its capture reference.
    pub fn blur(&mut self) -> bool {
        std::mem::take(&mut self.focused)
    }

    /// The glyphs shown on screen: masked in password mode.
    fn shown_text(&self) -> String {
        match self.mode {
            InputMode::Password => "*".repeat(self.text.chars().count()),
            _ => self.text.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Frame hooks
    // -------------------------------------------------------------------------

    /// Advance caret blink and hover feedback. `pointer` is the last seen
    /// pointer position; `None` (nothing seen yet) never counts as hover.
    pub fn update(&mut self, backend: &mut dyn RenderBackend, abs: Rect, pointer: Option<Point>) {
        self.caret_counter += 1;
        if self.caret_counter > CARET_BLINK_INTERVAL {
            self.caret_counter = 0;
            self.caret_visible = !self.caret_visible;
        }

        let Some(pointer) = pointer else { return };
        if abs.contains(pointer) {
            self.hovered = true;
            backend.set_cursor(CursorKind::Text);
        } else if self.hovered {
            self.hovered = false;
            backend.set_cursor(CursorKind::Default);
        }
    }

    /// Handle a raw event against the field's resolved rect.
    pub fn handle_event(&mut self, event: &Event, abs: Rect) -> Option<FocusChange> {
        match event {
            Event::PointerDown { pos, .. } => {
                let inside = abs.contains(*pos);
                if inside && !self.focused {
                    self.focused = true;
                    self.caret_counter = 0;
                    self.caret_visible = true;
                    Some(FocusChange::Gained)
                } else if !inside && self.focused {
                    self.focused = false;
                    Some(FocusChange::Lost)
                } else {
                    None
                }
            }
            Event::TextInput { text } if self.focused => {
                self.append(text);
                None
            }
            Event::KeyDown { key } if self.focused => match key {
                Key::Backspace => {
                    if self.text.pop().is_some() {
                        self.dirty = true;
                    }
                    None
                }
                Key::Return => {
                    self.focused = false;
                    Some(FocusChange::Lost)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn append(&mut self, input: &str) {
        let mut changed = false;
        for c in input.chars() {
            if self.max_length > 0 && self.text.chars().count() >= self.max_length {
                break;
            }
            if self.mode == InputMode::Numeric && !c.is_ascii_digit() {
                continue;
            }
            self.text.push(c);
            changed = true;
        }
        if changed {
            self.dirty = true;
            // The caret is always visible while typing.
            self.caret_counter = 0;
            self.caret_visible = true;
        }
    }

    // -------------------------------------------------------------------------
    // Draw
    // -------------------------------------------------------------------------

    /// Draw chrome, text (or dimmed placeholder) and the caret.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, abs: Rect) {
        // Focused fields tint slightly darker.
        let c = if self.focused { 240 } else { 255 };
        backend.fill_rect(abs, Color::rgb(c, c, c));

        if self.dirty {
            self.regenerate(backend);
        }

        let use_placeholder = self.text.is_empty();
        let texture = if use_placeholder {
            self.placeholder_texture
        } else {
            self.text_texture
        };

        let mut text_w = 0;
        if let Some(id) = texture {
            if let Some((w, h)) = backend.texture_size(id) {
                text_w = w as i32;
                backend.blit(
                    id,
                    Rect::new(abs.x + TEXT_PAD, abs.y + TEXT_PAD, w as i32, h as i32),
                    0.0,
                    crate::types::Flip::empty(),
                );
            }
        }

        if self.focused && self.caret_visible {
            // The caret sits at the start while the placeholder shows.
            let caret_x = if use_placeholder {
                abs.x + TEXT_PAD
            } else {
                abs.x + TEXT_PAD + text_w
            };
            backend.fill_rect(
                Rect::new(caret_x, abs.y + TEXT_PAD, CARET_W, abs.h - 2 * TEXT_PAD),
                Color::BLACK,
            );
        }
    }

    fn regenerate(&mut self, backend: &mut dyn RenderBackend) {
        self.dirty = false;

        if let Some(old) = self.text_texture.take() {
            backend.destroy_texture(old);
        }
        if !self.text.is_empty() {
            match backend.render_text(&self.shown_text(), Color::BLACK, None) {
                Ok(id) => self.text_texture = Some(id),
                Err(err) => tracing::error!(%err, "failed to render input text"),
            }
        }

        if self.placeholder_texture.is_none() && !self.placeholder.is_empty() {
            match backend.render_text(&self.placeholder, Color::new(0, 0, 0, 128), None) {
                Ok(id) => self.placeholder_texture = Some(id),
                Err(err) => tracing::error!(%err, "failed to render placeholder text"),
            }
        }
    }

    /// Destroy the rendered text textures.
    pub(crate) fn release(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(id) = self.text_texture.take() {
            backend.destroy_texture(id);
        }
        if let Some(id) = self.placeholder_texture.take() {
            backend.destroy_texture(id);
        }
        self.dirty = true;
    }
}

// =============================================================================
// Tests
// =============================================================================
