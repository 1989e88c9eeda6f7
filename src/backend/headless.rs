//! Headless Backend - Recording backend with a texture-lifetime tracker.
//!
//! Implements [`RenderBackend`] without any window or GPU. Draw calls are
//! recorded in order, texture creates/destroys are counted, and the clock
//! is advanced manually. Tests drive frames against it; it also serves
//! headless runs (CI smoke tests, server-side scene dumps).

use std::collections::HashMap;

use slotmap::SlotMap;

use super::{BackendError, RenderBackend, Surface, TextureId};
use crate::types::{Color, CursorKind, Flip, Rect};

// =============================================================================
// Recorded state
// =============================================================================

/// A single recorded draw operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Blit {
        id: TextureId,
        dst: Rect,
        angle: f64,
        flip: Flip,
        color_mod: Color,
        alpha_mod: u8,
    },
    FillRect {
        dst: Rect,
        color: Color,
    },
}

#[derive(Debug, Clone)]
struct TextureEntry {
    width: u32,
    height: u32,
    color_mod: Color,
    alpha_mod: u8,
    /// Origin label: file path or rendered text, for assertions.
    label: String,
}

// =============================================================================
// Backend
// =============================================================================

/// In-memory [`RenderBackend`] for tests and headless runs.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    textures: SlotMap<TextureId, TextureEntry>,
    images: HashMap<String, Surface>,
    draw_log: Vec<DrawCall>,
    created: usize,
    destroyed: usize,
    /// Destroys of ids that were not alive. Always a bug in the caller.
    invalid_destroys: usize,
    text_input_active: bool,
    cursor: CursorKind,
    now_ms: u64,
}

/// Headless glyph cell size used to size rendered text textures.
const GLYPH_W: u32 = 8;
const GLYPH_H: u32 = 16;

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decodable image under a path. `load_surface` for any
    /// unregistered path fails with [`BackendError::Decode`].
    pub fn insert_image(&mut self, path: &str, surface: Surface) {
        self.images.insert(path.to_string(), surface);
    }

    /// Advance the backend clock.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn draw_log(&self) -> &[DrawCall] {
        &self.draw_log
    }

    pub fn clear_draw_log(&mut self) {
        self.draw_log.clear();
    }

    /// Number of textures currently alive.
    pub fn alive_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn created_textures(&self) -> usize {
        self.created
    }

    pub fn destroyed_textures(&self) -> usize {
        self.destroyed
    }

    /// Destroy calls against dead or foreign ids (double-free attempts).
    pub fn invalid_destroys(&self) -> usize {
        self.invalid_destroys
    }

    pub fn is_text_input_active(&self) -> bool {
        self.text_input_active
    }

    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    /// Label a texture was created with (path or rendered text).
    pub fn texture_label(&self, id: TextureId) -> Option<&str> {
        self.textures.get(id).map(|e| e.label.as_str())
    }

    fn insert_texture(&mut self, width: u32, height: u32, label: String) -> TextureId {
        self.created += 1;
        self.textures.insert(TextureEntry {
            width,
            height,
            color_mod: Color::WHITE,
            alpha_mod: 255,
            label,
        })
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture(&mut self, surface: &Surface) -> Result<TextureId, BackendError> {
        Ok(self.insert_texture(surface.width(), surface.height(), String::new()))
    }

    fn load_surface(&mut self, path: &str) -> Result<Surface, BackendError> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::Decode {
                path: path.to_string(),
            })
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureId, BackendError> {
        let surface = self.load_surface(path)?;
        Ok(self.insert_texture(surface.width(), surface.height(), path.to_string()))
    }

    fn render_text(
        &mut self,
        text: &str,
        _color: Color,
        wrap_width: Option<u32>,
    ) -> Result<TextureId, BackendError> {
        let chars = text.chars().count().max(1) as u32;
        let (w, h) = match wrap_width {
            Some(wrap) if wrap >= GLYPH_W => {
                let per_line = (wrap / GLYPH_W).max(1);
                let lines = chars.div_ceil(per_line);
                (per_line.min(chars) * GLYPH_W, lines * GLYPH_H)
            }
            _ => (chars * GLYPH_W, GLYPH_H),
        };
        Ok(self.insert_texture(w, h, text.to_string()))
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(id).is_some() {
            self.destroyed += 1;
        } else {
            self.invalid_destroys += 1;
            tracing::warn!(?id, "destroy of texture that is not alive");
        }
    }

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(id).map(|e| (e.width, e.height))
    }

    fn set_color_mod(&mut self, id: TextureId, color: Color) {
        if let Some(entry) = self.textures.get_mut(id) {
            entry.color_mod = color;
        }
    }

    fn set_alpha_mod(&mut self, id: TextureId, alpha: u8) {
        if let Some(entry) = self.textures.get_mut(id) {
            entry.alpha_mod = alpha;
        }
    }

    fn blit(&mut self, id: TextureId, dst: Rect, angle: f64, flip: Flip) {
        let Some(entry) = self.textures.get(id) else {
            tracing::warn!(?id, "blit of texture that is not alive");
            return;
        };
        self.draw_log.push(DrawCall::Blit {
            id,
            dst,
            angle,
            flip,
            color_mod: entry.color_mod,
            alpha_mod: entry.alpha_mod,
        });
    }

    fn fill_rect(&mut self, dst: Rect, color: Color) {
        self.draw_log.push(DrawCall::FillRect { dst, color });
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursor = cursor;
    }

    fn start_text_input(&mut self) {
        self.text_input_active = true;
    }

    fn stop_text_input(&mut self) {
        self.text_input_active = false;
    }

    fn ticks(&self) -> u64 {
        self.now_ms
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_lifecycle_counters() {
        let mut backend = HeadlessBackend::new();
        let surface = Surface::solid(4, 4, Color::RED);

        let id = backend.create_texture(&surface).unwrap();
        assert_eq!(backend.alive_textures(), 1);
        assert_eq!(backend.texture_size(id), Some((4, 4)));

        backend.destroy_texture(id);
        assert_eq!(backend.alive_textures(), 0);
        assert_eq!(backend.destroyed_textures(), 1);

        // Second destroy of the same id is flagged, not counted.
        backend.destroy_texture(id);
        assert_eq!(backend.destroyed_textures(), 1);
        assert_eq!(backend.invalid_destroys(), 1);
    }

    #[test]
    fn test_load_requires_registered_image() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.load_texture("img/missing.png").is_err());

        backend.insert_image("img/ok.png", Surface::solid(2, 3, Color::BLUE));
        let id = backend.load_texture("img/ok.png").unwrap();
        assert_eq!(backend.texture_size(id), Some((2, 3)));
        assert_eq!(backend.texture_label(id), Some("img/ok.png"));
    }

    #[test]
    fn test_render_text_sizes_by_glyph_cells() {
        let mut backend = HeadlessBackend::new();
        let id = backend.render_text("hello", Color::BLACK, None).unwrap();
        assert_eq!(backend.texture_size(id), Some((5 * GLYPH_W, GLYPH_H)));

        let wrapped = backend
            .render_text("hello world!", Color::BLACK, Some(6 * GLYPH_W))
            .unwrap();
        // 12 chars, 6 per line -> 2 lines.
        assert_eq!(backend.texture_size(wrapped), Some((6 * GLYPH_W, 2 * GLYPH_H)));
    }

    #[test]
    fn test_blit_records_mods() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_texture(&Surface::solid(1, 1, Color::WHITE))
            .unwrap();
        backend.set_color_mod(id, Color::rgb(10, 20, 30));
        backend.set_alpha_mod(id, 128);
        backend.blit(id, Rect::new(0, 0, 10, 10), 0.0, Flip::HORIZONTAL);

        match &backend.draw_log()[0] {
            DrawCall::Blit {
                color_mod,
                alpha_mod,
                flip,
                ..
            } => {
                assert_eq!(*color_mod, Color::rgb(10, 20, 30));
                assert_eq!(*alpha_mod, 128);
                assert_eq!(*flip, Flip::HORIZONTAL);
            }
            other => panic!("unexpected draw call: {other:?}"),
        }
    }

    #[test]
    fn test_clock_advances_manually() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(backend.ticks(), 0);
        backend.advance(16);
        backend.advance(16);
        assert_eq!(backend.ticks(), 32);
    }
}
