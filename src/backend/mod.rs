//! Render Backend - The seam to the rendering/windowing/font collaborator.
//!
//! The toolkit draws through [`RenderBackend`] and owns nothing about how
//! pixels reach a screen. Textures live inside the backend and are addressed
//! by [`TextureId`]; decoded [`Surface`] pixel data stays on the CPU side for
//! pixel-level queries. All calls are synchronous and single-threaded,
//! driven from the frame cycle.
//!
//! A real implementation wraps SDL or similar. [`headless::HeadlessBackend`]
//! records calls and tracks texture lifetimes for tests and headless runs.

pub mod headless;

use slotmap::new_key_type;
use thiserror::Error;

use crate::types::{Color, CursorKind, Flip, Rect};

pub use headless::HeadlessBackend;

new_key_type! {
    /// Handle to a texture owned by the backend.
    pub struct TextureId;
}

// =============================================================================
// Errors
// =============================================================================

/// Failures surfaced by backend resource operations.
///
/// Components never propagate these; they log and degrade (missing texture
/// draws nothing). The error type exists so backend callers and scene
/// drivers can distinguish failure causes.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to decode image: {path}")]
    Decode { path: String },
    #[error("texture creation failed: {0}")]
    TextureCreate(String),
    #[error("text rendering failed: {0}")]
    TextRender(String),
}

// =============================================================================
// Surface
// =============================================================================

/// A decoded RGBA8 pixel buffer.
///
/// Sprites may retain one next to their texture to answer pixel-accurate
/// collision queries. Row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Wrap existing RGBA8 pixel data. Panics if the buffer size does not
    /// match `width * height * 4`; surfaces come from decoders, a mismatch
    /// is a programmer error.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A surface filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha channel at a pixel; `None` outside the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4 + 3) as usize;
        Some(self.pixels[idx])
    }
}

// =============================================================================
// Backend trait
// =============================================================================

/// The rendering/windowing/font collaborator.
///
/// Everything is synchronous and assumed available; resource operations
/// that can fail return [`BackendError`] and callers degrade per the
/// toolkit's error policy.
pub trait RenderBackend {
    /// Upload a decoded surface as a new texture.
    fn create_texture(&mut self, surface: &Surface) -> Result<TextureId, BackendError>;

    /// Decode an image file into a surface. The path arrives fully
    /// resolved; the toolkit does no path construction beyond animated
    /// frame-index substitution.
    fn load_surface(&mut self, path: &str) -> Result<Surface, BackendError>;

    /// Decode and upload in one step.
    fn load_texture(&mut self, path: &str) -> Result<TextureId, BackendError> {
        let surface = self.load_surface(path)?;
        self.create_texture(&surface)
    }

    /// Render text with the backend font into a new texture.
    /// `wrap_width` of `None` renders a single line.
    fn render_text(
        &mut self,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Result<TextureId, BackendError>;

    /// Release a texture. Must be called exactly once per owned texture;
    /// the ownership flags on sprites enforce this structurally.
    fn destroy_texture(&mut self, id: TextureId);

    /// Pixel size of a texture, if it is still alive.
    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)>;

    /// Color modulation applied to subsequent blits of this texture.
    fn set_color_mod(&mut self, id: TextureId, color: Color);

    /// Alpha modulation applied to subsequent blits of this texture.
    fn set_alpha_mod(&mut self, id: TextureId, alpha: u8);

    /// Blit a texture to a destination rect with rotation and mirroring.
    fn blit(&mut self, id: TextureId, dst: Rect, angle: f64, flip: Flip);

    /// Fill a rect with a solid color.
    fn fill_rect(&mut self, dst: Rect, color: Color);

    /// Change the mouse cursor shape.
    fn set_cursor(&mut self, cursor: CursorKind);

    /// Begin delivering [`Event::TextInput`](crate::events::Event) records.
    fn start_text_input(&mut self);

    /// Stop delivering text input records.
    fn stop_text_input(&mut self);

    /// Milliseconds since backend startup.
    fn ticks(&self) -> u64;
}
