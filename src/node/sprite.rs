//! Sprite - Textured visual node.
//!
//! A sprite owns or borrows one backend texture, optionally retaining the
//! decoded surface for pixel-accurate collision queries. Draw applies
//! color/alpha modulation, rotation and flip before blitting.
//!
//! # Texture ownership
//!
//! Exactly one logical owner exists per texture. A sprite created from a
//! path owns what it loaded and releases it on destroy; a sprite handed an
//! existing [`TextureId`] borrows it and must never release it. Replacing a
//! texture releases the previously owned one first, so transfer is
//! all-or-nothing.

use std::rc::Rc;

use crate::backend::{RenderBackend, Surface, TextureId};
use crate::types::{Color, Flip, Rect};

// =============================================================================
// Texture reference
// =============================================================================

/// A texture slot with an explicit ownership flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub id: TextureId,
    /// When false, destroy must never release the texture.
    pub owned: bool,
}

// =============================================================================
// Fade
// =============================================================================

/// An in-flight alpha ramp. Inactive fades are `None` on the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fade {
    target: u8,
    duration_ms: u64,
    delay_ms: u64,
    scheduled_at: u64,
}

// =============================================================================
// Sprite
// =============================================================================

/// A textured rectangle with modulation, flip and fade state.
#[derive(Debug, Default)]
pub struct Sprite {
    texture: Option<TextureRef>,
    surface: Option<Rc<Surface>>,
    color_mod: Color,
    alpha_mod: u8,
    angle: f64,
    flip: Flip,
    fade: Option<Fade>,
}

impl Sprite {
    /// An empty sprite. Draw is a no-op until a texture is set.
    pub fn new() -> Self {
        Self {
            alpha_mod: 255,
            ..Default::default()
        }
    }

    /// Load a texture from a resolved path; the sprite owns it.
    ///
    /// Decode failure logs an error and leaves the sprite empty.
    pub fn from_path(backend: &mut dyn RenderBackend, path: &str) -> Self {
        let mut sprite = Self::new();
        sprite.set_texture_from_path(backend, path);
        sprite
    }

    /// Like [`from_path`](Self::from_path), additionally retaining the
    /// decoded surface for pixel collision queries.
    pub fn from_path_with_surface(backend: &mut dyn RenderBackend, path: &str) -> Self {
        let mut sprite = Self::new();
        match backend.load_surface(path) {
            Ok(surface) => match backend.create_texture(&surface) {
                Ok(id) => {
                    sprite.texture = Some(TextureRef { id, owned: true });
                    sprite.surface = Some(Rc::new(surface));
                }
                Err(err) => tracing::error!(%err, path, "failed to upload sprite texture"),
            },
            Err(err) => tracing::error!(%err, path, "failed to load sprite image"),
        }
        sprite
    }

    /// Wrap an existing texture without taking ownership, e.g. many sprites
    /// sharing one atlas texture.
    pub fn borrowed(id: TextureId) -> Self {
        let mut sprite = Self::new();
        sprite.texture = Some(TextureRef { id, owned: false });
        sprite
    }

    /// Wrap an existing texture and take ownership of it.
    pub fn owned(id: TextureId) -> Self {
        let mut sprite = Self::new();
        sprite.texture = Some(TextureRef { id, owned: true });
        sprite
    }

    // -------------------------------------------------------------------------
    // Texture management
    // -------------------------------------------------------------------------

    /// Replace the texture, releasing a previously owned one first.
    pub fn set_texture(&mut self, backend: &mut dyn RenderBackend, id: TextureId, owned: bool) {
        self.release_texture(backend);
        self.texture = Some(TextureRef { id, owned });
    }

    /// Load and own a new texture from a resolved path.
    ///
    /// On decode failure the previous texture is already released and the
    /// sprite degrades to drawing nothing.
    pub fn set_texture_from_path(&mut self, backend: &mut dyn RenderBackend, path: &str) {
        self.release_texture(backend);
        match backend.load_texture(path) {
            Ok(id) => self.texture = Some(TextureRef { id, owned: true }),
            Err(err) => tracing::error!(%err, path, "failed to load sprite image"),
        }
    }

    /// Retain a decoded surface for pixel collision queries. Shared
    /// surfaces (`Rc`) are fine; dropping this sprite never invalidates
    /// another holder's copy.
    pub fn set_surface(&mut self, surface: Rc<Surface>) {
        self.surface = Some(surface);
    }

    pub fn texture(&self) -> Option<TextureRef> {
        self.texture
    }

    pub fn surface(&self) -> Option<&Rc<Surface>> {
        self.surface.as_ref()
    }

    /// Release the owned texture, if any. Borrowed textures are untouched.
    pub(crate) fn release_texture(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(tex) = self.texture.take() {
            if tex.owned {
                backend.destroy_texture(tex.id);
            }
        }
        self.surface = None;
    }

    // -------------------------------------------------------------------------
    // Appearance
    // -------------------------------------------------------------------------

    pub fn set_color_mod(&mut self, color: Color) {
        self.color_mod = color;
    }

    pub fn color_mod(&self) -> Color {
        self.color_mod
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha_mod = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha_mod
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    pub fn flip(&self) -> Flip {
        self.flip
    }

    // -------------------------------------------------------------------------
    // Fades
    // -------------------------------------------------------------------------

    /// Schedule a linear alpha ramp toward `target`, starting after
    /// `delay_ms` and lasting `duration_ms`. Replaces any fade in flight.
    pub fn fade_to(&mut self, now: u64, duration_ms: u64, target: u8, delay_ms: u64) {
        self.fade = Some(Fade {
            target,
            duration_ms,
            delay_ms,
            scheduled_at: now,
        });
    }

    /// Fade to fully opaque.
    pub fn fade_in(&mut self, now: u64, duration_ms: u64) {
        self.fade_to(now, duration_ms, 255, 0);
    }

    /// Fade to fully transparent.
    pub fn fade_out(&mut self, now: u64, duration_ms: u64) {
        self.fade_to(now, duration_ms, 0, 0);
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Advance the fade against the backend clock. A completed fade goes
    /// inactive; further updates leave alpha unchanged.
    pub fn update(&mut self, now: u64) {
        let Some(fade) = self.fade else { return };
        let elapsed = now.saturating_sub(fade.scheduled_at);
        if elapsed < fade.delay_ms {
            return;
        }

        let ramp = elapsed - fade.delay_ms;
        if fade.duration_ms == 0 || ramp >= fade.duration_ms {
            self.alpha_mod = fade.target;
            self.fade = None;
            return;
        }

        let t = ramp as f64 / fade.duration_ms as f64;
        let current = self.alpha_mod as f64;
        let next = current + (fade.target as f64 - current) * t;
        self.alpha_mod = next.round().clamp(0.0, 255.0) as u8;
    }

    // -------------------------------------------------------------------------
    // Draw
    // -------------------------------------------------------------------------

    /// Blit to the resolved absolute rect. No texture means no draw.
    pub fn draw(&self, backend: &mut dyn RenderBackend, abs: Rect) {
        let Some(tex) = self.texture else { return };
        backend.set_color_mod(tex.id, self.color_mod);
        backend.set_alpha_mod(tex.id, self.alpha_mod);
        backend.blit(tex.id, abs, self.angle, self.flip);
    }

    // -------------------------------------------------------------------------
    // Collision
    // -------------------------------------------------------------------------

    /// Pixel-accurate collision against another sprite over the overlap of
    /// the two absolute rects. True at the first texel pair whose alpha
    /// exceeds `alpha_threshold` in both sprites.
    ///
    /// Requires both sprites to have retained their decoded surface; if
    /// either lacks one this warns and reports no collision.
    pub fn pixel_collides_with(
        &self,
        self_abs: Rect,
        other: &Sprite,
        other_abs: Rect,
        alpha_threshold: u8,
    ) -> bool {
        let (Some(surf_a), Some(surf_b)) = (&self.surface, &other.surface) else {
            tracing::warn!("pixel collision requested without retained surfaces");
            return false;
        };
        let Some(overlap) = self_abs.intersection(&other_abs) else {
            return false;
        };
        if self_abs.w <= 0 || self_abs.h <= 0 || other_abs.w <= 0 || other_abs.h <= 0 {
            return false;
        }

        for y in overlap.y..overlap.bottom() {
            for x in overlap.x..overlap.right() {
                let a = sample_alpha(surf_a, self_abs, x, y);
                let b = sample_alpha(surf_b, other_abs, x, y);
                if a > alpha_threshold && b > alpha_threshold {
                    return true;
                }
            }
        }
        false
    }
}

/// Map a screen pixel into a sprite's surface and read its alpha,
/// accounting for the blit scale. Out-of-surface reads are transparent.
fn sample_alpha(surface: &Surface, abs: Rect, x: i32, y: i32) -> u8 {
    let sx = (x - abs.x) as i64 * surface.width() as i64 / abs.w as i64;
    let sy = (y - abs.y) as i64 * surface.height() as i64 / abs.h as i64;
    if sx < 0 || sy < 0 {
        return 0;
    }
    surface.alpha_at(sx as u32, sy as u32).unwrap_or(0)
}

// =============================================================================
// Rect collision
// =============================================================================

/// Bounding-box overlap test with a shrink tolerance.
///
/// Both rects are shrunk by `threshold` pixels on every edge before the
/// test, so a near-miss within `threshold` counts as no collision.
pub fn rects_collide(a: Rect, b: Rect, threshold: i32) -> bool {
    a.shrunk(threshold).intersects(&b.shrunk(threshold))
}

// =============================================================================
// Tests
// =============================================================================
