//! AnimatedSprite - Frame-cycling textured node.
//!
//! Owns an ordered sequence of frame textures and advances through them on
//! the backend clock, wrapping at the end. Frames load from a path template
//! where `{n}` is replaced with the 1-based frame number; loading stops at
//! the first missing frame.

use crate::backend::{RenderBackend, TextureId};
use crate::types::Rect;

// =============================================================================
// AnimatedSprite
// =============================================================================

/// A sprite cycling through owned frame textures.
#[derive(Debug, Default)]
pub struct AnimatedSprite {
    frames: Vec<TextureId>,
    frame: usize,
    /// Milliseconds between frame advances.
    speed_ms: u64,
    last_advance: u64,
}

impl AnimatedSprite {
    /// Load frames from a `{n}` path template, e.g. `res/img/run-{n}.png`
    /// loads `run-1.png`, `run-2.png`, ... until a frame fails to load.
    ///
    /// Zero loaded frames logs an error and leaves the sprite drawing
    /// nothing.
    pub fn load(backend: &mut dyn RenderBackend, path_template: &str, speed_ms: u64) -> Self {
        let mut frames = Vec::new();
        loop {
            let path = path_template.replace("{n}", &(frames.len() + 1).to_string());
            match backend.load_texture(&path) {
                Ok(id) => frames.push(id),
                Err(_) => break,
            }
        }

        if frames.is_empty() {
            tracing::error!(path_template, "animation loaded no frames");
        }

        Self {
            frames,
            frame: 0,
            speed_ms,
            last_advance: 0,
        }
    }

    /// Take ownership of pre-loaded frame textures.
    pub fn from_frames(frames: Vec<TextureId>, speed_ms: u64) -> Self {
        Self {
            frames,
            frame: 0,
            speed_ms,
            last_advance: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current frame index, always in `[0, frame_count)` when any frames
    /// are loaded.
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Advance once per `speed_ms` elapsed since the last advance.
    pub fn update(&mut self, now: u64) {
        if self.frames.is_empty() {
            return;
        }
        if now.saturating_sub(self.last_advance) >= self.speed_ms {
            self.frame = (self.frame + 1) % self.frames.len();
            self.last_advance = now;
        }
    }

    /// Blit the current frame to the resolved absolute rect.
    pub fn draw(&self, backend: &mut dyn RenderBackend, abs: Rect) {
        if let Some(&id) = self.frames.get(self.frame) {
            backend.blit(id, abs, 0.0, crate::types::Flip::empty());
        }
    }

    /// Destroy every frame texture. All frames are owned by this sprite.
    pub(crate) fn release(&mut self, backend: &mut dyn RenderBackend) {
        for id in self.frames.drain(..) {
            backend.destroy_texture(id);
        }
        self.frame = 0;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HeadlessBackend, Surface};
    use crate::types::Color;

    fn backend_with_frames(count: usize) -> HeadlessBackend {
        let mut backend = HeadlessBackend::new();
        for n in 1..=count {
            backend.insert_image(
                &format!("res/img/run-{n}.png"),
                Surface::solid(4, 4, Color::WHITE),
            );
        }
        backend
    }

    #[test]
    fn test_load_stops_at_first_missing_frame() {
        let mut backend = backend_with_frames(3);
        let anim = AnimatedSprite::load(&mut backend, "res/img/run-{n}.png", 100);
        assert_eq!(anim.frame_count(), 3);
        assert_eq!(backend.alive_textures(), 3);
    }

    #[test]
    fn test_advances_and_wraps() {
        let mut backend = backend_with_frames(3);
        let mut anim = AnimatedSprite::load(&mut backend, "res/img/run-{n}.png", 100);

        anim.update(50);
        assert_eq!(anim.current_frame(), 0);

        anim.update(100);
        assert_eq!(anim.current_frame(), 1);

        // Not enough time since the last advance.
        anim.update(150);
        assert_eq!(anim.current_frame(), 1);

        anim.update(200);
        anim.update(300);
        assert_eq!(anim.current_frame(), 0, "wraps modulo frame count");
    }

    #[test]
    fn test_release_destroys_all_frames() {
        let mut backend = backend_with_frames(2);
        let mut anim = AnimatedSprite::load(&mut backend, "res/img/run-{n}.png", 100);
        anim.release(&mut backend);
        assert_eq!(backend.alive_textures(), 0);
        assert_eq!(backend.destroyed_textures(), 2);
    }

    #[test]
    fn test_empty_animation_is_inert() {
        let mut backend = HeadlessBackend::new();
        let mut anim = AnimatedSprite::load(&mut backend, "res/img/none-{n}.png", 100);
        anim.update(1000);
        anim.draw(&mut backend, Rect::new(0, 0, 4, 4));
        assert!(backend.draw_log().is_empty());
    }
}
