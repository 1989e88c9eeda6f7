//! ResponsiveSprite - Aspect-fit sprite with alignment.
//!
//! On start, the sprite rescales itself to fit inside its declared rect
//! without stretching: a uniform scale factor fits the texture to the
//! container, then one of nine alignment anchors places the scaled rect
//! inside the original container.

use crate::backend::RenderBackend;
use crate::node::sprite::Sprite;
use crate::types::{Alignment, Rect};

// =============================================================================
// ResponsiveSprite
// =============================================================================

/// A [`Sprite`] that aspect-fits its container once at start.
#[derive(Debug, Default)]
pub struct ResponsiveSprite {
    pub sprite: Sprite,
    alignment: Alignment,
    /// When false (default), the texture is only ever scaled down.
    allow_upscale: bool,
    /// The container rect as declared, kept from before the fit.
    original: Option<Rect>,
}

impl ResponsiveSprite {
    pub fn new(sprite: Sprite, alignment: Alignment) -> Self {
        Self {
            sprite,
            alignment,
            allow_upscale: false,
            original: None,
        }
    }

    /// Permit scale factors above 1 when the container is larger than the
    /// texture.
    pub fn allow_upscale(mut self) -> Self {
        self.allow_upscale = true;
        self
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The container rect before aspect-fitting, available after start.
    pub fn original_rect(&self) -> Option<Rect> {
        self.original
    }

    /// Compute the fitted relative rect from the declared one. Called once
    /// when the node starts; returns the new relative rect.
    ///
    /// Without a texture (or a degenerate one) the rect is left alone.
    pub fn start(&mut self, backend: &dyn RenderBackend, relative: Rect) -> Rect {
        self.original = Some(relative);

        let Some(tex) = self.sprite.texture() else {
            return relative;
        };
        let Some((tex_w, tex_h)) = backend.texture_size(tex.id) else {
            return relative;
        };
        if tex_w == 0 || tex_h == 0 {
            return relative;
        }

        let mut scale = f64::min(
            relative.w as f64 / tex_w as f64,
            relative.h as f64 / tex_h as f64,
        );
        if !self.allow_upscale {
            scale = scale.min(1.0);
        }

        let w = (tex_w as f64 * scale) as i32;
        let h = (tex_h as f64 * scale) as i32;
        let leftover_w = relative.w - w;
        let leftover_h = relative.h - h;

        let (dx, dy) = match self.alignment {
            Alignment::TopLeft => (0, 0),
            Alignment::TopCenter => (leftover_w / 2, 0),
            Alignment::TopRight => (leftover_w, 0),
            Alignment::CenterLeft => (0, leftover_h / 2),
            Alignment::Center => (leftover_w / 2, leftover_h / 2),
            Alignment::CenterRight => (leftover_w, leftover_h / 2),
            Alignment::BottomLeft => (0, leftover_h),
            Alignment::BottomCenter => (leftover_w / 2, leftover_h),
            Alignment::BottomRight => (leftover_w, leftover_h),
        };

        Rect::new(relative.x + dx, relative.y + dy, w, h)
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

    fn fitted(
        tex_w: u32,
        tex_h: u32,
        container: Rect,
        alignment: Alignment,
    ) -> (Rect, ResponsiveSprite, HeadlessBackend) {
        let mut backend = HeadlessBackend::new();
        backend.insert_image("img/t.png", Surface::solid(tex_w, tex_h, Color::WHITE));
        let sprite = Sprite::from_path(&mut backend, "img/t.png");
        let mut responsive = ResponsiveSprite::new(sprite, alignment);
        let rect = responsive.start(&backend, container);
        (rect, responsive, backend)
    }

    #[test]
    fn test_center_fit_wide_texture() {
        // 400x100 texture in a 200x100 container: scale 0.5 -> 200x50,
        // centered vertically.
        let (rect, responsive, _) = fitted(400, 100, Rect::new(0, 0, 200, 100), Alignment::Center);
        assert_eq!(rect, Rect::new(0, 25, 200, 50));
        assert_eq!(responsive.original_rect(), Some(Rect::new(0, 0, 200, 100)));
    }

    #[test]
    fn test_tall_texture_fits_height() {
        let (rect, _, _) = fitted(100, 400, Rect::new(0, 0, 200, 100), Alignment::Center);
        // scale = min(2.0, 0.25) = 0.25 -> 25x100, centered horizontally.
        assert_eq!(rect, Rect::new(87, 0, 25, 100));
    }

    #[test]
    fn test_no_upscale_by_default() {
        let (rect, _, _) = fitted(50, 50, Rect::new(10, 10, 200, 100), Alignment::TopLeft);
        assert_eq!(rect, Rect::new(10, 10, 50, 50));
    }

    #[test]
    fn test_upscale_when_allowed() {
        let mut backend = HeadlessBackend::new();
        backend.insert_image("img/t.png", Surface::solid(50, 50, Color::WHITE));
        let sprite = Sprite::from_path(&mut backend, "img/t.png");
        let mut responsive = ResponsiveSprite::new(sprite, Alignment::TopLeft).allow_upscale();
        let rect = responsive.start(&backend, Rect::new(0, 0, 200, 100));
        assert_eq!(rect, Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn test_corner_alignments() {
        let container = Rect::new(0, 0, 200, 100);

        let (br, _, _) = fitted(400, 100, container, Alignment::BottomRight);
        assert_eq!(br, Rect::new(0, 50, 200, 50));

        let (tr, _, _) = fitted(100, 400, container, Alignment::TopRight);
        assert_eq!(tr, Rect::new(175, 0, 25, 100));

        let (bc, _, _) = fitted(400, 100, container, Alignment::BottomCenter);
        assert_eq!(bc, Rect::new(0, 50, 200, 50));
    }

    #[test]
    fn test_missing_texture_keeps_rect() {
        let mut backend = HeadlessBackend::new();
        let sprite = Sprite::from_path(&mut backend, "img/none.png");
        let mut responsive = ResponsiveSprite::new(sprite, Alignment::Center);
        let rect = responsive.start(&backend, Rect::new(5, 5, 60, 40));
        assert_eq!(rect, Rect::new(5, 5, 60, 40));
    }
}
