//! Core types for ember-ui.
//!
//! These types define the foundation that everything builds on.
//! They flow from the component tree through layout resolution and
//! down to the rendering backend.

use bitflags::bitflags;

// =============================================================================
// Geometry
// =============================================================================

/// An integer point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A normalized point in [0, 1] × [0, 1], used for anchor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorPoint {
    pub x: f32,
    pub y: f32,
}

impl AnchorPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen space.
///
/// `x`/`y` is the top-left corner; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect at the origin with the given size.
    pub const fn of_size(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check whether a point lies inside this rect.
    ///
    /// The right and bottom edges are exclusive, matching SDL's
    /// point-in-rect convention.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Shrink the rect by `amount` pixels on all four edges.
    ///
    /// A rect smaller than `2 * amount` collapses to zero size.
    pub fn shrunk(&self, amount: i32) -> Rect {
        Rect {
            x: self.x + amount,
            y: self.y + amount,
            w: (self.w - 2 * amount).max(0),
            h: (self.h - 2 * amount).max(0),
        }
    }

    /// Check whether two rects overlap. Zero-sized rects overlap nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
            && self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
    }

    /// The overlapping region of two rects, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

bitflags! {
    /// Mirroring applied when a texture is blitted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flip: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL = 0b10;
    }
}

// =============================================================================
// Anchors
// =============================================================================

/// Anchor preset relating a component's rect to its parent's rect.
///
/// Point presets pin the relative rect to a normalized point of the parent.
/// Stretch presets span one or both parent axes. `Custom` reads the
/// component's own anchor min/max points for partial-stretch layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    /// Spans the parent's width along the top edge.
    TopStretch,
    /// Spans the parent's width at vertical center.
    CenterStretch,
    /// Spans both parent axes.
    Stretch,
    /// Spans the parent's width along the bottom edge.
    BottomStretch,
    /// Spans the parent's height along the left edge.
    StretchLeft,
    /// Spans the parent's height at horizontal center.
    StretchCenter,
    /// Spans the parent's height along the right edge.
    StretchRight,
    /// Anchor min/max are taken from the component itself.
    Custom,
}

impl Anchor {
    /// The normalized (min, max) anchor points for a preset.
    ///
    /// Returns `None` for `Custom`, whose points live on the component.
    pub fn points(&self) -> Option<(AnchorPoint, AnchorPoint)> {
        let (min, max) = match self {
            Anchor::TopLeft => ((0.0, 0.0), (0.0, 0.0)),
            Anchor::TopCenter => ((0.5, 0.0), (0.5, 0.0)),
            Anchor::TopRight => ((1.0, 0.0), (1.0, 0.0)),
            Anchor::CenterLeft => ((0.0, 0.5), (0.0, 0.5)),
            Anchor::Center => ((0.5, 0.5), (0.5, 0.5)),
            Anchor::CenterRight => ((1.0, 0.5), (1.0, 0.5)),
            Anchor::BottomLeft => ((0.0, 1.0), (0.0, 1.0)),
            Anchor::BottomCenter => ((0.5, 1.0), (0.5, 1.0)),
            Anchor::BottomRight => ((1.0, 1.0), (1.0, 1.0)),
            Anchor::TopStretch => ((0.0, 0.0), (1.0, 0.0)),
            Anchor::CenterStretch => ((0.0, 0.5), (1.0, 0.5)),
            Anchor::Stretch => ((0.0, 0.0), (1.0, 1.0)),
            Anchor::BottomStretch => ((0.0, 1.0), (1.0, 1.0)),
            Anchor::StretchLeft => ((0.0, 0.0), (0.0, 1.0)),
            Anchor::StretchCenter => ((0.5, 0.0), (0.5, 1.0)),
            Anchor::StretchRight => ((1.0, 0.0), (1.0, 1.0)),
            Anchor::Custom => return None,
        };
        Some((
            AnchorPoint::new(min.0, min.1),
            AnchorPoint::new(max.0, max.1),
        ))
    }

    /// Preset name as shown by the debug overlay.
    pub fn name(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "TOP_LEFT",
            Anchor::TopCenter => "TOP_CENTER",
            Anchor::TopRight => "TOP_RIGHT",
            Anchor::CenterLeft => "CENTER_LEFT",
            Anchor::Center => "CENTER",
            Anchor::CenterRight => "CENTER_RIGHT",
            Anchor::BottomLeft => "BOTTOM_LEFT",
            Anchor::BottomCenter => "BOTTOM_CENTER",
            Anchor::BottomRight => "BOTTOM_RIGHT",
            Anchor::TopStretch => "TOP_STRETCH",
            Anchor::CenterStretch => "CENTER_STRETCH",
            Anchor::Stretch => "STRETCH",
            Anchor::BottomStretch => "BOTTOM_STRETCH",
            Anchor::StretchLeft => "STRETCH_LEFT",
            Anchor::StretchCenter => "STRETCH_CENTER",
            Anchor::StretchRight => "STRETCH_RIGHT",
            Anchor::Custom => "CUSTOM",
        }
    }
}

// =============================================================================
// Alignment
// =============================================================================

/// Placement of an aspect-fitted sprite inside its original container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

// =============================================================================
// Input
// =============================================================================

/// Character acceptance mode for an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    /// Only ASCII digits are accepted.
    Numeric,
    /// All characters accepted; rendered as mask glyphs.
    Password,
}

/// Mouse cursor shapes the toolkit asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    /// I-beam cursor shown over text entry fields.
    Text,
}

// =============================================================================
// Tests
// =============================================================================
