//! # ember-ui
//!
//! Lightweight 2D UI and scene-graph toolkit.
//!
//! Components live in an arena-backed forest owned by a [`Scene`]; each
//! frame the scene fans events out, updates, and draws in z order through
//! a pluggable [`RenderBackend`]. Layout is anchor-based: every node holds
//! a rect relative to its parent plus an anchor preset (or custom min/max
//! points), and absolute rects are resolved top-down each pass.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rect, Color, Anchor, Alignment, etc.)
//! - [`layout`] - Anchor resolution from relative to absolute rects
//! - [`events`] - Backend-agnostic input events
//! - [`backend`] - The rendering seam, plus a headless recorder for tests
//! - [`node`] - Component nodes: sprites, labels, input fields
//! - [`scene`] - The component forest, frame cycle and debug overlay

pub mod backend;
pub mod events;
pub mod layout;
pub mod node;
pub mod scene;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use backend::{BackendError, HeadlessBackend, RenderBackend, Surface, TextureId};

pub use events::{Event, Key, PointerButton};

pub use layout::resolve_rect;

pub use node::{
    rects_collide, AnimatedSprite, FocusChange, InputField, Label, Node, NodeKey, NodeKind,
    Rectangle, ResponsiveSprite, Sprite, TextureRef,
};

pub use scene::{DebugOverlay, Scene, SceneScript};
