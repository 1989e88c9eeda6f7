//! Debug Overlay - Recursive component tree dump.
//!
//! When enabled on a scene, renders topmost: a translucent scrim plus a
//! wrapped text block listing every component's kind, absolute rect,
//! z-index and anchor description, indented by depth. The dump refreshes
//! on a millisecond period, not every frame, and each refresh is mirrored
//! to the log.

use crate::backend::RenderBackend;
use crate::node::{Label, NodeKey, Rectangle};
use crate::scene::Scene;
use crate::types::{Anchor, Color, Rect};

/// Milliseconds between dump refreshes.
const REFRESH_INTERVAL_MS: u64 = 500;

/// Overlay placement on screen.
const OVERLAY_RECT: Rect = Rect::new(10, 10, 800, 1200);

// =============================================================================
// Overlay
// =============================================================================

/// Scene diagnostics rendered over everything else.
#[derive(Debug)]
pub struct DebugOverlay {
    rect: Rect,
    scrim: Rectangle,
    label: Label,
    cached_text: String,
    last_refresh: u64,
    refreshed_once: bool,
}

impl DebugOverlay {
    pub(crate) fn new() -> Self {
        Self {
            rect: OVERLAY_RECT,
            scrim: Rectangle::new(Color::new(0, 0, 0, 64)),
            label: Label::new("Debug Info", Color::new(153, 255, 153, 255)).with_wrap(),
            cached_text: String::new(),
            last_refresh: 0,
            refreshed_once: false,
        }
    }

    /// Rebuild the dump if the refresh period elapsed.
    pub(crate) fn update(&mut self, backend: &mut dyn RenderBackend, scene: &Scene) {
        let now = backend.ticks();
        if self.refreshed_once && now.saturating_sub(self.last_refresh) < REFRESH_INTERVAL_MS {
            return;
        }
        self.last_refresh = now;
        self.refreshed_once = true;

        self.cached_text.clear();
        self.cached_text.reserve(4096);
        for &key in scene.components() {
            collect_node(&mut self.cached_text, scene, key, 0);
        }

        self.label.set_text(self.cached_text.clone());
        tracing::debug!("========== DEBUG INFO ==========\n{}", self.cached_text);
    }

    pub(crate) fn draw(&mut self, backend: &mut dyn RenderBackend) {
        self.scrim.draw(backend, self.rect);
        self.label.draw(backend, self.rect);
    }

    pub(crate) fn release(&mut self, backend: &mut dyn RenderBackend) {
        self.label.release(backend);
    }

    /// The current dump text, as of the last refresh.
    pub fn text(&self) -> &str {
        &self.cached_text
    }
}

/// Append one node's line and recurse into its children.
fn collect_node(out: &mut String, scene: &Scene, key: NodeKey, level: usize) {
    let Some(node) = scene.node(key) else { return };
    let abs = scene.absolute_rect(key).unwrap_or_default();

    let anchor = match node.anchor() {
        Anchor::Custom => {
            let (min, max) = node.custom_anchors();
            format!("{{{}, {}}} - {{{}, {}}}", min.x, min.y, max.x, max.y)
        }
        preset => preset.name().to_string(),
    };

    out.push_str(&" ".repeat(level * 4));
    out.push_str(&format!(
        "{} at ({}, {}) W:{}, H:{}, Z: {}, A: {}\n",
        node.kind().name(),
        abs.x,
        abs.y,
        abs.w,
        abs.h,
        node.z_index(),
        anchor,
    ));

    for &child in node.children() {
        collect_node(out, scene, child, level + 1);
    }
}

// =============================================================================
// Tests
// =============================================================================
