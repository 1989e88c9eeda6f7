//! Component Nodes - The polymorphic scene-graph node.
//!
//! A [`Node`] carries the base component data every kind shares: relative
//! rect, anchor data, z-index, visibility, parent back-reference and owned
//! child list. Behavior is selected by the [`NodeKind`] tagged variant
//! rather than inheritance; the scene dispatches lifecycle hooks through
//! the methods here.
//!
//! Parent/child relations are arena keys, never owning pointers; the
//! [`Scene`](crate::scene::Scene) owns the arena.

pub mod animated;
pub mod input_field;
pub mod label;
pub mod rectangle;
pub mod responsive;
pub mod sprite;

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::backend::RenderBackend;
use crate::events::Event;
use crate::types::{Anchor, AnchorPoint, Point, Rect};

pub use animated::AnimatedSprite;
pub use input_field::{FocusChange, InputField};
pub use label::Label;
pub use rectangle::Rectangle;
pub use responsive::ResponsiveSprite;
pub use sprite::{rects_collide, Sprite, TextureRef};

new_key_type! {
    /// Arena key addressing a node inside its scene.
    pub struct NodeKey;
}

// =============================================================================
// Node kind
// =============================================================================

/// The concrete behavior of a node.
#[derive(Debug)]
pub enum NodeKind {
    /// Plain container; draws nothing itself.
    Group,
    Sprite(Sprite),
    Animated(AnimatedSprite),
    Responsive(ResponsiveSprite),
    Rectangle(Rectangle),
    Label(Label),
    Input(InputField),
}

impl NodeKind {
    /// Kind name as shown by the debug overlay.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Sprite(_) => "Sprite",
            NodeKind::Animated(_) => "AnimatedSprite",
            NodeKind::Responsive(_) => "ResponsiveSprite",
            NodeKind::Rectangle(_) => "Rectangle",
            NodeKind::Label(_) => "Label",
            NodeKind::Input(_) => "InputField",
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// One component in the scene forest.
#[derive(Debug)]
pub struct Node {
    pub(crate) relative: Rect,
    pub(crate) anchor: Anchor,
    pub(crate) anchor_min: AnchorPoint,
    pub(crate) anchor_max: AnchorPoint,
    pub(crate) z_index: i32,
    pub(crate) visible: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: SmallVec<[NodeKey; 4]>,
    pub(crate) started: bool,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind, relative: Rect) -> Self {
        Self {
            relative,
            anchor: Anchor::default(),
            anchor_min: AnchorPoint::default(),
            anchor_max: AnchorPoint::default(),
            z_index: 0,
            visible: true,
            parent: None,
            children: SmallVec::new(),
            started: false,
            kind,
        }
    }

    /// A plain container node.
    pub fn group(relative: Rect) -> Self {
        Self::new(NodeKind::Group, relative)
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set custom (min, max) anchor points and switch to
    /// [`Anchor::Custom`].
    pub fn with_custom_anchors(mut self, min: AnchorPoint, max: AnchorPoint) -> Self {
        self.anchor = Anchor::Custom;
        self.anchor_min = min;
        self.anchor_max = max;
        self
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The parent-relative rect, before anchor resolution.
    pub fn rect(&self) -> Rect {
        self.relative
    }

    /// Change the relative rect. Children pick the change up when they
    /// next resolve against this node, not immediately.
    pub fn set_rect(&mut self, relative: Rect) {
        self.relative = relative;
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    /// Custom anchor points, read when the preset is [`Anchor::Custom`].
    pub fn custom_anchors(&self) -> (AnchorPoint, AnchorPoint) {
        (self.anchor_min, self.anchor_max)
    }

    pub fn set_custom_anchors(&mut self, min: AnchorPoint, max: AnchorPoint) {
        self.anchor = Anchor::Custom;
        self.anchor_min = min;
        self.anchor_max = max;
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_sprite(&self) -> Option<&Sprite> {
        match &self.kind {
            NodeKind::Sprite(s) => Some(s),
            NodeKind::Responsive(r) => Some(&r.sprite),
            _ => None,
        }
    }

    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match &mut self.kind {
            NodeKind::Sprite(s) => Some(s),
            NodeKind::Responsive(r) => Some(&mut r.sprite),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut Label> {
        match &mut self.kind {
            NodeKind::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputField> {
        match &mut self.kind {
            NodeKind::Input(f) => Some(f),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle dispatch (scene-driven)
    // -------------------------------------------------------------------------

    /// One-time start hook, run before the node's first update.
    pub(crate) fn run_start(&mut self, backend: &mut dyn RenderBackend) {
        self.started = true;
        if let NodeKind::Responsive(r) = &mut self.kind {
            self.relative = r.start(backend, self.relative);
        }
    }

    /// Per-frame update hook.
    pub(crate) fn run_update(
        &mut self,
        backend: &mut dyn RenderBackend,
        abs: Rect,
        now: u64,
        pointer: Option<Point>,
    ) {
        match &mut self.kind {
            NodeKind::Sprite(s) => s.update(now),
            NodeKind::Responsive(r) => r.sprite.update(now),
            NodeKind::Animated(a) => a.update(now),
            NodeKind::Input(f) => f.update(backend, abs, pointer),
            NodeKind::Group | NodeKind::Rectangle(_) | NodeKind::Label(_) => {}
        }
    }

    /// Per-frame draw hook.
    pub(crate) fn run_draw(&mut self, backend: &mut dyn RenderBackend, abs: Rect) {
        match &mut self.kind {
            NodeKind::Group => {}
            NodeKind::Sprite(s) => s.draw(backend, abs),
            NodeKind::Responsive(r) => r.sprite.draw(backend, abs),
            NodeKind::Animated(a) => a.draw(backend, abs),
            NodeKind::Rectangle(r) => r.draw(backend, abs),
            NodeKind::Label(l) => l.draw(backend, abs),
            NodeKind::Input(f) => f.draw(backend, abs),
        }
    }

    /// Raw event hook; only input fields react today.
    pub(crate) fn run_event(&mut self, event: &Event, abs: Rect) -> Option<FocusChange> {
        match &mut self.kind {
            NodeKind::Input(f) => f.handle_event(event, abs),
            _ => None,
        }
    }

    /// Release kind-owned backend resources. Called only on removal with
    /// `destroy = true`.
    pub(crate) fn release_resources(&mut self, backend: &mut dyn RenderBackend) {
        match &mut self.kind {
            NodeKind::Group | NodeKind::Rectangle(_) => {}
            NodeKind::Sprite(s) => s.release_texture(backend),
            NodeKind::Responsive(r) => r.sprite.release_texture(backend),
            NodeKind::Animated(a) => a.release(backend),
            NodeKind::Label(l) => l.release(backend),
            NodeKind::Input(f) => f.release(backend),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_custom_anchor_setter_switches_preset() {
        let mut node = Node::group(Rect::new(0, 0, 10, 10));
        node.set_custom_anchors(AnchorPoint::new(0.25, 0.0), AnchorPoint::new(0.75, 1.0));
        assert_eq!(node.anchor(), Anchor::Custom);

        // A later preset assignment wins over the stored points.
        node.set_anchor(Anchor::Center);
        assert_eq!(node.anchor(), Anchor::Center);
        assert_eq!(node.custom_anchors().0, AnchorPoint::new(0.25, 0.0));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::group(Rect::default()).kind().name(), "Group");
        let rect = Node::new(
            NodeKind::Rectangle(Rectangle::new(Color::RED)),
            Rect::default(),
        );
        assert_eq!(rect.kind().name(), "Rectangle");
    }

    #[test]
    fn test_builder_defaults() {
        let node = Node::group(Rect::new(1, 2, 3, 4)).with_z(7);
        assert_eq!(node.z_index(), 7);
        assert!(node.is_visible());
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
    }
}
