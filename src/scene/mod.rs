//! Scene - Owner of the component forest.
//!
//! A scene owns an arena of nodes and drives them through the frame cycle:
//! `handle_event` → `update` → `draw` → `flush_removals`, all on one
//! thread. Root components iterate in ascending z-index order (stable for
//! equal z); children follow their parent depth-first.
//!
//! Removal is two-phase by design: `remove` only marks, `flush_removals`
//! erases at the end of the frame when no update/draw pass is running, so
//! iteration is never invalidated mid-pass.

pub mod debug;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::backend::RenderBackend;
use crate::events::Event;
use crate::layout::resolve_rect;
use crate::node::{FocusChange, Node, NodeKey, NodeKind};
use crate::types::{Point, Rect};

pub use debug::DebugOverlay;

// =============================================================================
// Scene lifecycle
// =============================================================================

/// Application-defined scene behavior, invoked by the owning driver on
/// activation and deactivation. A `false` return reports failure to the
/// driver; the toolkit never retries.
pub trait SceneScript {
    /// Populate the scene. Called when the scene becomes active.
    fn enter(&mut self, scene: &mut Scene, backend: &mut dyn RenderBackend) -> bool;

    /// Tear the scene down; resources should be freed here.
    fn exit(&mut self, scene: &mut Scene, backend: &mut dyn RenderBackend) -> bool;
}

// =============================================================================
// Scene
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct PendingRemoval {
    key: NodeKey,
    destroy: bool,
}

/// A container for all components of one screen.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    /// Root keys in ascending z-index order, insertion-stable for ties.
    roots: Vec<NodeKey>,
    pending: Vec<PendingRemoval>,
    screen: Rect,
    /// Last pointer position seen in an event, for hover feedback. `None`
    /// until the first pointer event arrives.
    pointer: Option<Point>,
    /// Focused input fields; text capture is active iff this is > 0.
    capture_refs: usize,
    overlay: Option<DebugOverlay>,
}

impl Scene {
    pub fn new(screen: Rect) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            pending: Vec::new(),
            screen,
            pointer: None,
            capture_refs: 0,
            overlay: None,
        }
    }

    pub fn screen_rect(&self) -> Rect {
        self.screen
    }

    pub fn set_screen_rect(&mut self, screen: Rect) {
        self.screen = screen;
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Add a root component, ordered by its z-index. Added components are
    /// started on the next update.
    pub fn add(&mut self, node: Node) -> NodeKey {
        let z = node.z_index;
        let key = self.nodes.insert(node);
        // First root with a strictly higher z; equal z stays insertion
        // ordered.
        let pos = self
            .roots
            .iter()
            .position(|&k| self.nodes[k].z_index > z)
            .unwrap_or(self.roots.len());
        self.roots.insert(pos, key);
        key
    }

    /// Add a root component at an explicit z-index.
    pub fn add_with_z(&mut self, mut node: Node, z_index: i32) -> NodeKey {
        node.z_index = z_index;
        self.add(node)
    }

    /// Add a component owned by `parent` instead of the root list. The
    /// sibling list keeps the same ascending z-index order as roots.
    ///
    /// A dead parent key falls back to root insertion with a warning; the
    /// node always ends up with exactly one owner.
    pub fn add_child(&mut self, parent: NodeKey, mut node: Node) -> NodeKey {
        if !self.nodes.contains_key(parent) {
            tracing::warn!(?parent, "add_child to dead parent; inserting as root");
            return self.add(node);
        }
        let z = node.z_index;
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        let pos = {
            let siblings = &self.nodes[parent].children;
            siblings
                .iter()
                .position(|&k| self.nodes[k].z_index > z)
                .unwrap_or(siblings.len())
        };
        self.nodes[parent].children.insert(pos, key);
        key
    }

    // -------------------------------------------------------------------------
    // Removal (two-phase)
    // -------------------------------------------------------------------------

    /// Mark a component for removal at the end of the frame. With
    /// `destroy` the component's owned backend resources are released on
    /// flush.
    pub fn remove(&mut self, key: NodeKey, destroy: bool) {
        self.pending.push(PendingRemoval { key, destroy });
    }

    /// Erase everything marked by [`remove`](Self::remove). Must run at
    /// the frame boundary, never during an update/draw pass.
    pub fn flush_removals(&mut self, backend: &mut dyn RenderBackend) {
        let pending = std::mem::take(&mut self.pending);
        for removal in pending {
            if !self.nodes.contains_key(removal.key) {
                // Removed twice in one frame; the first flush won.
                continue;
            }

            // Unlink from the single owner.
            if let Some(parent) = self.nodes[removal.key].parent {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|k| *k != removal.key);
                }
            } else {
                self.roots.retain(|&k| k != removal.key);
            }

            let mut subtree = Vec::new();
            collect_subtree(&self.nodes, removal.key, &mut subtree);
            for key in subtree {
                let Some(mut node) = self.nodes.remove(key) else {
                    continue;
                };
                // A focused field going away must drop its capture
                // reference.
                if let NodeKind::Input(field) = &mut node.kind {
                    if field.blur() {
                        self.release_capture(backend);
                    }
                }
                if removal.destroy {
                    node.release_resources(backend);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Root component keys in draw order (ascending z).
    pub fn components(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a node's absolute rect by composing the anchor transform up
    /// the parent chain to the screen rect.
    pub fn absolute_rect(&self, key: NodeKey) -> Option<Rect> {
        let node = self.nodes.get(key)?;
        let parent_abs = match node.parent {
            Some(parent) => self.absolute_rect(parent)?,
            None => self.screen,
        };
        Some(resolve_rect(
            parent_abs,
            node.relative,
            node.anchor,
            (node.anchor_min, node.anchor_max),
        ))
    }

    /// Count of focused input fields holding text capture.
    pub fn capture_refs(&self) -> usize {
        self.capture_refs
    }

    // -------------------------------------------------------------------------
    // Frame cycle
    // -------------------------------------------------------------------------

    /// Fan a raw event out to every component, depth-first in z order.
    pub fn handle_event(&mut self, backend: &mut dyn RenderBackend, event: &Event) {
        if let Some(pos) = event.pointer_pos() {
            self.pointer = Some(pos);
        }

        let mut focus_changes = Vec::new();
        for key in self.roots.clone() {
            self.event_node(key, self.screen, event, &mut focus_changes);
        }

        for change in focus_changes {
            match change {
                FocusChange::Gained => self.acquire_capture(backend),
                FocusChange::Lost => self.release_capture(backend),
            }
        }
    }

    fn event_node(
        &mut self,
        key: NodeKey,
        parent_abs: Rect,
        event: &Event,
        focus_changes: &mut Vec<FocusChange>,
    ) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let abs = resolve_rect(
            parent_abs,
            node.relative,
            node.anchor,
            (node.anchor_min, node.anchor_max),
        );
        if let Some(change) = node.run_event(event, abs) {
            focus_changes.push(change);
        }
        let children: SmallVec<[NodeKey; 4]> = node.children.clone();
        for child in children {
            self.event_node(child, abs, event, focus_changes);
        }
    }

    /// Update every component top-down, starting nodes on their first
    /// frame, then refresh the debug overlay.
    pub fn update(&mut self, backend: &mut dyn RenderBackend) {
        let now = backend.ticks();
        for key in self.roots.clone() {
            self.update_node(key, self.screen, backend, now);
        }

        if let Some(mut overlay) = self.overlay.take() {
            overlay.update(backend, self);
            self.overlay = Some(overlay);
        }
    }

    fn update_node(
        &mut self,
        key: NodeKey,
        parent_abs: Rect,
        backend: &mut dyn RenderBackend,
        now: u64,
    ) {
        let pointer = self.pointer;
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if !node.started {
            node.run_start(backend);
        }
        let abs = resolve_rect(
            parent_abs,
            node.relative,
            node.anchor,
            (node.anchor_min, node.anchor_max),
        );
        node.run_update(backend, abs, now, pointer);
        let children: SmallVec<[NodeKey; 4]> = node.children.clone();
        for child in children {
            self.update_node(child, abs, backend, now);
        }
    }

    /// Draw every visible component bottom-z first, the debug overlay
    /// last (topmost).
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) {
        for key in self.roots.clone() {
            self.draw_node(key, self.screen, backend);
        }

        if let Some(mut overlay) = self.overlay.take() {
            overlay.draw(backend);
            self.overlay = Some(overlay);
        }
    }

    fn draw_node(&mut self, key: NodeKey, parent_abs: Rect, backend: &mut dyn RenderBackend) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        // An invisible node hides its whole subtree.
        if !node.visible {
            return;
        }
        let abs = resolve_rect(
            parent_abs,
            node.relative,
            node.anchor,
            (node.anchor_min, node.anchor_max),
        );
        node.run_draw(backend, abs);
        let children: SmallVec<[NodeKey; 4]> = node.children.clone();
        for child in children {
            self.draw_node(child, abs, backend);
        }
    }

    // -------------------------------------------------------------------------
    // Text capture refcount
    // -------------------------------------------------------------------------

    fn acquire_capture(&mut self, backend: &mut dyn RenderBackend) {
        self.capture_refs += 1;
        if self.capture_refs == 1 {
            backend.start_text_input();
        }
    }

    fn release_capture(&mut self, backend: &mut dyn RenderBackend) {
        if self.capture_refs == 0 {
            tracing::warn!("text capture released more often than acquired");
            return;
        }
        self.capture_refs -= 1;
        if self.capture_refs == 0 {
            backend.stop_text_input();
        }
    }

    // -------------------------------------------------------------------------
    // Debug overlay
    // -------------------------------------------------------------------------

    /// Toggle the diagnostic overlay drawn over all components.
    pub fn set_debug(&mut self, backend: &mut dyn RenderBackend, enabled: bool) {
        match (enabled, self.overlay.is_some()) {
            (true, false) => self.overlay = Some(DebugOverlay::new()),
            (false, true) => {
                if let Some(mut overlay) = self.overlay.take() {
                    overlay.release(backend);
                }
            }
            _ => {}
        }
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.overlay.is_some()
    }

    /// The overlay, when enabled; its `text()` exposes the last dump.
    pub fn debug_overlay(&self) -> Option<&DebugOverlay> {
        self.overlay.as_ref()
    }
}

/// Collect `key` and all descendants, parents before children.
fn collect_subtree(nodes: &SlotMap<NodeKey, Node>, key: NodeKey, out: &mut Vec<NodeKey>) {
    out.push(key);
    if let Some(node) = nodes.get(key) {
        for &child in &node.children {
            collect_subtree(nodes, child, out);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{headless::DrawCall, HeadlessBackend, Surface};
    use crate::events::PointerButton;
    use crate::node::{InputField, Rectangle, Sprite};
    use crate::types::{Anchor, Color, CursorKind, InputMode};

    fn setup() -> (Scene, HeadlessBackend) {
        (Scene::new(Rect::new(0, 0, 800, 600)), HeadlessBackend::new())
    }

    fn rect_node(color: Color, rect: Rect) -> Node {
        Node::new(NodeKind::Rectangle(Rectangle::new(color)), rect)
    }

    fn click(x: i32, y: i32) -> Event {
        Event::PointerDown {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn drawn_fill_colors(backend: &HeadlessBackend) -> Vec<Color> {
        backend
            .draw_log()
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_draw_order_follows_z_then_insertion() {
        let (mut scene, mut backend) = setup();
        scene.add(rect_node(Color::RED, Rect::new(0, 0, 10, 10)).with_z(5));
        scene.add(rect_node(Color::GREEN, Rect::new(0, 0, 10, 10)).with_z(1));
        scene.add(rect_node(Color::BLUE, Rect::new(0, 0, 10, 10)).with_z(5));

        scene.draw(&mut backend);
        assert_eq!(
            drawn_fill_colors(&backend),
            vec![Color::GREEN, Color::RED, Color::BLUE]
        );
    }

    #[test]
    fn test_sibling_draw_order_follows_z() {
        let (mut scene, mut backend) = setup();
        let group = scene.add(Node::group(Rect::new(0, 0, 100, 100)));
        scene.add_child(group, rect_node(Color::RED, Rect::new(0, 0, 10, 10)).with_z(5));
        scene.add_child(group, rect_node(Color::GREEN, Rect::new(0, 0, 10, 10)).with_z(1));
        scene.add_child(group, rect_node(Color::BLUE, Rect::new(0, 0, 10, 10)).with_z(5));

        // Siblings draw in ascending z, insertion-stable for ties, exactly
        // like roots.
        scene.draw(&mut backend);
        assert_eq!(
            drawn_fill_colors(&backend),
            vec![Color::GREEN, Color::RED, Color::BLUE]
        );
    }

    #[test]
    fn test_removal_is_deferred_until_flush() {
        let (mut scene, mut backend) = setup();
        let a = scene.add(rect_node(Color::RED, Rect::new(0, 0, 10, 10)));
        let b = scene.add(rect_node(Color::GREEN, Rect::new(0, 0, 10, 10)));

        // Mark mid-frame; the rest of the frame still sees both.
        scene.update(&mut backend);
        scene.remove(a, false);
        scene.draw(&mut backend);
        assert_eq!(drawn_fill_colors(&backend).len(), 2);
        assert_eq!(scene.components().len(), 2);

        scene.flush_removals(&mut backend);
        assert_eq!(scene.components(), &[b]);
        assert!(scene.node(a).is_none());
    }

    #[test]
    fn test_flush_with_destroy_releases_owned_textures() {
        let (mut scene, mut backend) = setup();
        backend.insert_image("img/a.png", Surface::solid(4, 4, Color::WHITE));
        let sprite = Sprite::from_path(&mut backend, "img/a.png");
        let key = scene.add(Node::new(NodeKind::Sprite(sprite), Rect::new(0, 0, 4, 4)));

        scene.remove(key, true);
        scene.flush_removals(&mut backend);
        assert_eq!(backend.alive_textures(), 0);
        assert_eq!(backend.invalid_destroys(), 0);
    }

    #[test]
    fn test_flush_without_destroy_keeps_textures() {
        let (mut scene, mut backend) = setup();
        backend.insert_image("img/a.png", Surface::solid(4, 4, Color::WHITE));
        let sprite = Sprite::from_path(&mut backend, "img/a.png");
        let key = scene.add(Node::new(NodeKind::Sprite(sprite), Rect::new(0, 0, 4, 4)));

        scene.remove(key, false);
        scene.flush_removals(&mut backend);
        assert!(scene.node(key).is_none());
        assert_eq!(backend.alive_textures(), 1);
    }

    #[test]
    fn test_child_removal_takes_subtree() {
        let (mut scene, mut backend) = setup();
        let parent = scene.add(Node::group(Rect::new(0, 0, 100, 100)));
        let child = scene.add_child(parent, Node::group(Rect::new(0, 0, 10, 10)));
        let grandchild = scene.add_child(child, Node::group(Rect::new(0, 0, 5, 5)));

        scene.remove(child, true);
        scene.flush_removals(&mut backend);

        assert!(scene.node(child).is_none());
        assert!(scene.node(grandchild).is_none());
        assert_eq!(scene.node(parent).unwrap().children(), &[]);
    }

    #[test]
    fn test_absolute_rect_composes_anchor_chain() {
        let (mut scene, _) = setup();
        let panel = scene.add(Node::group(Rect::new(0, 0, 400, 300)).with_anchor(Anchor::Center));
        let inner = scene.add_child(
            panel,
            Node::group(Rect::new(0, 0, 40, 30)).with_anchor(Anchor::BottomRight),
        );

        assert_eq!(scene.absolute_rect(panel), Some(Rect::new(400, 300, 400, 300)));
        assert_eq!(scene.absolute_rect(inner), Some(Rect::new(800, 600, 40, 30)));
    }

    #[test]
    fn test_parent_rect_change_applies_on_next_resolve() {
        let (mut scene, _) = setup();
        let panel = scene.add(Node::group(Rect::new(0, 0, 100, 100)));
        let child = scene.add_child(
            panel,
            Node::group(Rect::new(0, 0, 10, 10)).with_anchor(Anchor::BottomRight),
        );
        assert_eq!(scene.absolute_rect(child), Some(Rect::new(100, 100, 10, 10)));

        scene.node_mut(panel).unwrap().set_rect(Rect::new(0, 0, 50, 50));
        assert_eq!(scene.absolute_rect(child), Some(Rect::new(50, 50, 10, 10)));
    }

    #[test]
    fn test_focus_refcount_drives_text_capture() {
        let (mut scene, mut backend) = setup();
        let field_a = Node::new(
            NodeKind::Input(InputField::new("a", InputMode::Text)),
            Rect::new(0, 0, 100, 40),
        );
        let field_b = Node::new(
            NodeKind::Input(InputField::new("b", InputMode::Text)),
            Rect::new(0, 100, 100, 40),
        );
        scene.add(field_a);
        scene.add(field_b);

        scene.handle_event(&mut backend, &click(10, 10));
        assert_eq!(scene.capture_refs(), 1);
        assert!(backend.is_text_input_active());

        // Clicking field B focuses it and defocuses A in the same pass.
        scene.handle_event(&mut backend, &click(10, 110));
        assert_eq!(scene.capture_refs(), 1);
        assert!(backend.is_text_input_active());

        // Clicking empty space defocuses everything.
        scene.handle_event(&mut backend, &click(500, 500));
        assert_eq!(scene.capture_refs(), 0);
        assert!(!backend.is_text_input_active());
    }

    #[test]
    fn test_removing_focused_field_releases_capture() {
        let (mut scene, mut backend) = setup();
        let key = scene.add(Node::new(
            NodeKind::Input(InputField::new("", InputMode::Text)),
            Rect::new(0, 0, 100, 40),
        ));

        scene.handle_event(&mut backend, &click(10, 10));
        assert!(backend.is_text_input_active());

        scene.remove(key, true);
        scene.flush_removals(&mut backend);
        assert_eq!(scene.capture_refs(), 0);
        assert!(!backend.is_text_input_active());
    }

    #[test]
    fn test_typing_reaches_focused_field() {
        let (mut scene, mut backend) = setup();
        let key = scene.add(Node::new(
            NodeKind::Input(InputField::new("", InputMode::Numeric)),
            Rect::new(0, 0, 100, 40),
        ));

        scene.handle_event(&mut backend, &click(10, 10));
        scene.handle_event(
            &mut backend,
            &Event::TextInput {
                text: "12a3".to_string(),
            },
        );

        let field = scene.node_mut(key).unwrap().as_input_mut().unwrap();
        assert_eq!(field.text(), "123");
    }

    #[test]
    fn test_no_hover_until_pointer_seen() {
        let (mut scene, mut backend) = setup();
        // The field touches the origin, where an unset pointer would sit.
        scene.add(Node::new(
            NodeKind::Input(InputField::new("", InputMode::Text)),
            Rect::new(0, 0, 100, 40),
        ));

        scene.update(&mut backend);
        assert_eq!(backend.cursor(), CursorKind::Default);

        scene.handle_event(
            &mut backend,
            &Event::PointerMoved {
                pos: Point::new(5, 5),
            },
        );
        scene.update(&mut backend);
        assert_eq!(backend.cursor(), CursorKind::Text);
    }

    #[test]
    fn test_invisible_subtree_is_skipped_on_draw() {
        let (mut scene, mut backend) = setup();
        let parent = scene.add(rect_node(Color::RED, Rect::new(0, 0, 10, 10)).with_visible(false));
        scene.add_child(parent, rect_node(Color::GREEN, Rect::new(0, 0, 5, 5)));

        scene.draw(&mut backend);
        assert!(backend.draw_log().is_empty());
    }

    #[test]
    fn test_responsive_start_runs_once_on_first_update() {
        let (mut scene, mut backend) = setup();
        backend.insert_image("img/wide.png", Surface::solid(400, 100, Color::WHITE));
        let sprite = Sprite::from_path(&mut backend, "img/wide.png");
        let responsive = crate::node::ResponsiveSprite::new(sprite, crate::types::Alignment::Center);
        let key = scene.add(Node::new(
            NodeKind::Responsive(responsive),
            Rect::new(0, 0, 200, 100),
        ));

        scene.update(&mut backend);
        assert_eq!(scene.node(key).unwrap().rect(), Rect::new(0, 25, 200, 50));

        // A second update does not re-fit.
        scene.update(&mut backend);
        assert_eq!(scene.node(key).unwrap().rect(), Rect::new(0, 25, 200, 50));
    }

    #[test]
    fn test_debug_overlay_draws_last() {
        let (mut scene, mut backend) = setup();
        scene.add(rect_node(Color::RED, Rect::new(0, 0, 10, 10)).with_z(100));
        scene.set_debug(&mut backend, true);

        scene.update(&mut backend);
        scene.draw(&mut backend);

        let log = backend.draw_log();
        // Scrim fill comes after every component draw.
        let scrim_pos = log
            .iter()
            .position(|c| matches!(c, DrawCall::FillRect { color, .. } if *color == Color::new(0, 0, 0, 64)))
            .expect("overlay scrim drawn");
        let red_pos = log
            .iter()
            .position(|c| matches!(c, DrawCall::FillRect { color, .. } if *color == Color::RED))
            .unwrap();
        assert!(scrim_pos > red_pos);

        let overlay = scene.debug_overlay().unwrap();
        assert!(overlay.text().contains("Rectangle"));
    }

    struct CountingScript {
        entered: usize,
        fail_exit: bool,
    }

    impl SceneScript for CountingScript {
        fn enter(&mut self, scene: &mut Scene, _backend: &mut dyn RenderBackend) -> bool {
            self.entered += 1;
            scene.add(Node::group(Rect::new(0, 0, 1, 1)));
            true
        }

        fn exit(&mut self, _scene: &mut Scene, _backend: &mut dyn RenderBackend) -> bool {
            !self.fail_exit
        }
    }

    #[test]
    fn test_scene_script_reports_outcome_to_driver() {
        let (mut scene, mut backend) = setup();
        let mut script = CountingScript {
            entered: 0,
            fail_exit: true,
        };

        assert!(script.enter(&mut scene, &mut backend));
        assert_eq!(script.entered, 1);
        assert_eq!(scene.len(), 1);

        // Failure is surfaced, not retried.
        assert!(!script.exit(&mut scene, &mut backend));
    }
}
