//! Per-editor persistent state and the query API hosts read between frames.
//!
//! An [`EditorContext`] owns everything that outlives a single frame: node
//! positions, the pan offset, both selection sets, the committed geometry
//! snapshot, the gesture state machine and the mini-map. All queries report
//! the state as of the most recently ended frame.

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::coords::{CanvasTransform, CoordinateSpace};
use crate::events::LinkCreated;
use crate::frame::FrameSnapshot;
use crate::gesture::Gesture;
use crate::math::{snap_to_grid, Rect};
use crate::minimap::MiniMapState;
use crate::selection::SelectionManager;

/// A node's state that survives between frames.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PersistentNode {
    pub grid_origin: Vec2,
    pub draggable: bool,
}

impl Default for PersistentNode {
    fn default() -> Self {
        Self {
            grid_origin: Vec2::ZERO,
            draggable: true,
        }
    }
}

/// An in-flight link drag, resolved for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingLink {
    pub start_attribute: i32,
    /// Start pin position in grid space.
    pub start: Vec2,
    /// Loose end position in grid space: the snapped pin if any, otherwise
    /// the cursor.
    pub end: Vec2,
    pub snapped_pin: Option<i32>,
}

#[derive(Default)]
pub struct EditorContext {
    pub(crate) pan: Vec2,
    pub(crate) nodes: FxHashMap<i32, PersistentNode>,
    pub(crate) selected_nodes: SelectionManager,
    pub(crate) selected_links: SelectionManager,
    pub(crate) gesture: Gesture,
    pub(crate) snapshot: FrameSnapshot,
    pub(crate) events: crate::events::FrameEvents,
    pub(crate) minimap: MiniMapState,
    /// Canvas rectangle in screen space, from the last frame's input.
    pub(crate) canvas_rect: Rect,
    pub(crate) prev_cursor: Vec2,
    pub(crate) prev_primary_down: bool,
    pub(crate) prev_alt_down: bool,
    pub(crate) frame_open: bool,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn transform(&self) -> CanvasTransform {
        CanvasTransform::new(self.canvas_rect.min, self.pan)
    }

    // ========================================================================
    // Hover and event queries
    // ========================================================================

    /// Whether the cursor was over the canvas last frame, outside the
    /// mini-map.
    pub fn is_editor_hovered(&self) -> bool {
        self.events.editor_hovered
    }

    pub fn hovered_node(&self) -> Option<i32> {
        self.events.hovered_node
    }

    pub fn hovered_link(&self) -> Option<i32> {
        self.events.hovered_link
    }

    pub fn hovered_pin(&self) -> Option<i32> {
        self.events.hovered_pin
    }

    /// The attribute whose pin started a link drag this frame.
    pub fn link_started(&self) -> Option<i32> {
        self.events.link_started
    }

    /// The start attribute of a link drag that ended without connecting
    /// this frame. With `include_detached` false, drops that began by
    /// detaching an existing link are filtered out.
    pub fn link_dropped(&self, include_detached: bool) -> Option<i32> {
        self.events
            .link_dropped
            .filter(|d| include_detached || !d.from_detach)
            .map(|d| d.start_attribute)
    }

    /// A link completed this frame, either by release over a compatible pin
    /// or by snapping.
    pub fn link_created(&self) -> Option<LinkCreated> {
        self.events.link_created
    }

    /// A declared link destroyed by detaching this frame. The host is
    /// expected to stop declaring it.
    pub fn link_destroyed(&self) -> Option<i32> {
        self.events.link_destroyed
    }

    /// The attribute the host marked active this frame, if any.
    pub fn active_attribute(&self) -> Option<i32> {
        self.events.active_attribute
    }

    pub fn is_attribute_active(&self, id: i32) -> bool {
        self.events.active_attribute == Some(id)
    }

    /// Node hovered inside the mini-map this frame.
    pub fn minimap_hovered_node(&self) -> Option<i32> {
        self.events.minimap_hovered_node
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_nodes(&self) -> Vec<i32> {
        self.selected_nodes.ids()
    }

    pub fn selected_links(&self) -> Vec<i32> {
        self.selected_links.ids()
    }

    pub fn num_selected_nodes(&self) -> usize {
        self.selected_nodes.len()
    }

    pub fn num_selected_links(&self) -> usize {
        self.selected_links.len()
    }

    pub fn is_node_selected(&self, id: i32) -> bool {
        self.selected_nodes.contains(id)
    }

    pub fn is_link_selected(&self, id: i32) -> bool {
        self.selected_links.contains(id)
    }

    /// # Panics
    ///
    /// Panics when the node is already selected.
    pub fn select_node(&mut self, id: i32) {
        self.selected_nodes.select(id);
    }

    /// # Panics
    ///
    /// Panics when the node is not selected.
    pub fn deselect_node(&mut self, id: i32) {
        self.selected_nodes.deselect(id);
    }

    /// # Panics
    ///
    /// Panics when the link is already selected.
    pub fn select_link(&mut self, id: i32) {
        self.selected_links.select(id);
    }

    /// # Panics
    ///
    /// Panics when the link is not selected.
    pub fn deselect_link(&mut self, id: i32) {
        self.selected_links.deselect(id);
    }

    pub fn clear_node_selection(&mut self) {
        self.selected_nodes.clear();
    }

    pub fn clear_link_selection(&mut self) {
        self.selected_links.clear();
    }

    // ========================================================================
    // Node positions
    // ========================================================================

    /// The node's position in the given space, or `None` for a node never
    /// declared or positioned.
    pub fn node_position(&self, id: i32, space: CoordinateSpace) -> Option<Vec2> {
        let node = self.nodes.get(&id)?;
        Some(self.transform().from_grid(node.grid_origin, space))
    }

    /// Set a node's position. Creates the persistent entry when the node has
    /// not been declared yet, so positions can be seeded before the first
    /// frame.
    pub fn set_node_position(&mut self, id: i32, pos: Vec2, space: CoordinateSpace) {
        let grid = self.transform().to_grid(pos, space);
        self.nodes.entry(id).or_default().grid_origin = grid;
    }

    /// The node's measured size from the last ended frame.
    pub fn node_dimensions(&self, id: i32) -> Option<Vec2> {
        self.snapshot.node(id).map(|n| n.rect.size())
    }

    pub fn set_node_draggable(&mut self, id: i32, draggable: bool) {
        self.nodes.entry(id).or_default().draggable = draggable;
    }

    /// Snap the node's position to the nearest grid intersection.
    pub fn snap_node_to_grid(&mut self, id: i32, spacing: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.grid_origin = snap_to_grid(node.grid_origin, spacing);
        } else {
            log::warn!("snap_node_to_grid: node {id} has no position yet");
        }
    }

    // ========================================================================
    // Panning
    // ========================================================================

    pub fn panning(&self) -> Vec2 {
        self.pan
    }

    pub fn reset_panning(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Pan so the node is centered in the canvas.
    pub fn move_to_node(&mut self, id: i32) {
        let Some(node) = self.snapshot.node(id) else {
            log::warn!("move_to_node: node {id} was not declared last frame");
            return;
        };
        self.pan = self.canvas_rect.size() * 0.5 - node.rect.center();
    }

    // ========================================================================
    // Geometry access
    // ========================================================================

    /// The committed geometry of the last ended frame, for rendering.
    pub fn geometry(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    /// The link drag in flight, if any, for rendering the partial link.
    pub fn pending_link(&self) -> Option<PendingLink> {
        let Gesture::DraggingLink(ref drag) = self.gesture else {
            return None;
        };
        let start = self.snapshot.pin(drag.start_attribute)?.pos;
        let end = match drag.snapped_pin.and_then(|id| self.snapshot.pin(id)) {
            Some(pin) => pin.pos,
            None => self.transform().screen_to_grid(self.prev_cursor),
        };
        Some(PendingLink {
            start_attribute: drag.start_attribute,
            start,
            end,
            snapped_pin: drag.snapped_pin,
        })
    }

    /// The active box selection rectangle in grid space, for rendering.
    pub fn box_selection_rect(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::BoxSelecting { rect, .. } => Some(rect),
            _ => None,
        }
    }

    /// Mini-map projection of a grid rectangle, in editor space, for
    /// rendering. Only meaningful on frames where the mini-map was declared.
    pub fn minimap_rect(&self) -> Option<Rect> {
        self.minimap.active.then_some(self.minimap.rect)
    }

    pub fn minimap_project(&self, rect: Rect) -> Rect {
        self.minimap.project_rect(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Node positions
    // ========================================================================

    #[test]
    fn test_set_position_before_first_declaration() {
        let mut editor = EditorContext::new();
        editor.set_node_position(1, Vec2::new(40.0, 60.0), CoordinateSpace::Grid);
        assert_eq!(
            editor.node_position(1, CoordinateSpace::Grid),
            Some(Vec2::new(40.0, 60.0))
        );
    }

    #[test]
    fn test_unknown_node_has_no_position() {
        let editor = EditorContext::new();
        assert_eq!(editor.node_position(7, CoordinateSpace::Grid), None);
    }

    #[test]
    fn test_position_spaces_are_consistent() {
        let mut editor = EditorContext::new();
        editor.canvas_rect = Rect::from_pos_size(Vec2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        editor.pan = Vec2::new(20.0, -10.0);
        editor.set_node_position(1, Vec2::new(0.0, 0.0), CoordinateSpace::Grid);

        assert_eq!(
            editor.node_position(1, CoordinateSpace::Editor),
            Some(Vec2::new(20.0, -10.0))
        );
        assert_eq!(
            editor.node_position(1, CoordinateSpace::Screen),
            Some(Vec2::new(120.0, 40.0))
        );
    }

    #[test]
    fn test_set_position_in_screen_space_round_trips() {
        let mut editor = EditorContext::new();
        editor.canvas_rect = Rect::from_pos_size(Vec2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        editor.pan = Vec2::new(20.0, -10.0);
        editor.set_node_position(1, Vec2::new(300.0, 200.0), CoordinateSpace::Screen);
        assert_eq!(
            editor.node_position(1, CoordinateSpace::Screen),
            Some(Vec2::new(300.0, 200.0))
        );
    }

    #[test]
    fn test_snap_node_to_grid() {
        let mut editor = EditorContext::new();
        editor.set_node_position(1, Vec2::new(30.0, 90.0), CoordinateSpace::Grid);
        editor.snap_node_to_grid(1, 24.0);
        assert_eq!(
            editor.node_position(1, CoordinateSpace::Grid),
            Some(Vec2::new(24.0, 96.0))
        );
    }

    // ========================================================================
    // Selection wrappers
    // ========================================================================

    #[test]
    fn test_select_and_query_nodes() {
        let mut editor = EditorContext::new();
        editor.select_node(3);
        assert!(editor.is_node_selected(3));
        assert_eq!(editor.num_selected_nodes(), 1);
        editor.deselect_node(3);
        assert!(!editor.is_node_selected(3));
    }

    #[test]
    #[should_panic(expected = "already selected")]
    fn test_double_select_node_panics() {
        let mut editor = EditorContext::new();
        editor.select_node(3);
        editor.select_node(3);
    }

    // ========================================================================
    // Panning
    // ========================================================================

    #[test]
    fn test_reset_panning() {
        let mut editor = EditorContext::new();
        editor.reset_panning(Vec2::new(5.0, 7.0));
        assert_eq!(editor.panning(), Vec2::new(5.0, 7.0));
    }

    #[test]
    fn test_move_to_unknown_node_is_noop() {
        let mut editor = EditorContext::new();
        editor.reset_panning(Vec2::new(5.0, 7.0));
        editor.move_to_node(42);
        assert_eq!(editor.panning(), Vec2::new(5.0, 7.0));
    }
}
