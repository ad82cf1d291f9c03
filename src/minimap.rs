//! Mini-map overlay: a scaled-down projection of the node graph docked in a
//! canvas corner, with hover and click-to-center interaction.
//!
//! The mini-map is re-declared every frame like everything else; on frames
//! where the host does not call for it, it is inactive and intercepts
//! nothing.

use glam::Vec2;

use crate::frame::FrameSnapshot;
use crate::math::Rect;
use crate::style::Style;

/// Canvas corner the mini-map docks into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MiniMapLocation {
    BottomLeft,
    #[default]
    BottomRight,
    TopLeft,
    TopRight,
}

/// Host hook invoked when a node is hovered inside the mini-map.
pub type MiniMapNodeHoverCallback = Box<dyn FnMut(i32)>;

#[derive(Default)]
pub(crate) struct MiniMapState {
    /// Declared this frame. Reset when a new frame begins.
    pub active: bool,
    pub size_fraction: f32,
    pub location: MiniMapLocation,
    pub hover_callback: Option<MiniMapNodeHoverCallback>,
    /// Mini-map area in editor space, valid while `active`.
    pub rect: Rect,
    scale: f32,
    /// Top-left of the projected content region, in grid space.
    content_min: Vec2,
    /// Where the content projection starts inside `rect`, in editor space.
    projection_origin: Vec2,
}

impl MiniMapState {
    pub(crate) fn declare(
        &mut self,
        size_fraction: f32,
        location: MiniMapLocation,
        hover_callback: Option<MiniMapNodeHoverCallback>,
    ) {
        assert!(
            size_fraction > 0.0 && size_fraction <= 1.0,
            "mini-map size fraction {size_fraction} must be in (0, 1]"
        );
        self.active = true;
        self.size_fraction = size_fraction;
        self.location = location;
        self.hover_callback = hover_callback;
    }

    pub(crate) fn reset_frame(&mut self) {
        self.active = false;
        self.hover_callback = None;
    }

    /// Compute the docked rectangle and content projection for this frame.
    /// Content is the snapshot's node bounds padded by the style's mini-map
    /// padding; with no nodes, a unit region is used so the scale stays
    /// finite.
    pub(crate) fn layout(&mut self, canvas_size: Vec2, snapshot: &FrameSnapshot, style: &Style) {
        let size = canvas_size * self.size_fraction;
        let offset = style.mini_map_offset;
        let min = match self.location {
            MiniMapLocation::TopLeft => offset,
            MiniMapLocation::TopRight => Vec2::new(canvas_size.x - size.x - offset.x, offset.y),
            MiniMapLocation::BottomLeft => Vec2::new(offset.x, canvas_size.y - size.y - offset.y),
            MiniMapLocation::BottomRight => canvas_size - size - offset,
        };
        self.rect = Rect::from_pos_size(min, size);

        let content = snapshot
            .content_bounds()
            .unwrap_or(Rect::from_pos_size(Vec2::ZERO, Vec2::ONE))
            .expand(style.mini_map_padding);
        let content_size = content.size().max(Vec2::ONE);
        self.scale = (size.x / content_size.x).min(size.y / content_size.y);
        self.content_min = content.min;
        // Center the projection inside the docked rect.
        self.projection_origin = min + (size - content_size * self.scale) * 0.5;
    }

    pub(crate) fn contains(&self, editor_pos: Vec2) -> bool {
        self.active && self.rect.contains(editor_pos)
    }

    /// Project a grid position into the mini-map, in editor space.
    pub fn project(&self, grid_pos: Vec2) -> Vec2 {
        self.projection_origin + (grid_pos - self.content_min) * self.scale
    }

    /// Project a grid rectangle into the mini-map, in editor space.
    pub fn project_rect(&self, rect: Rect) -> Rect {
        Rect::new(self.project(rect.min), self.project(rect.max))
    }

    /// The topmost node whose projected rectangle contains the cursor.
    pub(crate) fn node_at(&self, editor_pos: Vec2, snapshot: &FrameSnapshot) -> Option<i32> {
        if !self.contains(editor_pos) {
            return None;
        }
        let mut hit = None;
        for node in &snapshot.nodes {
            if self.project_rect(node.rect).contains(editor_pos) {
                hit = Some(node.id);
            }
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuffers;

    fn snapshot_with_node(origin: Vec2) -> FrameSnapshot {
        let style = Style::default();
        let mut buffers = FrameBuffers::default();
        buffers.begin_node(1, origin, true, &style);
        buffers.begin_title_bar();
        buffers.add_item(Vec2::new(100.0, 20.0));
        buffers.end_title_bar();
        buffers.end_node(&style);
        buffers.commit()
    }

    fn laid_out(location: MiniMapLocation) -> (MiniMapState, FrameSnapshot, Style) {
        let style = Style::default();
        let snapshot = snapshot_with_node(Vec2::new(50.0, 50.0));
        let mut minimap = MiniMapState::default();
        minimap.declare(0.2, location, None);
        minimap.layout(Vec2::new(1000.0, 800.0), &snapshot, &style);
        (minimap, snapshot, style)
    }

    // ========================================================================
    // Docking
    // ========================================================================

    #[test]
    fn test_docked_size_is_fraction_of_canvas() {
        let (minimap, _, _) = laid_out(MiniMapLocation::BottomRight);
        assert_eq!(minimap.rect.size(), Vec2::new(200.0, 160.0));
    }

    #[test]
    fn test_top_left_docks_at_offset() {
        let (minimap, _, style) = laid_out(MiniMapLocation::TopLeft);
        assert_eq!(minimap.rect.min, style.mini_map_offset);
    }

    #[test]
    fn test_bottom_right_docks_against_far_corner() {
        let (minimap, _, style) = laid_out(MiniMapLocation::BottomRight);
        assert_eq!(
            minimap.rect.max,
            Vec2::new(1000.0, 800.0) - style.mini_map_offset
        );
    }

    // ========================================================================
    // Projection
    // ========================================================================

    #[test]
    fn test_projected_node_lands_inside_minimap() {
        let (minimap, snapshot, _) = laid_out(MiniMapLocation::BottomRight);
        let projected = minimap.project_rect(snapshot.node(1).unwrap().rect);
        assert!(minimap.rect.contains(projected.min));
        assert!(projected.max.x <= minimap.rect.max.x + 0.001);
        assert!(projected.max.y <= minimap.rect.max.y + 0.001);
    }

    #[test]
    fn test_projection_preserves_aspect() {
        let (minimap, snapshot, _) = laid_out(MiniMapLocation::BottomRight);
        let rect = snapshot.node(1).unwrap().rect;
        let projected = minimap.project_rect(rect);
        let sx = projected.width() / rect.width();
        let sy = projected.height() / rect.height();
        assert!((sx - sy).abs() < 0.001);
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    #[test]
    fn test_node_at_projected_center() {
        let (minimap, snapshot, _) = laid_out(MiniMapLocation::BottomRight);
        let center = minimap
            .project_rect(snapshot.node(1).unwrap().rect)
            .center();
        assert_eq!(minimap.node_at(center, &snapshot), Some(1));
    }

    #[test]
    fn test_node_at_outside_minimap_misses() {
        let (minimap, snapshot, _) = laid_out(MiniMapLocation::BottomRight);
        assert_eq!(minimap.node_at(Vec2::new(10.0, 10.0), &snapshot), None);
    }

    #[test]
    fn test_inactive_minimap_contains_nothing() {
        let (mut minimap, _, _) = laid_out(MiniMapLocation::BottomRight);
        let inside = minimap.rect.center();
        assert!(minimap.contains(inside));
        minimap.reset_frame();
        assert!(!minimap.contains(inside));
    }

    // ========================================================================
    // Usage contract
    // ========================================================================

    #[test]
    #[should_panic(expected = "must be in (0, 1]")]
    fn test_zero_size_fraction_panics() {
        let mut minimap = MiniMapState::default();
        minimap.declare(0.0, MiniMapLocation::BottomRight, None);
    }
}
