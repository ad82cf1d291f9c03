//! Style state: semantic color slots, numeric style variables, style flags,
//! and the stack elements used by the push/pop override discipline.
//!
//! Colors are packed `0xAABBGGRR`, matching the usual immediate-mode
//! convention of red in the low byte.

use bitflags::bitflags;
use glam::Vec2;

/// Pack an RGBA color with red in the low byte.
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Semantic color slots. Renderers index [`Style::colors`] with these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ColorSlot {
    NodeBackground = 0,
    NodeBackgroundHovered,
    NodeBackgroundSelected,
    NodeOutline,
    TitleBar,
    TitleBarHovered,
    TitleBarSelected,
    Link,
    LinkHovered,
    LinkSelected,
    Pin,
    PinHovered,
    BoxSelector,
    BoxSelectorOutline,
    GridBackground,
    GridLine,
    GridLinePrimary,
    MiniMapBackground,
    MiniMapBackgroundHovered,
    MiniMapOutline,
    MiniMapOutlineHovered,
    MiniMapNodeBackground,
    MiniMapNodeBackgroundHovered,
    MiniMapNodeBackgroundSelected,
    MiniMapNodeOutline,
    MiniMapLink,
    MiniMapLinkSelected,
    MiniMapCanvas,
    MiniMapCanvasOutline,
}

impl ColorSlot {
    pub const COUNT: usize = 29;
}

/// Numeric style variables. Scalar-valued unless noted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleVar {
    GridSpacing,
    NodeCornerRounding,
    /// Vec2-valued.
    NodePadding,
    NodeBorderThickness,
    LinkThickness,
    LinkLineSegmentsPerLength,
    LinkHoverDistance,
    PinCircleRadius,
    PinQuadSideLength,
    PinTriangleSideLength,
    PinLineThickness,
    PinHoverRadius,
    PinOffset,
    /// Vec2-valued.
    MiniMapPadding,
    /// Vec2-valued.
    MiniMapOffset,
}

/// A style variable value; slots are either scalar or 2D-vector valued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleVarValue {
    Float(f32),
    Vec2(Vec2),
}

bitflags! {
    /// Behavior toggles carried on [`Style::flags`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StyleFlags: u32 {
        const NODE_OUTLINE = 1 << 0;
        const GRID_LINES = 1 << 2;
        const GRID_LINES_PRIMARY = 1 << 3;
        const GRID_SNAPPING = 1 << 4;
    }
}

/// The full style table. Push/pop overrides mutate this in place and restore
/// the previous value on pop.
#[derive(Clone, Debug)]
pub struct Style {
    pub grid_spacing: f32,
    pub node_corner_rounding: f32,
    pub node_padding: Vec2,
    pub node_border_thickness: f32,

    pub link_thickness: f32,
    /// Number of segments used to approximate a link curve, per unit of
    /// curve length. Also drives link hit-test sampling density.
    pub link_line_segments_per_length: f32,
    /// Cursor distance below which a link counts as hovered, independent of
    /// the rendered line thickness.
    pub link_hover_distance: f32,

    pub pin_circle_radius: f32,
    pub pin_quad_side_length: f32,
    pub pin_triangle_side_length: f32,
    pub pin_line_thickness: f32,
    /// Radius around a pin center inside of which the pin is hovered.
    pub pin_hover_radius: f32,
    /// Offsets pins outward from the node edge.
    pub pin_offset: f32,

    pub mini_map_padding: Vec2,
    pub mini_map_offset: Vec2,

    pub flags: StyleFlags,
    pub colors: [u32; ColorSlot::COUNT],
}

impl Default for Style {
    fn default() -> Self {
        Self::dark()
    }
}

impl Style {
    fn base() -> Self {
        Self {
            grid_spacing: 24.0,
            node_corner_rounding: 4.0,
            node_padding: Vec2::new(8.0, 8.0),
            node_border_thickness: 1.0,
            link_thickness: 3.0,
            link_line_segments_per_length: 0.1,
            link_hover_distance: 10.0,
            pin_circle_radius: 4.0,
            pin_quad_side_length: 7.0,
            pin_triangle_side_length: 9.5,
            pin_line_thickness: 1.0,
            pin_hover_radius: 10.0,
            pin_offset: 0.0,
            mini_map_padding: Vec2::new(8.0, 8.0),
            mini_map_offset: Vec2::new(4.0, 4.0),
            flags: StyleFlags::NODE_OUTLINE | StyleFlags::GRID_LINES,
            colors: [0; ColorSlot::COUNT],
        }
    }

    /// The default preset.
    pub fn dark() -> Self {
        let mut style = Self::base();
        let c = &mut style.colors;
        c[ColorSlot::NodeBackground as usize] = rgba(50, 50, 50, 255);
        c[ColorSlot::NodeBackgroundHovered as usize] = rgba(75, 75, 75, 255);
        c[ColorSlot::NodeBackgroundSelected as usize] = rgba(75, 75, 75, 255);
        c[ColorSlot::NodeOutline as usize] = rgba(100, 100, 100, 255);
        c[ColorSlot::TitleBar as usize] = rgba(41, 74, 122, 255);
        c[ColorSlot::TitleBarHovered as usize] = rgba(66, 150, 250, 255);
        c[ColorSlot::TitleBarSelected as usize] = rgba(66, 150, 250, 255);
        c[ColorSlot::Link as usize] = rgba(61, 133, 224, 200);
        c[ColorSlot::LinkHovered as usize] = rgba(66, 150, 250, 255);
        c[ColorSlot::LinkSelected as usize] = rgba(66, 150, 250, 255);
        c[ColorSlot::Pin as usize] = rgba(53, 150, 250, 180);
        c[ColorSlot::PinHovered as usize] = rgba(53, 150, 250, 255);
        c[ColorSlot::BoxSelector as usize] = rgba(61, 133, 224, 30);
        c[ColorSlot::BoxSelectorOutline as usize] = rgba(61, 133, 224, 150);
        c[ColorSlot::GridBackground as usize] = rgba(40, 40, 50, 200);
        c[ColorSlot::GridLine as usize] = rgba(200, 200, 200, 40);
        c[ColorSlot::GridLinePrimary as usize] = rgba(240, 240, 240, 60);
        c[ColorSlot::MiniMapBackground as usize] = rgba(25, 25, 25, 150);
        c[ColorSlot::MiniMapBackgroundHovered as usize] = rgba(25, 25, 25, 200);
        c[ColorSlot::MiniMapOutline as usize] = rgba(150, 150, 150, 100);
        c[ColorSlot::MiniMapOutlineHovered as usize] = rgba(150, 150, 150, 200);
        c[ColorSlot::MiniMapNodeBackground as usize] = rgba(200, 200, 200, 100);
        c[ColorSlot::MiniMapNodeBackgroundHovered as usize] = rgba(200, 200, 200, 255);
        c[ColorSlot::MiniMapNodeBackgroundSelected as usize] = rgba(200, 200, 240, 255);
        c[ColorSlot::MiniMapNodeOutline as usize] = rgba(100, 100, 100, 100);
        c[ColorSlot::MiniMapLink as usize] = c[ColorSlot::Link as usize];
        c[ColorSlot::MiniMapLinkSelected as usize] = c[ColorSlot::LinkSelected as usize];
        c[ColorSlot::MiniMapCanvas as usize] = rgba(200, 200, 200, 25);
        c[ColorSlot::MiniMapCanvasOutline as usize] = rgba(200, 200, 200, 200);
        style
    }

    pub fn classic() -> Self {
        let mut style = Self::base();
        let c = &mut style.colors;
        c[ColorSlot::NodeBackground as usize] = rgba(50, 50, 50, 255);
        c[ColorSlot::NodeBackgroundHovered as usize] = rgba(75, 75, 75, 255);
        c[ColorSlot::NodeBackgroundSelected as usize] = rgba(75, 75, 75, 255);
        c[ColorSlot::NodeOutline as usize] = rgba(100, 100, 100, 255);
        c[ColorSlot::TitleBar as usize] = rgba(69, 69, 138, 255);
        c[ColorSlot::TitleBarHovered as usize] = rgba(82, 82, 161, 255);
        c[ColorSlot::TitleBarSelected as usize] = rgba(82, 82, 161, 255);
        c[ColorSlot::Link as usize] = rgba(255, 255, 255, 100);
        c[ColorSlot::LinkHovered as usize] = rgba(105, 99, 204, 153);
        c[ColorSlot::LinkSelected as usize] = rgba(105, 99, 204, 153);
        c[ColorSlot::Pin as usize] = rgba(89, 102, 156, 170);
        c[ColorSlot::PinHovered as usize] = rgba(102, 122, 179, 200);
        c[ColorSlot::BoxSelector as usize] = rgba(82, 82, 161, 100);
        c[ColorSlot::BoxSelectorOutline as usize] = rgba(82, 82, 161, 255);
        c[ColorSlot::GridBackground as usize] = rgba(40, 40, 50, 200);
        c[ColorSlot::GridLine as usize] = rgba(200, 200, 200, 40);
        c[ColorSlot::GridLinePrimary as usize] = rgba(240, 240, 240, 60);
        c[ColorSlot::MiniMapBackground as usize] = rgba(25, 25, 25, 100);
        c[ColorSlot::MiniMapBackgroundHovered as usize] = rgba(25, 25, 25, 200);
        c[ColorSlot::MiniMapOutline as usize] = rgba(150, 150, 150, 100);
        c[ColorSlot::MiniMapOutlineHovered as usize] = rgba(150, 150, 150, 200);
        c[ColorSlot::MiniMapNodeBackground as usize] = rgba(200, 200, 200, 100);
        c[ColorSlot::MiniMapNodeBackgroundHovered as usize] = rgba(200, 200, 200, 255);
        c[ColorSlot::MiniMapNodeBackgroundSelected as usize] = rgba(200, 200, 240, 255);
        c[ColorSlot::MiniMapNodeOutline as usize] = rgba(100, 100, 100, 100);
        c[ColorSlot::MiniMapLink as usize] = c[ColorSlot::Link as usize];
        c[ColorSlot::MiniMapLinkSelected as usize] = c[ColorSlot::LinkSelected as usize];
        c[ColorSlot::MiniMapCanvas as usize] = rgba(200, 200, 200, 25);
        c[ColorSlot::MiniMapCanvasOutline as usize] = rgba(200, 200, 200, 200);
        style
    }

    pub fn light() -> Self {
        let mut style = Self::base();
        let c = &mut style.colors;
        c[ColorSlot::NodeBackground as usize] = rgba(240, 240, 240, 255);
        c[ColorSlot::NodeBackgroundHovered as usize] = rgba(240, 240, 240, 255);
        c[ColorSlot::NodeBackgroundSelected as usize] = rgba(240, 240, 240, 255);
        c[ColorSlot::NodeOutline as usize] = rgba(100, 100, 100, 255);
        c[ColorSlot::TitleBar as usize] = rgba(248, 248, 248, 255);
        c[ColorSlot::TitleBarHovered as usize] = rgba(209, 209, 209, 255);
        c[ColorSlot::TitleBarSelected as usize] = rgba(209, 209, 209, 255);
        c[ColorSlot::Link as usize] = rgba(66, 150, 250, 100);
        c[ColorSlot::LinkHovered as usize] = rgba(66, 150, 250, 242);
        c[ColorSlot::LinkSelected as usize] = rgba(66, 150, 250, 242);
        c[ColorSlot::Pin as usize] = rgba(66, 150, 250, 160);
        c[ColorSlot::PinHovered as usize] = rgba(66, 150, 250, 255);
        c[ColorSlot::BoxSelector as usize] = rgba(90, 170, 250, 30);
        c[ColorSlot::BoxSelectorOutline as usize] = rgba(90, 170, 250, 150);
        c[ColorSlot::GridBackground as usize] = rgba(225, 225, 225, 255);
        c[ColorSlot::GridLine as usize] = rgba(180, 180, 180, 100);
        c[ColorSlot::GridLinePrimary as usize] = rgba(120, 120, 120, 100);
        c[ColorSlot::MiniMapBackground as usize] = rgba(25, 25, 25, 100);
        c[ColorSlot::MiniMapBackgroundHovered as usize] = rgba(25, 25, 25, 200);
        c[ColorSlot::MiniMapOutline as usize] = rgba(150, 150, 150, 100);
        c[ColorSlot::MiniMapOutlineHovered as usize] = rgba(150, 150, 150, 200);
        c[ColorSlot::MiniMapNodeBackground as usize] = rgba(200, 200, 200, 100);
        c[ColorSlot::MiniMapNodeBackgroundHovered as usize] = rgba(200, 200, 200, 255);
        c[ColorSlot::MiniMapNodeBackgroundSelected as usize] = rgba(200, 200, 240, 255);
        c[ColorSlot::MiniMapNodeOutline as usize] = rgba(100, 100, 100, 100);
        c[ColorSlot::MiniMapLink as usize] = c[ColorSlot::Link as usize];
        c[ColorSlot::MiniMapLinkSelected as usize] = c[ColorSlot::LinkSelected as usize];
        c[ColorSlot::MiniMapCanvas as usize] = rgba(200, 200, 200, 25);
        c[ColorSlot::MiniMapCanvasOutline as usize] = rgba(200, 200, 200, 200);
        style
    }

    pub fn color(&self, slot: ColorSlot) -> u32 {
        self.colors[slot as usize]
    }

    /// Read the current value of a style variable.
    pub fn var(&self, var: StyleVar) -> StyleVarValue {
        use StyleVarValue::{Float, Vec2 as V2};
        match var {
            StyleVar::GridSpacing => Float(self.grid_spacing),
            StyleVar::NodeCornerRounding => Float(self.node_corner_rounding),
            StyleVar::NodePadding => V2(self.node_padding),
            StyleVar::NodeBorderThickness => Float(self.node_border_thickness),
            StyleVar::LinkThickness => Float(self.link_thickness),
            StyleVar::LinkLineSegmentsPerLength => Float(self.link_line_segments_per_length),
            StyleVar::LinkHoverDistance => Float(self.link_hover_distance),
            StyleVar::PinCircleRadius => Float(self.pin_circle_radius),
            StyleVar::PinQuadSideLength => Float(self.pin_quad_side_length),
            StyleVar::PinTriangleSideLength => Float(self.pin_triangle_side_length),
            StyleVar::PinLineThickness => Float(self.pin_line_thickness),
            StyleVar::PinHoverRadius => Float(self.pin_hover_radius),
            StyleVar::PinOffset => Float(self.pin_offset),
            StyleVar::MiniMapPadding => V2(self.mini_map_padding),
            StyleVar::MiniMapOffset => V2(self.mini_map_offset),
        }
    }

    /// Overwrite a style variable.
    ///
    /// # Panics
    ///
    /// Panics when the value kind does not match the slot (scalar value for
    /// a Vec2 slot or vice versa).
    pub fn set_var(&mut self, var: StyleVar, value: StyleVarValue) {
        let target = match var {
            StyleVar::GridSpacing => &mut self.grid_spacing,
            StyleVar::NodeCornerRounding => &mut self.node_corner_rounding,
            StyleVar::NodeBorderThickness => &mut self.node_border_thickness,
            StyleVar::LinkThickness => &mut self.link_thickness,
            StyleVar::LinkLineSegmentsPerLength => &mut self.link_line_segments_per_length,
            StyleVar::LinkHoverDistance => &mut self.link_hover_distance,
            StyleVar::PinCircleRadius => &mut self.pin_circle_radius,
            StyleVar::PinQuadSideLength => &mut self.pin_quad_side_length,
            StyleVar::PinTriangleSideLength => &mut self.pin_triangle_side_length,
            StyleVar::PinLineThickness => &mut self.pin_line_thickness,
            StyleVar::PinHoverRadius => &mut self.pin_hover_radius,
            StyleVar::PinOffset => &mut self.pin_offset,
            StyleVar::NodePadding | StyleVar::MiniMapPadding | StyleVar::MiniMapOffset => {
                let StyleVarValue::Vec2(v) = value else {
                    panic!("style variable {var:?} requires a Vec2 value");
                };
                match var {
                    StyleVar::NodePadding => self.node_padding = v,
                    StyleVar::MiniMapPadding => self.mini_map_padding = v,
                    StyleVar::MiniMapOffset => self.mini_map_offset = v,
                    _ => unreachable!(),
                }
                return;
            }
        };
        let StyleVarValue::Float(f) = value else {
            panic!("style variable {var:?} requires a scalar value");
        };
        *target = f;
    }
}

/// Stack record for a pushed color override.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ColorStackElement {
    pub slot: ColorSlot,
    pub previous: u32,
}

/// Stack record for a pushed style variable override.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StyleVarStackElement {
    pub var: StyleVar,
    pub previous: StyleVarValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Color packing
    // ========================================================================

    #[test]
    fn test_rgba_packs_red_in_low_byte() {
        assert_eq!(rgba(0xAB, 0, 0, 0), 0x0000_00AB);
        assert_eq!(rgba(0, 0, 0, 0xFF), 0xFF00_0000);
        assert_eq!(rgba(1, 2, 3, 4), 0x0403_0201);
    }

    // ========================================================================
    // Presets
    // ========================================================================

    #[test]
    fn test_default_is_dark() {
        let style = Style::default();
        assert_eq!(
            style.color(ColorSlot::TitleBar),
            Style::dark().color(ColorSlot::TitleBar)
        );
        assert!(style.flags.contains(StyleFlags::NODE_OUTLINE));
        assert!(style.flags.contains(StyleFlags::GRID_LINES));
        assert!(!style.flags.contains(StyleFlags::GRID_SNAPPING));
    }

    #[test]
    fn test_presets_differ() {
        assert_ne!(
            Style::dark().color(ColorSlot::NodeBackground),
            Style::light().color(ColorSlot::NodeBackground)
        );
        assert_ne!(
            Style::dark().color(ColorSlot::TitleBar),
            Style::classic().color(ColorSlot::TitleBar)
        );
    }

    // ========================================================================
    // Style variables
    // ========================================================================

    #[test]
    fn test_var_round_trip_scalar() {
        let mut style = Style::default();
        style.set_var(StyleVar::LinkHoverDistance, StyleVarValue::Float(17.0));
        assert_eq!(
            style.var(StyleVar::LinkHoverDistance),
            StyleVarValue::Float(17.0)
        );
        assert_eq!(style.link_hover_distance, 17.0);
    }

    #[test]
    fn test_var_round_trip_vec2() {
        let mut style = Style::default();
        let v = Vec2::new(3.0, 5.0);
        style.set_var(StyleVar::NodePadding, StyleVarValue::Vec2(v));
        assert_eq!(style.var(StyleVar::NodePadding), StyleVarValue::Vec2(v));
        assert_eq!(style.node_padding, v);
    }

    #[test]
    #[should_panic(expected = "requires a Vec2 value")]
    fn test_scalar_into_vec2_slot_panics() {
        let mut style = Style::default();
        style.set_var(StyleVar::NodePadding, StyleVarValue::Float(1.0));
    }

    #[test]
    #[should_panic(expected = "requires a scalar value")]
    fn test_vec2_into_scalar_slot_panics() {
        let mut style = Style::default();
        style.set_var(StyleVar::GridSpacing, StyleVarValue::Vec2(Vec2::ONE));
    }
}
