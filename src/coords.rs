//! Coordinate space conversions.
//!
//! Node positions exist in three reference frames:
//!
//! * **Screen** - origin at the top-left of the window or viewport,
//! * **Editor** - origin at the top-left of the canvas widget,
//! * **Grid** - editor space translated by the current pan offset, so grid
//!   positions stay put while the view pans.
//!
//! All conversions are pure affine translations and live here; the rest of
//! the engine never does space arithmetic directly.

use glam::Vec2;

/// The coordinate space a position is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSpace {
    Screen,
    Editor,
    Grid,
}

/// Conversion context for one frame: the canvas origin in screen space and
/// the editor's current pan offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasTransform {
    /// Top-left of the canvas in screen space.
    pub origin: Vec2,
    /// Grid -> editor translation.
    pub pan: Vec2,
}

impl CanvasTransform {
    pub fn new(origin: Vec2, pan: Vec2) -> Self {
        Self { origin, pan }
    }

    pub fn screen_to_editor(&self, p: Vec2) -> Vec2 {
        p - self.origin
    }

    pub fn editor_to_screen(&self, p: Vec2) -> Vec2 {
        p + self.origin
    }

    pub fn editor_to_grid(&self, p: Vec2) -> Vec2 {
        p - self.pan
    }

    pub fn grid_to_editor(&self, p: Vec2) -> Vec2 {
        p + self.pan
    }

    pub fn screen_to_grid(&self, p: Vec2) -> Vec2 {
        p - self.origin - self.pan
    }

    pub fn grid_to_screen(&self, p: Vec2) -> Vec2 {
        p + self.origin + self.pan
    }

    /// Convert a position from the given space into grid space.
    pub fn to_grid(&self, p: Vec2, space: CoordinateSpace) -> Vec2 {
        match space {
            CoordinateSpace::Screen => self.screen_to_grid(p),
            CoordinateSpace::Editor => self.editor_to_grid(p),
            CoordinateSpace::Grid => p,
        }
    }

    /// Convert a grid space position into the given space.
    pub fn from_grid(&self, p: Vec2, space: CoordinateSpace) -> Vec2 {
        match space {
            CoordinateSpace::Screen => self.grid_to_screen(p),
            CoordinateSpace::Editor => self.grid_to_editor(p),
            CoordinateSpace::Grid => p,
        }
    }
}
