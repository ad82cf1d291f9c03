use glam::Vec2;

/// Axis-aligned rectangle used for node bodies, title bars, selection boxes
/// and the minimap area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Build a normalized rectangle from two arbitrary corners.
    ///
    /// Used for the box selector, where the anchor corner may lie on any
    /// side of the current mouse position.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Point containment: inclusive on the min edge, exclusive on the max
    /// edge, so adjacent rects never both claim a shared boundary point.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Strict overlap test: rects that merely touch edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn union_point(&self, p: Vec2) -> Rect {
        Rect {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn expand(&self, by: Vec2) -> Rect {
        Rect {
            min: self.min - by,
            max: self.max + by,
        }
    }

    pub fn translate(&self, by: Vec2) -> Rect {
        Rect {
            min: self.min + by,
            max: self.max + by,
        }
    }
}

/// Snap a position to the nearest multiple of `spacing` on both axes.
pub fn snap_to_grid(p: Vec2, spacing: f32) -> Vec2 {
    if spacing <= 0.0 {
        return p;
    }
    Vec2::new(
        (p.x / spacing).round() * spacing,
        (p.y / spacing).round() * spacing,
    )
}
