//! Link curve geometry.
//!
//! Links are modeled as horizontal-biased cubic beziers between pin
//! positions. Hit testing samples the curve as a polyline; the sampling
//! density follows the style's segments-per-length setting so long curves
//! stay accurate without a fixed global sample count.

use crate::math::Rect;
use glam::Vec2;

/// Distance below which a link degenerates to a straight segment, avoiding
/// control-point zig-zags between nearly coincident pins.
const STRAIGHT_LINE_THRESHOLD: f32 = 10.0;

/// Cubic bezier used for link hit testing and renderer output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    /// Build the link curve between two pin positions.
    ///
    /// Control points extend horizontally from each endpoint by half the
    /// horizontal span, at least `min_offset`.
    pub fn link(start: Vec2, end: Vec2, min_offset: f32) -> Self {
        let d = end - start;
        if d.length_squared() < STRAIGHT_LINE_THRESHOLD * STRAIGHT_LINE_THRESHOLD {
            return Self {
                p0: start,
                p1: start,
                p2: end,
                p3: end,
            };
        }

        let offset = (d.x.abs() * 0.5).max(min_offset);
        Self {
            p0: start,
            p1: start + Vec2::new(offset, 0.0),
            p2: end - Vec2::new(offset, 0.0),
            p3: end,
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// Number of polyline segments to approximate the curve with, from the
    /// style's segments-per-length density. Never less than one.
    pub fn segment_count(&self, segments_per_length: f32) -> usize {
        // Control polygon length over-estimates the true arc length, which
        // errs on the side of more samples.
        let length = (self.p1 - self.p0).length()
            + (self.p2 - self.p1).length()
            + (self.p3 - self.p2).length();
        ((length * segments_per_length).ceil() as usize).max(1)
    }
}

fn distance_to_segment_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len_sq = ab.length_squared();
    if ab_len_sq < f32::EPSILON {
        return ap.length_squared();
    }
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length_squared()
}

/// Minimum distance from a point to the curve, via polyline sampling.
pub fn distance_to_bezier(p: Vec2, bezier: &CubicBezier, segments: usize) -> f32 {
    let segments = segments.max(1);
    let mut min_dist_sq = f32::MAX;
    let mut prev = bezier.eval(0.0);
    for i in 1..=segments {
        let t = i as f32 / segments as f32;
        let curr = bezier.eval(t);
        min_dist_sq = min_dist_sq.min(distance_to_segment_sq(p, prev, curr));
        prev = curr;
    }
    min_dist_sq.sqrt()
}

/// Whether any sampled segment of the curve crosses the rectangle.
///
/// Used by box selection so a link can be captured by sweeping over its
/// middle, not only its endpoints.
pub fn bezier_overlaps_rect(rect: &Rect, bezier: &CubicBezier, segments: usize) -> bool {
    let segments = segments.max(1);
    let mut prev = bezier.eval(0.0);
    for i in 1..=segments {
        let t = i as f32 / segments as f32;
        let curr = bezier.eval(t);
        if segment_overlaps_rect(rect, prev, curr) {
            return true;
        }
        prev = curr;
    }
    false
}

fn segment_overlaps_rect(rect: &Rect, a: Vec2, b: Vec2) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let seg_box = Rect::from_corners(a, b);
    if !rect.overlaps(&seg_box) {
        return false;
    }
    // Neither endpoint inside but the bounding boxes overlap: the segment
    // crosses the rect iff it properly intersects one of its edges.
    let corners = [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ];
    for i in 0..4 {
        if segments_intersect(a, b, corners[i], corners[(i + 1) % 4]) {
            return true;
        }
    }
    false
}

fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b - a).perp_dot(c - a)
    }
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    (o1 * o2 < 0.0) && (o3 * o4 < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CubicBezier::link() - Construction
    // ========================================================================

    #[test]
    fn test_link_endpoints_preserved() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0), 50.0);
        assert_eq!(b.p0, Vec2::new(0.0, 0.0));
        assert_eq!(b.p3, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_link_control_points_extend_horizontally() {
        let b = CubicBezier::link(Vec2::new(0.0, 50.0), Vec2::new(200.0, 50.0), 50.0);
        assert!(b.p1.x > b.p0.x);
        assert_eq!(b.p1.y, b.p0.y);
        assert!(b.p2.x < b.p3.x);
        assert_eq!(b.p2.y, b.p3.y);
    }

    #[test]
    fn test_link_min_offset_applies_to_vertical_links() {
        // Zero horizontal span: offset falls back to min_offset
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(0.0, 200.0), 50.0);
        assert_eq!(b.p1, Vec2::new(50.0, 0.0));
        assert_eq!(b.p2, Vec2::new(-50.0, 200.0));
    }

    #[test]
    fn test_link_short_distance_degenerates_to_segment() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), 50.0);
        assert_eq!(b.p0, b.p1);
        assert_eq!(b.p2, b.p3);
    }

    // ========================================================================
    // eval()
    // ========================================================================

    #[test]
    fn test_eval_boundaries() {
        let b = CubicBezier::link(Vec2::new(10.0, 20.0), Vec2::new(100.0, 80.0), 50.0);
        assert!((b.eval(0.0) - Vec2::new(10.0, 20.0)).length() < 0.001);
        assert!((b.eval(1.0) - Vec2::new(100.0, 80.0)).length() < 0.001);
    }

    #[test]
    fn test_eval_horizontal_curve_stays_on_line() {
        let b = CubicBezier::link(Vec2::new(0.0, 30.0), Vec2::new(100.0, 30.0), 50.0);
        for i in 0..=10 {
            let p = b.eval(i as f32 / 10.0);
            assert!((p.y - 30.0).abs() < 0.001);
        }
    }

    // ========================================================================
    // segment_count()
    // ========================================================================

    #[test]
    fn test_segment_count_scales_with_length() {
        let short = CubicBezier::link(Vec2::ZERO, Vec2::new(50.0, 0.0), 50.0);
        let long = CubicBezier::link(Vec2::ZERO, Vec2::new(800.0, 0.0), 50.0);
        assert!(long.segment_count(0.1) > short.segment_count(0.1));
    }

    #[test]
    fn test_segment_count_never_zero() {
        let b = CubicBezier::link(Vec2::ZERO, Vec2::ZERO, 50.0);
        assert_eq!(b.segment_count(0.1), 1);
        assert_eq!(b.segment_count(0.0), 1);
    }

    // ========================================================================
    // distance_to_bezier()
    // ========================================================================

    #[test]
    fn test_distance_on_curve_is_near_zero() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 50.0);
        assert!(distance_to_bezier(Vec2::new(0.0, 0.0), &b, 20) < 1.0);
        assert!(distance_to_bezier(Vec2::new(100.0, 0.0), &b, 20) < 1.0);
    }

    #[test]
    fn test_distance_near_curve() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 50.0);
        let d = distance_to_bezier(Vec2::new(50.0, 5.0), &b, 20);
        assert!(d > 2.0 && d < 10.0);
    }

    #[test]
    fn test_distance_far_from_curve() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 50.0);
        assert!(distance_to_bezier(Vec2::new(50.0, 100.0), &b, 20) > 90.0);
    }

    #[test]
    fn test_distance_zero_segments_is_safe() {
        let b = CubicBezier::link(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 50.0);
        let d = distance_to_bezier(Vec2::new(50.0, 10.0), &b, 0);
        assert!(d.is_finite() && d >= 0.0);
    }

    // ========================================================================
    // bezier_overlaps_rect()
    // ========================================================================

    #[test]
    fn test_overlap_endpoint_inside() {
        let b = CubicBezier::link(Vec2::new(50.0, 50.0), Vec2::new(300.0, 50.0), 50.0);
        let rect = Rect::from_pos_size(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert!(bezier_overlaps_rect(&rect, &b, 20));
    }

    #[test]
    fn test_overlap_midsection_crossing() {
        // Both endpoints outside, curve passes through the box
        let b = CubicBezier::link(Vec2::new(-200.0, 50.0), Vec2::new(300.0, 50.0), 50.0);
        let rect = Rect::from_pos_size(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert!(bezier_overlaps_rect(&rect, &b, 20));
    }

    #[test]
    fn test_overlap_miss() {
        let b = CubicBezier::link(Vec2::new(0.0, 500.0), Vec2::new(300.0, 500.0), 50.0);
        let rect = Rect::from_pos_size(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert!(!bezier_overlaps_rect(&rect, &b, 20));
    }
}
