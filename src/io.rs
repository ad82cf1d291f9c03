//! Input configuration and the per-frame input sample.
//!
//! The engine never polls a windowing system. The host samples its toolkit
//! once per frame and hands the result over as a [`FrameInput`]. Button
//! click/release edges are derived internally by comparing against the
//! previous frame, so hosts only report level state.

use crate::math::Rect;
use glam::Vec2;

/// Engine-wide input behavior configuration.
#[derive(Clone, Copy, Debug)]
pub struct Io {
    /// When set, holding the pan modifier (see
    /// [`FrameInput::pan_modifier_down`]) turns a primary-button drag over
    /// empty canvas into a pan, emulating a three-button mouse.
    pub emulate_three_button_mouse: bool,
    /// When set, clicking a link while the detach modifier is held detaches
    /// the link at the endpoint nearer the cursor.
    pub link_detach_with_modifier_click: bool,
    /// Pan speed, in pixels per second, applied while a drag gesture holds
    /// the cursor outside the canvas.
    pub auto_panning_speed: f32,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            emulate_three_button_mouse: false,
            link_detach_with_modifier_click: false,
            auto_panning_speed: 1000.0,
        }
    }
}

/// One frame's worth of sampled input, all in screen space.
///
/// The alternate pan button is whichever button the host chose to map
/// (conventionally the middle button); the engine only sees its state.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// The canvas widget's rectangle in screen space.
    pub canvas_rect: Rect,
    pub cursor: Vec2,
    pub primary_down: bool,
    /// Alternate pan mouse button (middle button by convention).
    pub alt_button_down: bool,
    /// Modifier combined with the primary button to pan, when
    /// [`Io::emulate_three_button_mouse`] is enabled.
    pub pan_modifier_down: bool,
    /// Modifier enabling link detach on click, when
    /// [`Io::link_detach_with_modifier_click`] is enabled.
    pub detach_modifier_down: bool,
    /// Multi-select modifier (platform Ctrl/Cmd by convention).
    pub multi_select_down: bool,
    /// Seconds since the previous frame, used for auto-panning.
    pub delta_time: f32,
}

/// Pointer state with click/release edges resolved against the previous
/// frame's sample.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PointerState {
    pub pos: Vec2,
    pub delta: Vec2,
    pub primary_down: bool,
    pub primary_clicked: bool,
    pub primary_released: bool,
    pub alt_down: bool,
    pub alt_clicked: bool,
    pub alt_released: bool,
    pub pan_modifier_down: bool,
    pub detach_modifier_down: bool,
    pub multi_select_down: bool,
}

impl PointerState {
    pub(crate) fn derive(
        input: &FrameInput,
        prev_cursor: Vec2,
        prev_primary_down: bool,
        prev_alt_down: bool,
    ) -> Self {
        Self {
            pos: input.cursor,
            delta: input.cursor - prev_cursor,
            primary_down: input.primary_down,
            primary_clicked: input.primary_down && !prev_primary_down,
            primary_released: !input.primary_down && prev_primary_down,
            alt_down: input.alt_button_down,
            alt_clicked: input.alt_button_down && !prev_alt_down,
            alt_released: !input.alt_button_down && prev_alt_down,
            pan_modifier_down: input.pan_modifier_down,
            detach_modifier_down: input.detach_modifier_down,
            multi_select_down: input.multi_select_down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clicked_edge_fires_once() {
        let input = FrameInput {
            primary_down: true,
            ..Default::default()
        };
        let first = PointerState::derive(&input, Vec2::ZERO, false, false);
        assert!(first.primary_clicked);
        assert!(!first.primary_released);

        // Held down on the next frame: no new click edge
        let second = PointerState::derive(&input, Vec2::ZERO, true, false);
        assert!(!second.primary_clicked);
        assert!(second.primary_down);
    }

    #[test]
    fn test_released_edge() {
        let input = FrameInput::default();
        let state = PointerState::derive(&input, Vec2::ZERO, true, false);
        assert!(state.primary_released);
        assert!(!state.primary_down);
        assert!(!state.primary_clicked);
    }

    #[test]
    fn test_cursor_delta() {
        let input = FrameInput {
            cursor: Vec2::new(110.0, 95.0),
            ..Default::default()
        };
        let state = PointerState::derive(&input, Vec2::new(100.0, 100.0), false, false);
        assert_eq!(state.delta, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_alt_button_edges() {
        let input = FrameInput {
            alt_button_down: true,
            ..Default::default()
        };
        let state = PointerState::derive(&input, Vec2::ZERO, false, false);
        assert!(state.alt_clicked);
        assert!(!state.alt_released);

        let released = PointerState::derive(&FrameInput::default(), Vec2::ZERO, false, true);
        assert!(released.alt_released);
    }
}
