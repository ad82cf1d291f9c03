//! Test harness driving the public frame API.
//!
//! Declares a small fixed graph every frame, the way a host application
//! would, and exposes helpers for simulating pointer input across frames.

#![allow(dead_code)]

use glam::Vec2;
use node_canvas::{
    Context, CoordinateSpace, EditorContext, Frame, FrameInput, MiniMapLocation, PinShape, Rect,
};

pub const CANVAS_SIZE: Vec2 = Vec2::new(1000.0, 800.0);

/// Node 1 sits at (100, 100) with input pin 10 and output pin 11.
pub const NODE_A: i32 = 1;
/// Node 2 sits at (500, 100) with input pin 20 and output pin 21.
pub const NODE_B: i32 = 2;

pub struct Harness {
    pub ctx: Context,
    /// Links declared every frame as (id, start_attribute, end_attribute).
    pub links: Vec<(i32, i32, i32)>,
    /// Declare a mini-map in the bottom-right corner each frame.
    pub minimap: bool,
    /// Modifier state applied to every input sample.
    pub multi_select_down: bool,
    pub detach_modifier_down: bool,
}

impl Harness {
    /// Build the harness and run one priming frame so the graph's geometry
    /// is committed and can be interacted with.
    pub fn new() -> Self {
        let mut harness = Self {
            ctx: Context::new(),
            links: Vec::new(),
            minimap: false,
            multi_select_down: false,
            detach_modifier_down: false,
        };
        harness
            .ctx
            .default_editor_mut()
            .set_node_position(NODE_A, Vec2::new(100.0, 100.0), CoordinateSpace::Grid);
        harness
            .ctx
            .default_editor_mut()
            .set_node_position(NODE_B, Vec2::new(500.0, 100.0), CoordinateSpace::Grid);
        harness.step(Vec2::ZERO, false);
        harness
    }

    /// Same, with a link from node A's output to node B's input declared
    /// every frame.
    pub fn with_link() -> Self {
        let mut harness = Self::new();
        harness.links.push((100, 11, 20));
        harness.step(Vec2::ZERO, false);
        harness
    }

    pub fn input(&self, cursor: Vec2, primary: bool) -> FrameInput {
        FrameInput {
            canvas_rect: Rect::from_pos_size(Vec2::ZERO, CANVAS_SIZE),
            cursor,
            primary_down: primary,
            multi_select_down: self.multi_select_down,
            detach_modifier_down: self.detach_modifier_down,
            delta_time: 1.0 / 60.0,
            ..Default::default()
        }
    }

    pub fn declare_node(frame: &mut Frame, id: i32, input_pin: i32, output_pin: i32) {
        frame.begin_node(id);
        frame.begin_node_title_bar();
        frame.add_item(Vec2::new(90.0, 18.0));
        frame.end_node_title_bar();
        frame.begin_input_attribute(input_pin, PinShape::CircleFilled);
        frame.add_item(Vec2::new(70.0, 20.0));
        frame.end_input_attribute();
        frame.begin_output_attribute(output_pin, PinShape::CircleFilled);
        frame.add_item(Vec2::new(70.0, 20.0));
        frame.end_output_attribute();
        frame.end_node();
    }

    /// Run one frame with the standard graph declaration.
    pub fn run(&mut self, input: FrameInput) {
        let links = self.links.clone();
        let minimap = self.minimap;
        let mut frame = self.ctx.frame(input);
        Self::declare_node(&mut frame, NODE_A, 10, 11);
        Self::declare_node(&mut frame, NODE_B, 20, 21);
        for (id, start, end) in links {
            frame.link(id, start, end);
        }
        if minimap {
            frame.mini_map(0.2, MiniMapLocation::BottomRight);
        }
        frame.end();
    }

    /// Run one frame with the standard graph plus extra declarations.
    pub fn run_with(&mut self, input: FrameInput, extra: impl FnOnce(&mut Frame)) {
        let links = self.links.clone();
        let mut frame = self.ctx.frame(input);
        Self::declare_node(&mut frame, NODE_A, 10, 11);
        Self::declare_node(&mut frame, NODE_B, 20, 21);
        for (id, start, end) in links {
            frame.link(id, start, end);
        }
        extra(&mut frame);
        frame.end();
    }

    pub fn step(&mut self, cursor: Vec2, primary: bool) {
        let input = self.input(cursor, primary);
        self.run(input);
    }

    pub fn editor(&self) -> &EditorContext {
        self.ctx.default_editor()
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        self.ctx.default_editor_mut()
    }

    /// A pin's position in screen space, accounting for the current pan.
    pub fn pin_screen_pos(&self, id: i32) -> Vec2 {
        self.editor()
            .geometry()
            .pin(id)
            .expect("pin not declared")
            .pos
            + self.editor().panning()
    }

    /// A node's center in screen space.
    pub fn node_screen_center(&self, id: i32) -> Vec2 {
        self.editor()
            .geometry()
            .node(id)
            .expect("node not declared")
            .rect
            .center()
            + self.editor().panning()
    }

    /// Press, move and release the primary button along the given points.
    pub fn drag(&mut self, path: &[Vec2]) {
        for &p in path {
            self.step(p, true);
        }
        let last = *path.last().expect("drag path must not be empty");
        self.step(last, false);
    }
}
