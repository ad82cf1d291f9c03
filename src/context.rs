//! The top-level context and the frame scope object.
//!
//! A [`Context`] owns the state shared by every editor: input configuration,
//! the style table and the three override stacks. Each frame the host opens
//! a [`Frame`], declares nodes, attributes and links through it, and drops
//! it via [`Frame::end`], which runs input resolution and commits the
//! frame's geometry.

use glam::Vec2;

use crate::editor::EditorContext;
use crate::frame::{AttributeFlags, FrameBuffers, PinKind, PinShape};
use crate::io::{FrameInput, Io};
use crate::minimap::{MiniMapLocation, MiniMapNodeHoverCallback};
use crate::style::{
    ColorSlot, ColorStackElement, Style, StyleVar, StyleVarStackElement, StyleVarValue,
};

pub struct Context {
    pub io: Io,
    pub style: Style,
    color_stack: Vec<ColorStackElement>,
    style_var_stack: Vec<StyleVarStackElement>,
    /// Never empty; the bottom entry is the ambient flag set.
    attribute_flag_stack: Vec<AttributeFlags>,
    default_editor: EditorContext,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            io: Io::default(),
            style: Style::default(),
            color_stack: Vec::new(),
            style_var_stack: Vec::new(),
            attribute_flag_stack: vec![AttributeFlags::NONE],
            default_editor: EditorContext::new(),
        }
    }

    /// The built-in editor used by [`Context::frame`]. Hosts with a single
    /// canvas never need their own [`EditorContext`].
    pub fn default_editor(&self) -> &EditorContext {
        &self.default_editor
    }

    pub fn default_editor_mut(&mut self) -> &mut EditorContext {
        &mut self.default_editor
    }

    /// Open a frame on the built-in editor.
    pub fn frame(&mut self, input: FrameInput) -> Frame<'_> {
        let Context {
            io,
            style,
            color_stack,
            style_var_stack,
            attribute_flag_stack,
            default_editor,
        } = self;
        Frame::open(
            io,
            style,
            color_stack,
            style_var_stack,
            attribute_flag_stack,
            default_editor,
            input,
        )
    }

    /// Open a frame on a caller-owned editor, for hosts with several
    /// canvases sharing one style.
    pub fn begin<'a>(&'a mut self, editor: &'a mut EditorContext, input: FrameInput) -> Frame<'a> {
        Frame::open(
            &self.io,
            &mut self.style,
            &mut self.color_stack,
            &mut self.style_var_stack,
            &mut self.attribute_flag_stack,
            editor,
            input,
        )
    }

    // ========================================================================
    // Style and flag stacks (between frames)
    // ========================================================================

    pub fn push_color_style(&mut self, slot: ColorSlot, color: u32) {
        push_color(&mut self.color_stack, &mut self.style, slot, color);
    }

    /// # Panics
    ///
    /// Panics when no color override is pushed.
    pub fn pop_color_style(&mut self) {
        pop_color(&mut self.color_stack, &mut self.style, 0);
    }

    pub fn push_style_var(&mut self, var: StyleVar, value: StyleVarValue) {
        push_var(&mut self.style_var_stack, &mut self.style, var, value);
    }

    /// # Panics
    ///
    /// Panics when no style variable override is pushed.
    pub fn pop_style_var(&mut self) {
        pop_var(&mut self.style_var_stack, &mut self.style, 0);
    }

    /// Add `flag` to the ambient attribute flags for subsequently declared
    /// attributes.
    pub fn push_attribute_flag(&mut self, flag: AttributeFlags) {
        push_flag(&mut self.attribute_flag_stack, flag);
    }

    /// # Panics
    ///
    /// Panics when no attribute flag is pushed.
    pub fn pop_attribute_flag(&mut self) {
        pop_flag(&mut self.attribute_flag_stack, 1);
    }
}

fn push_color(stack: &mut Vec<ColorStackElement>, style: &mut Style, slot: ColorSlot, color: u32) {
    stack.push(ColorStackElement {
        slot,
        previous: style.colors[slot as usize],
    });
    style.colors[slot as usize] = color;
}

fn pop_color(stack: &mut Vec<ColorStackElement>, style: &mut Style, floor: usize) {
    assert!(stack.len() > floor, "color style stack underflow");
    let element = stack.pop().unwrap();
    style.colors[element.slot as usize] = element.previous;
}

fn push_var(
    stack: &mut Vec<StyleVarStackElement>,
    style: &mut Style,
    var: StyleVar,
    value: StyleVarValue,
) {
    stack.push(StyleVarStackElement {
        var,
        previous: style.var(var),
    });
    style.set_var(var, value);
}

fn pop_var(stack: &mut Vec<StyleVarStackElement>, style: &mut Style, floor: usize) {
    assert!(stack.len() > floor, "style variable stack underflow");
    let element = stack.pop().unwrap();
    style.set_var(element.var, element.previous);
}

fn push_flag(stack: &mut Vec<AttributeFlags>, flag: AttributeFlags) {
    let top = *stack.last().unwrap();
    stack.push(top | flag);
}

fn pop_flag(stack: &mut Vec<AttributeFlags>, floor: usize) {
    assert!(stack.len() > floor, "attribute flag stack underflow");
    stack.pop();
}

/// One open frame on one editor. Dropping it without calling [`Frame::end`]
/// abandons the frame's declarations.
pub struct Frame<'a> {
    io: &'a Io,
    style: &'a mut Style,
    color_stack: &'a mut Vec<ColorStackElement>,
    style_var_stack: &'a mut Vec<StyleVarStackElement>,
    attribute_flag_stack: &'a mut Vec<AttributeFlags>,
    editor: &'a mut EditorContext,
    buffers: FrameBuffers,
    input: FrameInput,
    base_color_depth: usize,
    base_var_depth: usize,
    base_flag_depth: usize,
}

impl<'a> Frame<'a> {
    #[allow(clippy::too_many_arguments)]
    fn open(
        io: &'a Io,
        style: &'a mut Style,
        color_stack: &'a mut Vec<ColorStackElement>,
        style_var_stack: &'a mut Vec<StyleVarStackElement>,
        attribute_flag_stack: &'a mut Vec<AttributeFlags>,
        editor: &'a mut EditorContext,
        input: FrameInput,
    ) -> Self {
        assert!(
            !editor.frame_open,
            "a frame is already open on this editor"
        );
        editor.frame_open = true;
        editor.minimap.reset_frame();
        let base_color_depth = color_stack.len();
        let base_var_depth = style_var_stack.len();
        let base_flag_depth = attribute_flag_stack.len();
        Self {
            io,
            style,
            color_stack,
            style_var_stack,
            attribute_flag_stack,
            editor,
            buffers: FrameBuffers::default(),
            input,
            base_color_depth,
            base_var_depth,
            base_flag_depth,
        }
    }

    // ========================================================================
    // Node declaration
    // ========================================================================

    /// Begin declaring a node. Its position comes from the editor's
    /// persistent state; a node never seen before starts at the grid origin.
    pub fn begin_node(&mut self, id: i32) {
        let node = *self.editor.nodes.entry(id).or_default();
        self.buffers
            .begin_node(id, node.grid_origin, node.draggable, self.style);
    }

    pub fn end_node(&mut self) {
        self.buffers.end_node(self.style);
    }

    pub fn begin_node_title_bar(&mut self) {
        self.buffers.begin_title_bar();
    }

    pub fn end_node_title_bar(&mut self) {
        self.buffers.end_title_bar();
    }

    /// Record the measured extent of one host widget inside the open title
    /// bar or attribute.
    pub fn add_item(&mut self, size: Vec2) {
        self.buffers.add_item(size);
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn begin_input_attribute(&mut self, id: i32, shape: PinShape) {
        self.begin_attribute(id, PinKind::Input, shape);
    }

    pub fn end_input_attribute(&mut self) {
        self.buffers.end_attribute(PinKind::Input);
    }

    pub fn begin_output_attribute(&mut self, id: i32, shape: PinShape) {
        self.begin_attribute(id, PinKind::Output, shape);
    }

    pub fn end_output_attribute(&mut self) {
        self.buffers.end_attribute(PinKind::Output);
    }

    /// A static attribute takes part in layout but has no pin.
    pub fn begin_static_attribute(&mut self, id: i32) {
        self.begin_attribute(id, PinKind::Static, PinShape::default());
    }

    pub fn end_static_attribute(&mut self) {
        self.buffers.end_attribute(PinKind::Static);
    }

    fn begin_attribute(&mut self, id: i32, kind: PinKind, shape: PinShape) {
        let flags = *self.attribute_flag_stack.last().unwrap();
        self.buffers.begin_attribute(id, kind, shape, flags, self.style);
    }

    /// Mark the attribute currently being declared as active, meaning a host
    /// widget inside it has keyboard or mouse focus this frame.
    pub fn mark_attribute_active(&mut self) {
        self.buffers.mark_active();
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Declare a link between two previously declared attributes. Links may
    /// be declared after the nodes they connect, in any order.
    pub fn link(&mut self, id: i32, start_attribute: i32, end_attribute: i32) {
        self.buffers.link(id, start_attribute, end_attribute, self.style);
    }

    // ========================================================================
    // Mini-map
    // ========================================================================

    pub fn mini_map(&mut self, size_fraction: f32, location: MiniMapLocation) {
        self.editor.minimap.declare(size_fraction, location, None);
    }

    pub fn mini_map_with_callback(
        &mut self,
        size_fraction: f32,
        location: MiniMapLocation,
        callback: MiniMapNodeHoverCallback,
    ) {
        self.editor
            .minimap
            .declare(size_fraction, location, Some(callback));
    }

    // ========================================================================
    // Mid-frame style overrides
    // ========================================================================

    pub fn push_color_style(&mut self, slot: ColorSlot, color: u32) {
        push_color(self.color_stack, self.style, slot, color);
    }

    /// # Panics
    ///
    /// Panics when popping past the depth the frame started with.
    pub fn pop_color_style(&mut self) {
        pop_color(self.color_stack, self.style, self.base_color_depth);
    }

    pub fn push_style_var(&mut self, var: StyleVar, value: StyleVarValue) {
        push_var(self.style_var_stack, self.style, var, value);
    }

    pub fn pop_style_var(&mut self) {
        pop_var(self.style_var_stack, self.style, self.base_var_depth);
    }

    pub fn push_attribute_flag(&mut self, flag: AttributeFlags) {
        push_flag(self.attribute_flag_stack, flag);
    }

    pub fn pop_attribute_flag(&mut self) {
        pop_flag(self.attribute_flag_stack, self.base_flag_depth);
    }

    /// Snap a node to the style's grid spacing.
    pub fn snap_node_to_grid(&mut self, id: i32) {
        self.editor.snap_node_to_grid(id, self.style.grid_spacing);
    }

    /// Close the frame: verify the override stacks are back at their
    /// frame-start depth, resolve input against the previous frame's
    /// geometry, and commit this frame's geometry.
    ///
    /// # Panics
    ///
    /// Panics when a node is still open or when pushes made during the frame
    /// were not popped.
    pub fn end(self) {
        assert!(
            !self.buffers.node_open(),
            "frame ended while a node is still open"
        );
        assert!(
            self.color_stack.len() == self.base_color_depth,
            "color style stack unbalanced at frame end: {} pushed without pop",
            self.color_stack.len() - self.base_color_depth
        );
        assert!(
            self.style_var_stack.len() == self.base_var_depth,
            "style variable stack unbalanced at frame end: {} pushed without pop",
            self.style_var_stack.len() - self.base_var_depth
        );
        assert!(
            self.attribute_flag_stack.len() == self.base_flag_depth,
            "attribute flag stack unbalanced at frame end: {} pushed without pop",
            self.attribute_flag_stack.len() - self.base_flag_depth
        );

        let active_attribute = self.buffers.active_attribute;
        let snapshot = self.buffers.commit();
        self.editor
            .resolve(&self.input, self.io, self.style, snapshot, active_attribute);
    }
}
