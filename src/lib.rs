//! # node-canvas
//!
//! An immediate-mode interaction engine for node-graph editors. The host
//! re-declares its nodes, attributes and links every frame, hands over one
//! input sample, and gets back hover state, selection, gestures and link
//! events plus the geometry needed to draw the canvas.
//!
//! The crate renders nothing and polls no windowing system: it is the layer
//! between a graph data model and whatever UI toolkit draws the result.
//!
//! ## Quick Start
//!
//! ```
//! use node_canvas::{Context, FrameInput, PinShape, Rect};
//! use glam::Vec2;
//!
//! let mut ctx = Context::new();
//!
//! // Once per frame:
//! let input = FrameInput {
//!     canvas_rect: Rect::from_pos_size(Vec2::ZERO, Vec2::new(1280.0, 720.0)),
//!     ..Default::default()
//! };
//! let mut frame = ctx.frame(input);
//! frame.begin_node(1);
//! frame.begin_node_title_bar();
//! frame.add_item(Vec2::new(120.0, 20.0)); // measured title widget
//! frame.end_node_title_bar();
//! frame.begin_output_attribute(10, PinShape::CircleFilled);
//! frame.add_item(Vec2::new(100.0, 24.0)); // measured attribute widget
//! frame.end_output_attribute();
//! frame.end_node();
//! frame.end();
//!
//! // Then query results and draw from the committed geometry.
//! if let Some(created) = ctx.default_editor().link_created() {
//!     println!("connect {} -> {}", created.start_attribute, created.end_attribute);
//! }
//! for node in &ctx.default_editor().geometry().nodes {
//!     // draw node.rect, node.title_rect, ...
//! }
//! ```
//!
//! ## Core Types
//!
//! - [`Context`] - shared style, input configuration and override stacks
//! - [`Frame`] - the per-frame declaration scope
//! - [`EditorContext`] - per-canvas persistent state and the query API
//! - [`FrameSnapshot`] - committed geometry for rendering and hit testing
//!
//! Interaction is resolved against the geometry committed by the *previous*
//! frame; the sizes declared this frame become authoritative when
//! [`Frame::end`] runs.

pub mod context;
pub mod coords;
pub mod editor;
pub mod events;
pub mod frame;
pub mod io;
pub mod link;
pub mod math;
pub mod minimap;
pub mod path;
pub mod selection;
pub mod style;

mod gesture;

pub use context::{Context, Frame};
pub use coords::{CanvasTransform, CoordinateSpace};
pub use editor::{EditorContext, PendingLink};
pub use events::{LinkCreated, LinkDropped};
pub use frame::{
    AttributeFlags, FrameSnapshot, LinkGeometry, NodeGeometry, PinGeometry, PinKind, PinShape,
    RESERVED_ID,
};
pub use io::{FrameInput, Io};
pub use link::{link_would_connect, LinkError};
pub use math::{snap_to_grid, Rect};
pub use minimap::{MiniMapLocation, MiniMapNodeHoverCallback};
pub use path::{bezier_overlaps_rect, distance_to_bezier, CubicBezier};
pub use selection::SelectionManager;
pub use style::{rgba, ColorSlot, Style, StyleFlags, StyleVar, StyleVarValue};
