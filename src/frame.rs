//! Per-frame geometry: the declaration buffers filled while a frame is open
//! and the committed snapshot the next frame hit-tests against.
//!
//! Geometry is double buffered. Input is always resolved against the
//! previous frame's committed snapshot, so the first frame after a node
//! appears cannot interact with it yet. The sizes measured this frame become
//! authoritative when the frame ends.

use bitflags::bitflags;
use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::math::Rect;
use crate::style::Style;

/// Node, pin and link ids must never be this value; it is reserved as the
/// internal "no id" sentinel.
pub const RESERVED_ID: i32 = i32::MIN;

bitflags! {
    /// Per-attribute behavior flags, applied via the attribute flag stack.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AttributeFlags: u32 {
        /// Dragging a link attached to this pin detaches it instead of
        /// starting a second link.
        const LINK_DETACH_WITH_DRAG_CLICK = 1 << 0;
        /// A link drag snapping onto this pin creates the link immediately,
        /// without waiting for the release.
        const LINK_CREATION_ON_SNAP = 1 << 1;
    }
}

impl AttributeFlags {
    pub const NONE: AttributeFlags = AttributeFlags::empty();
}

/// Link polarity of an attribute. Static attributes take part in layout but
/// never in linking or hover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinKind {
    Input,
    Output,
    Static,
}

/// Renderer hint for pin glyphs. The engine itself only uses it for
/// pass-through to the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinShape {
    Circle,
    #[default]
    CircleFilled,
    Triangle,
    TriangleFilled,
    Quad,
    QuadFilled,
}

/// A node's committed geometry, in grid space.
#[derive(Clone, Copy, Debug)]
pub struct NodeGeometry {
    pub id: i32,
    pub rect: Rect,
    /// Title bar area, when the node declared one.
    pub title_rect: Option<Rect>,
    pub draggable: bool,
    pub background: u32,
    pub outline: u32,
    pub title_bar: u32,
}

/// A pin's committed geometry, in grid space.
#[derive(Clone, Copy, Debug)]
pub struct PinGeometry {
    pub id: i32,
    pub node_id: i32,
    pub kind: PinKind,
    pub shape: PinShape,
    pub flags: AttributeFlags,
    /// Pin glyph center, on the node edge for input/output pins.
    pub pos: Vec2,
    /// The attribute's content rectangle inside the node.
    pub attr_rect: Rect,
    pub color: u32,
}

/// A link's committed geometry with both endpoints resolved.
#[derive(Clone, Copy, Debug)]
pub struct LinkGeometry {
    pub id: i32,
    pub start_attribute: i32,
    pub end_attribute: i32,
    /// Start pin position in grid space.
    pub start: Vec2,
    /// End pin position in grid space.
    pub end: Vec2,
    pub color: u32,
}

/// Everything declared in one completed frame, indexed for lookup. Z-order
/// follows declaration order: later entries draw, and hit, on top.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub nodes: Vec<NodeGeometry>,
    pub pins: Vec<PinGeometry>,
    pub links: Vec<LinkGeometry>,
    node_index: FxHashMap<i32, usize>,
    pin_index: FxHashMap<i32, usize>,
    link_index: FxHashMap<i32, usize>,
}

impl FrameSnapshot {
    pub fn node(&self, id: i32) -> Option<&NodeGeometry> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn pin(&self, id: i32) -> Option<&PinGeometry> {
        self.pin_index.get(&id).map(|&i| &self.pins[i])
    }

    pub fn link(&self, id: i32) -> Option<&LinkGeometry> {
        self.link_index.get(&id).map(|&i| &self.links[i])
    }

    /// Bounding box of all node rectangles, in grid space. `None` when the
    /// frame declared no nodes.
    pub fn content_bounds(&self) -> Option<Rect> {
        let mut iter = self.nodes.iter();
        let first = iter.next()?.rect;
        Some(iter.fold(first, |acc, n| acc.union(&n.rect)))
    }
}

// ============================================================================
// Declaration buffers
// ============================================================================

/// A pin recorded during an attribute block. Its x position is resolved at
/// `end_node` once the node rectangle is known.
struct PendingPin {
    id: i32,
    kind: PinKind,
    shape: PinShape,
    flags: AttributeFlags,
    attr_rect: Rect,
    color: u32,
}

enum BlockKind {
    Title,
    Attribute {
        id: i32,
        kind: PinKind,
        shape: PinShape,
        flags: AttributeFlags,
        color: u32,
    },
}

/// A title bar or attribute block currently being measured.
struct OpenBlock {
    kind: BlockKind,
    origin: Vec2,
    size: Vec2,
}

struct NodeDraft {
    id: i32,
    origin: Vec2,
    draggable: bool,
    padding: Vec2,
    background: u32,
    outline: u32,
    title_bar: u32,
    /// Grid position where the next block starts.
    cursor: Vec2,
    /// Union of all closed blocks, before padding.
    content: Option<Rect>,
    title_rect: Option<Rect>,
    pins: Vec<PendingPin>,
    block: Option<OpenBlock>,
}

struct LinkDraft {
    id: i32,
    start_attribute: i32,
    end_attribute: i32,
    color: u32,
}

/// Declaration state for the frame currently being built.
#[derive(Default)]
pub(crate) struct FrameBuffers {
    nodes: Vec<NodeGeometry>,
    pins: Vec<PinGeometry>,
    links: Vec<LinkDraft>,
    node_index: FxHashMap<i32, usize>,
    pin_index: FxHashMap<i32, usize>,
    open_node: Option<NodeDraft>,
    pub(crate) active_attribute: Option<i32>,
}

impl FrameBuffers {
    fn check_id(id: i32, what: &str) {
        assert!(id != RESERVED_ID, "{what} id {RESERVED_ID} is reserved");
    }

    pub(crate) fn begin_node(
        &mut self,
        id: i32,
        origin: Vec2,
        draggable: bool,
        style: &Style,
    ) {
        Self::check_id(id, "node");
        assert!(
            self.open_node.is_none(),
            "begin_node({id}) called while node {} is still open",
            self.open_node.as_ref().map(|n| n.id).unwrap_or(RESERVED_ID)
        );
        assert!(
            !self.node_index.contains_key(&id),
            "node id {id} declared twice in one frame"
        );
        let padding = style.node_padding;
        self.open_node = Some(NodeDraft {
            id,
            origin,
            draggable,
            padding,
            background: style.color(crate::style::ColorSlot::NodeBackground),
            outline: style.color(crate::style::ColorSlot::NodeOutline),
            title_bar: style.color(crate::style::ColorSlot::TitleBar),
            cursor: origin + padding,
            content: None,
            title_rect: None,
            pins: Vec::new(),
            block: None,
        });
    }

    pub(crate) fn end_node(&mut self, style: &Style) {
        let draft = self
            .open_node
            .take()
            .unwrap_or_else(|| panic!("end_node called with no node open"));
        assert!(
            draft.block.is_none(),
            "end_node called while a title bar or attribute of node {} is still open",
            draft.id
        );

        let rect = match draft.content {
            Some(content) => content.expand(draft.padding),
            None => Rect::from_pos_size(draft.origin, draft.padding * 2.0),
        };

        let index = self.nodes.len();
        self.node_index.insert(draft.id, index);
        self.nodes.push(NodeGeometry {
            id: draft.id,
            rect,
            title_rect: draft.title_rect,
            draggable: draft.draggable,
            background: draft.background,
            outline: draft.outline,
            title_bar: draft.title_bar,
        });

        // Pin x positions hug the finished node edges; static attributes sit
        // at their content center and never take part in hit testing.
        for pin in draft.pins {
            let y = pin.attr_rect.center().y;
            let pos = match pin.kind {
                PinKind::Input => Vec2::new(rect.min.x - style.pin_offset, y),
                PinKind::Output => Vec2::new(rect.max.x + style.pin_offset, y),
                PinKind::Static => pin.attr_rect.center(),
            };
            assert!(
                !self.pin_index.contains_key(&pin.id),
                "attribute id {} declared twice in one frame",
                pin.id
            );
            let pin_index = self.pins.len();
            self.pin_index.insert(pin.id, pin_index);
            self.pins.push(PinGeometry {
                id: pin.id,
                node_id: draft.id,
                kind: pin.kind,
                shape: pin.shape,
                flags: pin.flags,
                pos,
                attr_rect: pin.attr_rect,
                color: pin.color,
            });
        }
    }

    fn open_block(&mut self, kind: BlockKind, what: &str) {
        let draft = self
            .open_node
            .as_mut()
            .unwrap_or_else(|| panic!("{what} called outside begin_node/end_node"));
        assert!(
            draft.block.is_none(),
            "{what} called while another block of node {} is open",
            draft.id
        );
        draft.block = Some(OpenBlock {
            kind,
            origin: draft.cursor,
            size: Vec2::ZERO,
        });
    }

    fn close_block(&mut self, what: &str) -> (BlockKind, Rect) {
        let draft = self
            .open_node
            .as_mut()
            .unwrap_or_else(|| panic!("{what} called outside begin_node/end_node"));
        let block = draft
            .block
            .take()
            .unwrap_or_else(|| panic!("{what} called with no matching begin"));
        let rect = Rect::from_pos_size(block.origin, block.size);
        draft.content = Some(match draft.content {
            Some(c) => c.union(&rect),
            None => rect,
        });
        // Next block starts one padding unit below this one.
        draft.cursor = Vec2::new(draft.cursor.x, rect.max.y + draft.padding.y);
        (block.kind, rect)
    }

    pub(crate) fn begin_title_bar(&mut self) {
        self.open_block(BlockKind::Title, "begin_node_title_bar");
        let draft = self.open_node.as_ref().unwrap();
        assert!(
            draft.title_rect.is_none(),
            "node {} declared two title bars",
            draft.id
        );
    }

    pub(crate) fn end_title_bar(&mut self) {
        let (kind, rect) = self.close_block("end_node_title_bar");
        assert!(
            matches!(kind, BlockKind::Title),
            "end_node_title_bar closed an attribute block"
        );
        let draft = self.open_node.as_mut().unwrap();
        draft.title_rect = Some(rect);
    }

    pub(crate) fn begin_attribute(
        &mut self,
        id: i32,
        kind: PinKind,
        shape: PinShape,
        flags: AttributeFlags,
        style: &Style,
    ) {
        Self::check_id(id, "attribute");
        let color = style.color(crate::style::ColorSlot::Pin);
        self.open_block(
            BlockKind::Attribute {
                id,
                kind,
                shape,
                flags,
                color,
            },
            "begin attribute",
        );
    }

    pub(crate) fn end_attribute(&mut self, expected: PinKind) {
        let (kind, rect) = self.close_block("end attribute");
        let BlockKind::Attribute {
            id,
            kind,
            shape,
            flags,
            color,
        } = kind
        else {
            panic!("end attribute closed a title bar block");
        };
        assert!(
            kind == expected,
            "attribute {id} was opened as {kind:?} but closed as {expected:?}"
        );
        let draft = self.open_node.as_mut().unwrap();
        draft.pins.push(PendingPin {
            id,
            kind,
            shape,
            flags,
            attr_rect: rect,
            color,
        });
    }

    /// Record the extent of one host widget inside the open block. Widgets
    /// stack vertically with no gap; the block is as wide as its widest
    /// widget.
    pub(crate) fn add_item(&mut self, size: Vec2) {
        let draft = self
            .open_node
            .as_mut()
            .unwrap_or_else(|| panic!("add_item called outside begin_node/end_node"));
        let block = draft
            .block
            .as_mut()
            .unwrap_or_else(|| panic!("add_item called outside a title bar or attribute block"));
        block.size.x = block.size.x.max(size.x);
        block.size.y += size.y;
    }

    pub(crate) fn link(&mut self, id: i32, start_attribute: i32, end_attribute: i32, style: &Style) {
        Self::check_id(id, "link");
        assert!(
            self.links.iter().all(|l| l.id != id),
            "link id {id} declared twice in one frame"
        );
        self.links.push(LinkDraft {
            id,
            start_attribute,
            end_attribute,
            color: style.color(crate::style::ColorSlot::Link),
        });
    }

    pub(crate) fn node_open(&self) -> bool {
        self.open_node.is_some()
    }

    /// Mark the attribute currently being declared as the active one, for
    /// hosts whose widget inside it has focus this frame.
    pub(crate) fn mark_active(&mut self) {
        let id = self
            .open_node
            .as_ref()
            .and_then(|n| n.block.as_ref())
            .and_then(|b| match b.kind {
                BlockKind::Attribute { id, .. } => Some(id),
                BlockKind::Title => None,
            })
            .unwrap_or_else(|| panic!("mark_attribute_active called outside an attribute block"));
        self.active_attribute = Some(id);
    }

    /// Finalize the frame into a snapshot. Links referring to attributes
    /// that were not declared this frame are dropped with a debug log rather
    /// than treated as errors, since hosts commonly remove a node one frame
    /// before pruning its links.
    pub(crate) fn commit(mut self) -> FrameSnapshot {
        assert!(
            self.open_node.is_none(),
            "frame ended while node {} is still open",
            self.open_node.as_ref().map(|n| n.id).unwrap_or(RESERVED_ID)
        );

        let mut links = Vec::with_capacity(self.links.len());
        let mut link_index = FxHashMap::default();
        for draft in self.links.drain(..) {
            let start = self.pin_index.get(&draft.start_attribute);
            let end = self.pin_index.get(&draft.end_attribute);
            let (Some(&start), Some(&end)) = (start, end) else {
                log::debug!(
                    "link {} references undeclared attribute ({} -> {}), skipping",
                    draft.id,
                    draft.start_attribute,
                    draft.end_attribute
                );
                continue;
            };
            link_index.insert(draft.id, links.len());
            links.push(LinkGeometry {
                id: draft.id,
                start_attribute: draft.start_attribute,
                end_attribute: draft.end_attribute,
                start: self.pins[start].pos,
                end: self.pins[end].pos,
                color: draft.color,
            });
        }

        FrameSnapshot {
            nodes: self.nodes,
            pins: self.pins,
            links,
            node_index: self.node_index,
            pin_index: self.pin_index,
            link_index,
        }
    }
}
