//! The gesture state machine and the frame-end resolve pass.
//!
//! Exactly one gesture is active at a time. Input is resolved against the
//! geometry committed by the previous frame, so everything here reads
//! `self.snapshot` before it is replaced by the new frame's buffers.

use glam::Vec2;

use crate::editor::EditorContext;
use crate::events::LinkDropped;
use crate::frame::{AttributeFlags, FrameSnapshot};
use crate::hit_test::{hit_test, links_in_rect, nodes_in_rect, HitResult};
use crate::io::{FrameInput, Io, PointerState};
use crate::link::link_would_connect;
use crate::math::{snap_to_grid, Rect};
use crate::style::{Style, StyleFlags};

/// An in-flight link drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LinkDrag {
    pub start_attribute: i32,
    /// The drag began by detaching an existing link.
    pub from_detach: bool,
    /// Compatible pin currently under the cursor.
    pub snapped_pin: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Panning,
    DraggingNode {
        node_id: i32,
        /// Cursor position relative to the node origin at grab time, so the
        /// node does not jump under the cursor.
        drag_offset: Vec2,
    },
    DraggingLink(LinkDrag),
    BoxSelecting {
        anchor: Vec2,
        rect: Rect,
    },
}

impl EditorContext {
    /// Frame-end resolution: derive pointer edges, run the mini-map
    /// intercept, hover the previous snapshot, advance the gesture machine,
    /// then commit the new snapshot.
    pub(crate) fn resolve(
        &mut self,
        input: &FrameInput,
        io: &Io,
        style: &Style,
        new_snapshot: FrameSnapshot,
        active_attribute: Option<i32>,
    ) {
        self.events.clear();
        let pointer = PointerState::derive(
            input,
            self.prev_cursor,
            self.prev_primary_down,
            self.prev_alt_down,
        );
        self.canvas_rect = input.canvas_rect;

        let transform = self.transform();
        let cursor_grid = transform.screen_to_grid(pointer.pos);
        let cursor_editor = transform.screen_to_editor(pointer.pos);
        let in_canvas = input.canvas_rect.contains(pointer.pos);

        // The mini-map swallows the cursor entirely while hovered.
        let over_minimap = in_canvas && self.minimap.contains(cursor_editor);
        if over_minimap {
            let hovered = self.minimap.node_at(cursor_editor, &self.snapshot);
            self.events.minimap_hovered_node = hovered;
            if let Some(id) = hovered {
                if let Some(callback) = self.minimap.hover_callback.as_mut() {
                    callback(id);
                }
                if pointer.primary_clicked {
                    self.move_to_node(id);
                }
            }
        }

        let hit = if in_canvas && !over_minimap {
            hit_test(cursor_grid, &self.snapshot, style)
        } else {
            HitResult::default()
        };
        let hovered_pin = hit.pin;
        let hovered_link = if hovered_pin.is_none() { hit.link } else { None };
        let hovered_node = if hovered_pin.is_none() && hovered_link.is_none() {
            hit.node
        } else {
            None
        };
        self.events.editor_hovered = in_canvas && !over_minimap;
        self.events.hovered_pin = hovered_pin;
        self.events.hovered_link = hovered_link;
        self.events.hovered_node = hovered_node;

        // The compatible link target under the cursor, for drag updates and
        // releases alike.
        let link_target = match self.gesture {
            Gesture::DraggingLink(drag) => hovered_pin
                .filter(|&pin| link_would_connect(drag.start_attribute, pin, &self.snapshot).is_ok()),
            _ => None,
        };

        let over_element =
            hovered_pin.is_some() || hovered_link.is_some() || hovered_node.is_some();

        self.gesture = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {
                // Panning only starts over empty canvas; an alt-click on a
                // node, pin or link leaves the view alone.
                if pointer.alt_clicked && in_canvas && !over_minimap && !over_element {
                    Gesture::Panning
                } else if pointer.primary_clicked && in_canvas && !over_minimap {
                    if let Some(pin_id) = hovered_pin {
                        self.begin_drag_from_pin(pin_id)
                    } else if let Some(link_id) = hovered_link {
                        self.click_link(link_id, &pointer, io, cursor_grid)
                    } else if let Some(node_id) = hovered_node {
                        self.click_node(node_id, &pointer, cursor_grid)
                    } else if io.emulate_three_button_mouse && pointer.pan_modifier_down {
                        Gesture::Panning
                    } else {
                        Gesture::BoxSelecting {
                            anchor: cursor_grid,
                            rect: Rect::from_corners(cursor_grid, cursor_grid),
                        }
                    }
                } else {
                    Gesture::Idle
                }
            }
            Gesture::Panning => {
                if pointer.primary_down || pointer.alt_down {
                    self.pan += pointer.delta;
                    Gesture::Panning
                } else {
                    Gesture::Idle
                }
            }
            Gesture::DraggingNode {
                node_id,
                drag_offset,
            } => {
                if pointer.primary_down {
                    self.drag_selected_nodes(node_id, drag_offset, cursor_grid, style);
                    Gesture::DraggingNode {
                        node_id,
                        drag_offset,
                    }
                } else {
                    Gesture::Idle
                }
            }
            Gesture::DraggingLink(mut drag) => {
                if pointer.primary_down {
                    drag.snapped_pin = link_target;
                    match link_target {
                        Some(pin) if self.snap_creates(drag.start_attribute, pin) => {
                            self.emit_link_created(drag.start_attribute, pin, true);
                            Gesture::Idle
                        }
                        _ => Gesture::DraggingLink(drag),
                    }
                } else {
                    match link_target {
                        Some(pin) => self.emit_link_created(drag.start_attribute, pin, false),
                        None => {
                            self.events.link_dropped = Some(LinkDropped {
                                start_attribute: drag.start_attribute,
                                from_detach: drag.from_detach,
                            });
                        }
                    }
                    Gesture::Idle
                }
            }
            Gesture::BoxSelecting { anchor, .. } => {
                let rect = Rect::from_corners(anchor, cursor_grid);
                if pointer.primary_down {
                    Gesture::BoxSelecting { anchor, rect }
                } else {
                    let nodes = nodes_in_rect(&rect, &self.snapshot);
                    let links = links_in_rect(&rect, &self.snapshot, style);
                    if pointer.multi_select_down {
                        self.selected_nodes.toggle_all(nodes);
                        self.selected_links.toggle_all(links);
                    } else {
                        self.selected_nodes.replace_selection(nodes);
                        self.selected_links.replace_selection(links);
                    }
                    Gesture::Idle
                }
            }
        };

        // Dragging against a canvas edge scrolls the view toward the cursor.
        if !in_canvas
            && matches!(
                self.gesture,
                Gesture::DraggingNode { .. } | Gesture::DraggingLink(_) | Gesture::BoxSelecting { .. }
            )
        {
            let rect = input.canvas_rect;
            let mut dir = Vec2::ZERO;
            if pointer.pos.x < rect.min.x {
                dir.x = -1.0;
            } else if pointer.pos.x >= rect.max.x {
                dir.x = 1.0;
            }
            if pointer.pos.y < rect.min.y {
                dir.y = -1.0;
            } else if pointer.pos.y >= rect.max.y {
                dir.y = 1.0;
            }
            self.pan -= dir * io.auto_panning_speed * input.delta_time;
        }

        // Commit: the sizes measured this frame become next frame's truth.
        self.events.active_attribute = active_attribute;
        self.snapshot = new_snapshot;
        if self.minimap.active {
            self.minimap
                .layout(input.canvas_rect.size(), &self.snapshot, style);
        }
        self.prev_cursor = pointer.pos;
        self.prev_primary_down = pointer.primary_down;
        self.prev_alt_down = pointer.alt_down;
        self.frame_open = false;
    }

    /// A click on a pin either detaches the topmost attached link (when the
    /// pin opted in) or starts a fresh link drag.
    fn begin_drag_from_pin(&mut self, pin_id: i32) -> Gesture {
        let flags = self
            .snapshot
            .pin(pin_id)
            .map(|p| p.flags)
            .unwrap_or_default();
        if flags.contains(AttributeFlags::LINK_DETACH_WITH_DRAG_CLICK) {
            let attached = self
                .snapshot
                .links
                .iter()
                .rev()
                .find(|l| l.start_attribute == pin_id || l.end_attribute == pin_id);
            if let Some(link) = attached {
                let start_attribute = if link.start_attribute == pin_id {
                    link.end_attribute
                } else {
                    link.start_attribute
                };
                self.events.link_destroyed = Some(link.id);
                return Gesture::DraggingLink(LinkDrag {
                    start_attribute,
                    from_detach: true,
                    snapped_pin: None,
                });
            }
        }
        self.events.link_started = Some(pin_id);
        Gesture::DraggingLink(LinkDrag {
            start_attribute: pin_id,
            from_detach: false,
            snapped_pin: None,
        })
    }

    /// A click on a link either detaches it at the endpoint nearer the
    /// cursor (with the detach modifier) or changes the link selection.
    fn click_link(
        &mut self,
        link_id: i32,
        pointer: &PointerState,
        io: &Io,
        cursor_grid: Vec2,
    ) -> Gesture {
        if io.link_detach_with_modifier_click && pointer.detach_modifier_down {
            if let Some(link) = self.snapshot.link(link_id) {
                let near_start = (cursor_grid - link.start).length_squared()
                    < (cursor_grid - link.end).length_squared();
                // The freed end follows the cursor; the drag originates from
                // the endpoint that stays attached.
                let start_attribute = if near_start {
                    link.end_attribute
                } else {
                    link.start_attribute
                };
                self.events.link_destroyed = Some(link_id);
                return Gesture::DraggingLink(LinkDrag {
                    start_attribute,
                    from_detach: true,
                    snapped_pin: None,
                });
            }
        }
        if !pointer.multi_select_down {
            self.selected_nodes.clear();
        }
        self.selected_links
            .handle_interaction(link_id, pointer.multi_select_down);
        Gesture::Idle
    }

    /// A click on a node updates the selection, then starts a node drag if
    /// the node ends up selected and is draggable.
    fn click_node(&mut self, node_id: i32, pointer: &PointerState, cursor_grid: Vec2) -> Gesture {
        if pointer.multi_select_down {
            self.selected_nodes.handle_interaction(node_id, true);
        } else {
            self.selected_links.clear();
            if !self.selected_nodes.contains(node_id) {
                self.selected_nodes.clear();
                self.selected_nodes.select(node_id);
            }
        }

        if !self.selected_nodes.contains(node_id) {
            return Gesture::Idle;
        }
        let Some(node) = self.nodes.get(&node_id) else {
            log::debug!("clicked node {node_id} has no persistent state, skipping drag");
            return Gesture::Idle;
        };
        if !node.draggable {
            return Gesture::Idle;
        }
        Gesture::DraggingNode {
            node_id,
            drag_offset: cursor_grid - node.grid_origin,
        }
    }

    /// Move the grabbed node under the cursor and carry every other selected
    /// draggable node by the same delta. With grid snapping enabled the
    /// grabbed node sticks to grid intersections continuously.
    fn drag_selected_nodes(
        &mut self,
        node_id: i32,
        drag_offset: Vec2,
        cursor_grid: Vec2,
        style: &Style,
    ) {
        let Some(primary) = self.nodes.get(&node_id).copied() else {
            return;
        };
        let mut desired = cursor_grid - drag_offset;
        if style.flags.contains(StyleFlags::GRID_SNAPPING) {
            desired = snap_to_grid(desired, style.grid_spacing);
        }
        let delta = desired - primary.grid_origin;
        if delta == Vec2::ZERO {
            return;
        }
        for id in self.selected_nodes.ids() {
            if let Some(node) = self.nodes.get_mut(&id) {
                if node.draggable {
                    node.grid_origin += delta;
                }
            }
        }
    }

    /// Whether snapping onto `candidate` commits the link immediately.
    fn snap_creates(&self, start_attribute: i32, candidate: i32) -> bool {
        let has_flag = |id: i32| {
            self.snapshot
                .pin(id)
                .map(|p| p.flags.contains(AttributeFlags::LINK_CREATION_ON_SNAP))
                .unwrap_or(false)
        };
        has_flag(start_attribute) || has_flag(candidate)
    }

    fn emit_link_created(&mut self, start_attribute: i32, end_attribute: i32, from_snap: bool) {
        let (Some(start), Some(end)) = (
            self.snapshot.pin(start_attribute),
            self.snapshot.pin(end_attribute),
        ) else {
            log::debug!(
                "link completion between {start_attribute} and {end_attribute} \
                 references missing pins, dropping event"
            );
            return;
        };
        self.events.link_created = Some(crate::events::LinkCreated {
            start_attribute,
            end_attribute,
            start_node: start.node_id,
            end_node: end.node_id,
            from_snap,
        });
    }
}
