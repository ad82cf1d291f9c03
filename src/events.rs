//! Discrete per-frame event results, filled in by the resolve pass at frame
//! end and cleared when the next frame begins.

/// A completed link creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkCreated {
    pub start_attribute: i32,
    pub end_attribute: i32,
    pub start_node: i32,
    pub end_node: i32,
    /// True when the link was committed by snapping onto a compatible pin
    /// during the drag rather than by releasing over it.
    pub from_snap: bool,
}

/// A link drag that ended over empty canvas or an incompatible pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkDropped {
    /// The pin the drag originated from.
    pub start_attribute: i32,
    /// True when the drag began by detaching an existing link.
    pub from_detach: bool,
}

/// Everything the host can query after the frame closes.
#[derive(Clone, Debug, Default)]
pub struct FrameEvents {
    pub(crate) editor_hovered: bool,
    pub(crate) hovered_node: Option<i32>,
    pub(crate) hovered_link: Option<i32>,
    pub(crate) hovered_pin: Option<i32>,
    pub(crate) active_attribute: Option<i32>,
    /// Attribute id a fresh link drag started from this frame.
    pub(crate) link_started: Option<i32>,
    pub(crate) link_dropped: Option<LinkDropped>,
    pub(crate) link_created: Option<LinkCreated>,
    /// Id of a link detached (and therefore destroyed) this frame.
    pub(crate) link_destroyed: Option<i32>,
    pub(crate) minimap_hovered_node: Option<i32>,
}

impl FrameEvents {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
