//! Link validation: the checks applied when a dragged link hovers or is
//! released over a candidate pin.
//!
//! Validation runs against the committed snapshot, so it sees the same
//! geometry the drag itself does. Failures are expected during normal use
//! (the user waves a drag over all sorts of pins) and are not logged.

use thiserror::Error;

use crate::frame::{FrameSnapshot, PinKind};

/// Why a candidate pin cannot complete the current link drag.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("link would start and end on the same pin {0}")]
    SamePin(i32),
    #[error("link would connect node {0} to itself")]
    SameNode(i32),
    #[error("pins {0} and {1} have the same polarity")]
    SamePolarity(i32, i32),
    #[error("pin {0} is a static attribute and cannot be linked")]
    StaticPin(i32),
    #[error("a link between pins {0} and {1} already exists")]
    Duplicate(i32, i32),
    #[error("pin {0} was not declared this frame")]
    PinNotFound(i32),
}

/// Check whether a link from `start_attribute` to `candidate` would be
/// valid: opposite polarities, different nodes, and not a duplicate of a
/// declared link (in either direction).
pub fn link_would_connect(
    start_attribute: i32,
    candidate: i32,
    snapshot: &FrameSnapshot,
) -> Result<(), LinkError> {
    if start_attribute == candidate {
        return Err(LinkError::SamePin(candidate));
    }

    let start = snapshot
        .pin(start_attribute)
        .ok_or(LinkError::PinNotFound(start_attribute))?;
    let end = snapshot
        .pin(candidate)
        .ok_or(LinkError::PinNotFound(candidate))?;

    if start.kind == PinKind::Static {
        return Err(LinkError::StaticPin(start.id));
    }
    if end.kind == PinKind::Static {
        return Err(LinkError::StaticPin(end.id));
    }
    if start.node_id == end.node_id {
        return Err(LinkError::SameNode(start.node_id));
    }
    if start.kind == end.kind {
        return Err(LinkError::SamePolarity(start.id, end.id));
    }

    let exists = snapshot.links.iter().any(|l| {
        (l.start_attribute == start_attribute && l.end_attribute == candidate)
            || (l.start_attribute == candidate && l.end_attribute == start_attribute)
    });
    if exists {
        return Err(LinkError::Duplicate(start_attribute, candidate));
    }

    Ok(())
}
