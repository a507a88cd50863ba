//! Highlight marker and scroll positioning
//!
//! Exactly one document element carries the "currently being read" marker
//! at any time. Moving the marker also computes where the host should
//! scroll so the element sits comfortably in the viewport.

use crate::dom::{Document, NodeId, Rect};
use serde::{Deserialize, Serialize};

/// Class added to the element currently being read
pub const HIGHLIGHT_CLASS: &str = "readaloud-highlight";

/// Guard band at the viewport edges; elements inside it count as off-screen
const EDGE_GUARD: f32 = 100.0;

/// Where an off-screen element's top lands after scrolling
const LANDING_OFFSET: f32 = 150.0;

/// Host viewport geometry at the time of a play call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible height in CSS pixels
    pub height: f32,
    /// Current scroll offset from the document top
    pub scroll_top: f32,
}

impl Viewport {
    pub fn new(height: f32, scroll_top: f32) -> Self {
        Self { height, scroll_top }
    }
}

/// Scroll request handed back to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollCommand {
    /// Target scroll offset from the document top, never negative
    pub top: f32,
    /// Always animated, never an instant jump
    pub smooth: bool,
}

/// Owner of the single highlight marker
#[derive(Debug, Default)]
pub struct Highlighter {
    current: Option<NodeId>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently marked element, if any
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Move the marker to `id` and compute the scroll target for it
    pub fn set_current(
        &mut self,
        doc: &mut Document,
        id: NodeId,
        viewport: Viewport,
    ) -> ScrollCommand {
        self.clear(doc);
        doc.get_mut(id).add_class(HIGHLIGHT_CLASS);
        self.current = Some(id);
        scroll_target(doc.get(id).rect, viewport)
    }

    /// Remove the marker, if present
    pub fn clear(&mut self, doc: &mut Document) {
        if let Some(prev) = self.current.take() {
            doc.get_mut(prev).remove_class(HIGHLIGHT_CLASS);
        }
    }
}

/// Compute where to scroll so an element is comfortably visible
///
/// Off-screen above (or within the top guard band): scroll so the element
/// top lands just below the viewport top. Off-screen below: same landing
/// target. Already visible: center it vertically. Clamped at the document
/// top.
pub fn scroll_target(rect: Rect, viewport: Viewport) -> ScrollCommand {
    let top = rect.top - viewport.scroll_top;
    let bottom = top + rect.height;

    let target = if top < EDGE_GUARD || bottom > viewport.height - EDGE_GUARD {
        viewport.scroll_top + top - LANDING_OFFSET
    } else {
        viewport.scroll_top + top - viewport.height / 2.0 + rect.height / 2.0
    };

    ScrollCommand {
        top: target.max(0.0),
        smooth: true,
    }
}
