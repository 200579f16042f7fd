//! Live matching of marker elements.
//!
//! The matcher turns a [`DocumentSubscription`] into activation events. An
//! element is activated when it carries the marker class and has not been
//! activated before; the flag is set before the callback runs, so repeated
//! announcements of the same element are ignored.

use std::sync::Arc;

use tracing::{debug, trace};

use super::binding::{Element, ElementId};
use super::document::{DocumentEvent, DocumentSubscription};

/// Marker class placed on elements that want an image preview.
pub const DEFAULT_MARKER_CLASS: &str = "jqImageTooltip";

/// Event delivered to the matcher's callback.
#[derive(Debug, Clone)]
pub enum MatchEvent {
    /// A marker element was activated for the first time
    Activated(Arc<Element>),

    /// An element left the document
    Removed(ElementId),
}

/// Matches elements by marker class, activating each one exactly once.
#[derive(Debug, Clone)]
pub struct ElementMatcher {
    marker: String,
}

impl Default for ElementMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_CLASS)
    }
}

impl ElementMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Claim an element for activation.
    ///
    /// Returns `true` exactly once per marker element.
    pub fn claim(&self, element: &Element) -> bool {
        element.has_class(&self.marker) && element.try_activate()
    }

    /// Drive the subscription until the document goes away.
    ///
    /// Returns the number of elements activated.
    pub async fn watch<F>(&self, mut subscription: DocumentSubscription, mut on_event: F) -> usize
    where
        F: FnMut(MatchEvent),
    {
        let mut activated = 0;
        while let Some(event) = subscription.next().await {
            match event {
                DocumentEvent::Inserted(element) => {
                    if self.claim(&element) {
                        activated += 1;
                        debug!(element = %element.id(), marker = %self.marker, "element activated");
                        on_event(MatchEvent::Activated(element));
                    } else {
                        trace!(element = %element.id(), "element ignored");
                    }
                }
                DocumentEvent::Removed(id) => on_event(MatchEvent::Removed(id)),
            }
        }
        activated
    }
}

// =============================================================================
// Tests
// =============================================================================
