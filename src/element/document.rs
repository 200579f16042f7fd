//! In-memory page model with an insertion/removal event stream.
//!
//! A [`Document`] owns the elements of one page. Observers call
//! [`Document::subscribe`] and receive every element already present followed
//! by every later mutation, so content loaded after the initial render is seen
//! the same way as the initial markup.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use super::binding::{Element, ElementId};

/// A change to the document.
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    /// An element entered the document (or was re-announced by [`Document::refresh`])
    Inserted(Arc<Element>),

    /// An element left the document
    Removed(ElementId),
}

#[derive(Default)]
struct DocumentInner {
    next_id: u64,
    elements: Vec<Arc<Element>>,
    subscribers: Vec<UnboundedSender<DocumentEvent>>,
}

impl DocumentInner {
    fn broadcast(&mut self, event: DocumentEvent) {
        // Subscribers that went away are pruned on the next send
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// The live set of elements on a page.
#[derive(Default)]
pub struct Document {
    inner: Mutex<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an element and notify subscribers.
    pub fn insert(&self, mut element: Element) -> Arc<Element> {
        let mut inner = self.lock();
        inner.next_id += 1;
        element.assign_id(ElementId(inner.next_id));

        let element = Arc::new(element);
        trace!(element = %element.id(), tag = element.tag(), "element inserted");
        inner.elements.push(Arc::clone(&element));
        inner.broadcast(DocumentEvent::Inserted(Arc::clone(&element)));
        element
    }

    /// Remove an element. Returns it if it was present.
    pub fn remove(&self, id: ElementId) -> Option<Arc<Element>> {
        let mut inner = self.lock();
        let pos = inner.elements.iter().position(|e| e.id() == id)?;
        let element = inner.elements.remove(pos);
        trace!(element = %id, "element removed");
        inner.broadcast(DocumentEvent::Removed(id));
        Some(element)
    }

    /// Re-announce every present element, as a live query does after an
    /// unrelated mutation. Already activated elements are ignored by matchers.
    pub fn refresh(&self) {
        let mut inner = self.lock();
        let elements = inner.elements.clone();
        for element in elements {
            inner.broadcast(DocumentEvent::Inserted(element));
        }
    }

    /// Look up an element by id.
    pub fn get(&self, id: ElementId) -> Option<Arc<Element>> {
        self.lock().elements.iter().find(|e| e.id() == id).cloned()
    }

    /// Snapshot of the elements in document order.
    pub fn elements(&self) -> Vec<Arc<Element>> {
        self.lock().elements.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().elements.is_empty()
    }

    /// Subscribe to the document.
    ///
    /// The subscription first yields an [`DocumentEvent::Inserted`] for every
    /// element already present, then live events. It ends when the document
    /// is dropped.
    pub fn subscribe(&self) -> DocumentSubscription {
        let (tx, rx) = unbounded_channel();
        let mut inner = self.lock();
        for element in &inner.elements {
            // The receiver is alive in this scope, so the send cannot fail
            let _ = tx.send(DocumentEvent::Inserted(Arc::clone(element)));
        }
        inner.subscribers.push(tx);
        DocumentSubscription { rx }
    }
}

/// Stream of [`DocumentEvent`]s for one observer.
pub struct DocumentSubscription {
    rx: UnboundedReceiver<DocumentEvent>,
}

impl DocumentSubscription {
    /// Wait for the next event. Returns `None` once the document is gone.
    pub async fn next(&mut self) -> Option<DocumentEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<DocumentEvent> {
        self.rx.try_recv().ok()
    }
}

// =============================================================================
// Tests
// =============================================================================
