//! Page elements that may carry an image preview.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Serialize;

/// Identifier assigned to an element when it enters a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw configuration declared in an element's markup.
///
/// `metadata` is the generic source (an object literal embedded in the markup),
/// `data` holds the more specific `data-*` attributes with the prefix removed.
#[derive(Debug, Clone, Copy)]
pub struct Declarations<'a> {
    pub metadata: Option<&'a str>,
    pub data: &'a [(String, String)],
}

/// One element of a rendered page.
///
/// The activation flag is the only mutable state and flips exactly once.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    tag: String,
    classes: Vec<String>,
    metadata: Option<String>,
    data: Vec<(String, String)>,
    activated: AtomicBool,
    declaration_reads: AtomicUsize,
}

impl Element {
    /// Create a detached element. The id is assigned on insertion.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: ElementId(0),
            tag: tag.into(),
            classes: Vec::new(),
            metadata: None,
            data: Vec::new(),
            activated: AtomicBool::new(false),
            declaration_reads: AtomicUsize::new(0),
        }
    }

    /// Add a class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Attach a metadata literal such as `{"web": "Sandbox"}`.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Add a data attribute. A leading `data-` is stripped.
    pub fn with_data(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref();
        let name = name.strip_prefix("data-").unwrap_or(name);
        self.data.push((name.to_string(), value.into()));
        self
    }

    pub(crate) fn assign_id(&mut self, id: ElementId) {
        self.id = id;
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether the element has already been claimed by a matcher.
    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }

    /// Flag the element as activated.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn try_activate(&self) -> bool {
        self.activated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Read the declared configuration sources.
    pub fn declarations(&self) -> Declarations<'_> {
        self.declaration_reads.fetch_add(1, Ordering::Relaxed);
        Declarations {
            metadata: self.metadata.as_deref(),
            data: &self.data,
        }
    }

    /// Number of times [`declarations`](Self::declarations) was called.
    pub fn declaration_reads(&self) -> usize {
        self.declaration_reads.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Tests
// =============================================================================
