//! Page model and marker matching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Document                  │
//! │  (elements + insert/remove events)      │
//! └────────────────────┬────────────────────┘
//!                      │ DocumentSubscription
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            ElementMatcher               │
//! │  (marker class, activate exactly once)  │
//! └────────────────────┬────────────────────┘
//!                      │ MatchEvent
//!                      ▼
//!               ImagePreview
//! ```
//!
//! # Usage
//!
//! ```
//! use image_tooltip::element::{Document, Element, ElementMatcher};
//!
//! let doc = Document::new();
//! let link = doc.insert(Element::new("a").with_class("jqImageTooltip"));
//!
//! let matcher = ElementMatcher::default();
//! assert!(matcher.claim(&link));
//! assert!(!matcher.claim(&link));
//! ```

mod binding;
mod document;
mod matcher;

pub use binding::{Declarations, Element, ElementId};
pub use document::{Document, DocumentEvent, DocumentSubscription};
pub use matcher::{ElementMatcher, MatchEvent, DEFAULT_MARKER_CLASS};
