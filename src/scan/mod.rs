//! Static page scanning.
//!
//! Reads rendered wiki pages so the preview pipeline can be inspected
//! offline, without a browser.

mod html;

pub use html::{scan_page, split_class_attr, PageScan};
