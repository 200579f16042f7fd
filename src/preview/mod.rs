//! Preview pipeline: configuration resolution and element binding.
//!
//! # Components
//!
//! - [`ResolvedConfig`]: effective per-element configuration
//! - [`DeclaredConfig`]: one declared source (metadata literal or data attributes)
//! - [`resolve`]: pure layering of defaults and declared sources
//! - [`ImagePreview`]: claims marker elements and arms their tooltips

mod resolve;
mod service;

pub use resolve::{
    read_declarations, resolve, Crop, DeclaredConfig, Param, ResolvedConfig, DEFAULT_DELAY_MS,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use service::{Activation, ImagePreview, PreviewSettings, SkipReason};
