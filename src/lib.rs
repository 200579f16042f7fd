//! # Image Tooltip
//!
//! Hover previews for image attachments on wiki pages.
//!
//! Elements carrying a marker class (`jqImageTooltip` by default) get a
//! tooltip that, when the pointer rests on them, shows a scaled thumbnail
//! produced by the wiki's image service. Each element declares its image and
//! sizing through an embedded metadata literal and `data-*` attributes.
//!
//! ## Features
//!
//! - **Live activation**: elements are claimed as they appear in the document, exactly once
//! - **Layered configuration**: defaults, metadata, then data attributes
//! - **Type filtering**: only previewable attachment types get a tooltip
//! - **Lazy URLs**: the thumbnail URL is built only when a tooltip shows
//! - **Service policies**: `latest` rasterizes vector images, `legacy` links them directly
//!
//! ## Architecture
//!
//! - [`element`] - Document model, insertion stream and marker matching
//! - [`preview`] - Configuration resolution and the activation pipeline
//! - [`media`] - Attachment type detection and allow-lists
//! - [`thumbnail`] - Site paths, service policies and URL construction
//! - [`tooltip`] - Widget seam and the in-memory hover widget
//! - [`scan`] - Static scanning of rendered HTML pages
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust
//! use image_tooltip::{Document, Element, HoverTooltips, ImagePreview, PreviewSettings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let prefs: &[(&str, &str)] = &[("SCRIPTURLPATH", "/bin"), ("PUBURLPATH", "/pub")];
//!     let tooltips = HoverTooltips::new();
//!     let preview = ImagePreview::install(prefs, tooltips.clone(), PreviewSettings::default())
//!         .expect("site preferences are complete");
//!
//!     let doc = Document::new();
//!     let mut events = doc.subscribe();
//!     let link = doc.insert(
//!         Element::new("a")
//!             .with_class("jqImageTooltip")
//!             .with_metadata(r#"{"web": "Sandbox", "topic": "WebHome"}"#)
//!             .with_data("image", "photo.JPG"),
//!     );
//!     preview.drain(&mut events);
//!
//!     let shown = tooltips.show_now(link.id()).unwrap();
//!     assert_eq!(
//!         shown.src,
//!         "/bin/rest/ImagePlugin/process?topic=Sandbox.WebHome&file=photo.JPG&width=300&height=300&crop=off"
//!     );
//! }
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod media;
pub mod preview;
pub mod scan;
pub mod thumbnail;
pub mod tooltip;

// Re-export commonly used types
pub use config::{Cli, Command, ReportFormat, ScanConfig, SiteArgs, UrlConfig, UrlOutputFormat};
pub use element::{
    Document, DocumentEvent, DocumentSubscription, Element, ElementId, ElementMatcher,
    DEFAULT_MARKER_CLASS,
};
pub use error::{ConfigError, InstallError, ScanError, SiteError};
pub use media::{detect_media, is_previewable, AllowList, MediaKind};
pub use preview::{
    resolve, Activation, Crop, DeclaredConfig, ImagePreview, Param, PreviewSettings,
    ResolvedConfig, SkipReason,
};
pub use scan::{scan_page, PageScan};
pub use thumbnail::{Revision, ServicePolicy, SiteUrls, Thumbnail, UrlBuilder};
pub use tooltip::{HoverTooltips, ImageContent, TooltipOptions, TooltipPhase, TooltipWidget};
