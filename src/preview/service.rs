//! Image preview pipeline.
//!
//! The [`ImagePreview`] is the main entry point. For every marker element it:
//!
//! 1. claims the element (exactly once)
//! 2. reads and resolves the declared configuration
//! 3. filters by media type
//! 4. arms a tooltip whose content builds the thumbnail URL when shown
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ImagePreview                          │
//! │                                                              │
//! │  ElementMatcher ──▶ resolve() ──▶ is_previewable() ──▶ attach│
//! │                                                         │    │
//! │                                  content (on show) ◀────┘    │
//! │                                        │                     │
//! │                                        ▼                     │
//! │                                   UrlBuilder                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::element::{
    DocumentEvent, DocumentSubscription, Element, ElementId, ElementMatcher, MatchEvent,
};
use crate::error::InstallError;
use crate::media::is_previewable;
use crate::thumbnail::{Preferences, ServicePolicy, SiteUrls, Thumbnail, UrlBuilder};
use crate::tooltip::{ContentFn, ImageContent, TooltipOptions, TooltipWidget, CONTENT_CLASS};

use super::resolve::{read_declarations, resolve, ResolvedConfig};

// =============================================================================
// Settings
// =============================================================================

/// Site-wide preview settings.
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Class marking elements that want a preview
    pub marker_class: String,

    /// Service contract generation
    pub policy: ServicePolicy,

    /// Base layer of every element's configuration
    pub defaults: ResolvedConfig,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            marker_class: crate::element::DEFAULT_MARKER_CLASS.to_string(),
            policy: ServicePolicy::LATEST,
            defaults: ResolvedConfig::default(),
        }
    }
}

// =============================================================================
// Activation
// =============================================================================

/// Why an element did not get a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// The element lacks the marker class
    NotMarked,

    /// The element was activated before
    AlreadyActive,

    /// No image was declared
    MissingImage,

    /// The image type is not on the allow-list
    UnsupportedType { image: String },

    /// The metadata literal is not an object literal
    InvalidDeclaration { message: String },
}

/// Outcome of activating one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Activation {
    /// A tooltip was armed with this configuration
    Armed { config: ResolvedConfig },

    /// No tooltip was attached
    Skipped(SkipReason),
}

impl Activation {
    pub fn is_armed(&self) -> bool {
        matches!(self, Activation::Armed { .. })
    }
}

// =============================================================================
// ImagePreview
// =============================================================================

/// Binds marker elements to lazily built image tooltips.
///
/// # Example
///
/// ```
/// use image_tooltip::element::{Document, Element};
/// use image_tooltip::preview::{ImagePreview, PreviewSettings};
/// use image_tooltip::thumbnail::SiteUrls;
/// use image_tooltip::tooltip::HoverTooltips;
///
/// let preview = ImagePreview::new(
///     SiteUrls::new("/bin", "/pub"),
///     HoverTooltips::new(),
///     PreviewSettings::default(),
/// );
///
/// let doc = Document::new();
/// let link = doc.insert(
///     Element::new("a")
///         .with_class("jqImageTooltip")
///         .with_data("web", "Sandbox")
///         .with_data("topic", "WebHome")
///         .with_data("image", "photo.jpg"),
/// );
///
/// assert!(preview.activate(&link).is_armed());
/// assert_eq!(preview.content_requests(), 0);
/// ```
pub struct ImagePreview<W: TooltipWidget> {
    matcher: ElementMatcher,
    builder: UrlBuilder,
    defaults: ResolvedConfig,
    widget: W,
    content_requests: Arc<AtomicUsize>,
}

impl<W: TooltipWidget> ImagePreview<W> {
    /// Create a preview pipeline for a site.
    pub fn new(site: SiteUrls, widget: W, settings: PreviewSettings) -> Self {
        Self {
            matcher: ElementMatcher::new(settings.marker_class),
            builder: UrlBuilder::new(Arc::new(site), settings.policy),
            defaults: settings.defaults,
            widget,
            content_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a preview pipeline after checking the environment.
    ///
    /// Fails, disabling the feature as a whole, when the widget cannot run or
    /// the host preferences lack the site paths.
    pub fn install<P: Preferences + ?Sized>(
        prefs: &P,
        widget: W,
        settings: PreviewSettings,
    ) -> Result<Self, InstallError> {
        if let Err(reason) = widget.check_support() {
            warn!(reason = %reason, "image previews disabled");
            return Err(InstallError::UnsupportedWidget(reason));
        }
        let site = SiteUrls::from_preferences(prefs).map_err(|e| {
            warn!(error = %e, "image previews disabled");
            InstallError::from(e)
        })?;

        info!(
            marker = %settings.marker_class,
            operation = settings.policy.operation.as_str(),
            "image previews installed"
        );
        Ok(Self::new(site, widget, settings))
    }

    pub fn matcher(&self) -> &ElementMatcher {
        &self.matcher
    }

    pub fn builder(&self) -> &UrlBuilder {
        &self.builder
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Number of times tooltip content has been produced.
    pub fn content_requests(&self) -> usize {
        self.content_requests.load(Ordering::Relaxed)
    }

    /// Activate a single element.
    pub fn activate(&self, element: &Arc<Element>) -> Activation {
        if !element.has_class(self.matcher.marker()) {
            return Activation::Skipped(SkipReason::NotMarked);
        }
        if !self.matcher.claim(element) {
            return Activation::Skipped(SkipReason::AlreadyActive);
        }
        self.bind(element)
    }

    /// Process every event already queued on `subscription`.
    ///
    /// Returns the activation outcome of each newly activated element.
    pub fn drain(&self, subscription: &mut DocumentSubscription) -> Vec<(ElementId, Activation)> {
        let mut outcomes = Vec::new();
        while let Some(event) = subscription.try_next() {
            match event {
                DocumentEvent::Inserted(element) => {
                    if self.matcher.claim(&element) {
                        outcomes.push((element.id(), self.bind(&element)));
                    }
                }
                DocumentEvent::Removed(id) => self.widget.detach(id),
            }
        }
        outcomes
    }

    /// Follow the document until it is dropped, activating marker elements as
    /// they appear and detaching tooltips of removed elements.
    ///
    /// Returns the number of elements activated.
    pub async fn watch(&self, subscription: DocumentSubscription) -> usize {
        self.matcher
            .watch(subscription, |event| match event {
                MatchEvent::Activated(element) => {
                    self.bind(&element);
                }
                MatchEvent::Removed(id) => self.widget.detach(id),
            })
            .await
    }

    /// Resolve, filter and attach. The element is already claimed.
    fn bind(&self, element: &Element) -> Activation {
        let id = element.id();
        let (declared, specific) = match read_declarations(element.declarations()) {
            Ok(sources) => sources,
            Err(e) => {
                warn!(element = %id, error = %e, "ignoring element with malformed metadata");
                return Activation::Skipped(SkipReason::InvalidDeclaration {
                    message: e.to_string(),
                });
            }
        };
        let config = resolve(&self.defaults, &declared, &specific);

        let image = match config.image.as_deref() {
            Some(image) if !image.is_empty() => image,
            _ => {
                debug!(element = %id, "no image declared");
                return Activation::Skipped(SkipReason::MissingImage);
            }
        };
        if !is_previewable(image, self.builder.policy().allow) {
            debug!(element = %id, image = image, "image type not previewable");
            return Activation::Skipped(SkipReason::UnsupportedType {
                image: image.to_string(),
            });
        }

        let options = TooltipOptions::from_config(&config);
        self.widget
            .attach(element, options, self.content_fn(id, config.clone()));
        debug!(element = %id, image = ?config.image, "tooltip armed");
        Activation::Armed { config }
    }

    fn content_fn(&self, id: ElementId, config: ResolvedConfig) -> ContentFn {
        let builder = self.builder.clone();
        let counter = Arc::clone(&self.content_requests);
        Arc::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            let thumbnail = builder.thumbnail(&config);
            let src = builder.site().absolutize(&thumbnail.path());
            debug!(element = %id, src = %src, "tooltip content requested");
            match thumbnail {
                Thumbnail::StaticAsset { width, height, .. } => ImageContent {
                    src,
                    width: Some(width.to_string()),
                    height: Some(height.to_string()),
                    class: CONTENT_CLASS.to_string(),
                },
                Thumbnail::Service(_) => ImageContent {
                    src,
                    width: None,
                    height: None,
                    class: CONTENT_CLASS.to_string(),
                },
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
