//! Test utilities for integration tests.
//!
//! Provides a recording widget, element builders and page fixtures.

use std::sync::{Arc, Mutex};

use image_tooltip::element::{Element, ElementId};
use image_tooltip::preview::{ImagePreview, PreviewSettings};
use image_tooltip::thumbnail::{Revision, SiteUrls};
use image_tooltip::tooltip::{ContentFn, ImageContent, TooltipOptions, TooltipWidget};

// =============================================================================
// Recording Widget
// =============================================================================

/// A widget that records attach and detach calls.
///
/// Content callbacks are kept so tests can invoke them as a widget would.
#[derive(Clone, Default)]
pub struct RecordingWidget {
    attached: Arc<Mutex<Vec<(ElementId, TooltipOptions, ContentFn)>>>,
    detached: Arc<Mutex<Vec<ElementId>>>,
}

impl RecordingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached_ids(&self) -> Vec<ElementId> {
        self.attached.lock().unwrap().iter().map(|(id, _, _)| *id).collect()
    }

    pub fn detached_ids(&self) -> Vec<ElementId> {
        self.detached.lock().unwrap().clone()
    }

    pub fn options(&self, id: ElementId) -> Option<TooltipOptions> {
        self.attached
            .lock()
            .unwrap()
            .iter()
            .find(|(i, _, _)| *i == id)
            .map(|(_, o, _)| o.clone())
    }

    /// Produce the content of an attached tooltip, as showing it would.
    pub fn show(&self, id: ElementId) -> Option<ImageContent> {
        let content = self
            .attached
            .lock()
            .unwrap()
            .iter()
            .find(|(i, _, _)| *i == id)
            .map(|(_, _, c)| Arc::clone(c))?;
        Some(content())
    }
}

impl TooltipWidget for RecordingWidget {
    fn attach(&self, element: &Element, options: TooltipOptions, content: ContentFn) {
        self.attached
            .lock()
            .unwrap()
            .push((element.id(), options, content));
    }

    fn detach(&self, id: ElementId) {
        self.detached.lock().unwrap().push(id);
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Site used by most tests.
pub fn site() -> SiteUrls {
    SiteUrls::new("/bin", "/pub")
}

pub fn settings(revision: Revision) -> PreviewSettings {
    PreviewSettings {
        policy: revision.policy(),
        ..Default::default()
    }
}

pub fn recording_preview(revision: Revision) -> (ImagePreview<RecordingWidget>, RecordingWidget) {
    let widget = RecordingWidget::new();
    let preview = ImagePreview::new(site(), widget.clone(), settings(revision));
    (preview, widget)
}

/// A marker element declaring web, topic and image through data attributes.
pub fn marked(web: &str, topic: &str, image: &str) -> Element {
    Element::new("a")
        .with_class("jqImageTooltip")
        .with_data("web", web)
        .with_data("topic", topic)
        .with_data("image", image)
}

// =============================================================================
// Page Fixtures
// =============================================================================

/// A rendered page with preferences, two previewable links, one unsupported
/// attachment and one unmarked link.
pub const GALLERY_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
<script class='$foswikiPreferences' type='text/json'>{"SCRIPTURLPATH":"/foswiki/bin","SCRIPTSUFFIX":".pl","PUBURLPATH":"/foswiki/pub","URLHOST":"https://wiki.example.org"}</script>
</head>
<body>
<table>
<tr><td><a class='jqImageTooltip {"web":"Projects.Alpha","topic":"Gallery","image":"Summer Party.JPG"}' href="#">party</a></td></tr>
<tr><td><a class='jqImageTooltip {"web":"Projects.Alpha","topic":"Gallery","width":120}' data-image="diagram.svg" data-crop="on">diagram</a></td></tr>
<tr><td><a class="jqImageTooltip" data-web="Projects.Alpha" data-topic="Gallery" data-image="notes.txt">notes</a></td></tr>
<tr><td><a data-web="Projects.Alpha" data-topic="Gallery" data-image="plain.png">plain</a></td></tr>
</table>
</body>
</html>"##;

/// A page without the preferences block.
pub const BARE_PAGE: &str = r#"<html><body>
<a class="jqImageTooltip" data-web="Main" data-topic="WebHome" data-image="a.png">a</a>
</body></html>"#;
