//! Page scanning integration tests.
//!
//! Tests verify:
//! - Rendered pages feed the preview pipeline end to end
//! - Page preferences locate the site's script and attachment paths
//! - Pages without preferences disable the feature

use image_tooltip::element::Document;
use image_tooltip::error::{InstallError, SiteError};
use image_tooltip::preview::{Activation, ImagePreview, PreviewSettings, SkipReason};
use image_tooltip::scan::scan_page;
use image_tooltip::thumbnail::{Revision, SiteUrls};
use image_tooltip::tooltip::HoverTooltips;

use super::test_utils::{settings, RecordingWidget, BARE_PAGE, GALLERY_PAGE};

fn query_value(src: &str, key: &str) -> Option<String> {
    url::Url::parse(src)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn query_value_relative(src: &str, key: &str) -> Option<String> {
    query_value(&format!("https://wiki.example.org{}", src), key)
}

#[test]
fn test_gallery_page_end_to_end() {
    let scan = scan_page(GALLERY_PAGE, "jqImageTooltip").unwrap();
    assert_eq!(scan.elements.len(), 3);

    let widget = RecordingWidget::new();
    let preview =
        ImagePreview::install(&scan.preferences, widget.clone(), settings(Revision::Latest))
            .unwrap();

    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let ids: Vec<_> = scan
        .elements
        .into_iter()
        .map(|e| doc.insert(e).id())
        .collect();

    let outcomes = preview.drain(&mut subscription);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].1.is_armed());
    assert!(outcomes[1].1.is_armed());
    assert_eq!(
        outcomes[2].1,
        Activation::Skipped(SkipReason::UnsupportedType {
            image: "notes.txt".to_string()
        })
    );
    assert_eq!(widget.attached_ids(), vec![ids[0], ids[1]]);

    let party = widget.show(ids[0]).unwrap();
    assert_eq!(
        party.src,
        "https://wiki.example.org/foswiki/bin/rest.pl/ImagePlugin/process?topic=Projects.Alpha.Gallery&file=Summer%20Party.JPG&width=300&height=300&crop=off"
    );

    let diagram = widget.show(ids[1]).unwrap();
    assert_eq!(query_value(&diagram.src, "width").as_deref(), Some("120"));
    assert_eq!(query_value(&diagram.src, "crop").as_deref(), Some("on"));
    assert_eq!(query_value(&diagram.src, "output").as_deref(), Some("png"));
}

#[test]
fn test_gallery_page_legacy_revision() {
    let scan = scan_page(GALLERY_PAGE, "jqImageTooltip").unwrap();
    let widget = RecordingWidget::new();
    let preview =
        ImagePreview::install(&scan.preferences, widget.clone(), settings(Revision::Legacy))
            .unwrap();

    let doc = Document::new();
    let ids: Vec<_> = scan
        .elements
        .into_iter()
        .map(|e| doc.insert(e))
        .collect();
    for element in &ids {
        preview.activate(element);
    }

    let diagram = widget.show(ids[1].id()).unwrap();
    assert_eq!(
        diagram.src,
        "https://wiki.example.org/foswiki/pub/Projects/Alpha/Gallery/diagram.svg"
    );
    assert_eq!(diagram.width.as_deref(), Some("120"));
    assert_eq!(diagram.height.as_deref(), Some("300"));
}

#[test]
fn test_single_quoted_metadata_literal() {
    let page = r#"<a class="jqImageTooltip {web:'Sandbox', topic:'WebHome', image:'photo.jpg'}">x</a>"#;
    let scan = scan_page(page, "jqImageTooltip").unwrap();
    let widget = RecordingWidget::new();
    let preview = ImagePreview::new(
        SiteUrls::new("/bin", "/pub"),
        widget.clone(),
        PreviewSettings::default(),
    );

    let doc = Document::new();
    let link = doc.insert(scan.elements.into_iter().next().unwrap());
    assert!(preview.activate(&link).is_armed());
    assert_eq!(
        widget.show(link.id()).unwrap().src,
        "/bin/rest/ImagePlugin/process?topic=Sandbox.WebHome&file=photo.jpg&width=300&height=300&crop=off"
    );
}

#[test]
fn test_unparsable_sizes_reach_the_url() {
    let page = r#"<a class="jqImageTooltip" data-web="Sandbox" data-topic="WebHome" data-image="photo.jpg" data-width="200px" data-delay="">x</a>"#;
    let scan = scan_page(page, "jqImageTooltip").unwrap();
    let widget = RecordingWidget::new();
    let preview = ImagePreview::new(
        SiteUrls::new("/bin", "/pub"),
        widget.clone(),
        PreviewSettings::default(),
    );

    let doc = Document::new();
    let link = doc.insert(scan.elements.into_iter().next().unwrap());
    assert!(preview.activate(&link).is_armed());
    let src = widget.show(link.id()).unwrap().src;
    assert_eq!(query_value_relative(&src, "width").as_deref(), Some("200px"));
    assert_eq!(widget.options(link.id()).unwrap().delay.as_millis(), 300);
}

#[test]
fn test_page_without_preferences_disables_feature() {
    let scan = scan_page(BARE_PAGE, "jqImageTooltip").unwrap();
    assert_eq!(scan.elements.len(), 1);

    let result = ImagePreview::install(
        &scan.preferences,
        RecordingWidget::new(),
        PreviewSettings::default(),
    );
    assert!(matches!(
        result,
        Err(InstallError::Site(SiteError::MissingPreference(_)))
    ));
}

#[tokio::test]
async fn test_scanned_page_with_hover_widget() {
    let scan = scan_page(GALLERY_PAGE, "jqImageTooltip").unwrap();
    let tooltips = HoverTooltips::new();
    let preview =
        ImagePreview::install(&scan.preferences, tooltips.clone(), PreviewSettings::default())
            .unwrap();

    let doc = Document::new();
    let subscription = doc.subscribe();
    for element in scan.elements {
        doc.insert(element);
    }
    drop(doc);

    assert_eq!(preview.watch(subscription).await, 3);
    assert_eq!(tooltips.attached().len(), 2);
    assert_eq!(preview.content_requests(), 0);
}
