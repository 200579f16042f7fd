//! Preview pipeline integration tests.
//!
//! Tests verify:
//! - Elements inserted after the pipeline starts are activated live
//! - Activation happens once, even when elements are re-announced
//! - Unmarked elements are never touched
//! - Tooltip content is produced lazily and recomputed on every show
//! - Removing an element detaches its tooltip

use std::sync::Arc;
use std::time::Duration;

use image_tooltip::element::{Document, Element};
use image_tooltip::preview::{ImagePreview, PreviewSettings};
use image_tooltip::thumbnail::Revision;
use image_tooltip::tooltip::{HoverTooltips, TooltipPhase};

use super::test_utils::{marked, recording_preview, site};

// =============================================================================
// Live Activation
// =============================================================================

#[tokio::test]
async fn test_watch_activates_existing_and_later_elements() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let preview = Arc::new(preview);

    let doc = Document::new();
    let early = doc.insert(marked("Sandbox", "WebHome", "early.png"));
    let subscription = doc.subscribe();

    let watcher = tokio::spawn({
        let preview = Arc::clone(&preview);
        async move { preview.watch(subscription).await }
    });

    // Content loaded into the page after the pipeline started
    let late = doc.insert(marked("Sandbox", "WebHome", "late.gif"));
    doc.insert(Element::new("span").with_class("caption"));
    drop(doc);

    let activated = watcher.await.unwrap();
    assert_eq!(activated, 2);
    assert_eq!(widget.attached_ids(), vec![early.id(), late.id()]);
}

#[tokio::test]
async fn test_watch_counts_filtered_elements_as_activated() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let subscription = doc.subscribe();

    let notes = doc.insert(marked("Sandbox", "WebHome", "notes.txt"));
    drop(doc);

    assert_eq!(preview.watch(subscription).await, 1);
    assert!(notes.is_activated());
    assert!(widget.attached_ids().is_empty());
}

#[test]
fn test_reannounced_elements_activate_once() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let mut subscription = doc.subscribe();

    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));
    doc.refresh();
    doc.refresh();

    let outcomes = preview.drain(&mut subscription);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(widget.attached_ids(), vec![link.id()]);
    assert_eq!(link.declaration_reads(), 1);
}

#[test]
fn test_two_subscriptions_share_activation_flag() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let mut first = doc.subscribe();
    let mut second = doc.subscribe();

    doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));

    assert_eq!(preview.drain(&mut first).len(), 1);
    assert!(preview.drain(&mut second).is_empty());
    assert_eq!(widget.attached_ids().len(), 1);
}

#[test]
fn test_unmarked_elements_never_read() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let mut subscription = doc.subscribe();

    let plain = doc.insert(
        Element::new("a")
            .with_metadata(r#"{"image": "a.png"}"#)
            .with_data("image", "a.png"),
    );

    assert!(preview.drain(&mut subscription).is_empty());
    assert_eq!(plain.declaration_reads(), 0);
    assert!(!plain.is_activated());
    assert!(widget.attached_ids().is_empty());
}

#[test]
fn test_custom_marker_class() {
    let widget = super::test_utils::RecordingWidget::new();
    let preview = ImagePreview::new(
        site(),
        widget.clone(),
        PreviewSettings {
            marker_class: "imagePreview".to_string(),
            ..Default::default()
        },
    );
    let doc = Document::new();
    let mut subscription = doc.subscribe();

    doc.insert(marked("Sandbox", "WebHome", "a.png"));
    let custom = doc.insert(
        Element::new("img")
            .with_class("imagePreview")
            .with_data("image", "b.png"),
    );

    let outcomes = preview.drain(&mut subscription);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, custom.id());
    assert_eq!(widget.attached_ids(), vec![custom.id()]);
}

// =============================================================================
// Lazy Content
// =============================================================================

#[test]
fn test_content_built_only_on_show() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));

    preview.drain(&mut subscription);
    assert_eq!(preview.content_requests(), 0);

    let first = widget.show(link.id()).unwrap();
    let second = widget.show(link.id()).unwrap();
    assert_eq!(preview.content_requests(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_removal_detaches_tooltip() {
    let (preview, widget) = recording_preview(Revision::Latest);
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));
    preview.drain(&mut subscription);

    assert!(doc.remove(link.id()).is_some());
    preview.drain(&mut subscription);
    assert_eq!(widget.detached_ids(), vec![link.id()]);
}

// =============================================================================
// Hover Widget
// =============================================================================

fn hover_pipeline() -> (ImagePreview<HoverTooltips>, HoverTooltips) {
    let tooltips = HoverTooltips::new();
    let prefs: &[(&str, &str)] = &[("SCRIPTURLPATH", "/bin"), ("PUBURLPATH", "/pub")];
    let preview = ImagePreview::install(prefs, tooltips.clone(), PreviewSettings::default())
        .expect("preferences are complete");
    (preview, tooltips)
}

#[tokio::test(start_paused = true)]
async fn test_hover_shows_thumbnail_after_delay() {
    let (preview, tooltips) = hover_pipeline();
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG").with_data("delay", "500"));
    preview.drain(&mut subscription);

    let timer = tooltips.hover_start(link.id()).unwrap();
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(tooltips.phase(link.id()), Some(TooltipPhase::Pending));
    assert_eq!(preview.content_requests(), 0);

    assert!(timer.await.unwrap());
    let shown = tooltips.visible(link.id()).unwrap();
    assert_eq!(
        shown.src,
        "/bin/rest/ImagePlugin/process?topic=Sandbox.WebHome&file=photo.JPG&width=300&height=300&crop=off"
    );
    assert_eq!(shown.class, "imgTooltip");
    assert_eq!(preview.content_requests(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hover_cycle_recomputes_content() {
    let (preview, tooltips) = hover_pipeline();
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));
    preview.drain(&mut subscription);

    for _ in 0..3 {
        assert!(tooltips.hover_start(link.id()).unwrap().await.unwrap());
        assert_eq!(tooltips.phase(link.id()), Some(TooltipPhase::Showing));
        tooltips.hover_end(link.id());
        assert_eq!(tooltips.phase(link.id()), Some(TooltipPhase::Armed));
    }
    assert_eq!(preview.content_requests(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_removed_element_never_shows() {
    let (preview, tooltips) = hover_pipeline();
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let link = doc.insert(marked("Sandbox", "WebHome", "photo.JPG"));
    preview.drain(&mut subscription);

    let timer = tooltips.hover_start(link.id()).unwrap();
    doc.remove(link.id());
    preview.drain(&mut subscription);

    assert!(!timer.await.unwrap());
    assert!(!tooltips.is_attached(link.id()));
    assert_eq!(preview.content_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_tracking_follows_config() {
    let (preview, tooltips) = hover_pipeline();
    let doc = Document::new();
    let mut subscription = doc.subscribe();
    let tracked = doc.insert(marked("Sandbox", "WebHome", "a.png"));
    let fixed = doc.insert(marked("Sandbox", "WebHome", "b.png").with_data("track", "false"));
    preview.drain(&mut subscription);

    let _a = tooltips.hover_start(tracked.id()).unwrap();
    let _b = tooltips.hover_start(fixed.id()).unwrap();
    tooltips.pointer_move(tracked.id(), 10, 10);
    tooltips.pointer_move(fixed.id(), 10, 10);

    assert_eq!(tooltips.cursor(tracked.id()), Some((25, 30)));
    assert_eq!(tooltips.cursor(fixed.id()), None);
}

#[test]
fn test_install_outside_runtime_disables_feature() {
    let prefs: &[(&str, &str)] = &[("SCRIPTURLPATH", "/bin"), ("PUBURLPATH", "/pub")];
    let result = ImagePreview::install(prefs, HoverTooltips::new(), PreviewSettings::default());
    assert!(result.is_err());
}
