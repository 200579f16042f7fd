//! Extract marker elements and host preferences from rendered HTML.
//!
//! Marker elements declare their configuration two ways:
//!
//! ```html
//! <a class="jqImageTooltip {web:'Sandbox', topic:'WebHome'}"
//!    data-image="photo.jpg" data-width="200">photo</a>
//! ```
//!
//! The object literal inside `class` is the metadata source; `data-*`
//! attributes are the more specific source. Site preferences come from the
//! JSON block the wiki renders into every page:
//!
//! ```html
//! <script class='$foswikiPreferences' type='text/json'>{"SCRIPTURLPATH":"/bin"}</script>
//! ```

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::element::Element;
use crate::error::ScanError;

/// Class identifying the preferences block.
const PREFERENCES_CLASS: &str = "foswikiPreferences";

/// Result of scanning one page.
#[derive(Debug, Default)]
pub struct PageScan {
    /// Marker elements in document order
    pub elements: Vec<Element>,

    /// Preferences published by the page
    pub preferences: HashMap<String, String>,
}

fn selector(source: &str) -> Result<Selector, ScanError> {
    Selector::parse(source).map_err(|e| ScanError::InvalidSelector {
        selector: source.to_string(),
        message: e.to_string(),
    })
}

/// Scan a page for elements carrying `marker`.
pub fn scan_page(html: &str, marker: &str) -> Result<PageScan, ScanError> {
    let document = Html::parse_document(html);
    let marker_selector = selector(&format!(".{}", marker))?;

    let elements: Vec<Element> = document
        .select(&marker_selector)
        .map(element_from_markup)
        .collect();
    debug!(marker = marker, count = elements.len(), "scanned page");

    Ok(PageScan {
        elements,
        preferences: page_preferences(&document)?,
    })
}

fn element_from_markup(node: ElementRef<'_>) -> Element {
    let value = node.value();
    let (classes, metadata) = split_class_attr(value.attr("class").unwrap_or_default());

    let mut element = Element::new(value.name());
    for class in classes {
        element = element.with_class(class);
    }
    if let Some(metadata) = metadata {
        element = element.with_metadata(metadata);
    }
    for (name, attr) in value.attrs() {
        if name.starts_with("data-") {
            element = element.with_data(name, attr);
        }
    }
    element
}

/// Split a class attribute into class names and an embedded object literal.
pub fn split_class_attr(attr: &str) -> (Vec<String>, Option<String>) {
    let Some(open) = attr.find('{') else {
        return (attr.split_whitespace().map(str::to_string).collect(), None);
    };

    let (literal, rest) = match attr[open..].rfind('}') {
        Some(close) => (&attr[open..=open + close], &attr[open + close + 1..]),
        None => (&attr[open..], ""),
    };
    let classes = attr[..open]
        .split_whitespace()
        .chain(rest.split_whitespace())
        .map(str::to_string)
        .collect();
    (classes, Some(literal.to_string()))
}

fn page_preferences(document: &Html) -> Result<HashMap<String, String>, ScanError> {
    let script = selector("script[type=\"text/json\"]")?;
    let mut preferences = HashMap::new();

    for node in document.select(&script) {
        let is_preferences = node
            .value()
            .attr("class")
            .is_some_and(|c| c.contains(PREFERENCES_CLASS));
        if !is_preferences {
            continue;
        }

        let text: String = node.text().collect();
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    let value = match value {
                        Value::String(s) => s,
                        Value::Null => continue,
                        other => other.to_string(),
                    };
                    preferences.insert(key, value);
                }
            }
            Ok(_) => warn!("preferences block is not a JSON object"),
            Err(e) => warn!(error = %e, "unreadable preferences block"),
        }
    }
    Ok(preferences)
}

// =============================================================================
// Tests
// =============================================================================
