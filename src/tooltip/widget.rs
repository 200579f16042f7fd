//! Seam between the preview pipeline and the tooltip widget.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::element::{Element, ElementId};

use super::options::TooltipOptions;

/// The image element shown inside a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageContent {
    pub src: String,

    /// Explicit width, set when the browser has to scale the image itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    pub class: String,
}

impl fmt::Display for ImageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<img class=\"{}\" src=\"{}\"",
            escape_attr(&self.class),
            escape_attr(&self.src)
        )?;
        if let Some(ref width) = self.width {
            write!(f, " width=\"{}\"", escape_attr(width))?;
        }
        if let Some(ref height) = self.height {
            write!(f, " height=\"{}\"", escape_attr(height))?;
        }
        write!(f, " />")
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Produces tooltip content. Called each time the tooltip is about to show.
pub type ContentFn = Arc<dyn Fn() -> ImageContent + Send + Sync>;

/// A hover-activated overlay capability.
///
/// Implementations own hover detection, delays, positioning and tracking.
/// The pipeline only configures them.
pub trait TooltipWidget: Send + Sync {
    /// Check that the widget can run in the current environment.
    fn check_support(&self) -> Result<(), String> {
        Ok(())
    }

    /// Arm a tooltip on `element`. `content` must not be called before the
    /// tooltip is actually shown.
    fn attach(&self, element: &Element, options: TooltipOptions, content: ContentFn);

    /// Forget the tooltip of an element that left the document.
    fn detach(&self, _id: ElementId) {}
}

impl<W: TooltipWidget + ?Sized> TooltipWidget for Arc<W> {
    fn check_support(&self) -> Result<(), String> {
        (**self).check_support()
    }

    fn attach(&self, element: &Element, options: TooltipOptions, content: ContentFn) {
        (**self).attach(element, options, content)
    }

    fn detach(&self, id: ElementId) {
        (**self).detach(id)
    }
}
