//! Tooltip presentation.
//!
//! The pipeline configures a [`TooltipWidget`] with [`TooltipOptions`] and a
//! lazy [`ContentFn`]; the widget owns hover detection, delays and tracking.
//! [`HoverTooltips`] is an in-memory widget that drives the show/hide state
//! machine on tokio timers.

mod hover;
mod options;
mod widget;

pub use hover::{HoverTooltips, TooltipPhase};
pub use options::{Collision, Position, TooltipOptions, CONTENT_CLASS, TOOLTIP_CLASS};
pub use widget::{ContentFn, ImageContent, TooltipWidget};
