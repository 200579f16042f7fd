//! Tooltip widget options.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::preview::ResolvedConfig;

/// Style class placed on the tooltip overlay.
pub const TOOLTIP_CLASS: &str = "imageTooltip";

/// Style class placed on the preview image inside the overlay.
pub const CONTENT_CLASS: &str = "imgTooltip";

/// How the widget keeps the overlay inside the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collision {
    Flip,
    Fit,
    #[default]
    FlipFit,
    None,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collision::Flip => "flip",
            Collision::Fit => "fit",
            Collision::FlipFit => "flipfit",
            Collision::None => "none",
        })
    }
}

/// Anchoring of the overlay relative to the element, in `my`/`at` notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Point on the overlay, e.g. `left+15 top+20`
    pub my: String,

    /// Point on the element it is aligned to, e.g. `left bottom`
    pub at: String,

    pub collision: Collision,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            my: "left+15 top+20".to_string(),
            at: "left bottom".to_string(),
            collision: Collision::FlipFit,
        }
    }
}

impl Position {
    /// Pixel offset encoded in `my`, e.g. `(15, 20)` for `left+15 top+20`.
    pub fn offset(&self) -> (i32, i32) {
        let mut parts = self.my.split_whitespace().map(token_offset);
        let x = parts.next().unwrap_or(0);
        let y = parts.next().unwrap_or(0);
        (x, y)
    }
}

fn token_offset(token: &str) -> i32 {
    match token.find(|c: char| c == '+' || c == '-') {
        Some(pos) => token[pos..]
            .trim_start_matches('+')
            .parse()
            .unwrap_or(0),
        None => 0,
    }
}

/// Everything the widget needs besides the content callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipOptions {
    /// Hover time before the overlay shows
    #[serde(with = "millis")]
    pub delay: Duration,

    /// Whether the overlay follows the cursor
    pub track: bool,

    /// Whether the widget may show the link target alongside the content
    pub show_url: bool,

    pub tooltip_class: String,
    pub position: Position,
}

impl TooltipOptions {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay),
            track: config.track,
            show_url: config.show_url,
            tooltip_class: TOOLTIP_CLASS.to_string(),
            position: Position::default(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
