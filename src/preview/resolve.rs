//! Per-element preview configuration.
//!
//! Configuration comes from three layers, later layers winning key by key:
//!
//! 1. library defaults ([`ResolvedConfig::default`])
//! 2. the generic metadata literal embedded in the markup
//! 3. the element's `data-*` attributes
//!
//! Declared values are read into a [`DeclaredConfig`] first, so merging in
//! [`resolve`] is a pure, infallible overlay. Request parameters (`width`,
//! `height`, `crop`) pass through as written when they do not parse; widget
//! settings (`delay`, `track`, `showURL`) fall back to the layer below.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::element::Declarations;
use crate::error::ConfigError;

/// Default preview width in pixels.
pub const DEFAULT_WIDTH: u32 = 300;

/// Default preview height in pixels.
pub const DEFAULT_HEIGHT: u32 = 300;

/// Default hover delay before the tooltip shows, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 300;

// =============================================================================
// Crop
// =============================================================================

/// Server-side crop mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    #[default]
    Off,
    On,
}

impl Crop {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Crop::Off => "off",
            Crop::On => "on",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Crop {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(Crop::On),
            "off" | "false" | "0" | "" => Ok(Crop::Off),
            _ => Err(ConfigError::InvalidCrop {
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Param
// =============================================================================

/// A declared value bound for the thumbnail request.
///
/// Values that parse are kept typed. Anything else is carried verbatim and
/// interpolated into the request as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Param<T> {
    Value(T),
    Verbatim(String),
}

impl<T: FromStr> Param<T> {
    /// Read a declared value, keeping the raw text when it does not parse.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse()
            .map(Param::Value)
            .unwrap_or_else(|_| Param::Verbatim(raw.to_string()))
    }
}

impl<T> Param<T> {
    /// The typed value, if the declaration parsed.
    pub fn value(&self) -> Option<&T> {
        match self {
            Param::Value(value) => Some(value),
            Param::Verbatim(_) => None,
        }
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Param::Value(value)
    }
}

impl<T: fmt::Display> fmt::Display for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(value) => value.fmt(f),
            Param::Verbatim(raw) => f.write_str(raw),
        }
    }
}

// =============================================================================
// ResolvedConfig
// =============================================================================

/// The effective configuration of one preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Attachment filename
    pub image: Option<String>,

    /// Web containing the topic
    pub web: Option<String>,

    /// Topic the image is attached to
    pub topic: Option<String>,

    pub width: Param<u32>,
    pub height: Param<u32>,
    pub crop: Param<Crop>,

    /// Hover delay in milliseconds
    pub delay: u64,

    /// Whether the tooltip follows the cursor
    pub track: bool,

    #[serde(rename = "showURL")]
    pub show_url: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            image: None,
            web: None,
            topic: None,
            width: Param::Value(DEFAULT_WIDTH),
            height: Param::Value(DEFAULT_HEIGHT),
            crop: Param::Value(Crop::Off),
            delay: DEFAULT_DELAY_MS,
            track: true,
            show_url: false,
        }
    }
}

// =============================================================================
// DeclaredConfig
// =============================================================================

/// Configuration declared by one source. Unset fields leave the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredConfig {
    pub image: Option<String>,
    pub web: Option<String>,
    pub topic: Option<String>,
    pub width: Option<Param<u32>>,
    pub height: Option<Param<u32>>,
    pub crop: Option<Param<Crop>>,
    pub delay: Option<u64>,
    pub track: Option<bool>,
    pub show_url: Option<bool>,
}

/// Normalize a key so `showURL`, `show-url` and `show_url` compare equal.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            field,
            value: value.to_string(),
        }),
    }
}

/// Keep a widget setting if it parses, otherwise leave the layer below.
fn setting<T>(parsed: Result<T, ConfigError>) -> Option<T> {
    parsed
        .map_err(|e| warn!(error = %e, "ignoring declared setting"))
        .ok()
}

/// Render a metadata number the way the page script would print it, so
/// `200.0` reads as `200`.
fn number_text(n: &serde_json::Number) -> String {
    match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => i.to_string(),
        (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

impl DeclaredConfig {
    /// Build from key/value pairs. Keys outside the documented field set are
    /// ignored, since other widgets share the same attributes.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut declared = Self::default();
        for (key, value) in pairs {
            declared.set(key, value);
        }
        declared
    }

    /// Build from a metadata object literal such as
    /// `{web: 'Sandbox', width: 200}`.
    ///
    /// The literal follows JavaScript object syntax: keys may be unquoted and
    /// strings single-quoted. Values may be strings, numbers or booleans.
    pub fn from_metadata(literal: &str) -> Result<Self, ConfigError> {
        let value: Value =
            json5::from_str(literal).map_err(|e| ConfigError::Metadata(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ConfigError::Metadata("expected an object".to_string()));
        };

        let mut declared = Self::default();
        for (key, value) in &map {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => number_text(n),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    warn!(key = %key, value = %other, "ignoring nested metadata value");
                    continue;
                }
            };
            declared.set(key, &text);
        }
        Ok(declared)
    }

    fn set(&mut self, key: &str, value: &str) {
        match normalize_key(key).as_str() {
            "image" => self.image = Some(value.to_string()),
            "web" => self.web = Some(value.to_string()),
            "topic" => self.topic = Some(value.to_string()),
            "width" => self.width = Some(Param::parse(value)),
            "height" => self.height = Some(Param::parse(value)),
            "crop" => self.crop = Some(Param::parse(value)),
            "delay" => self.delay = setting(parse_number("delay", value)).or(self.delay),
            "track" => self.track = setting(parse_bool("track", value)).or(self.track),
            "showurl" => self.show_url = setting(parse_bool("showURL", value)).or(self.show_url),
            _ => {}
        }
    }
}

/// Read both declared sources of an element.
///
/// Returns `(metadata, data_attributes)`. Fails only when the metadata
/// literal is not an object literal.
pub fn read_declarations(
    declarations: Declarations<'_>,
) -> Result<(DeclaredConfig, DeclaredConfig), ConfigError> {
    let metadata = match declarations.metadata {
        Some(literal) => DeclaredConfig::from_metadata(literal)?,
        None => DeclaredConfig::default(),
    };
    let data = DeclaredConfig::from_pairs(
        declarations
            .data
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );
    Ok((metadata, data))
}

// =============================================================================
// Resolution
// =============================================================================

fn overlay(base: &mut ResolvedConfig, layer: &DeclaredConfig) {
    if let Some(ref image) = layer.image {
        base.image = Some(image.clone());
    }
    if let Some(ref web) = layer.web {
        base.web = Some(web.clone());
    }
    if let Some(ref topic) = layer.topic {
        base.topic = Some(topic.clone());
    }
    if let Some(ref width) = layer.width {
        base.width = width.clone();
    }
    if let Some(ref height) = layer.height {
        base.height = height.clone();
    }
    if let Some(ref crop) = layer.crop {
        base.crop = crop.clone();
    }
    if let Some(delay) = layer.delay {
        base.delay = delay;
    }
    if let Some(track) = layer.track {
        base.track = track;
    }
    if let Some(show_url) = layer.show_url {
        base.show_url = show_url;
    }
}

/// Merge declared configuration over defaults.
///
/// `more_specific` wins over `declared` on overlapping keys; both win over
/// `defaults`. Nothing is mutated.
pub fn resolve(
    defaults: &ResolvedConfig,
    declared: &DeclaredConfig,
    more_specific: &DeclaredConfig,
) -> ResolvedConfig {
    let mut resolved = defaults.clone();
    overlay(&mut resolved, declared);
    overlay(&mut resolved, more_specific);
    resolved
}

// =============================================================================
// Tests
// =============================================================================
