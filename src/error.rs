use thiserror::Error;

/// Errors raised while reading the configuration an element declares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric field (width, height, delay) is not an unsigned integer
    #[error("Invalid number for '{field}': {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A boolean field (track, showURL) is not true/false
    #[error("Invalid boolean for '{field}': {value:?}")]
    InvalidBool { field: &'static str, value: String },

    /// Crop mode is neither on nor off
    #[error("Invalid crop mode: {value:?} (expected on or off)")]
    InvalidCrop { value: String },

    /// The metadata literal embedded in the markup is not a JSON object
    #[error("Malformed metadata: {0}")]
    Metadata(String),
}

/// Errors resolving the site's script and attachment paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    /// A preference the host page must provide is absent
    #[error("Missing site preference: {0}")]
    MissingPreference(&'static str),

    /// The absolute base URL could not be parsed
    #[error("Invalid base URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

/// Capability check failures that disable the preview feature entirely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// Site paths could not be resolved
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    /// The tooltip widget cannot run in this environment
    #[error("Tooltip widget unsupported: {0}")]
    UnsupportedWidget(String),
}

/// Errors scanning a rendered page for marker elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The marker class does not form a valid CSS selector
    #[error("Invalid marker selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    /// The page could not be read
    #[error("Failed to read page: {0}")]
    Read(String),
}
