//! Thumbnail service contract.
//!
//! # Components
//!
//! - [`SiteUrls`]: script and attachment paths looked up from host [`Preferences`]
//! - [`ServicePolicy`]: versioned operation name, vector handling and allow-list
//! - [`UrlBuilder`]: builds the [`Thumbnail`] request for a [`ResolvedConfig`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use image_tooltip::preview::ResolvedConfig;
//! use image_tooltip::thumbnail::{ServicePolicy, SiteUrls, UrlBuilder};
//!
//! let builder = UrlBuilder::new(Arc::new(SiteUrls::new("/bin", "/pub")), ServicePolicy::LATEST);
//! let config = ResolvedConfig {
//!     web: Some("Sandbox".into()),
//!     topic: Some("WebHome".into()),
//!     image: Some("diagram.svg".into()),
//!     ..Default::default()
//! };
//! assert!(builder.build(&config).ends_with("&output=png"));
//! ```
//!
//! [`ResolvedConfig`]: crate::preview::ResolvedConfig

mod policy;
mod site;
mod request;

pub use self::policy::{Operation, Revision, ServicePolicy, VectorHandling, SERVICE_NAME};
pub use self::site::{
    Preferences, SiteUrls, PREF_PUB_URL_PATH, PREF_SCRIPT_SUFFIX, PREF_SCRIPT_URL_PATH,
    PREF_URL_HOST,
};
pub use self::request::{RequestDescriptor, Thumbnail, UrlBuilder};
