//! Thumbnail request construction.
//!
//! Turns a [`ResolvedConfig`] into the URL the preview image loads from.
//!
//! # URL Shape
//!
//! ```text
//! /bin/rest/ImagePlugin/process?topic=Sandbox.WebHome&file=photo.JPG&width=300&height=300&crop=off
//! ```
//!
//! Only `file` is percent-encoded. The other values are numbers, enum
//! strings, or the `web.topic` pair, and are interpolated as they are,
//! including declared sizes that did not parse. Missing `web`, `topic` or
//! `image` render as empty strings; the image element will then simply fail
//! to load.

use std::sync::Arc;

use serde::Serialize;

use crate::media::is_vector;
use crate::preview::{Param, ResolvedConfig};

use super::policy::{ServicePolicy, VectorHandling, SERVICE_NAME};
use super::site::SiteUrls;

// =============================================================================
// RequestDescriptor
// =============================================================================

/// Endpoint plus ordered query parameters for one service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Look up a parameter value (as it appears in the query string).
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize to `endpoint?k=v&k=v`.
    pub fn to_path(&self) -> String {
        if self.params.is_empty() {
            return self.endpoint.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.endpoint, query)
    }
}

// =============================================================================
// Thumbnail
// =============================================================================

/// Where a preview image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Thumbnail {
    /// Scaled by the thumbnail service
    Service(RequestDescriptor),

    /// The attachment itself, sized by the image element
    StaticAsset {
        path: String,
        width: Param<u32>,
        height: Param<u32>,
    },
}

impl Thumbnail {
    /// Site-relative path including the query string.
    pub fn path(&self) -> String {
        match self {
            Thumbnail::Service(request) => request.to_path(),
            Thumbnail::StaticAsset { path, .. } => path.clone(),
        }
    }
}

// =============================================================================
// UrlBuilder
// =============================================================================

/// Builds thumbnail URLs for one site under one policy.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    site: Arc<SiteUrls>,
    policy: ServicePolicy,
}

impl UrlBuilder {
    pub fn new(site: Arc<SiteUrls>, policy: ServicePolicy) -> Self {
        Self { site, policy }
    }

    pub fn site(&self) -> &SiteUrls {
        &self.site
    }

    pub fn policy(&self) -> ServicePolicy {
        self.policy
    }

    /// Describe the request for a preview.
    pub fn thumbnail(&self, config: &ResolvedConfig) -> Thumbnail {
        let web = config.web.as_deref().unwrap_or_default();
        let topic = config.topic.as_deref().unwrap_or_default();
        let image = config.image.as_deref().unwrap_or_default();
        let vector = is_vector(image);

        if vector && self.policy.vector == VectorHandling::StaticAsset {
            return Thumbnail::StaticAsset {
                path: self.site.attachment_path(web, topic, image),
                width: config.width.clone(),
                height: config.height.clone(),
            };
        }

        let mut params = vec![
            ("topic".to_string(), format!("{}.{}", web, topic)),
            ("file".to_string(), urlencoding::encode(image).into_owned()),
            ("width".to_string(), config.width.to_string()),
            ("height".to_string(), config.height.to_string()),
            ("crop".to_string(), config.crop.to_string()),
        ];
        if vector {
            params.push(("output".to_string(), "png".to_string()));
        }

        Thumbnail::Service(RequestDescriptor {
            endpoint: self
                .site
                .rest_path(SERVICE_NAME, self.policy.operation.as_str()),
            params,
        })
    }

    /// Build the URL the preview image loads from.
    pub fn build(&self, config: &ResolvedConfig) -> String {
        self.site.absolutize(&self.thumbnail(config).path())
    }
}

// =============================================================================
// Tests
// =============================================================================
