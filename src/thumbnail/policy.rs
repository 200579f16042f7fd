//! Versioned policy table for the thumbnail service.
//!
//! Deployments have seen the service contract change over time: the operation
//! was renamed from `resize` to `process`, SVG attachments moved from being
//! linked directly to being rasterized by the service, and the allow-list
//! grew. Each generation is one [`ServicePolicy`]; [`ServicePolicy::LATEST`]
//! is the default.

use serde::Serialize;

use crate::media::AllowList;

/// Name of the server-side service answering thumbnail requests.
pub const SERVICE_NAME: &str = "ImagePlugin";

/// Service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Resize,
    Process,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Resize => "resize",
            Operation::Process => "process",
        }
    }
}

/// How SVG attachments are previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VectorHandling {
    /// Ask the service for a PNG rendering (`output=png`)
    Rasterize,

    /// Link the attachment itself, sized by the image element
    StaticAsset,
}

/// One generation of the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePolicy {
    pub operation: Operation,
    pub vector: VectorHandling,
    pub allow: AllowList,
}

impl ServicePolicy {
    /// `resize` operation, SVGs linked directly, classic allow-list.
    pub const LEGACY: ServicePolicy = ServicePolicy {
        operation: Operation::Resize,
        vector: VectorHandling::StaticAsset,
        allow: AllowList::Classic,
    };

    /// `process` operation, SVGs rasterized, extended allow-list.
    pub const LATEST: ServicePolicy = ServicePolicy {
        operation: Operation::Process,
        vector: VectorHandling::Rasterize,
        allow: AllowList::Extended,
    };
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self::LATEST
    }
}

/// Selectable policy generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    #[default]
    Latest,
    Legacy,
}

impl Revision {
    pub const fn policy(&self) -> ServicePolicy {
        match self {
            Revision::Latest => ServicePolicy::LATEST,
            Revision::Legacy => ServicePolicy::LEGACY,
        }
    }
}
