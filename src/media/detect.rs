//! Extension-based media detection for image attachments.
//!
//! Recognition is purely by file extension, matched case-insensitively:
//!
//! - **Raster**: jpg, jpeg, gif, png, bmp, tif, tiff, ico (plus webp, avif, heic, heif
//!   in the extended list)
//! - **Vector**: svg, svgz
//! - **Document**: pdf, ps, psd, xcf (extended list only)
//! - **Video**: mp4, avi, mov (extended list only)
//!
//! Anything else is rejected. Rejection is expected filtering, not an error.

// =============================================================================
// MediaKind
// =============================================================================

/// Broad class of a recognized attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Bitmap images the service can scale directly
    Raster,

    /// SVG drawings, rasterized by the service on request
    Vector,

    /// Multi-page or layered documents (first page/layer is previewed)
    Document,

    /// Video files (a poster frame is previewed)
    Video,
}

impl MediaKind {
    /// Get a human-readable name for the kind.
    pub const fn name(&self) -> &'static str {
        match self {
            MediaKind::Raster => "raster image",
            MediaKind::Vector => "vector image",
            MediaKind::Document => "document",
            MediaKind::Video => "video",
        }
    }
}

// =============================================================================
// AllowList
// =============================================================================

/// Which generation of the allow-list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowList {
    /// Raster and vector images only
    Classic,

    /// Classic plus documents, video and newer raster formats
    Extended,
}

impl AllowList {
    /// Whether this list includes types introduced by `since`.
    const fn includes(&self, since: AllowList) -> bool {
        match (self, since) {
            (AllowList::Extended, _) => true,
            (AllowList::Classic, AllowList::Classic) => true,
            (AllowList::Classic, AllowList::Extended) => false,
        }
    }
}

struct MediaType {
    extension: &'static str,
    kind: MediaKind,
    since: AllowList,
}

const fn media(extension: &'static str, kind: MediaKind, since: AllowList) -> MediaType {
    MediaType {
        extension,
        kind,
        since,
    }
}

/// The one allow-list of previewable attachment types.
const MEDIA_TYPES: &[MediaType] = &[
    media("jpg", MediaKind::Raster, AllowList::Classic),
    media("jpeg", MediaKind::Raster, AllowList::Classic),
    media("gif", MediaKind::Raster, AllowList::Classic),
    media("png", MediaKind::Raster, AllowList::Classic),
    media("bmp", MediaKind::Raster, AllowList::Classic),
    media("tif", MediaKind::Raster, AllowList::Classic),
    media("tiff", MediaKind::Raster, AllowList::Classic),
    media("ico", MediaKind::Raster, AllowList::Classic),
    media("svg", MediaKind::Vector, AllowList::Classic),
    media("svgz", MediaKind::Vector, AllowList::Classic),
    media("webp", MediaKind::Raster, AllowList::Extended),
    media("avif", MediaKind::Raster, AllowList::Extended),
    media("heic", MediaKind::Raster, AllowList::Extended),
    media("heif", MediaKind::Raster, AllowList::Extended),
    media("pdf", MediaKind::Document, AllowList::Extended),
    media("ps", MediaKind::Document, AllowList::Extended),
    media("psd", MediaKind::Document, AllowList::Extended),
    media("xcf", MediaKind::Document, AllowList::Extended),
    media("mp4", MediaKind::Video, AllowList::Extended),
    media("avi", MediaKind::Video, AllowList::Extended),
    media("mov", MediaKind::Video, AllowList::Extended),
];

// =============================================================================
// Detection
// =============================================================================

/// Get the extension of a filename or attachment path.
///
/// Returns `None` when there is no dot in the final path segment or the
/// extension is empty.
pub fn file_extension(image: &str) -> Option<&str> {
    let name = image.rsplit('/').next().unwrap_or(image);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

fn lookup(image: &str) -> Option<&'static MediaType> {
    let ext = file_extension(image)?;
    MEDIA_TYPES
        .iter()
        .find(|t| t.extension.eq_ignore_ascii_case(ext))
}

/// Detect the media kind of an attachment from its extension.
///
/// Consults the extended list; use [`is_previewable`] to honour a narrower one.
pub fn detect_media(image: &str) -> Option<MediaKind> {
    lookup(image).map(|t| t.kind)
}

/// Check whether an attachment may get a preview under `allow`.
pub fn is_previewable(image: &str, allow: AllowList) -> bool {
    lookup(image).is_some_and(|t| allow.includes(t.since))
}

/// Check whether an attachment is an SVG drawing (`.svg` or `.svgz`).
pub fn is_vector(image: &str) -> bool {
    detect_media(image) == Some(MediaKind::Vector)
}

// =============================================================================
// Tests
// =============================================================================
