//! Media type recognition.
//!
//! Decides which attachments can be previewed. The allow-list lives in one
//! table inside [`detect`]; every call site goes through [`is_previewable`]
//! or [`is_vector`] instead of matching extensions itself.

mod detect;

pub use detect::{detect_media, file_extension, is_previewable, is_vector, AllowList, MediaKind};
