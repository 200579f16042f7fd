//! Site paths supplied by the host page.
//!
//! Script and attachment locations are never hardcoded; they are looked up
//! through a [`Preferences`] source provided by the embedding page.

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::error::SiteError;

/// Preference holding the script path, e.g. `/bin`.
pub const PREF_SCRIPT_URL_PATH: &str = "SCRIPTURLPATH";

/// Preference holding the script suffix, e.g. `.pl` (may be empty).
pub const PREF_SCRIPT_SUFFIX: &str = "SCRIPTSUFFIX";

/// Preference holding the attachment path, e.g. `/pub`.
pub const PREF_PUB_URL_PATH: &str = "PUBURLPATH";

/// Optional preference holding the absolute site origin, e.g. `https://wiki.example.org`.
pub const PREF_URL_HOST: &str = "URLHOST";

/// Host-provided preference lookup.
pub trait Preferences {
    fn preference(&self, key: &str) -> Option<String>;
}

impl Preferences for HashMap<String, String> {
    fn preference(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Preferences for [(&str, &str)] {
    fn preference(&self, key: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

/// Resolved script and attachment locations of a wiki site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    script_url_path: String,
    script_suffix: String,
    pub_url_path: String,
    base: Option<Url>,
}

impl SiteUrls {
    pub fn new(script_url_path: impl Into<String>, pub_url_path: impl Into<String>) -> Self {
        Self {
            script_url_path: trim_path(script_url_path.into()),
            script_suffix: String::new(),
            pub_url_path: trim_path(pub_url_path.into()),
            base: None,
        }
    }

    pub fn with_script_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.script_suffix = suffix.into();
        self
    }

    /// Make built URLs absolute against `base`.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, SiteError> {
        let url = Url::parse(base).map_err(|e| SiteError::InvalidBaseUrl {
            url: base.to_string(),
            message: e.to_string(),
        })?;
        self.base = Some(url);
        Ok(self)
    }

    /// Resolve from host preferences.
    ///
    /// `SCRIPTURLPATH` and `PUBURLPATH` are required.
    pub fn from_preferences<P: Preferences + ?Sized>(prefs: &P) -> Result<Self, SiteError> {
        let script = prefs
            .preference(PREF_SCRIPT_URL_PATH)
            .ok_or(SiteError::MissingPreference(PREF_SCRIPT_URL_PATH))?;
        let public = prefs
            .preference(PREF_PUB_URL_PATH)
            .ok_or(SiteError::MissingPreference(PREF_PUB_URL_PATH))?;

        let mut site = Self::new(script, public)
            .with_script_suffix(prefs.preference(PREF_SCRIPT_SUFFIX).unwrap_or_default());
        if let Some(host) = prefs.preference(PREF_URL_HOST).filter(|h| !h.is_empty()) {
            site = site.with_base_url(&host)?;
        }
        Ok(site)
    }

    pub fn script_url_path(&self) -> &str {
        &self.script_url_path
    }

    pub fn pub_url_path(&self) -> &str {
        &self.pub_url_path
    }

    /// Path of a REST handler: `{script}/rest{suffix}/{service}/{operation}`.
    pub fn rest_path(&self, service: &str, operation: &str) -> String {
        format!(
            "{}/rest{}/{}/{}",
            self.script_url_path, self.script_suffix, service, operation
        )
    }

    /// Path of an attachment: `{pub}/{web}/{topic}/{file}`.
    ///
    /// Dotted subweb names are turned into path segments; the filename is
    /// percent-encoded.
    pub fn attachment_path(&self, web: &str, topic: &str, file: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.pub_url_path,
            web.replace('.', "/"),
            topic,
            urlencoding::encode(file)
        )
    }

    /// Join a site-relative path onto the base URL, if one is configured.
    pub fn absolutize(&self, path: &str) -> String {
        match &self.base {
            Some(base) => match base.join(path) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    debug!(path = path, error = %e, "could not join path onto base URL");
                    path.to_string()
                }
            },
            None => path.to_string(),
        }
    }
}

fn trim_path(path: String) -> String {
    path.trim_end_matches('/').to_string()
}
